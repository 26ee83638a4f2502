//! Pass trait for whole-program transformations.

use crate::{compiler::EventLog, ir::Program, Result};

/// A transformation that runs over an entire [`Program`].
///
/// Unlike per-function passes, a program pass may append new functions, so it
/// receives the program mutably and is expected to iterate it by index.
/// Passes keep their own run state, which is why `run_on_program` takes
/// `&mut self`.
pub trait ProgramPass {
    /// Unique name for logging and debugging.
    fn name(&self) -> &'static str;

    /// Human-readable description of what the pass does.
    fn description(&self) -> &'static str {
        ""
    }

    /// Run the pass over `program`.
    ///
    /// Returns `true` if the pass changed control flow in a way that
    /// invalidates analyses, `false` otherwise. Events should be recorded
    /// into `events`.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is inconsistent with the pass's
    /// assumptions (for example a call site that cannot be found).
    fn run_on_program(&mut self, program: &mut Program, events: &EventLog) -> Result<bool>;
}
