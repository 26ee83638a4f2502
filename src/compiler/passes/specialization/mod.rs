//! Constant-argument function specialization.
//!
//! For every direct call that passes an integer literal, the callee is
//! cloned, the call is pointed at the clone, and inside the clone every use
//! of a parameter that received a literal is replaced by that literal. Later
//! passes can then fold the constants, drop dead branches or inline the
//! now-smaller body without any interprocedural analysis.
//!
//! ```text
//! before                              after
//! ------                              -----
//! fn f(a, b) { ret a * b }            fn f(a, b)  { ret a * b }
//! fn main(x) { f(5, x) }              fn main(x)  { f1(5, x) }
//!                                     fn f1(a, b) { ret 5 * b }
//! ```
//!
//! # Components
//!
//! - [`is_constant_argument`] / [`needs_clone`] - the per-call decision
//! - [`CloneRegistry`] - clone identity and per-name counters for one run
//! - [`setup_clone`] - copy, name and append
//! - [`retarget_call`] - point the call at the clone
//! - [`substitute_constant_arguments`] - fold the literals into the clone
//! - [`SpecializationPass`] - visits every call once, in program order
//!
//! Clones are appended while the program is being walked and are visited in
//! turn. A clone is never itself cloned, but substitution can turn calls
//! inside a clone into constant calls to an original, which can repeat
//! indefinitely for self-feeding recursion. The clone limit bounds this.

mod cloner;
mod policy;
mod registry;
mod rewrite;

use std::time::{Duration, Instant};

pub use cloner::setup_clone;
pub use policy::{is_constant_argument, needs_clone};
pub use registry::CloneRegistry;
pub use rewrite::{retarget_call, substitute_constant_arguments, Substitution};

use crate::{
    compiler::{DerivedStats, EventKind, EventLog, ProgramPass},
    ir::{Block, CallSite, FunctionId, Program, Value},
    Result,
};

/// Default maximum number of clones a single run may create.
pub const DEFAULT_CLONE_LIMIT: usize = 4096;

/// Specializes callees for call sites that pass integer constants.
///
/// # Examples
///
/// ```rust
/// use argspec::compiler::SpecializationPass;
/// use argspec::ir::{FunctionBuilder, IrType, Program, Value};
///
/// let mut program = Program::new();
/// let f = program.add_function(
///     FunctionBuilder::new("f", IrType::I32)
///         .param(IrType::I32)
///         .build_with(|fc| {
///             let a = fc.arg(0);
///             fc.block(0, |b| {
///                 let r = b.add(a, Value::i32(1));
///                 b.ret_val(r);
///             });
///         }),
/// )?;
/// let main = program.add_function(
///     FunctionBuilder::new("main", IrType::I32).build_with(|fc| {
///         fc.block(0, |b| {
///             let r = b.call(f, IrType::I32, vec![Value::i32(5)]);
///             b.ret_val(r);
///         });
///     }),
/// )?;
///
/// let mut pass = SpecializationPass::new();
/// assert!(!pass.run(&mut program)?);
///
/// let clone = program.find("f1").unwrap();
/// assert!(pass.registry().is_clone(clone));
/// assert!(!program.get(clone)?.is_parameter_used(0));
/// # let _ = main;
/// # Ok::<(), argspec::Error>(())
/// ```
#[derive(Debug)]
pub struct SpecializationPass {
    /// Clone identity and name counters, reset at the start of every run.
    registry: CloneRegistry,
    /// Maximum number of clones per run.
    clone_limit: usize,
    /// Events from the most recent [`SpecializationPass::run`].
    events: EventLog,
    /// Duration of the most recent run.
    elapsed: Duration,
}

impl Default for SpecializationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecializationPass {
    /// Creates a new pass with the default clone limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: CloneRegistry::new(),
            clone_limit: DEFAULT_CLONE_LIMIT,
            events: EventLog::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the maximum number of clones a single run may create.
    ///
    /// Once the limit is reached, every remaining qualifying call is left
    /// pointing at its original callee and a single warning is recorded.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum clones per run. `0` disables specialization.
    #[must_use]
    pub fn with_clone_limit(mut self, limit: usize) -> Self {
        self.clone_limit = limit;
        self
    }

    /// Returns the configured clone limit.
    #[must_use]
    pub fn clone_limit(&self) -> usize {
        self.clone_limit
    }

    /// Returns the registry of the most recent run.
    #[must_use]
    pub fn registry(&self) -> &CloneRegistry {
        &self.registry
    }

    /// Returns the events of the most recent [`SpecializationPass::run`].
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Returns statistics for the most recent [`SpecializationPass::run`].
    #[must_use]
    pub fn stats(&self) -> DerivedStats {
        DerivedStats::from_log(&self.events).with_time(self.elapsed)
    }

    /// Runs the pass over `program`, keeping the events for inspection.
    ///
    /// Returns `Ok(false)` on success even when clones were added and calls
    /// retargeted. Use [`SpecializationPass::stats`] or
    /// [`SpecializationPass::events`] to see what changed.
    ///
    /// # Errors
    ///
    /// Returns a lookup error only if the program changes shape underneath
    /// the pass. Calls to functions outside the program are skipped.
    pub fn run(&mut self, program: &mut Program) -> Result<bool> {
        let events = EventLog::new();
        let result = self.run_on_program(program, &events);
        self.events = events;
        result
    }

    /// Visits every instruction of every function, including clones appended
    /// along the way.
    fn specialize(&mut self, program: &mut Program, events: &EventLog) -> Result<()> {
        let mut exhausted = false;
        let mut func_idx = 0;

        while func_idx < program.function_count() {
            let function = FunctionId::new(func_idx);
            func_idx += 1;

            // Block shapes of an existing function never change during a run.
            let shape: Vec<usize> = program
                .get(function)?
                .blocks()
                .iter()
                .map(Block::instruction_count)
                .collect();

            for (block, &count) in shape.iter().enumerate() {
                for index in 0..count {
                    let site = CallSite::new(function, block, index);
                    self.visit(program, site, events, &mut exhausted)?;
                }
            }
        }

        Ok(())
    }

    fn visit(
        &mut self,
        program: &mut Program,
        site: CallSite,
        events: &EventLog,
        exhausted: &mut bool,
    ) -> Result<()> {
        let op = program.instruction(site)?.op();
        let Some(target) = op.direct_callee() else {
            return Ok(());
        };
        let Some(callee) = program.function(target) else {
            return Ok(());
        };
        let target_name = callee.name().to_string();
        let args: Vec<Value> = op.call_args().map(<[Value]>::to_vec).unwrap_or_default();

        let mut qualifies = needs_clone(&args, target, &self.registry);
        if qualifies && self.registry.clone_count() >= self.clone_limit {
            if !*exhausted {
                *exhausted = true;
                log::warn!(
                    "clone limit of {} reached at {}, remaining calls keep their callee",
                    self.clone_limit,
                    site
                );
                events
                    .record(EventKind::Warning)
                    .at(site)
                    .pass(self.name())
                    .message(format!("clone limit of {} reached", self.clone_limit));
            }
            qualifies = false;
        }

        if !qualifies {
            log::info!("does not need to be cloned: {target_name}");
            events
                .record(EventKind::CloneNotRequired)
                .at(site)
                .pass(self.name())
                .message(format!("does not need to be cloned: {target_name}"));
            return Ok(());
        }

        log::info!("needs to be cloned: {target_name}");
        events
            .record(EventKind::CloneRequired)
            .at(site)
            .pass(self.name())
            .message(format!("needs to be cloned: {target_name}"));

        let clone = setup_clone(program, target, &mut self.registry)?;
        let clone_name = program.get(clone)?.name().to_string();
        events
            .record(EventKind::FunctionCloned)
            .function(clone)
            .pass(self.name())
            .message(format!("{target_name} -> {clone_name}"));

        retarget_call(program, site, clone)?;
        events
            .record(EventKind::CallRetargeted)
            .at(site)
            .pass(self.name())
            .message(format!("call now targets {clone_name}"));

        for sub in substitute_constant_arguments(&args, program.get_mut(clone)?) {
            events
                .record(EventKind::ArgumentSubstituted)
                .function(clone)
                .pass(self.name())
                .message(format!(
                    "{clone_name}: {} -> {} ({} uses)",
                    sub.param, sub.value, sub.uses
                ));
        }

        self.registry.register(clone);
        Ok(())
    }
}

impl ProgramPass for SpecializationPass {
    fn name(&self) -> &'static str {
        "SpecializationPass"
    }

    fn description(&self) -> &'static str {
        "Clones callees for call sites with integer constant arguments"
    }

    fn run_on_program(&mut self, program: &mut Program, events: &EventLog) -> Result<bool> {
        let start = Instant::now();
        self.registry.clear();

        events
            .record(EventKind::PassStarted)
            .pass(self.name())
            .message(format!("{} functions", program.function_count()));

        self.specialize(program, events)?;
        self.elapsed = start.elapsed();

        log::debug!(
            "{} finished: {} clones in {:?}",
            self.name(),
            self.registry.clone_count(),
            self.elapsed
        );
        events
            .record(EventKind::PassCompleted)
            .pass(self.name())
            .message(format!("{} clones", self.registry.clone_count()));

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{FunctionBuilder, IrType},
        test::{caller, identity, identity_called_with},
    };

    #[test]
    fn test_pass_creation() {
        let pass = SpecializationPass::new();
        assert_eq!(pass.name(), "SpecializationPass");
        assert_eq!(pass.clone_limit(), DEFAULT_CLONE_LIMIT);
        assert!(pass.events().is_empty());

        let custom = SpecializationPass::default().with_clone_limit(3);
        assert_eq!(custom.clone_limit(), 3);
    }

    #[test]
    fn test_empty_program() {
        let mut program = Program::new();
        let mut pass = SpecializationPass::new();
        assert!(!pass.run(&mut program).unwrap());
        assert_eq!(pass.events().decisions().count(), 0);
        assert!(pass.events().has(EventKind::PassCompleted));
    }

    #[test]
    fn test_registry_reset_between_runs() {
        let (mut first, _) = identity_called_with(Value::i32(3));
        let mut pass = SpecializationPass::new();
        pass.run(&mut first).unwrap();
        assert_eq!(pass.registry().clone_count(), 1);

        let (mut second, _) = identity_called_with(Value::i32(4));
        pass.run(&mut second).unwrap();
        assert_eq!(second.get(FunctionId::new(2)).unwrap().name(), "id1");
        assert_eq!(pass.registry().counter("id"), 1);
        assert_eq!(pass.events().count_kind(EventKind::FunctionCloned), 1);
    }

    #[test]
    fn test_zero_limit_disables_cloning() {
        let (mut program, _) = identity_called_with(Value::i32(3));

        let mut pass = SpecializationPass::new().with_clone_limit(0);
        pass.run(&mut program).unwrap();

        assert_eq!(program.function_count(), 2);
        assert_eq!(pass.events().warnings().count(), 1);
        assert_eq!(pass.events().count_kind(EventKind::CloneNotRequired), 1);
    }

    #[test]
    fn test_run_on_program_records_into_caller_log() {
        let (mut program, _) = identity_called_with(Value::i32(3));
        let log = EventLog::new();

        let mut pass = SpecializationPass::new();
        assert!(!pass.run_on_program(&mut program, &log).unwrap());

        assert!(log.has(EventKind::CloneRequired));
        assert!(pass.events().is_empty());
        assert!(log.iter().all(|e| e.pass.as_deref() == Some("SpecializationPass")));
    }

    #[test]
    fn test_stats() {
        let mut program = Program::new();
        let id = program.add_function(identity("id")).unwrap();
        program
            .add_function(
                FunctionBuilder::new("main", IrType::I32)
                    .param(IrType::I32)
                    .build_with(|f| {
                        let x = f.arg(0);
                        f.block(0, |b| {
                            let r = b.call(id, IrType::I32, vec![Value::i32(3)]);
                            let s = b.call(id, IrType::I32, vec![x.into()]);
                            let t = b.add(r, s);
                            b.ret_val(t);
                        });
                    }),
            )
            .unwrap();

        let mut pass = SpecializationPass::new();
        pass.run(&mut program).unwrap();

        let stats = pass.stats();
        assert_eq!(stats.calls_inspected, 2);
        assert_eq!(stats.clones_created, 1);
        assert_eq!(stats.calls_retargeted, 1);
        assert_eq!(stats.arguments_substituted, 1);
    }

    #[test]
    fn test_existing_clone_name_is_skipped() {
        let mut program = Program::new();
        let g = program.add_function(identity("g")).unwrap();
        let id = program.add_function(identity("id")).unwrap();
        program.add_function(identity("id1")).unwrap();
        program
            .add_function(
                FunctionBuilder::new("main", IrType::I32).build_with(|f| {
                    f.block(0, |b| {
                        let r = b.call(g, IrType::I32, vec![Value::i32(1)]);
                        let s = b.call(id, IrType::I32, vec![Value::i32(5)]);
                        let t = b.add(r, s);
                        b.ret_val(t);
                    });
                }),
            )
            .unwrap();

        let mut pass = SpecializationPass::new();
        assert!(!pass.run(&mut program).unwrap());

        assert_eq!(program.function_count(), 6);
        let id2 = program.find("id2").unwrap();
        assert!(program.find("g1").is_some());
        assert!(pass.registry().is_clone(id2));
        assert!(!pass.registry().is_clone(FunctionId::new(2)));
        assert_eq!(
            program
                .instruction(CallSite::new(FunctionId::new(3), 0, 1))
                .unwrap()
                .op()
                .direct_callee(),
            Some(id2)
        );
    }

    #[test]
    fn test_every_constant_parameter_is_counted() {
        let mut program = Program::new();
        let f = program
            .add_function(
                FunctionBuilder::new("f", IrType::I32)
                    .param(IrType::I32)
                    .param(IrType::I32)
                    .build_with(|fc| {
                        let (a, b) = (fc.arg(0), fc.arg(1));
                        fc.block(0, |blk| {
                            let r = blk.mul(a, b);
                            blk.ret_val(r);
                        });
                    }),
            )
            .unwrap();
        program
            .add_function(caller("main", f, vec![Value::i32(5), Value::i32(7)]))
            .unwrap();

        let mut pass = SpecializationPass::new();
        pass.run(&mut program).unwrap();

        let stats = pass.stats();
        assert_eq!(stats.clones_created, 1);
        assert_eq!(stats.arguments_substituted, 2);
    }

    #[test]
    fn test_call_to_missing_function_is_skipped() {
        let mut program = Program::new();
        let main = program
            .add_function(caller("main", FunctionId::new(99), vec![Value::i32(5)]))
            .unwrap();
        let before = program.to_string();

        let mut pass = SpecializationPass::new();
        assert!(!pass.run(&mut program).unwrap());

        assert_eq!(program.function_count(), 1);
        assert_eq!(program.to_string(), before);
        assert_eq!(pass.events().decisions().count(), 0);
        assert!(program.get(main).is_ok());
    }
}
