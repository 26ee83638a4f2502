//! IR instructions.
//!
//! An [`Instruction`] wraps a single [`Op`]. Keeping the wrapper separate from
//! the operation leaves room for per-instruction metadata without touching
//! every match on [`Op`].

use std::fmt;

use crate::ir::{Op, VarId};

/// A single instruction inside a [`crate::ir::Block`].
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    op: Op,
}

impl Instruction {
    /// Creates an instruction from an operation.
    #[must_use]
    pub const fn new(op: Op) -> Self {
        Self { op }
    }

    /// Returns the operation.
    #[must_use]
    pub const fn op(&self) -> &Op {
        &self.op
    }

    /// Returns the operation for in-place modification.
    pub fn op_mut(&mut self) -> &mut Op {
        &mut self.op
    }

    /// Replaces the operation.
    pub fn set_op(&mut self, op: Op) {
        self.op = op;
    }

    /// Returns the variable this instruction defines, if any.
    #[must_use]
    pub fn def(&self) -> Option<VarId> {
        self.op.dest()
    }

    /// Returns `true` if this instruction is a call.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        self.op.is_call()
    }

    /// Returns `true` if this instruction ends its block.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        self.op.is_terminator()
    }
}

impl From<Op> for Instruction {
    fn from(op: Op) -> Self {
        Self::new(op)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)
    }
}
