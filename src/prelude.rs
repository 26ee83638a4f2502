//! # argspec Prelude
//!
//! Re-exports of the types needed to build a program and run the
//! specialization pass over it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all argspec operations
pub use crate::Error;

/// The result type used throughout argspec
pub use crate::Result;

// ================================================================================================
// Intermediate Representation
// ================================================================================================

/// Program container and identifiers
pub use crate::ir::{CallSite, FunctionId, Program};

/// Functions, blocks and instructions
pub use crate::ir::{Block, Function, Instruction, Op};

/// Values, types and variables
pub use crate::ir::{ConstValue, IntConst, IrType, Value, VarId};

/// Hand-written IR
pub use crate::ir::FunctionBuilder;

// ================================================================================================
// Passes
// ================================================================================================

/// Pass trait and the specialization pass
pub use crate::compiler::{ProgramPass, SpecializationPass};

/// Event inspection
pub use crate::compiler::{DerivedStats, EventKind, EventLog};
