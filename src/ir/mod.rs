//! Intermediate representation the specialization pass operates on.
//!
//! The IR is a small, typed, SSA-form control-flow-graph representation:
//!
//! - [`Program`] - an append-only arena of [`Function`]s addressed by [`FunctionId`]
//! - [`Function`] - parameters, a variable table and a list of [`Block`]s
//! - [`Block`] - a straight-line sequence of [`Instruction`]s ending in a terminator
//! - [`Op`] - the operation an instruction performs; operands are [`Value`]s
//! - [`Value`] - either a variable ([`VarId`]) or a literal ([`ConstValue`])
//!
//! Calls name their target through [`Callee`]. Only [`Callee::Direct`] calls
//! have a statically known target; indirect calls go through a function
//! pointer value.
//!
//! # Building IR
//!
//! [`FunctionBuilder`] offers a closure-based API for writing functions by
//! hand:
//!
//! ```rust
//! use argspec::ir::{FunctionBuilder, IrType, Program, Value};
//!
//! let mut program = Program::new();
//! let add = program.add_function(
//!     FunctionBuilder::new("add", IrType::I32)
//!         .param(IrType::I32)
//!         .param(IrType::I32)
//!         .build_with(|f| {
//!             let (a, b) = (f.arg(0), f.arg(1));
//!             f.block(0, |blk| {
//!                 let sum = blk.add(a, b);
//!                 blk.ret_val(sum);
//!             });
//!         }),
//! )?;
//!
//! program.add_function(
//!     FunctionBuilder::new("main", IrType::I32).build_with(|f| {
//!         f.block(0, |blk| {
//!             let r = blk.call(add, IrType::I32, vec![Value::i32(1), Value::i32(2)]);
//!             blk.ret_val(r);
//!         });
//!     }),
//! )?;
//!
//! program.validate()?;
//! # Ok::<(), argspec::Error>(())
//! ```

mod block;
mod builder;
mod cloning;
mod function;
mod instruction;
mod ops;
mod program;
mod types;
mod value;
mod variable;

pub use block::Block;
pub use builder::{BlockBuilder, FunctionBuilder, FunctionContext};
pub use cloning::CloneMap;
pub use function::Function;
pub use instruction::Instruction;
pub use ops::{BinaryOpKind, Callee, CmpKind, Op, UnaryOpKind};
pub use program::{CallSite, FunctionId, Program};
pub use types::IrType;
pub use value::{ConstValue, IntConst, Value};
pub use variable::{VarId, Variable, VariableOrigin};
