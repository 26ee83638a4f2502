// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # argspec
//!
//! Constant-argument function specialization over a small SSA IR.
//!
//! When a call passes an integer literal, `argspec` clones the callee, points
//! the call at the clone and replaces the parameter inside the clone by the
//! literal. Downstream optimizers can then fold, prune and inline the clone
//! using the known value without any interprocedural constant propagation.
//!
//! ## Features
//!
//! - **Owned arena IR** - functions, blocks and variables addressed by index
//! - **Structural cloning** - deep copy with an explicit correspondence map
//! - **Deterministic naming** - clones of `f` are `f1`, `f2`, ... in call order
//! - **Event log** - every decision and edit is recorded for inspection
//!
//! ## Quick Start
//!
//! ```rust
//! use argspec::prelude::*;
//!
//! let mut program = Program::new();
//!
//! // fn scale(a, b) { ret a * b }
//! let scale = program.add_function(
//!     FunctionBuilder::new("scale", IrType::I32)
//!         .param(IrType::I32)
//!         .param(IrType::I32)
//!         .build_with(|f| {
//!             let (a, b) = (f.arg(0), f.arg(1));
//!             f.block(0, |blk| {
//!                 let r = blk.mul(a, b);
//!                 blk.ret_val(r);
//!             });
//!         }),
//! )?;
//!
//! // fn main(x) { ret scale(8, x) }
//! let main = program.add_function(
//!     FunctionBuilder::new("main", IrType::I32)
//!         .param(IrType::I32)
//!         .build_with(|f| {
//!             let x = f.arg(0);
//!             f.block(0, |blk| {
//!                 let r = blk.call(scale, IrType::I32, vec![Value::i32(8), x.into()]);
//!                 blk.ret_val(r);
//!             });
//!         }),
//! )?;
//!
//! let mut pass = SpecializationPass::new();
//! pass.run(&mut program)?;
//!
//! let scale1 = program.find("scale1").expect("clone exists");
//! let call = program.instruction(CallSite::new(main, 0, 0))?;
//! assert_eq!(call.op().direct_callee(), Some(scale1));
//! assert!(!program.get(scale1)?.is_parameter_used(0));
//! assert!(program.get(scale1)?.is_parameter_used(1));
//! # Ok::<(), argspec::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - the program representation, builder and cloning primitive
//! - [`compiler`] - the [`compiler::ProgramPass`] trait, the event log and
//!   the [`compiler::SpecializationPass`]
//!
//! ## Diagnostics
//!
//! The pass reports through the [`log`](https://docs.rs/log) facade. Every
//! inspected direct call produces one `info` line, `needs to be cloned: f` or
//! `does not need to be cloned: f`; clone details go to `debug`. Install any
//! `log` backend to see them. The same decisions are recorded as
//! [`compiler::Event`]s in [`compiler::SpecializationPass::events`].
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use argspec::{ir::{Function, FunctionId, IrType, Program}, Error};
//!
//! let program = Program::new();
//! match program.get(FunctionId::new(0)) {
//!     Ok(_) => unreachable!(),
//!     Err(Error::FunctionNotFound(id)) => println!("no function {id}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use argspec::prelude::*;
///
/// let mut program = Program::new();
/// program.add_function(Function::new("f", IrType::Void))?;
/// SpecializationPass::new().run(&mut program)?;
/// # Ok::<(), argspec::Error>(())
/// ```
pub mod prelude;

/// The intermediate representation.
///
/// Programs, functions, blocks, instructions and values, plus the
/// [`ir::FunctionBuilder`] for writing IR by hand and
/// [`ir::Function::clone_with_map`] for structural copies.
pub mod ir;

/// Program passes and their event log.
///
/// Contains the [`compiler::SpecializationPass`] and its building blocks, the
/// [`compiler::ProgramPass`] trait, and the [`compiler::EventLog`] passes
/// record into.
pub mod compiler;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `argspec` Error type
///
/// The main error type for all operations in this crate. Lookups, validation and
/// function insertion all report through it.
pub use error::Error;
