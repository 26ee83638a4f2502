//! Builder pattern for programmatic IR construction.
//!
//! The builder uses a closure-based API where all blocks are defined within
//! a single expression, making the CFG structure visually clear:
//!
//! ```rust
//! use argspec::ir::{CmpKind, FunctionBuilder, IrType, Value};
//!
//! let abs = FunctionBuilder::new("abs", IrType::I32)
//!     .param(IrType::I32)
//!     .build_with(|f| {
//!         let x = f.arg(0);
//!
//!         f.block(0, |b| {
//!             let negative = b.cmp(CmpKind::Lt, x, Value::i32(0));
//!             b.branch(negative, 1, 2);
//!         });
//!         f.block(1, |b| {
//!             let n = b.neg(x);
//!             b.ret_val(n);
//!         });
//!         f.block(2, |b| b.ret_val(x));
//!     });
//!
//! assert_eq!(abs.block_count(), 3);
//! assert!(abs.validate().is_ok());
//! ```
//!
//! # Variable Management
//!
//! Variables are allocated as operations are added. Operations that produce
//! values return the new [`VarId`], which can be passed straight into later
//! operations. Result types follow the left operand; comparisons produce
//! `i1`.

use std::collections::HashMap;

use crate::ir::{
    BinaryOpKind, Block, Callee, CmpKind, Function, FunctionId, Instruction, IrType, Op,
    UnaryOpKind, Value, VarId,
};

/// Builder for constructing functions programmatically.
#[derive(Debug)]
pub struct FunctionBuilder {
    function: Function,
    /// Blocks indexed by ID (may have gaps)
    blocks: HashMap<usize, Block>,
    /// Highest block ID seen
    max_block_id: Option<usize>,
}

impl FunctionBuilder {
    /// Creates a new builder for a function with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: IrType) -> Self {
        Self {
            function: Function::new(name, return_type),
            blocks: HashMap::new(),
            max_block_id: None,
        }
    }

    /// Appends a parameter of type `ty`.
    #[must_use]
    pub fn param(mut self, ty: IrType) -> Self {
        self.function.add_param(ty);
        self
    }

    /// Builds the function using a closure that defines all blocks.
    ///
    /// Block ids that are skipped are filled with empty blocks, which
    /// [`Function::validate`] reports as malformed.
    pub fn build_with<F>(mut self, f: F) -> Function
    where
        F: FnOnce(&mut FunctionContext<'_>),
    {
        let mut ctx = FunctionContext { builder: &mut self };
        f(&mut ctx);
        self.build()
    }

    /// Builds a function with no body.
    #[must_use]
    pub fn declare(self) -> Function {
        self.build()
    }

    fn build(mut self) -> Function {
        if let Some(max) = self.max_block_id {
            for id in 0..=max {
                let block = self.blocks.remove(&id).unwrap_or_else(|| Block::new(id));
                self.function.add_block(block);
            }
        }
        self.function
    }

    fn type_of(&self, value: &Value) -> IrType {
        match value {
            Value::Var(var) => self
                .function
                .variable(*var)
                .map_or(IrType::Void, |v| v.ty()),
            Value::Const(c) => c.ty(),
        }
    }
}

/// Context passed to the build closure for defining blocks.
pub struct FunctionContext<'a> {
    builder: &'a mut FunctionBuilder,
}

impl FunctionContext<'_> {
    /// Gets the parameter variable at the specified index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a declared parameter.
    #[must_use]
    pub fn arg(&self, index: usize) -> VarId {
        self.builder.function.params()[index]
    }

    /// Allocates a fresh variable of type `ty`.
    ///
    /// Use this when a variable is needed before it is defined, such as a
    /// phi placeholder.
    #[must_use]
    pub fn var(&mut self, ty: IrType) -> VarId {
        self.builder.function.alloc_var(ty)
    }

    /// Defines a block with the given ID using a closure.
    pub fn block<F>(&mut self, id: usize, f: F)
    where
        F: FnOnce(&mut BlockBuilder<'_>),
    {
        if self.builder.max_block_id.map_or(true, |max| id > max) {
            self.builder.max_block_id = Some(id);
        }

        let mut block = Block::new(id);
        let mut block_builder = BlockBuilder {
            builder: self.builder,
            block: &mut block,
        };

        f(&mut block_builder);

        self.builder.blocks.insert(id, block);
    }
}

/// Builder for constructing individual blocks.
///
/// Operations that produce values return the allocated [`VarId`].
pub struct BlockBuilder<'a> {
    builder: &'a mut FunctionBuilder,
    block: &'a mut Block,
}

impl BlockBuilder<'_> {
    fn push(&mut self, op: Op) {
        self.block.add_instruction(Instruction::new(op));
    }

    fn binary(&mut self, kind: BinaryOpKind, left: Value, right: Value) -> VarId {
        let ty = self.builder.type_of(&left);
        let dest = self.builder.function.alloc_var(ty);
        self.push(Op::Binary {
            dest,
            kind,
            left,
            right,
        });
        dest
    }

    fn unary(&mut self, kind: UnaryOpKind, operand: Value) -> VarId {
        let ty = self.builder.type_of(&operand);
        let dest = self.builder.function.alloc_var(ty);
        self.push(Op::Unary {
            dest,
            kind,
            operand,
        });
        dest
    }

    /// Adds: dest = src
    pub fn copy(&mut self, src: impl Into<Value>) -> VarId {
        let src = src.into();
        let ty = self.builder.type_of(&src);
        let dest = self.builder.function.alloc_var(ty);
        self.push(Op::Copy { dest, src });
        dest
    }

    /// Adds: dest = add left, right
    pub fn add(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Add, left.into(), right.into())
    }

    /// Adds: dest = sub left, right
    pub fn sub(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Sub, left.into(), right.into())
    }

    /// Adds: dest = mul left, right
    pub fn mul(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Mul, left.into(), right.into())
    }

    /// Adds: dest = div left, right
    pub fn div(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Div, left.into(), right.into())
    }

    /// Adds: dest = rem left, right
    pub fn rem(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Rem, left.into(), right.into())
    }

    /// Adds: dest = and left, right
    pub fn and(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::And, left.into(), right.into())
    }

    /// Adds: dest = or left, right
    pub fn or(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Or, left.into(), right.into())
    }

    /// Adds: dest = xor left, right
    pub fn xor(&mut self, left: impl Into<Value>, right: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Xor, left.into(), right.into())
    }

    /// Adds: dest = shl value, amount
    pub fn shl(&mut self, value: impl Into<Value>, amount: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Shl, value.into(), amount.into())
    }

    /// Adds: dest = shr value, amount
    pub fn shr(&mut self, value: impl Into<Value>, amount: impl Into<Value>) -> VarId {
        self.binary(BinaryOpKind::Shr, value.into(), amount.into())
    }

    /// Adds: dest = neg operand
    pub fn neg(&mut self, operand: impl Into<Value>) -> VarId {
        self.unary(UnaryOpKind::Neg, operand.into())
    }

    /// Adds: dest = not operand
    pub fn not(&mut self, operand: impl Into<Value>) -> VarId {
        self.unary(UnaryOpKind::Not, operand.into())
    }

    /// Adds: dest = cmp.kind left, right (an `i1`)
    pub fn cmp(
        &mut self,
        kind: CmpKind,
        left: impl Into<Value>,
        right: impl Into<Value>,
    ) -> VarId {
        let dest = self.builder.function.alloc_var(IrType::I1);
        self.push(Op::Cmp {
            dest,
            kind,
            left: left.into(),
            right: right.into(),
        });
        dest
    }

    /// Adds: dest = phi [pred: value], ...
    pub fn phi(&mut self, ty: IrType, operands: Vec<(usize, Value)>) -> VarId {
        let dest = self.builder.function.alloc_var(ty);
        self.push(Op::Phi { dest, operands });
        dest
    }

    /// Adds a phi defining a variable allocated earlier with
    /// [`FunctionContext::var`].
    pub fn phi_into(&mut self, dest: VarId, operands: Vec<(usize, Value)>) {
        self.push(Op::Phi { dest, operands });
    }

    /// Adds: dest = call callee(args...)
    pub fn call(&mut self, callee: FunctionId, return_type: IrType, args: Vec<Value>) -> VarId {
        let dest = self.builder.function.alloc_var(return_type);
        self.push(Op::Call {
            dest: Some(dest),
            callee: Callee::Direct(callee),
            args,
        });
        dest
    }

    /// Adds: call callee(args...) with the result discarded
    pub fn call_void(&mut self, callee: FunctionId, args: Vec<Value>) {
        self.push(Op::Call {
            dest: None,
            callee: Callee::Direct(callee),
            args,
        });
    }

    /// Adds: call *target(args...) through a function pointer
    pub fn call_indirect(&mut self, target: impl Into<Value>, args: Vec<Value>) {
        self.push(Op::Call {
            dest: None,
            callee: Callee::Indirect(target.into()),
            args,
        });
    }

    /// Adds: jmp target
    pub fn jump(&mut self, target: usize) {
        self.push(Op::Jump { target });
    }

    /// Adds: br condition, true_target, false_target
    pub fn branch(&mut self, condition: impl Into<Value>, true_target: usize, false_target: usize) {
        self.push(Op::Branch {
            condition: condition.into(),
            true_target,
            false_target,
        });
    }

    /// Adds: ret
    pub fn ret(&mut self) {
        self.push(Op::Return { value: None });
    }

    /// Adds: ret value
    pub fn ret_val(&mut self, value: impl Into<Value>) {
        self.push(Op::Return {
            value: Some(value.into()),
        });
    }

    /// Adds: nop
    pub fn nop(&mut self) {
        self.push(Op::Nop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_types_follow_operands() {
        let func = FunctionBuilder::new("f", IrType::I64)
            .param(IrType::I64)
            .build_with(|f| {
                let x = f.arg(0);
                f.block(0, |b| {
                    let sum = b.add(x, Value::i64(1));
                    let c = b.cmp(CmpKind::Eq, sum, x);
                    let _ = b.copy(c);
                    b.ret_val(sum);
                });
            });

        let types: Vec<IrType> = func.variables().iter().map(|v| v.ty()).collect();
        assert_eq!(types, vec![IrType::I64, IrType::I64, IrType::I1, IrType::I1]);
    }

    #[test]
    fn test_gaps_are_filled() {
        let func = FunctionBuilder::new("f", IrType::Void).build_with(|f| {
            f.block(2, |b| b.ret());
        });
        assert_eq!(func.block_count(), 3);
        assert!(func.blocks()[0].is_empty());
        assert!(func.validate().is_err());
    }

    #[test]
    fn test_declare_has_no_body() {
        let func = FunctionBuilder::new("ext", IrType::I32)
            .param(IrType::I32)
            .declare();
        assert!(func.is_empty());
        assert_eq!(func.param_count(), 1);
    }
}
