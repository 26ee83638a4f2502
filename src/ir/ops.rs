//! IR operations.
//!
//! This module defines [`Op`], the `result = op(operands)` form every
//! instruction takes. Operands are [`Value`]s, so a literal can appear
//! directly wherever a variable can; this is what the argument substituter
//! relies on when it rewrites a parameter use into a constant.
//!
//! # Field Documentation
//!
//! The struct fields in this module follow a consistent naming convention:
//! - `dest`: The destination variable for the operation result
//! - `left`, `right`: Binary operands (left and right hand side)
//! - `operand`: Unary operand
//! - `src`: The value being copied
//! - `callee`, `args`: Call target and its ordered arguments
//! - `target`, `true_target`, `false_target`: Branch targets (block indices)
//! - `operands`: Phi inputs as `(predecessor block, value)` pairs

#![allow(missing_docs)]

use std::fmt;

use crate::ir::{FunctionId, Value, VarId};

/// Kind of binary arithmetic or bitwise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpKind {
    /// Addition: `left + right`
    Add,
    /// Subtraction: `left - right`
    Sub,
    /// Multiplication: `left * right`
    Mul,
    /// Signed division: `left / right`
    Div,
    /// Signed remainder: `left % right`
    Rem,
    /// Bitwise AND: `left & right`
    And,
    /// Bitwise OR: `left | right`
    Or,
    /// Bitwise XOR: `left ^ right`
    Xor,
    /// Shift left: `value << amount`
    Shl,
    /// Arithmetic shift right: `value >> amount`
    Shr,
}

impl fmt::Display for BinaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Mul => write!(f, "mul"),
            Self::Div => write!(f, "div"),
            Self::Rem => write!(f, "rem"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Xor => write!(f, "xor"),
            Self::Shl => write!(f, "shl"),
            Self::Shr => write!(f, "shr"),
        }
    }
}

/// Kind of unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    /// Negation: `-operand`
    Neg,
    /// Bitwise NOT: `~operand`
    Not,
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neg => write!(f, "neg"),
            Self::Not => write!(f, "not"),
        }
    }
}

/// Comparison operator for [`Op::Cmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpKind {
    /// Equal: `left == right`
    Eq,
    /// Not equal: `left != right`
    Ne,
    /// Less than: `left < right`
    Lt,
    /// Less than or equal: `left <= right`
    Le,
    /// Greater than: `left > right`
    Gt,
    /// Greater than or equal: `left >= right`
    Ge,
}

impl fmt::Display for CmpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "eq"),
            Self::Ne => write!(f, "ne"),
            Self::Lt => write!(f, "lt"),
            Self::Le => write!(f, "le"),
            Self::Gt => write!(f, "gt"),
            Self::Ge => write!(f, "ge"),
        }
    }
}

/// What a call instruction invokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Callee {
    /// Statically known function in the same program.
    Direct(FunctionId),
    /// Computed function pointer; the target is not known at compile time.
    Indirect(Value),
}

impl Callee {
    /// Returns the target function if the call is direct.
    #[must_use]
    pub const fn function(&self) -> Option<FunctionId> {
        match self {
            Self::Direct(id) => Some(*id),
            Self::Indirect(_) => None,
        }
    }
}

impl fmt::Display for Callee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(id) => write!(f, "{id}"),
            Self::Indirect(value) => write!(f, "*{value}"),
        }
    }
}

/// A single IR operation.
///
/// # Conventions
///
/// - For operations that produce a result, `dest` is the defined variable
/// - Calls that return nothing have `dest: None`
/// - Terminators ([`Op::Jump`], [`Op::Branch`], [`Op::Return`]) end a block
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Copy: `dest = src`
    Copy { dest: VarId, src: Value },

    /// Binary operation: `dest = kind left, right`
    Binary {
        dest: VarId,
        kind: BinaryOpKind,
        left: Value,
        right: Value,
    },

    /// Unary operation: `dest = kind operand`
    Unary {
        dest: VarId,
        kind: UnaryOpKind,
        operand: Value,
    },

    /// Comparison producing an `i1`: `dest = cmp.kind left, right`
    Cmp {
        dest: VarId,
        kind: CmpKind,
        left: Value,
        right: Value,
    },

    /// Phi node: `dest = phi [pred0: v0], [pred1: v1], ...`
    Phi {
        dest: VarId,
        operands: Vec<(usize, Value)>,
    },

    /// Call: `dest = call callee(args...)`
    Call {
        dest: Option<VarId>,
        callee: Callee,
        args: Vec<Value>,
    },

    /// Unconditional jump.
    Jump { target: usize },

    /// Conditional branch on an `i1` condition.
    Branch {
        condition: Value,
        true_target: usize,
        false_target: usize,
    },

    /// Return from the function.
    Return { value: Option<Value> },

    /// No operation.
    Nop,
}

impl Op {
    /// Returns the destination variable if this operation produces one.
    #[must_use]
    pub fn dest(&self) -> Option<VarId> {
        match self {
            Self::Copy { dest, .. }
            | Self::Binary { dest, .. }
            | Self::Unary { dest, .. }
            | Self::Cmp { dest, .. }
            | Self::Phi { dest, .. } => Some(*dest),
            Self::Call { dest, .. } => *dest,
            Self::Jump { .. } | Self::Branch { .. } | Self::Return { .. } | Self::Nop => None,
        }
    }

    /// Returns all operand values in evaluation order.
    ///
    /// For indirect calls the function pointer comes first, followed by the
    /// arguments.
    #[must_use]
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Self::Copy { src, .. } => vec![src],
            Self::Binary { left, right, .. } | Self::Cmp { left, right, .. } => vec![left, right],
            Self::Unary { operand, .. } => vec![operand],
            Self::Phi { operands, .. } => operands.iter().map(|(_, value)| value).collect(),
            Self::Call { callee, args, .. } => {
                let mut values = Vec::with_capacity(args.len() + 1);
                if let Callee::Indirect(target) = callee {
                    values.push(target);
                }
                values.extend(args.iter());
                values
            }
            Self::Branch { condition, .. } => vec![condition],
            Self::Return { value } => value.iter().collect(),
            Self::Jump { .. } | Self::Nop => Vec::new(),
        }
    }

    /// Returns mutable references to all operand values.
    fn operands_mut(&mut self) -> Vec<&mut Value> {
        match self {
            Self::Copy { src, .. } => vec![src],
            Self::Binary { left, right, .. } | Self::Cmp { left, right, .. } => vec![left, right],
            Self::Unary { operand, .. } => vec![operand],
            Self::Phi { operands, .. } => operands.iter_mut().map(|(_, value)| value).collect(),
            Self::Call { callee, args, .. } => {
                let mut values = Vec::with_capacity(args.len() + 1);
                if let Callee::Indirect(target) = callee {
                    values.push(target);
                }
                values.extend(args.iter_mut());
                values
            }
            Self::Branch { condition, .. } => vec![condition],
            Self::Return { value } => value.iter_mut().collect(),
            Self::Jump { .. } | Self::Nop => Vec::new(),
        }
    }

    /// Returns the variables read by this operation.
    ///
    /// A variable that appears twice (for example `add v0, v0`) is listed twice.
    #[must_use]
    pub fn uses(&self) -> Vec<VarId> {
        self.operands()
            .into_iter()
            .filter_map(Value::as_var)
            .collect()
    }

    /// Replaces every use of `old_var` with `new_value`.
    ///
    /// The destination is never touched. This is the graph-edit primitive
    /// behind both copy-style rewrites (variable for variable) and constant
    /// substitution (literal for variable).
    ///
    /// # Arguments
    ///
    /// * `old_var` - The variable to replace.
    /// * `new_value` - The value to use instead.
    ///
    /// # Returns
    ///
    /// The number of replacements made.
    pub fn replace_uses(&mut self, old_var: VarId, new_value: &Value) -> usize {
        let mut count = 0;
        for operand in self.operands_mut() {
            if operand.is_var(old_var) {
                *operand = *new_value;
                count += 1;
            }
        }
        count
    }

    /// Creates a copy of this operation with variables remapped.
    ///
    /// Both the destination and every variable operand are passed through
    /// `remap`; variables for which it returns `None` are kept unchanged.
    /// Block references are not touched, see [`Op::remap_blocks`].
    #[must_use]
    pub fn remap_variables<F>(&self, remap: F) -> Self
    where
        F: Fn(VarId) -> Option<VarId>,
    {
        let mut op = self.clone();

        for operand in op.operands_mut() {
            if let Value::Var(var) = operand {
                if let Some(new_var) = remap(*var) {
                    *var = new_var;
                }
            }
        }

        match &mut op {
            Self::Copy { dest, .. }
            | Self::Binary { dest, .. }
            | Self::Unary { dest, .. }
            | Self::Cmp { dest, .. }
            | Self::Phi { dest, .. } => {
                if let Some(new_dest) = remap(*dest) {
                    *dest = new_dest;
                }
            }
            Self::Call {
                dest: Some(dest), ..
            } => {
                if let Some(new_dest) = remap(*dest) {
                    *dest = new_dest;
                }
            }
            _ => {}
        }

        op
    }

    /// Rewrites every block reference in place.
    ///
    /// This covers branch targets as well as phi predecessors. Blocks for
    /// which `remap` returns `None` are kept unchanged.
    pub fn remap_blocks<F>(&mut self, remap: F)
    where
        F: Fn(usize) -> Option<usize>,
    {
        match self {
            Self::Jump { target } => {
                if let Some(new_target) = remap(*target) {
                    *target = new_target;
                }
            }
            Self::Branch {
                true_target,
                false_target,
                ..
            } => {
                if let Some(new_target) = remap(*true_target) {
                    *true_target = new_target;
                }
                if let Some(new_target) = remap(*false_target) {
                    *false_target = new_target;
                }
            }
            Self::Phi { operands, .. } => {
                for (pred, _) in operands.iter_mut() {
                    if let Some(new_pred) = remap(*pred) {
                        *pred = new_pred;
                    }
                }
            }
            _ => {}
        }
    }

    /// Returns the successor block indices for a terminator.
    ///
    /// Empty for returns and for non-terminators.
    #[must_use]
    pub fn successors(&self) -> Vec<usize> {
        match self {
            Self::Jump { target } => vec![*target],
            Self::Branch {
                true_target,
                false_target,
                ..
            } => vec![*true_target, *false_target],
            _ => Vec::new(),
        }
    }

    /// Returns `true` if this operation ends a basic block.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::Jump { .. } | Self::Branch { .. } | Self::Return { .. }
        )
    }

    /// Returns `true` if this is a call of any kind.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }

    /// Returns the statically known target of a direct call.
    #[must_use]
    pub fn direct_callee(&self) -> Option<FunctionId> {
        match self {
            Self::Call { callee, .. } => callee.function(),
            _ => None,
        }
    }

    /// Returns the argument list of a call.
    #[must_use]
    pub fn call_args(&self) -> Option<&[Value]> {
        match self {
            Self::Call { args, .. } => Some(args),
            _ => None,
        }
    }

    /// Points a call at `function`, leaving its arguments untouched.
    ///
    /// # Returns
    ///
    /// `true` if the operation is a call and was retargeted, `false` otherwise.
    pub fn set_callee(&mut self, function: FunctionId) -> bool {
        match self {
            Self::Call { callee, .. } => {
                *callee = Callee::Direct(function);
                true
            }
            _ => false,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy { dest, src } => write!(f, "{dest} = {src}"),
            Self::Binary {
                dest,
                kind,
                left,
                right,
            } => write!(f, "{dest} = {kind} {left}, {right}"),
            Self::Unary {
                dest,
                kind,
                operand,
            } => write!(f, "{dest} = {kind} {operand}"),
            Self::Cmp {
                dest,
                kind,
                left,
                right,
            } => write!(f, "{dest} = cmp.{kind} {left}, {right}"),
            Self::Phi { dest, operands } => {
                write!(f, "{dest} = phi")?;
                for (i, (pred, value)) in operands.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}[bb{pred}: {value}]")?;
                }
                Ok(())
            }
            Self::Call { dest, callee, args } => {
                if let Some(dest) = dest {
                    write!(f, "{dest} = ")?;
                }
                write!(f, "call {callee}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Self::Jump { target } => write!(f, "jmp bb{target}"),
            Self::Branch {
                condition,
                true_target,
                false_target,
            } => write!(f, "br {condition}, bb{true_target}, bb{false_target}"),
            Self::Return { value: Some(value) } => write!(f, "ret {value}"),
            Self::Return { value: None } => write!(f, "ret"),
            Self::Nop => write!(f, "nop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: usize) -> VarId {
        VarId::new(n)
    }

    #[test]
    fn test_replace_uses_counts_every_occurrence() {
        let mut op = Op::Binary {
            dest: v(2),
            kind: BinaryOpKind::Mul,
            left: v(0).into(),
            right: v(0).into(),
        };

        assert_eq!(op.replace_uses(v(0), &Value::i32(3)), 2);
        assert_eq!(op.uses(), Vec::<VarId>::new());
        assert_eq!(op.dest(), Some(v(2)));
        assert_eq!(op.to_string(), "v2 = mul i32 3, i32 3");
    }

    #[test]
    fn test_replace_uses_ignores_dest() {
        let mut op = Op::Copy {
            dest: v(0),
            src: v(1).into(),
        };
        assert_eq!(op.replace_uses(v(0), &Value::i32(1)), 0);
        assert_eq!(op.dest(), Some(v(0)));
    }

    #[test]
    fn test_call_operands_include_indirect_target() {
        let op = Op::Call {
            dest: None,
            callee: Callee::Indirect(v(4).into()),
            args: vec![v(1).into(), Value::i32(2)],
        };
        assert_eq!(op.uses(), vec![v(4), v(1)]);
        assert_eq!(op.direct_callee(), None);
        assert_eq!(op.call_args().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn test_set_callee_keeps_arguments() {
        let mut op = Op::Call {
            dest: Some(v(3)),
            callee: Callee::Direct(FunctionId::new(0)),
            args: vec![Value::i32(5), v(1).into()],
        };

        assert!(op.set_callee(FunctionId::new(7)));
        assert_eq!(op.direct_callee(), Some(FunctionId::new(7)));
        assert_eq!(
            op.call_args(),
            Some(&[Value::i32(5), Value::Var(v(1))][..])
        );

        let mut not_call = Op::Nop;
        assert!(!not_call.set_callee(FunctionId::new(7)));
    }

    #[test]
    fn test_remap_variables_and_blocks() {
        let op = Op::Phi {
            dest: v(5),
            operands: vec![(0, v(1).into()), (2, Value::i32(0))],
        };

        let mut remapped = op.remap_variables(|var| Some(VarId::new(var.index() + 10)));
        remapped.remap_blocks(|block| if block == 2 { Some(7) } else { None });

        assert_eq!(
            remapped,
            Op::Phi {
                dest: v(15),
                operands: vec![(0, v(11).into()), (7, Value::i32(0))],
            }
        );
        // The source operation is unchanged.
        assert_eq!(op.dest(), Some(v(5)));
    }

    #[test]
    fn test_terminators_and_successors() {
        let br = Op::Branch {
            condition: v(0).into(),
            true_target: 1,
            false_target: 2,
        };
        assert!(br.is_terminator());
        assert_eq!(br.successors(), vec![1, 2]);
        assert!(Op::Return { value: None }.is_terminator());
        assert!(Op::Return { value: None }.successors().is_empty());
        assert!(!Op::Nop.is_terminator());
    }
}
