//! Basic blocks.
//!
//! A block is a straight-line sequence of instructions. Its index inside the
//! owning function is its identity; branch targets and phi predecessors refer
//! to blocks by that index.
//!
//! ```text
//! bb1:
//!   v3 = phi [bb0: v1], [bb2: v2]
//!   v4 = add v3, i32 1
//!   br v5, bb2, bb3
//! ```

use std::fmt;

use crate::ir::{Instruction, Value, VarId};

/// A basic block in a [`crate::ir::Function`].
///
/// # Examples
///
/// ```rust
/// use argspec::ir::{Block, Instruction, Op, Value};
///
/// let mut block = Block::new(0);
/// block.add_instruction(Instruction::new(Op::Return { value: Some(Value::i32(0)) }));
///
/// assert_eq!(block.instruction_count(), 1);
/// assert!(block.terminator().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block index (position in the function's block list).
    id: usize,

    /// Instructions in execution order.
    instructions: Vec<Instruction>,
}

impl Block {
    /// Creates a new empty block.
    ///
    /// # Arguments
    ///
    /// * `id` - The block index within its function
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            instructions: Vec::new(),
        }
    }

    /// Creates a new block with pre-allocated instruction capacity.
    #[must_use]
    pub fn with_capacity(id: usize, capacity: usize) -> Self {
        Self {
            id,
            instructions: Vec::with_capacity(capacity),
        }
    }

    /// Returns the block index.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Returns the instructions in this block.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns mutable access to the instructions.
    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    /// Returns the instruction at `index`.
    #[must_use]
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Returns the instruction at `index` for modification.
    pub fn instruction_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.instructions.get_mut(index)
    }

    /// Appends an instruction.
    pub fn add_instruction(&mut self, instr: Instruction) {
        self.instructions.push(instr);
    }

    /// Returns the number of instructions.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the block has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the last instruction if it is a terminator.
    #[must_use]
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last().filter(|instr| instr.is_terminator())
    }

    /// Returns the successor block indices taken from the terminator.
    #[must_use]
    pub fn successors(&self) -> Vec<usize> {
        self.terminator()
            .map(|instr| instr.op().successors())
            .unwrap_or_default()
    }

    /// Returns the variables defined in this block, in order.
    pub fn defined_variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.instructions.iter().filter_map(Instruction::def)
    }

    /// Replaces every use of `old_var` in this block with `new_value`.
    ///
    /// # Returns
    ///
    /// The number of operands rewritten.
    pub fn replace_uses(&mut self, old_var: VarId, new_value: &Value) -> usize {
        self.instructions
            .iter_mut()
            .map(|instr| instr.op_mut().replace_uses(old_var, new_value))
            .sum()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bb{}:", self.id)?;
        for instr in &self.instructions {
            writeln!(f, "  {instr}")?;
        }
        Ok(())
    }
}
