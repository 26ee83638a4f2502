//! Function representation.
//!
//! A [`Function`] owns its parameters, its variable table and its blocks.
//! Variables are identified by [`VarId`], an index into the variable table;
//! parameters are ordinary variables whose origin is
//! [`VariableOrigin::Param`].
//!
//! # Structure
//!
//! ```text
//! Function
//! ├── name: String              // Unique within the program
//! ├── params: Vec<VarId>        // Formal parameters in declaration order
//! ├── return_type: IrType
//! ├── variables: Vec<Variable>  // Every variable, indexed by VarId
//! └── blocks: Vec<Block>        // Entry block is index 0
//! ```
//!
//! The IR is in SSA form: every variable has exactly one definition, either
//! as a parameter or as the destination of one instruction.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    ir::{Block, Instruction, IrType, Op, Value, VarId, Variable, VariableOrigin},
    Result,
};

/// A function in the program.
///
/// # Examples
///
/// ```rust
/// use argspec::ir::{Block, Function, Instruction, IrType, Op};
///
/// let mut func = Function::new("id", IrType::I32);
/// let x = func.add_param(IrType::I32);
///
/// let mut entry = Block::new(0);
/// entry.add_instruction(Instruction::new(Op::Return { value: Some(x.into()) }));
/// func.add_block(entry);
///
/// assert_eq!(func.param_count(), 1);
/// assert!(func.validate().is_ok());
/// assert_eq!(func.use_count(x), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name.
    name: String,

    /// Formal parameters in declaration order.
    params: Vec<VarId>,

    /// Declared return type.
    return_type: IrType,

    /// All variables in this function.
    variables: Vec<Variable>,

    /// Basic blocks, indexed by block ID.
    blocks: Vec<Block>,
}

impl Function {
    /// Creates a new function with no parameters and no blocks.
    ///
    /// # Arguments
    ///
    /// * `name` - The function name
    /// * `return_type` - Type of the returned value, [`IrType::Void`] for none
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: IrType) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type,
            variables: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared return type.
    #[must_use]
    pub const fn return_type(&self) -> IrType {
        self.return_type
    }

    /// Appends a formal parameter and returns its variable.
    pub fn add_param(&mut self, ty: IrType) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables
            .push(Variable::new(id, ty, VariableOrigin::Param(self.params.len())));
        self.params.push(id);
        id
    }

    /// Allocates a fresh instruction-defined variable.
    ///
    /// The caller is responsible for adding the instruction that defines it.
    pub fn alloc_var(&mut self, ty: IrType) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables
            .push(Variable::new(id, ty, VariableOrigin::Instruction));
        id
    }

    /// Returns the formal parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[VarId] {
        &self.params
    }

    /// Returns the parameter at position `index`.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<VarId> {
        self.params.get(index).copied()
    }

    /// Returns the number of formal parameters.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Returns all variables.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Returns the variable with the given ID.
    #[must_use]
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// Returns the number of variables, parameters included.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the blocks.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the block at `index`.
    #[must_use]
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Returns the block at `index` for modification.
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Appends a block.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the function has no body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the total number of instructions across all blocks.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(Block::instruction_count).sum()
    }

    /// Iterates over all instructions as `(block, index, instruction)`.
    pub fn iter_instructions(&self) -> impl Iterator<Item = (usize, usize, &Instruction)> + '_ {
        self.blocks.iter().enumerate().flat_map(|(block_idx, block)| {
            block
                .instructions()
                .iter()
                .enumerate()
                .map(move |(instr_idx, instr)| (block_idx, instr_idx, instr))
        })
    }

    /// Replaces every use of `old_var` throughout the function with `new_value`.
    ///
    /// Definitions are left in place, so after replacing a parameter it stays
    /// in the signature with no remaining uses.
    ///
    /// # Returns
    ///
    /// The number of operands rewritten.
    pub fn replace_uses(&mut self, old_var: VarId, new_value: &Value) -> usize {
        self.blocks
            .iter_mut()
            .map(|block| block.replace_uses(old_var, new_value))
            .sum()
    }

    /// Counts the uses of every variable in a single walk.
    #[must_use]
    pub fn count_uses(&self) -> FxHashMap<VarId, usize> {
        let mut counts = FxHashMap::default();
        for (_, _, instr) in self.iter_instructions() {
            for var in instr.op().uses() {
                *counts.entry(var).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Returns how many operands read `var`.
    #[must_use]
    pub fn use_count(&self, var: VarId) -> usize {
        self.iter_instructions()
            .map(|(_, _, instr)| instr.op().uses().iter().filter(|&&v| v == var).count())
            .sum()
    }

    /// Returns the `(block, index)` position of every instruction that reads `var`.
    #[must_use]
    pub fn use_sites(&self, var: VarId) -> Vec<(usize, usize)> {
        self.iter_instructions()
            .filter(|(_, _, instr)| instr.op().uses().contains(&var))
            .map(|(block, index, _)| (block, index))
            .collect()
    }

    /// Returns `true` if the parameter at `index` is read anywhere in the body.
    #[must_use]
    pub fn is_parameter_used(&self, index: usize) -> bool {
        self.param(index)
            .is_some_and(|param| self.use_count(param) > 0)
    }

    /// Checks the structural invariants of the function.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if:
    /// - a block's id does not match its position, or a block is empty
    /// - a terminator appears anywhere but last, or a block lacks one
    /// - a variable is defined twice, or a parameter is redefined
    /// - an operand refers to a variable that is never defined
    /// - a branch target or phi predecessor is not a block of this function
    pub fn validate(&self) -> Result<()> {
        let mut defined: FxHashSet<VarId> = self.params.iter().copied().collect();

        for (position, param) in self.params.iter().enumerate() {
            match self.variable(*param).map(Variable::origin) {
                Some(VariableOrigin::Param(index)) if index == position => {}
                _ => {
                    return Err(malformed_error!(
                        "{}: parameter {} is not recorded as parameter {}",
                        self.name,
                        param,
                        position
                    ))
                }
            }
        }

        for (block_idx, block) in self.blocks.iter().enumerate() {
            if block.id() != block_idx {
                return Err(malformed_error!(
                    "{}: block at position {} has id {}",
                    self.name,
                    block_idx,
                    block.id()
                ));
            }
            if block.terminator().is_none() {
                return Err(malformed_error!(
                    "{}: bb{} does not end in a terminator",
                    self.name,
                    block_idx
                ));
            }

            let last = block.instruction_count() - 1;
            for (instr_idx, instr) in block.instructions().iter().enumerate() {
                if instr.is_terminator() && instr_idx != last {
                    return Err(malformed_error!(
                        "{}: terminator in the middle of bb{}",
                        self.name,
                        block_idx
                    ));
                }

                if let Some(dest) = instr.def() {
                    if self.variable(dest).is_none() {
                        return Err(malformed_error!(
                            "{}: {} is not in the variable table",
                            self.name,
                            dest
                        ));
                    }
                    if !defined.insert(dest) {
                        return Err(malformed_error!(
                            "{}: {} is defined more than once",
                            self.name,
                            dest
                        ));
                    }
                }

                for target in instr.op().successors() {
                    if target >= self.blocks.len() {
                        return Err(malformed_error!(
                            "{}: bb{} branches to missing bb{}",
                            self.name,
                            block_idx,
                            target
                        ));
                    }
                }

                if let Op::Phi { operands, .. } = instr.op() {
                    if let Some((pred, _)) =
                        operands.iter().find(|(pred, _)| *pred >= self.blocks.len())
                    {
                        return Err(malformed_error!(
                            "{}: phi in bb{} names missing predecessor bb{}",
                            self.name,
                            block_idx,
                            pred
                        ));
                    }
                }
            }
        }

        for (_, _, instr) in self.iter_instructions() {
            if let Some(var) = instr.op().uses().into_iter().find(|v| !defined.contains(v)) {
                return Err(malformed_error!(
                    "{}: {} is used but never defined",
                    self.name,
                    var
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn {}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.variable(*param) {
                Some(var) => write!(f, "{var}")?,
                None => write!(f, "{param}")?,
            }
        }
        writeln!(f, ") -> {} {{", self.return_type)?;
        for block in &self.blocks {
            write!(f, "{block}")?;
        }
        write!(f, "}}")
    }
}
