//! Deep copy of a function under a new name.
//!
//! [`Function::clone_with_map`] produces a structurally identical function
//! whose variables are fresh: parameters come first in the same positions,
//! then instruction results in block order, then any variable that is
//! allocated but never defined. The returned [`CloneMap`] records how every
//! variable and block of the source maps onto the copy, so callers can
//! locate the clone's counterpart of anything they know about in the source.

use rustc_hash::FxHashMap;

use crate::ir::{Block, Function, Instruction, IrType, VarId, VariableOrigin};

/// Correspondence between a source function and its clone.
#[derive(Debug, Clone, Default)]
pub struct CloneMap {
    vars: FxHashMap<VarId, VarId>,
    blocks: FxHashMap<usize, usize>,
}

impl CloneMap {
    /// Returns the clone's variable for a source variable.
    #[must_use]
    pub fn var(&self, source: VarId) -> Option<VarId> {
        self.vars.get(&source).copied()
    }

    /// Returns the clone's block index for a source block index.
    #[must_use]
    pub fn block(&self, source: usize) -> Option<usize> {
        self.blocks.get(&source).copied()
    }

    /// Returns the number of mapped variables.
    #[must_use]
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }
}

impl Function {
    /// Creates a deep copy of this function named `name`.
    ///
    /// The copy has the same signature, return type and control flow. Every
    /// variable is remapped to a fresh variable of the clone, and every
    /// instruction operand, branch target and phi predecessor is rewritten
    /// through the map. The source function is not modified.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the new function
    ///
    /// # Returns
    ///
    /// The clone together with the source-to-clone [`CloneMap`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argspec::ir::{FunctionBuilder, IrType};
    ///
    /// let double = FunctionBuilder::new("double", IrType::I32)
    ///     .param(IrType::I32)
    ///     .build_with(|f| {
    ///         let x = f.arg(0);
    ///         f.block(0, |b| {
    ///             let r = b.add(x, x);
    ///             b.ret_val(r);
    ///         });
    ///     });
    ///
    /// let (copy, map) = double.clone_with_map("double1");
    /// assert_eq!(copy.name(), "double1");
    /// assert_eq!(copy.param_count(), 1);
    /// assert_eq!(map.var(double.params()[0]), Some(copy.params()[0]));
    /// assert_eq!(copy.instruction_count(), double.instruction_count());
    /// ```
    #[must_use]
    pub fn clone_with_map(&self, name: &str) -> (Function, CloneMap) {
        let mut clone = Function::new(name, self.return_type());
        let mut map = CloneMap::default();

        for &param in self.params() {
            let ty = self.variable(param).map_or(IrType::Void, |v| v.ty());
            map.vars.insert(param, clone.add_param(ty));
        }

        for block in self.blocks() {
            for var in block.defined_variables() {
                if map.vars.contains_key(&var) {
                    continue;
                }
                let ty = self.variable(var).map_or(IrType::Void, |v| v.ty());
                map.vars.insert(var, clone.alloc_var(ty));
            }
        }

        for variable in self.variables() {
            if map.vars.contains_key(&variable.id())
                || matches!(variable.origin(), VariableOrigin::Param(_))
            {
                continue;
            }
            map.vars
                .insert(variable.id(), clone.alloc_var(variable.ty()));
        }

        for block in self.blocks() {
            map.blocks.insert(block.id(), block.id());
        }

        for block in self.blocks() {
            let mut copy = Block::with_capacity(block.id(), block.instruction_count());
            for instr in block.instructions() {
                let mut op = instr.op().remap_variables(|var| map.var(var));
                op.remap_blocks(|b| map.block(b));
                copy.add_instruction(Instruction::new(op));
            }
            clone.add_block(copy);
        }

        (clone, map)
    }
}
