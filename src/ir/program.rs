//! Whole-program container.
//!
//! A [`Program`] is an append-only arena of [`Function`]s. A function's
//! [`FunctionId`] is its position in the arena and never changes, so call
//! instructions refer to their targets by id and stay valid while new
//! functions are appended.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{
    ir::{Function, Instruction},
    Error, Result,
};

/// Identifies a function within a [`Program`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(usize);

impl FunctionId {
    /// Creates a function id from an arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// The position of one instruction in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Function containing the instruction.
    pub function: FunctionId,
    /// Block index within the function.
    pub block: usize,
    /// Instruction index within the block.
    pub index: usize,
}

impl CallSite {
    /// Creates a new site.
    #[must_use]
    pub const fn new(function: FunctionId, block: usize, index: usize) -> Self {
        Self {
            function,
            block,
            index,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:bb{}:{}", self.function, self.block, self.index)
    }
}

/// An ordered, append-only collection of functions with unique names.
///
/// # Examples
///
/// ```rust
/// use argspec::ir::{Function, IrType, Program};
///
/// let mut program = Program::new();
/// let main = program.add_function(Function::new("main", IrType::Void))?;
///
/// assert_eq!(program.function_count(), 1);
/// assert_eq!(program.find("main"), Some(main));
/// assert_eq!(program.get(main)?.name(), "main");
/// # Ok::<(), argspec::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Program {
    functions: Vec<Function>,
    by_name: FxHashMap<String, FunctionId>,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a function to the end of the program.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFunction`] if a function with the same name
    /// already exists.
    pub fn add_function(&mut self, function: Function) -> Result<FunctionId> {
        if self.by_name.contains_key(function.name()) {
            return Err(Error::DuplicateFunction(function.name().to_string()));
        }

        let id = FunctionId::new(self.functions.len());
        self.by_name.insert(function.name().to_string(), id);
        self.functions.push(function);
        Ok(id)
    }

    /// Returns the function with the given id.
    #[must_use]
    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id.index())
    }

    /// Returns the function with the given id for modification.
    ///
    /// Renaming is not exposed, so the name index stays consistent.
    pub fn function_mut(&mut self, id: FunctionId) -> Option<&mut Function> {
        self.functions.get_mut(id.index())
    }

    /// Returns the function with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FunctionNotFound`] if `id` is outside the program.
    pub fn get(&self, id: FunctionId) -> Result<&Function> {
        self.function(id).ok_or(Error::FunctionNotFound(id))
    }

    /// Returns the function with the given id for modification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FunctionNotFound`] if `id` is outside the program.
    pub fn get_mut(&mut self, id: FunctionId) -> Result<&mut Function> {
        self.function_mut(id).ok_or(Error::FunctionNotFound(id))
    }

    /// Returns the number of functions, including any appended during a pass.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if the program has no functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Iterates over `(id, function)` pairs in program order.
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, &Function)> + '_ {
        self.functions
            .iter()
            .enumerate()
            .map(|(index, function)| (FunctionId::new(index), function))
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<FunctionId> {
        self.by_name.get(name).copied()
    }

    /// Returns the instruction at `site`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FunctionNotFound`], [`Error::BlockNotFound`] or
    /// [`Error::InstructionNotFound`] when the site does not exist.
    pub fn instruction(&self, site: CallSite) -> Result<&Instruction> {
        self.get(site.function)?
            .block(site.block)
            .ok_or(Error::BlockNotFound {
                function: site.function,
                block: site.block,
            })?
            .instruction(site.index)
            .ok_or(Error::InstructionNotFound {
                function: site.function,
                block: site.block,
                index: site.index,
            })
    }

    /// Returns the instruction at `site` for modification.
    ///
    /// # Errors
    ///
    /// Same as [`Program::instruction`].
    pub fn instruction_mut(&mut self, site: CallSite) -> Result<&mut Instruction> {
        self.get_mut(site.function)?
            .block_mut(site.block)
            .ok_or(Error::BlockNotFound {
                function: site.function,
                block: site.block,
            })?
            .instruction_mut(site.index)
            .ok_or(Error::InstructionNotFound {
                function: site.function,
                block: site.block,
                index: site.index,
            })
    }

    /// Validates every function plus cross-function references.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if any function is malformed, a direct call
    /// targets a function outside the program, or its argument count differs
    /// from the callee's parameter count.
    pub fn validate(&self) -> Result<()> {
        for (id, function) in self.iter() {
            function.validate()?;

            for (block, index, instr) in function.iter_instructions() {
                let Some(target) = instr.op().direct_callee() else {
                    continue;
                };
                let Some(callee) = self.function(target) else {
                    return Err(malformed_error!(
                        "{}:bb{}:{} calls missing function {}",
                        id,
                        block,
                        index,
                        target
                    ));
                };
                let arg_count = instr.op().call_args().map_or(0, <[_]>::len);
                if arg_count != callee.param_count() {
                    return Err(malformed_error!(
                        "{}:bb{}:{} passes {} arguments to {} which takes {}",
                        id,
                        block,
                        index,
                        arg_count,
                        callee.name(),
                        callee.param_count()
                    ));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, function)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "; {id}")?;
            writeln!(f, "{function}")?;
        }
        Ok(())
    }
}
