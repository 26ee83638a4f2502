//! Variable identifiers and the per-function variable table.
//!
//! Variables are identified by a simple index ([`VarId`]) into the owning
//! function's variable table. The identifier is unique within one
//! [`crate::ir::Function`] but not across functions; a clone receives a fresh
//! table, and the cloning primitive reports how the old identifiers map onto
//! the new ones.

use std::fmt;

use crate::ir::IrType;

/// Unique identifier for a variable within a function.
///
/// # Examples
///
/// ```rust
/// use argspec::ir::VarId;
///
/// let id = VarId::new(42);
/// assert_eq!(id.index(), 42);
/// assert_eq!(id.to_string(), "v42");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Creates a new variable identifier.
    ///
    /// # Arguments
    ///
    /// * `index` - The index into the variable table
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Where a variable comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableOrigin {
    /// Formal parameter at the given position.
    Param(usize),
    /// Result of an instruction in the body.
    Instruction,
}

/// An entry in a function's variable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    id: VarId,
    ty: IrType,
    origin: VariableOrigin,
}

impl Variable {
    /// Creates a new variable table entry.
    #[must_use]
    pub const fn new(id: VarId, ty: IrType, origin: VariableOrigin) -> Self {
        Self { id, ty, origin }
    }

    /// Returns the variable identifier.
    #[must_use]
    pub const fn id(&self) -> VarId {
        self.id
    }

    /// Returns the variable type.
    #[must_use]
    pub const fn ty(&self) -> IrType {
        self.ty
    }

    /// Returns where the variable comes from.
    #[must_use]
    pub const fn origin(&self) -> VariableOrigin {
        self.origin
    }

    /// Returns the parameter position if this variable is a formal parameter.
    #[must_use]
    pub const fn param_index(&self) -> Option<usize> {
        match self.origin {
            VariableOrigin::Param(index) => Some(index),
            VariableOrigin::Instruction => None,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.ty)
    }
}
