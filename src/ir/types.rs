//! Type system for the IR.
//!
//! Types are deliberately coarse: the specialization pass only needs to carry
//! parameter and result types through a clone unchanged, and the constant
//! classifier only needs to distinguish integers from everything else.

use std::fmt;

/// The type of an IR value.
///
/// # Examples
///
/// ```rust
/// use argspec::ir::IrType;
///
/// assert_eq!(IrType::I32, IrType::Int(32));
/// assert!(IrType::I64.is_integer());
/// assert!(!IrType::F64.is_integer());
/// assert_eq!(IrType::Int(1).to_string(), "i1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrType {
    /// No value (function return type only).
    Void,
    /// Integer of the given bit width (1..=64).
    Int(u32),
    /// 32-bit IEEE float.
    F32,
    /// 64-bit IEEE float.
    F64,
    /// Opaque pointer.
    Ptr,
}

impl IrType {
    /// 1-bit integer (boolean).
    pub const I1: Self = Self::Int(1);
    /// 8-bit integer.
    pub const I8: Self = Self::Int(8);
    /// 16-bit integer.
    pub const I16: Self = Self::Int(16);
    /// 32-bit integer.
    pub const I32: Self = Self::Int(32);
    /// 64-bit integer.
    pub const I64: Self = Self::Int(64);

    /// Returns `true` if this is an integer type of any width.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns `true` if this is a floating-point type.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns `true` for the void type.
    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Int(bits) => write!(f, "i{bits}"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::Ptr => write!(f, "ptr"),
        }
    }
}
