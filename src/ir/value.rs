//! Constants and operand values.
//!
//! Every operand in the IR is a [`Value`]: either a reference to a variable
//! (a formal parameter or an instruction result) or an inline literal
//! [`ConstValue`]. Literals are immutable and compared structurally, which is
//! what lets the argument substituter drop a call's constant argument straight
//! into the clone's instructions.
//!
//! # Integer Representation
//!
//! [`IntConst`] stores its width and a sign-extended `i64`. Construction
//! truncates the input to the requested width first, so `IntConst::new(8, 255)`
//! is the 8-bit pattern `0xff`, whose signed value is `-1`.

use std::fmt;

use crate::{
    ir::{IrType, VarId},
    Error, Result,
};

/// An integer literal with a fixed bit width and signed value.
///
/// # Examples
///
/// ```rust
/// use argspec::ir::IntConst;
///
/// let c = IntConst::new(8, 255)?;
/// assert_eq!(c.bits(), 8);
/// assert_eq!(c.sext_value(), -1);
/// assert_eq!(c.zext_value(), 255);
///
/// assert_eq!(IntConst::i32(5).to_string(), "i32 5");
/// assert!(IntConst::new(0, 1).is_err());
/// # Ok::<(), argspec::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntConst {
    bits: u32,
    value: i64,
}

impl IntConst {
    /// Largest supported width in bits.
    pub const MAX_BITS: u32 = 64;

    /// Creates an integer literal of the given width.
    ///
    /// The value is truncated to `bits` and sign-extended back to 64 bits.
    ///
    /// # Arguments
    ///
    /// * `bits` - Bit width, `1..=64`
    /// * `value` - Raw value; bits above `bits` are discarded
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitWidth`] if `bits` is zero or larger than 64.
    pub fn new(bits: u32, value: i64) -> Result<Self> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(Error::InvalidBitWidth(bits));
        }

        Ok(Self {
            bits,
            value: sign_extend(value, bits),
        })
    }

    /// Creates a 1-bit boolean literal.
    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self {
            bits: 1,
            value: if value { -1 } else { 0 },
        }
    }

    /// Creates an 8-bit literal.
    #[must_use]
    pub const fn i8(value: i8) -> Self {
        Self {
            bits: 8,
            value: value as i64,
        }
    }

    /// Creates a 16-bit literal.
    #[must_use]
    pub const fn i16(value: i16) -> Self {
        Self {
            bits: 16,
            value: value as i64,
        }
    }

    /// Creates a 32-bit literal.
    #[must_use]
    pub const fn i32(value: i32) -> Self {
        Self {
            bits: 32,
            value: value as i64,
        }
    }

    /// Creates a 64-bit literal.
    #[must_use]
    pub const fn i64(value: i64) -> Self {
        Self { bits: 64, value }
    }

    /// Returns the bit width.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Returns the value sign-extended to 64 bits.
    #[must_use]
    pub const fn sext_value(self) -> i64 {
        self.value
    }

    /// Returns the value zero-extended to 64 bits.
    #[must_use]
    pub const fn zext_value(self) -> u64 {
        if self.bits == Self::MAX_BITS {
            self.value as u64
        } else {
            (self.value as u64) & ((1u64 << self.bits) - 1)
        }
    }

    /// Returns the IR type of this literal.
    #[must_use]
    pub const fn ty(self) -> IrType {
        IrType::Int(self.bits)
    }
}

/// Truncates `value` to `bits` and sign-extends the result back to 64 bits.
fn sign_extend(value: i64, bits: u32) -> i64 {
    if bits >= IntConst::MAX_BITS {
        return value;
    }
    let shift = IntConst::MAX_BITS - bits;
    (value << shift) >> shift
}

impl fmt::Display for IntConst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bits == 1 {
            write!(f, "i1 {}", self.value != 0)
        } else {
            write!(f, "i{} {}", self.bits, self.value)
        }
    }
}

/// A compile-time constant.
///
/// Only [`ConstValue::Int`] is eligible for specialization; the other kinds
/// exist so that floating-point and pointer literals can flow through the IR
/// and be rejected by the constant classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    /// Integer literal.
    Int(IntConst),

    /// 32-bit floating point.
    F32(f32),

    /// 64-bit floating point.
    F64(f64),

    /// Null pointer.
    Null,
}

impl ConstValue {
    /// Returns `true` if this is an integer constant.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns `true` if this is a floating-point constant.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32(_) | Self::F64(_))
    }

    /// Returns `true` if this is the null constant.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer literal, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<IntConst> {
        match self {
            Self::Int(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the IR type of this constant.
    #[must_use]
    pub const fn ty(&self) -> IrType {
        match self {
            Self::Int(c) => c.ty(),
            Self::F32(_) => IrType::F32,
            Self::F64(_) => IrType::F64,
            Self::Null => IrType::Ptr,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(c) => write!(f, "{c}"),
            Self::F32(v) => write!(f, "f32 {v}"),
            Self::F64(v) => write!(f, "f64 {v}"),
            Self::Null => write!(f, "ptr null"),
        }
    }
}

impl From<IntConst> for ConstValue {
    fn from(value: IntConst) -> Self {
        Self::Int(value)
    }
}

/// An instruction operand.
///
/// # Examples
///
/// ```rust
/// use argspec::ir::{IntConst, Value, VarId};
///
/// let v = Value::from(VarId::new(3));
/// assert_eq!(v.as_var(), Some(VarId::new(3)));
///
/// let c = Value::i32(7);
/// assert_eq!(c.as_int_const(), Some(IntConst::i32(7)));
/// assert_eq!(c.to_string(), "i32 7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Reference to a parameter or instruction result.
    Var(VarId),

    /// Inline literal.
    Const(ConstValue),
}

impl Value {
    /// Creates an `i32` literal operand.
    #[must_use]
    pub const fn i32(value: i32) -> Self {
        Self::Const(ConstValue::Int(IntConst::i32(value)))
    }

    /// Creates an `i64` literal operand.
    #[must_use]
    pub const fn i64(value: i64) -> Self {
        Self::Const(ConstValue::Int(IntConst::i64(value)))
    }

    /// Creates an `i1` literal operand.
    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self::Const(ConstValue::Int(IntConst::bool(value)))
    }

    /// Creates an `f64` literal operand.
    #[must_use]
    pub const fn f64(value: f64) -> Self {
        Self::Const(ConstValue::F64(value))
    }

    /// Creates a null pointer operand.
    #[must_use]
    pub const fn null() -> Self {
        Self::Const(ConstValue::Null)
    }

    /// Returns the referenced variable, if this is a variable operand.
    #[must_use]
    pub const fn as_var(&self) -> Option<VarId> {
        match self {
            Self::Var(var) => Some(*var),
            Self::Const(_) => None,
        }
    }

    /// Returns the literal, if this is a constant operand.
    #[must_use]
    pub const fn as_const(&self) -> Option<&ConstValue> {
        match self {
            Self::Var(_) => None,
            Self::Const(c) => Some(c),
        }
    }

    /// Returns the integer literal, if this is an integer constant operand.
    #[must_use]
    pub const fn as_int_const(&self) -> Option<IntConst> {
        match self {
            Self::Const(c) => c.as_int(),
            Self::Var(_) => None,
        }
    }

    /// Returns `true` if this operand references `var`.
    #[must_use]
    pub fn is_var(&self, var: VarId) -> bool {
        matches!(self, Self::Var(v) if *v == var)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(var) => write!(f, "{var}"),
            Self::Const(c) => write!(f, "{c}"),
        }
    }
}

impl From<VarId> for Value {
    fn from(value: VarId) -> Self {
        Self::Var(value)
    }
}

impl From<ConstValue> for Value {
    fn from(value: ConstValue) -> Self {
        Self::Const(value)
    }
}

impl From<IntConst> for Value {
    fn from(value: IntConst) -> Self {
        Self::Const(ConstValue::Int(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_const_truncates_and_sign_extends() {
        let c = IntConst::new(8, 0x1ff).unwrap();
        assert_eq!(c.sext_value(), -1);
        assert_eq!(c.zext_value(), 0xff);

        let c = IntConst::new(16, 0x7fff).unwrap();
        assert_eq!(c.sext_value(), 0x7fff);

        let c = IntConst::new(64, i64::MIN).unwrap();
        assert_eq!(c.sext_value(), i64::MIN);
        assert_eq!(c.zext_value(), 1u64 << 63);
    }

    #[test]
    fn test_int_const_rejects_bad_width() {
        assert!(matches!(
            IntConst::new(0, 1),
            Err(Error::InvalidBitWidth(0))
        ));
        assert!(matches!(
            IntConst::new(65, 1),
            Err(Error::InvalidBitWidth(65))
        ));
    }

    #[test]
    fn test_bool_constant() {
        let t = IntConst::bool(true);
        assert_eq!(t.bits(), 1);
        assert_eq!(t.sext_value(), -1);
        assert_eq!(t.zext_value(), 1);
        assert_eq!(t.to_string(), "i1 true");
        assert_eq!(IntConst::bool(false).to_string(), "i1 false");
    }

    #[test]
    fn test_const_value_kinds() {
        assert!(ConstValue::Int(IntConst::i64(1)).is_integer());
        assert!(ConstValue::F32(1.0).is_float());
        assert!(ConstValue::Null.is_null());
        assert_eq!(ConstValue::F64(2.5).as_int(), None);
        assert_eq!(ConstValue::Null.ty(), IrType::Ptr);
    }

    #[test]
    fn test_value_accessors() {
        let v = Value::from(VarId::new(2));
        assert!(v.is_var(VarId::new(2)));
        assert!(!v.is_var(VarId::new(3)));
        assert_eq!(v.as_const(), None);

        assert_eq!(Value::i64(9).as_int_const(), Some(IntConst::i64(9)));
        assert_eq!(Value::f64(1.5).as_int_const(), None);
        assert_eq!(Value::null().as_var(), None);
    }
}
