//! Deciding which calls get a specialized callee.

use crate::{
    compiler::CloneRegistry,
    ir::{FunctionId, Value},
};

/// Returns `true` if `value` is an integer literal of any width.
///
/// Floating-point and null literals are constants too, but they are never
/// specialized on.
#[must_use]
pub fn is_constant_argument(value: &Value) -> bool {
    value.as_int_const().is_some()
}

/// Decides whether a direct call to `target` with `args` should be cloned.
///
/// The scan stops at the first integer-constant argument: the answer is then
/// `true` unless `target` is itself a clone. A call without any integer
/// constant is never cloned.
#[must_use]
pub fn needs_clone(args: &[Value], target: FunctionId, registry: &CloneRegistry) -> bool {
    for arg in args {
        if is_constant_argument(arg) {
            return !registry.is_clone(target);
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{IntConst, VarId};

    #[test]
    fn test_classifier() {
        assert!(is_constant_argument(&Value::i32(5)));
        assert!(is_constant_argument(&Value::i64(-1)));
        assert!(is_constant_argument(&Value::bool(true)));
        assert!(is_constant_argument(&IntConst::i8(0).into()));
        assert!(!is_constant_argument(&Value::f64(1.5)));
        assert!(!is_constant_argument(&Value::null()));
        assert!(!is_constant_argument(&VarId::new(0).into()));
    }

    #[test]
    fn test_first_constant_decides() {
        let registry = CloneRegistry::new();
        let f = FunctionId::new(0);
        let x: Value = VarId::new(0).into();

        assert!(needs_clone(&[Value::i32(5), x], f, &registry));
        assert!(needs_clone(&[x, Value::i32(5)], f, &registry));
        assert!(!needs_clone(&[x, x], f, &registry));
        assert!(!needs_clone(&[], f, &registry));
        assert!(!needs_clone(&[Value::f64(2.0), Value::null()], f, &registry));
    }

    #[test]
    fn test_clones_are_never_cloned() {
        let mut registry = CloneRegistry::new();
        let clone = FunctionId::new(4);
        registry.register(clone);

        assert!(!needs_clone(&[Value::i32(1)], clone, &registry));
        assert!(needs_clone(&[Value::i32(1)], FunctionId::new(0), &registry));
    }
}
