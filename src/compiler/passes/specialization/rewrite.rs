//! Graph edits applied after a clone exists: retargeting the call and
//! folding constant arguments into the clone.

use crate::{
    compiler::is_constant_argument,
    ir::{CallSite, Function, FunctionId, Program, Value, VarId},
    Error, Result,
};

/// A clone parameter bound to the constant passed for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Substitution {
    /// Position of the parameter in the signature.
    pub position: usize,
    /// The clone's parameter variable.
    pub param: VarId,
    /// The constant that replaced it.
    pub value: Value,
    /// Number of uses rewritten. Zero if the parameter was never read.
    pub uses: usize,
}

/// Points the call at `site` to `clone`. The arguments are untouched.
///
/// # Errors
///
/// Returns a lookup error if `site` does not exist, or [`Error::NotACall`]
/// if the instruction there is not a call.
pub fn retarget_call(program: &mut Program, site: CallSite, clone: FunctionId) -> Result<()> {
    let instr = program.instruction_mut(site)?;
    if instr.op_mut().set_callee(clone) {
        Ok(())
    } else {
        Err(Error::NotACall {
            function: site.function,
            block: site.block,
            index: site.index,
        })
    }
}

/// Replaces the clone's parameters by the integer constants passed for them.
///
/// `args` and the clone's parameters are paired by position. Non-constant
/// positions keep their parameter as a live input. Parameters stay in the
/// signature either way.
///
/// # Returns
///
/// One [`Substitution`] per constant position, in parameter order.
pub fn substitute_constant_arguments(args: &[Value], clone: &mut Function) -> Vec<Substitution> {
    let params = clone.params().to_vec();
    let mut substitutions = Vec::new();

    for (position, (arg, param)) in args.iter().zip(params).enumerate() {
        if !is_constant_argument(arg) {
            continue;
        }
        let uses = clone.replace_uses(param, arg);
        log::debug!("{}: {} -> {} ({} uses)", clone.name(), param, arg, uses);
        substitutions.push(Substitution {
            position,
            param,
            value: *arg,
            uses,
        });
    }

    substitutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FunctionBuilder, IrType, Op};

    fn add3() -> Function {
        FunctionBuilder::new("add3", IrType::I32)
            .param(IrType::I32)
            .param(IrType::I32)
            .param(IrType::I32)
            .build_with(|f| {
                let (a, b, c) = (f.arg(0), f.arg(1), f.arg(2));
                f.block(0, |blk| {
                    let ab = blk.add(a, b);
                    let abc = blk.add(ab, c);
                    let aa = blk.mul(abc, a);
                    blk.ret_val(aa);
                });
            })
    }

    #[test]
    fn test_only_constant_positions_are_substituted() {
        let mut clone = add3();
        let x: Value = VarId::new(99).into();

        let substitutions =
            substitute_constant_arguments(&[Value::i32(5), x, Value::i32(2)], &mut clone);

        let positions: Vec<usize> = substitutions.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 2]);
        assert_eq!(substitutions[0].uses, 2);
        assert_eq!(substitutions[1].uses, 1);
        assert_eq!(substitutions[1].value, Value::i32(2));
        assert_eq!(clone.param_count(), 3);
        assert!(!clone.is_parameter_used(0));
        assert_eq!(clone.use_count(clone.params()[1]), 1);
        assert!(!clone.is_parameter_used(2));
        assert!(clone.validate().is_ok());
    }

    #[test]
    fn test_no_constants_no_change() {
        let mut clone = add3();
        let before = clone.to_string();
        let x: Value = VarId::new(0).into();

        assert!(substitute_constant_arguments(&[x, x, Value::f64(1.0)], &mut clone).is_empty());
        assert_eq!(clone.to_string(), before);
    }

    #[test]
    fn test_unused_parameter_still_reported() {
        let mut clone = FunctionBuilder::new("first", IrType::I32)
            .param(IrType::I32)
            .param(IrType::I32)
            .build_with(|f| {
                let a = f.arg(0);
                f.block(0, |b| b.ret_val(a));
            });

        let substitutions =
            substitute_constant_arguments(&[Value::i32(5), Value::i32(7)], &mut clone);

        assert_eq!(substitutions.len(), 2);
        assert_eq!(substitutions[0].uses, 1);
        assert_eq!(substitutions[1].uses, 0);
        assert_eq!(substitutions[1].param, clone.params()[1]);
    }

    #[test]
    fn test_retarget_call() {
        let mut program = Program::new();
        let f = program.add_function(add3()).unwrap();
        let main = program
            .add_function(FunctionBuilder::new("main", IrType::I32).build_with(|fc| {
                fc.block(0, |b| {
                    let r = b.call(f, IrType::I32, vec![Value::i32(1); 3]);
                    b.ret_val(r);
                });
            }))
            .unwrap();

        let target = FunctionId::new(7);
        retarget_call(&mut program, CallSite::new(main, 0, 0), target).unwrap();

        let op = program.instruction(CallSite::new(main, 0, 0)).unwrap().op();
        assert_eq!(op.direct_callee(), Some(target));
        assert_eq!(op.call_args(), Some(&[Value::i32(1); 3][..]));

        assert!(matches!(
            retarget_call(&mut program, CallSite::new(main, 0, 1), target),
            Err(Error::NotACall { .. })
        ));
        assert!(matches!(op_at(&program, main), Op::Return { .. }));
    }

    fn op_at(program: &Program, function: FunctionId) -> &Op {
        program
            .instruction(CallSite::new(function, 0, 1))
            .unwrap()
            .op()
    }
}
