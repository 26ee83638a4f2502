#![no_main]

use argspec::{
    compiler::SpecializationPass,
    ir::{FunctionBuilder, FunctionId, IrType, Program, Value},
};
use libfuzzer_sys::fuzz_target;

// Every byte pair becomes one call: the first picks the callee, the second
// picks which arguments are literals.
fuzz_target!(|data: &[u8]| {
    let Some((&count, calls)) = data.split_first() else {
        return;
    };
    let count = usize::from(count % 8) + 1;

    let mut program = Program::new();
    for (index, chunk) in calls.chunks(2 * 4).take(count).enumerate() {
        let func = FunctionBuilder::new(format!("f{index}x"), IrType::I32)
            .param(IrType::I32)
            .param(IrType::I32)
            .build_with(|f| {
                let (a, b) = (f.arg(0), f.arg(1));
                f.block(0, |blk| {
                    let mut acc = blk.add(a, b);
                    for pair in chunk.chunks_exact(2) {
                        let target = FunctionId::new(usize::from(pair[0]) % count);
                        let first = if pair[1] & 1 == 1 {
                            Value::i32(i32::from(pair[1]))
                        } else {
                            a.into()
                        };
                        let second = if pair[1] & 2 == 2 { Value::i32(2) } else { acc.into() };
                        let r = blk.call(target, IrType::I32, vec![first, second]);
                        acc = blk.add(acc, r);
                    }
                    blk.ret_val(acc);
                });
            });
        let _ = program.add_function(func);
    }

    // Callees past the last built function make the program invalid.
    if program.validate().is_err() {
        return;
    }

    let mut pass = SpecializationPass::new().with_clone_limit(64);
    assert!(pass.run(&mut program).is_ok());
    assert!(program.validate().is_ok());
    assert!(pass.registry().clone_count() <= 64);
});
