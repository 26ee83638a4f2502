//! Program factories shared by unit tests.

use crate::ir::{Function, FunctionBuilder, FunctionId, IrType, Program, Value};

/// `fn <name>(x: i32) -> i32 { ret x }`
pub fn identity(name: &str) -> Function {
    FunctionBuilder::new(name, IrType::I32)
        .param(IrType::I32)
        .build_with(|f| {
            let x = f.arg(0);
            f.block(0, |b| b.ret_val(x));
        })
}

/// `fn <name>() -> i32 { ret <target>(args...) }`
pub fn caller(name: &str, target: FunctionId, args: Vec<Value>) -> Function {
    FunctionBuilder::new(name, IrType::I32).build_with(|f| {
        f.block(0, |b| {
            let r = b.call(target, IrType::I32, args);
            b.ret_val(r);
        });
    })
}

/// `id(x)` plus `main() { ret id(<value>) }`, returning the program and `id`.
pub fn identity_called_with(value: Value) -> (Program, FunctionId) {
    let mut program = Program::new();
    let id = program
        .add_function(identity("id"))
        .expect("fresh program has no functions");
    program
        .add_function(caller("main", id, vec![value]))
        .expect("names are distinct");
    (program, id)
}
