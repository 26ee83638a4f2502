//! Creating a named clone and appending it to the program.

use crate::{
    compiler::CloneRegistry,
    ir::{FunctionId, Program},
    Result,
};

/// Clones `original` under its next clone name and appends the copy.
///
/// The name comes from `registry`, whose counter for the original's name is
/// advanced. Names already present in `program` (a user function literally
/// named `f1`, say) are skipped, so the counter may advance more than once.
/// The clone is not registered here; the caller does that once the clone has
/// been wired up.
///
/// # Errors
///
/// Returns [`crate::Error::FunctionNotFound`] if `original` does not exist.
pub fn setup_clone(
    program: &mut Program,
    original: FunctionId,
    registry: &mut CloneRegistry,
) -> Result<FunctionId> {
    let source = program.get(original)?;
    let mut name = registry.next_clone_name(source.name());
    while program.find(&name).is_some() {
        name = registry.next_clone_name(source.name());
    }
    let (clone, map) = source.clone_with_map(&name);

    log::debug!(
        "cloned {} into {} ({} variables remapped)",
        source.name(),
        name,
        map.var_count()
    );

    program.add_function(clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{FunctionBuilder, IrType},
        Error,
    };

    fn program_with(names: &[&str]) -> Program {
        let mut program = Program::new();
        for name in names {
            let func = FunctionBuilder::new(*name, IrType::I32)
                .param(IrType::I32)
                .build_with(|f| {
                    let x = f.arg(0);
                    f.block(0, |b| {
                        let y = b.mul(x, x);
                        b.ret_val(y);
                    });
                });
            program.add_function(func).unwrap();
        }
        program
    }

    #[test]
    fn test_clone_is_appended_with_counter_name() {
        let mut program = program_with(&["sq"]);
        let mut registry = CloneRegistry::new();

        let first = setup_clone(&mut program, FunctionId::new(0), &mut registry).unwrap();
        let second = setup_clone(&mut program, FunctionId::new(0), &mut registry).unwrap();

        assert_eq!(first, FunctionId::new(1));
        assert_eq!(second, FunctionId::new(2));
        assert_eq!(program.get(first).unwrap().name(), "sq1");
        assert_eq!(program.get(second).unwrap().name(), "sq2");
        assert_eq!(registry.clone_count(), 0);

        let original = program.get(FunctionId::new(0)).unwrap();
        let clone = program.get(first).unwrap();
        assert_eq!(clone.block_count(), original.block_count());
        assert_eq!(clone.instruction_count(), original.instruction_count());
    }

    #[test]
    fn test_taken_names_are_skipped() {
        let mut program = program_with(&["f", "f1", "f2"]);
        let mut registry = CloneRegistry::new();

        let clone = setup_clone(&mut program, FunctionId::new(0), &mut registry).unwrap();
        assert_eq!(clone, FunctionId::new(3));
        assert_eq!(program.get(clone).unwrap().name(), "f3");
        assert_eq!(registry.counter("f"), 3);

        let next = setup_clone(&mut program, FunctionId::new(0), &mut registry).unwrap();
        assert_eq!(program.get(next).unwrap().name(), "f4");
    }

    #[test]
    fn test_missing_original() {
        let mut program = Program::new();
        let mut registry = CloneRegistry::new();
        assert!(matches!(
            setup_clone(&mut program, FunctionId::new(0), &mut registry),
            Err(Error::FunctionNotFound(_))
        ));
    }
}
