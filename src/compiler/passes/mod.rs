//! Built-in program passes.

mod specialization;

pub use specialization::{
    is_constant_argument, needs_clone, retarget_call, setup_clone, substitute_constant_arguments,
    CloneRegistry, SpecializationPass, Substitution, DEFAULT_CLONE_LIMIT,
};
