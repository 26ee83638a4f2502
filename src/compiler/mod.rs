//! Whole-program transformation infrastructure.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ProgramPass trait          Interface for program passes     │
//! │    └─ run_on_program()      Transform, record events         │
//! │                                                              │
//! │  SpecializationPass         Constant-argument specialization │
//! │    ├─ Policy                 (should this call be cloned?)   │
//! │    ├─ Cloner                 (copy + name + append)          │
//! │    ├─ Call rewriter          (retarget the call)             │
//! │    └─ Substituter            (constants into the clone)      │
//! │                                                              │
//! │  EventLog                   Decisions and change tracking    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod events;
mod pass;
mod passes;

pub use events::{DerivedStats, Event, EventBuilder, EventKind, EventLog};
pub use pass::ProgramPass;
pub use passes::{
    is_constant_argument, needs_clone, retarget_call, setup_clone, substitute_constant_arguments,
    CloneRegistry, SpecializationPass, Substitution, DEFAULT_CLONE_LIMIT,
};
