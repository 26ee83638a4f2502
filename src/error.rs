use thiserror::Error;

use crate::ir::FunctionId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The specialization pass itself assumes well-formed IR and has no failure mode of its own;
/// every variant here describes either malformed input detected by validation, or an
/// IR-level operation that was pointed at something that does not exist.
///
/// # Error Categories
///
/// ## Structural Errors
/// - [`Error::Malformed`] - The IR violates a structural invariant
/// - [`Error::InvalidBitWidth`] - An integer literal width outside `1..=64`
///
/// ## Lookup Errors
/// - [`Error::FunctionNotFound`] - A [`FunctionId`] outside the program arena
/// - [`Error::BlockNotFound`] - A block index outside a function
/// - [`Error::InstructionNotFound`] - An instruction index outside a block
///
/// ## Mutation Errors
/// - [`Error::DuplicateFunction`] - Appending a function whose name is already taken
/// - [`Error::NotACall`] - Retargeting an instruction that is not a call
///
/// # Examples
///
/// ```rust
/// use argspec::{ir::{IrType, Function, Program}, Error};
///
/// let mut program = Program::new();
/// program.add_function(Function::new("f", IrType::Void))?;
///
/// match program.add_function(Function::new("f", IrType::Void)) {
///     Err(Error::DuplicateFunction(name)) => assert_eq!(name, "f"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// # Ok::<(), argspec::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The IR is structurally invalid.
    ///
    /// Produced by [`crate::ir::Function::validate`] and [`crate::ir::Program::validate`]
    /// when a branch target, phi predecessor, operand or call arity is out of range. The
    /// error includes the source location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An integer literal was requested with an unsupported bit width.
    ///
    /// Integer constants carry between 1 and 64 bits.
    #[error("Invalid integer bit width - {0}")]
    InvalidBitWidth(u32),

    /// The referenced function does not exist in the program.
    #[error("Function not found - {0}")]
    FunctionNotFound(FunctionId),

    /// A function with this name already exists in the program.
    ///
    /// Function names are unique within a [`crate::ir::Program`]. Clone names are
    /// derived from a counter keyed on the bare original name, so a user function that
    /// already looks like a clone (such as `f1` next to `f`) collides with a generated one.
    #[error("A function named '{0}' already exists")]
    DuplicateFunction(String),

    /// The referenced block does not exist in the function.
    #[error("Block {block} not found in function {function}")]
    BlockNotFound {
        /// Function that was searched
        function: FunctionId,
        /// Missing block index
        block: usize,
    },

    /// The referenced instruction does not exist in the block.
    #[error("Instruction {index} not found in block {block} of function {function}")]
    InstructionNotFound {
        /// Function that was searched
        function: FunctionId,
        /// Block that was searched
        block: usize,
        /// Missing instruction index
        index: usize,
    },

    /// The referenced instruction is not a call.
    #[error("Instruction {index} in block {block} of function {function} is not a call")]
    NotACall {
        /// Function containing the instruction
        function: FunctionId,
        /// Block containing the instruction
        block: usize,
        /// Instruction index within the block
        index: usize,
    },
}
