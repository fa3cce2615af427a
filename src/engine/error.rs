//! Engine error types.
//!
//! Compilation problems are surfaced synchronously by `compile`; control-flow
//! problems are only discoverable at execution time, by the scan that needs
//! the missing marker. Both are fatal to the run. The binary converts them
//! into `anyhow` errors via `?`.

use std::error::Error;
use std::fmt;

/// A script line that cannot become an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The script has no lines at all.
    EmptyProgram,
    /// A line is empty after trimming. Line numbers are 1-based.
    EmptyLine { line: usize },
    UnknownOpcode { line: usize, token: String },
    UnknownPredicate { line: usize, token: String },
    MissingArgument { line: usize, opcode: &'static str },
    /// GOTO argument is not a positive integer.
    BadJumpTarget { line: usize, token: String },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::EmptyProgram => write!(f, "script is empty"),
            CompileError::EmptyLine { line } => {
                write!(f, "line {line}: empty line (one instruction per line)")
            }
            CompileError::UnknownOpcode { line, token } => {
                write!(f, "line {line}: unknown instruction '{token}'")
            }
            CompileError::UnknownPredicate { line, token } => {
                write!(f, "line {line}: unknown predicate '{token}'")
            }
            CompileError::MissingArgument { line, opcode } => {
                write!(f, "line {line}: {opcode} requires an argument")
            }
            CompileError::BadJumpTarget { line, token } => {
                write!(f, "line {line}: GOTO target '{token}' is not a line number")
            }
        }
    }
}

impl Error for CompileError {}

/// A branch, loop, or jump that references program structure that does not
/// exist. Carries the offending opcode and its 0-based instruction index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    MissingTerminator {
        opcode: &'static str,
        index: usize,
        wanted: &'static str,
    },
    JumpOutOfRange {
        index: usize,
        target: u32,
        len: usize,
    },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::MissingTerminator {
                opcode,
                index,
                wanted,
            } => write!(
                f,
                "{opcode} at line {}: no matching {wanted} found",
                index + 1
            ),
            ExecError::JumpOutOfRange { index, target, len } => write!(
                f,
                "GOTO at line {}: target {target} outside program (1..={len})",
                index + 1
            ),
        }
    }
}

impl Error for ExecError {}
