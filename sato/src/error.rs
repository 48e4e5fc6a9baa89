//! Error kinds raised while compiling and solving a problem.
//!
//! Functions of the crate return [anyhow::Result] and attach context at each
//! layer. The kind of the root cause can be recovered with
//! `err.downcast_ref::<Error>()`.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Int;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed declaration, literal or clause syntax.
    #[error("parse error: {0}")]
    Parse(String),

    /// A literal references a variable that was never declared.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// Unsupported relation or malformed linear expression.
    #[error("invalid expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },

    /// Internal invariant violated while building the order encoding.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A literal refers to a boolean that is not registered in the SAT instance.
    #[error("unknown boolean '{0}'")]
    UnknownBoolean(String),

    /// A DIMACS literal does not match any registered boolean.
    #[error("DIMACS literal {index} is out of range (1..={max})")]
    IndexOutOfRange { index: Int, max: usize },

    /// A solver artifact could not be written, read or produced.
    #[error("solver I/O failure on '{}'", path.display())]
    SolverIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn invalid(expr: impl ToString, reason: impl ToString) -> Self {
        Error::InvalidExpression {
            expr: expr.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn solver_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::SolverIo {
            path: path.into(),
            source,
        }
    }
}

/// Return the error kind at the root of `err`, if it was raised by this crate.
pub fn kind(err: &anyhow::Error) -> Option<&Error> {
    err.downcast_ref::<Error>()
}
