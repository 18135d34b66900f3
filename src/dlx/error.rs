//! Errors raised while building an exact cover instance or reading one from text.
//!
//! Nothing in here is produced by the search itself: running out of candidates or
//! columns is ordinary control flow, so once a [`crate::dlx::Dlx`] exists every
//! search over it succeeds.

use std::io;
use thiserror::Error;

/// Error type shared by the problem builder, the DLX text reader and the puzzle parsers.
#[derive(Debug, Error)]
pub enum DlxError {
    /// An action names a requirement that was never declared.
    #[error("action {action} expects undeclared requirement {requirement}")]
    UnknownRequirement {
        /// Debug rendering of the offending action.
        action: String,
        /// Debug rendering of the missing requirement.
        requirement: String,
    },

    /// A requirement was declared more than once, or as both mandatory and optional.
    #[error("requirement {0} is declared more than once")]
    DuplicateRequirement(String),

    /// The same action was added twice.
    #[error("action {0} is declared more than once")]
    DuplicateAction(String),

    /// An action satisfies no requirement at all.
    #[error("action {0} satisfies no requirements")]
    EmptyAction(String),

    /// An action lists the same requirement twice.
    #[error("action {action} lists requirement {requirement} more than once")]
    RepeatedRequirement {
        /// Debug rendering of the offending action.
        action: String,
        /// Debug rendering of the repeated requirement.
        requirement: String,
    },

    /// Malformed textual input. `line` is 1-based.
    #[error("line {line}: {message}")]
    Parse {
        /// Line the problem was found on.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Input that parsed but does not describe a valid puzzle.
    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),

    /// Reading the input failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DlxError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
