use thiserror::Error;

pub type Result<T, E = FoldError> = std::result::Result<T, E>;

/// Errors raised by a single collapse or expand call.
///
/// Both variants are caller sequencing bugs rather than recoverable conditions. A
/// failed call leaves the controller untouched and never invalidates the
/// [`BlockPairing`](crate::BlockPairing).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    /// The named line cannot be toggled in the requested direction.
    #[error("invalid fold range at line {opener}: {reason}")]
    InvalidRange { opener: usize, reason: InvalidRange },

    /// Per-line bookkeeping disagrees with the set of collapsed blocks.
    #[error("inconsistent fold state at line {line}: {detail}")]
    InconsistentState { line: usize, detail: Inconsistency },
}

impl FoldError {
    pub(crate) fn invalid(opener: usize, reason: InvalidRange) -> Self {
        FoldError::InvalidRange { opener, reason }
    }

    pub(crate) fn inconsistent(line: usize, detail: Inconsistency) -> Self {
        FoldError::InconsistentState { line, detail }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidRange {
    #[error("line does not open a foldable block")]
    NotAnOpener,

    #[error("block is already collapsed")]
    AlreadyCollapsed,

    #[error("block is not collapsed")]
    NotCollapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Inconsistency {
    #[error("line is visible inside a collapsed block")]
    VisibleInsideCollapse,

    #[error("nested collapse count overflowed")]
    CountOverflow,

    #[error("line is hidden but no collapsed block covers it")]
    UntrackedHide,

    #[error("nested collapse count is {actual}, expected {expected}")]
    CountMismatch { expected: u32, actual: u32 },
}
