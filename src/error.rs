//! Error types for instrument parsing and voice management.

use thiserror::Error;

use crate::instrument::InstrumentKind;

/// Status code for a successful call.
pub const STATUS_OK: i32 = 0;
/// Status code for an unknown voice handle or a null pointer.
pub const STATUS_BAD_HANDLE: i32 = -1;
/// Status code for a blob shorter than its header or declared sample data.
pub const STATUS_TOO_SHORT: i32 = -2;
/// Status code for an unrecognised instrument header.
pub const STATUS_INVALID_HEADER: i32 = -3;
/// Status code for a failed or refused sample allocation.
pub const STATUS_ALLOCATION_FAILED: i32 = -4;

/// Errors raised while decoding an instrument blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("instrument blob is empty")]
    Empty,

    #[error("unknown instrument kind {0}")]
    UnknownKind(u8),

    #[error("{kind:?} header needs {expected} bytes, blob has {actual}")]
    TooShortForHeader {
        kind: InstrumentKind,
        expected: usize,
        actual: usize,
    },

    #[error("sample declares {declared} bytes but only {available} follow the header")]
    TooShortForSampleData { declared: usize, available: usize },

    #[error("sample length {declared} exceeds the {limit} byte limit")]
    SampleTooLarge { declared: usize, limit: usize },

    #[error("could not allocate {requested} bytes of sample data")]
    AllocationFailed { requested: usize },
}

impl ParseError {
    pub fn status_code(&self) -> i32 {
        match self {
            ParseError::Empty
            | ParseError::TooShortForHeader { .. }
            | ParseError::TooShortForSampleData { .. } => STATUS_TOO_SHORT,
            ParseError::UnknownKind(_) => STATUS_INVALID_HEADER,
            ParseError::SampleTooLarge { .. } | ParseError::AllocationFailed { .. } => {
                STATUS_ALLOCATION_FAILED
            }
        }
    }
}

/// Errors raised by [`Context::load_instrument`](crate::synth::Context::load_instrument).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("voice handle does not refer to an allocated voice")]
    BadHandle,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl LoadError {
    /// Numeric status as reported across the C ABI.
    pub fn status_code(&self) -> i32 {
        match self {
            LoadError::BadHandle => STATUS_BAD_HANDLE,
            LoadError::Parse(err) => err.status_code(),
        }
    }
}

/// Errors raised when creating a [`Context`](crate::synth::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("sample rate must be at least 50 Hz, got {0}")]
    InvalidSampleRate(u32),
}

/// A parameter id that no [`ParamId`](crate::synth::ParamId) matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown parameter id {0}")]
pub struct UnknownParam(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(LoadError::BadHandle.status_code(), -1);
        assert_eq!(LoadError::from(ParseError::Empty).status_code(), -2);
        assert_eq!(
            LoadError::from(ParseError::TooShortForSampleData {
                declared: 100,
                available: 2
            })
            .status_code(),
            -2
        );
        assert_eq!(LoadError::from(ParseError::UnknownKind(9)).status_code(), -3);
        assert_eq!(
            LoadError::from(ParseError::SampleTooLarge {
                declared: 2 << 20,
                limit: 1 << 20
            })
            .status_code(),
            -4
        );
    }

    #[test]
    fn display_names_the_problem() {
        let err = ParseError::TooShortForHeader {
            kind: InstrumentKind::PcmSample,
            expected: 16,
            actual: 2,
        };
        assert_eq!(err.to_string(), "PcmSample header needs 16 bytes, blob has 2");
        assert_eq!(
            ContextError::InvalidSampleRate(0).to_string(),
            "sample rate must be at least 50 Hz, got 0"
        );
    }
}
