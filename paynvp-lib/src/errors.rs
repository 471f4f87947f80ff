//! Error types for NVP codec operations.
//!
//! Malformed index annotations and path-shape conflicts are resolved
//! permissively by the codec and never surface here. What remains are
//! resource boundaries, explicit caller requests that cannot be honoured
//! (densifying a sparse sequence, an unimplemented wire format) and
//! failures reported by the transport collaborator.

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum NvpErrorCode {
    /// Feature not implemented
    Unimplemented = 1000,
    /// Transport/network layer error
    Transport = 2000,
    /// Unknown protocol tag
    UnsupportedProtocol = 4001,
    /// Invalid request/data
    InvalidData = 5000,
    /// Serialization error
    Serialization = 5002,
    /// Sequence is not contiguous
    Gap = 5003,
    /// Nesting depth limit exceeded
    DepthLimitExceeded = 8001,
}

/// Error type for NVP operations.
#[derive(Debug, thiserror::Error)]
pub enum NvpError {
    /// Feature not implemented.
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    /// The protocol tag is not one of `NV`, `JSON` or `XML`.
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// A key or tree nests deeper than the configured limit.
    #[error("nesting depth {depth} exceeds the limit of {limit}")]
    DepthLimitExceeded {
        /// Depth that was reached when the walk stopped
        depth: usize,
        /// Configured maximum
        limit: usize,
    },

    /// A sequence could not be densified because an index is missing.
    #[error("sequence is not contiguous: index {missing} is missing")]
    Gap {
        /// First index absent from `0..len`
        missing: u64,
    },

    /// Invalid data provided.
    #[error("invalid {field}: {reason}")]
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport/network layer error.
    #[error("transport error: {0}")]
    Transport(String),
}

impl NvpError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> NvpErrorCode {
        match self {
            Self::Unimplemented(_) => NvpErrorCode::Unimplemented,
            Self::UnsupportedProtocol(_) => NvpErrorCode::UnsupportedProtocol,
            Self::DepthLimitExceeded { .. } => NvpErrorCode::DepthLimitExceeded,
            Self::Gap { .. } => NvpErrorCode::Gap,
            Self::InvalidData { .. } => NvpErrorCode::InvalidData,
            Self::Serialization(_) => NvpErrorCode::Serialization,
            Self::Transport(_) => NvpErrorCode::Transport,
        }
    }

    /// Returns true if this error is potentially recoverable by retrying.
    ///
    /// Only transport failures qualify; codec errors are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for NvpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
