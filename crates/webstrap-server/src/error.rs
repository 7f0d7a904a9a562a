//! Server error types.

use std::io;

/// Errors raised while starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not be bound to the configured address.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// Address that was being bound.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configured host or port cannot form a listen address.
    #[error("invalid listen address: {0}")]
    InvalidAddress(String),

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ServerError {
    /// Creates a bind error for the given address.
    pub fn bind(addr: impl Into<String>, source: io::Error) -> Self {
        Self::Bind {
            addr: addr.into(),
            source,
        }
    }

    /// Creates an invalid address error.
    pub fn invalid_address(reason: impl Into<String>) -> Self {
        Self::InvalidAddress(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServerError::bind(
            "127.0.0.1:80",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(
            err.to_string(),
            "failed to bind to 127.0.0.1:80: permission denied"
        );

        let err = ServerError::invalid_address("port 70000 is out of range");
        assert!(err.to_string().contains("70000"));
    }

    #[test]
    fn test_io_from() {
        let err: ServerError = io::Error::new(io::ErrorKind::Other, "reset").into();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
