//! Listener errors surfaced by [`crate::ApiServer::serve`].

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::net::SocketAddr;

/// Result alias for [`ApiServerError`].
pub type ApiServerResult<T> = std::result::Result<T, ApiServerError>;

/// Failure to start or keep running the HTTP listener.
#[derive(Debug)]
pub enum ApiServerError {
    /// The socket could not be bound, usually because the port is taken.
    Bind {
        /// Requested listen address.
        addr: SocketAddr,
        /// Error returned by the OS.
        source: io::Error,
    },
    /// The accept loop ended with an error before shutdown was requested.
    Serve {
        /// Error returned by the server loop.
        source: io::Error,
    },
}

impl Display for ApiServerError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Bind { .. } => "could not bind http listener",
            Self::Serve { .. } => "http server stopped with an error",
        };
        formatter.write_str(message)
    }
}

impl Error for ApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let (Self::Bind { source, .. } | Self::Serve { source }) = self;
        Some(source)
    }
}
