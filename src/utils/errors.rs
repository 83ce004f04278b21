#![forbid(unsafe_code)]

use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// The log4rs configuration could not be built or installed.
    #[error("Unable to initialize Log4rs logging: {}", .0)]
    Log4rsInitialization(String),

    /// A challenge could not be rendered as an HTTP header value.
    #[error("Invalid WWW-Authenticate header value: {}", .0)]
    InvalidHeaderValue(String),
}
