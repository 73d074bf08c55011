//! Common error type and result alias for route assembly.

use thiserror::Error;

/// Errors surfaced by the assembler and hop export. All of them are terminal
/// for the call that produced them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("No route found from {from} to {to}")]
    NoRouteFound { from: String, to: String },

    #[error("Path is not solved and cannot be exported as hops")]
    UnsolvedPath,
}

impl RouteError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RouteError::InvalidRequest { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
