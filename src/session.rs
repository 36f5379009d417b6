//! Protocol collaborator abstraction.
//!
//! The executor only ever talks to a server through these traits, so tests can swap
//! in a scripted session and the production path can wrap whatever SMB client is
//! available. Rejected credentials are a typed signal, not an error string.

use async_trait::async_trait;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// Text some SMB client libraries raise when the server refuses the credentials.
///
/// Only [`SessionError::from_message`] compares against it.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "SMB connection not authenticated";

/// Failure reported by a collaborator operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The server rejected the username/password.
    #[error("SMB connection not authenticated")]
    AuthenticationRejected,

    /// Transport failure, timeout, malformed response or unexpected protocol state.
    #[error("{0}")]
    Protocol(String),
}

impl SessionError {
    /// Classify free-form error text from a client that has no typed rejection signal.
    pub fn from_message(message: impl AsRef<str>) -> Self {
        let message = message.as_ref().trim();
        if message == NOT_AUTHENTICATED_MESSAGE {
            SessionError::AuthenticationRejected
        } else {
            SessionError::Protocol(message.to_string())
        }
    }
}

/// One share advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub name: String,
    pub comment: String,
}

impl Share {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
        }
    }
}

/// A single authenticated-or-not conversation with the server.
#[async_trait]
pub trait ShareSession: Send {
    /// Transport connect plus handshake. `Ok(false)` means the session could not be
    /// established without a more specific error.
    async fn connect(
        &mut self,
        server: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<bool, SessionError>;

    /// List shares; only possible once authenticated.
    async fn list_shares(&mut self, timeout: Duration) -> Result<Vec<Share>, SessionError>;

    /// Release everything the session holds. Must be safe to call more than once.
    fn close(&mut self);
}

/// Creates a fresh session for each attempt.
pub trait SessionConnector {
    type Session: ShareSession;

    fn open(&self, username: &str, password: &str, domain: &str) -> Self::Session;
}

/// Owns a session and closes it when dropped, on every exit path.
pub struct SessionGuard<S: ShareSession> {
    session: S,
}

impl<S: ShareSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: ShareSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: ShareSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: ShareSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_maps_to_rejection() {
        assert_eq!(
            SessionError::from_message("SMB connection not authenticated"),
            SessionError::AuthenticationRejected
        );
        assert_eq!(
            SessionError::from_message("  SMB connection not authenticated\n"),
            SessionError::AuthenticationRejected
        );
    }

    #[test]
    fn other_text_is_protocol_error_trimmed() {
        assert_eq!(
            SessionError::from_message(" Connection reset by peer \n"),
            SessionError::Protocol("Connection reset by peer".into())
        );
        // Case and substring matches are not the sentinel.
        assert!(matches!(
            SessionError::from_message("smb connection not authenticated"),
            SessionError::Protocol(_)
        ));
        assert!(matches!(
            SessionError::from_message("Error: SMB connection not authenticated"),
            SessionError::Protocol(_)
        ));
    }

    #[test]
    fn rejection_displays_sentinel() {
        assert_eq!(
            SessionError::AuthenticationRejected.to_string(),
            NOT_AUTHENTICATED_MESSAGE
        );
    }
}
