use tracing::debug;

use crate::session::{SessionConnector, SessionError, SessionGuard, ShareSession};
use crate::types::{AttemptOutcome, CredentialPair, Target};

/// Message reported when the collaborator cannot establish a session at all.
pub const ESTABLISH_FAILED_MESSAGE: &str = "Failed to establish session";

/// Make one authentication attempt and classify it.
///
/// - Opens a session scoped to this call; it is closed before returning on every path,
///   and also when the returned future is dropped mid-attempt.
/// - `connect` returning `false` is a protocol error, never an invalid credential.
/// - A successful share listing is proof of authentication.
/// - Errors from either step become `Invalid` (rejection) or `ProtocolError`; nothing
///   escapes to the caller.
pub async fn attempt<C: SessionConnector>(
    connector: &C,
    target: &Target,
    creds: &CredentialPair,
) -> AttemptOutcome {
    debug!(server = %target.server, port = target.port, username = %creds.username, "attempt start");
    let mut session = SessionGuard::new(connector.open(
        &creds.username,
        &creds.password,
        &target.domain,
    ));
    let result = establish_and_list(&mut *session, target).await;
    drop(session);

    let outcome = classify(result);
    debug!(username = %creds.username, valid = outcome.is_valid(), "attempt done");
    outcome
}

/// `Ok(None)` when the session could not be established.
async fn establish_and_list<S: ShareSession>(
    session: &mut S,
    target: &Target,
) -> Result<Option<Vec<String>>, SessionError> {
    if !session
        .connect(&target.server, target.port, target.timeout)
        .await?
    {
        return Ok(None);
    }
    let shares = session.list_shares(target.timeout).await?;
    Ok(Some(shares.into_iter().map(|s| s.name).collect()))
}

fn classify(result: Result<Option<Vec<String>>, SessionError>) -> AttemptOutcome {
    match result {
        Ok(Some(shares)) => AttemptOutcome::Valid { shares },
        Ok(None) => AttemptOutcome::ProtocolError {
            message: ESTABLISH_FAILED_MESSAGE.to_string(),
        },
        Err(SessionError::AuthenticationRejected) => AttemptOutcome::Invalid,
        Err(SessionError::Protocol(message)) => AttemptOutcome::ProtocolError {
            message: message.trim().to_string(),
        },
    }
}
