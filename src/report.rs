use std::io::{self, Write};

use crate::types::{AttemptOutcome, CredentialPair};

/// Render the report lines for one outcome, without trailing newlines.
pub fn format_outcome(creds: &CredentialPair, outcome: &AttemptOutcome) -> Vec<String> {
    let pair = format!("{}:{}", creds.username, creds.password);
    match outcome {
        AttemptOutcome::Valid { shares } => {
            let mut lines = vec![format!("VALID: {pair}")];
            if !shares.is_empty() {
                lines.push(format!("  Shares: {}", shares.join(", ")));
            }
            lines
        }
        AttemptOutcome::ProtocolError { message } => vec![format!("ERROR: {pair} -> {message}")],
        AttemptOutcome::Invalid => vec![format!("INVALID: {pair}")],
    }
}

/// Write one outcome and flush so the line is visible before the next attempt starts.
pub fn write_outcome<W: Write>(
    out: &mut W,
    creds: &CredentialPair,
    outcome: &AttemptOutcome,
) -> io::Result<()> {
    for line in format_outcome(creds, outcome) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_with_shares() {
        let lines = format_outcome(
            &CredentialPair::new("admin", "1234"),
            &AttemptOutcome::Valid {
                shares: vec!["C$".into(), "Users".into()],
            },
        );
        assert_eq!(lines, vec!["VALID: admin:1234", "  Shares: C$, Users"]);
    }

    #[test]
    fn valid_without_shares_has_no_share_line() {
        let lines = format_outcome(
            &CredentialPair::new("admin", "1234"),
            &AttemptOutcome::Valid { shares: vec![] },
        );
        assert_eq!(lines, vec!["VALID: admin:1234"]);
    }

    #[test]
    fn error_and_invalid() {
        let creds = CredentialPair::new("guest", "");
        assert_eq!(
            format_outcome(
                &creds,
                &AttemptOutcome::ProtocolError {
                    message: "Failed to establish session".into()
                }
            ),
            vec!["ERROR: guest: -> Failed to establish session"]
        );
        assert_eq!(
            format_outcome(&creds, &AttemptOutcome::Invalid),
            vec!["INVALID: guest:"]
        );
    }

    #[test]
    fn write_appends_newlines() {
        let mut buf = Vec::new();
        write_outcome(
            &mut buf,
            &CredentialPair::new("a", "b"),
            &AttemptOutcome::Invalid,
        )
        .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "INVALID: a:b\n");
    }
}
