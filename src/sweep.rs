use anyhow::{Context, Result};
use std::io::Write;
use tokio::time;

use crate::attempt::attempt;
use crate::report::write_outcome;
use crate::session::SessionConnector;
use crate::types::{CredentialPair, SweepConfig, SweepSummary};

/// Try every username × password pair against the configured server, one at a time.
///
/// - Usernames in the outer loop, passwords vary fastest, both in list order.
/// - Each outcome is written to `out` before the next attempt starts.
/// - With a non-zero delay, sleeps after every pair, including the last.
/// - Per-attempt failures never stop the sweep; only a failing `out` does.
pub async fn run<C, W>(config: &SweepConfig, connector: &C, out: &mut W) -> Result<SweepSummary>
where
    C: SessionConnector,
    W: Write,
{
    let mut summary = SweepSummary::default();
    for username in config.usernames.iter() {
        for password in config.passwords.iter() {
            let creds = CredentialPair::new(username.as_str(), password.as_str());
            let outcome = attempt(connector, &config.target, &creds).await;
            summary.record(&outcome);
            write_outcome(out, &creds, &outcome).context("failed to write report line")?;

            if !config.delay.is_zero() {
                time::sleep(config.delay).await;
            }
        }
    }
    Ok(summary)
}
