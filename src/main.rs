use std::io;
use std::path::PathBuf;
use std::time::Duration;

use smb_auth_sweep::smbclient::{SmbclientConnector, DEFAULT_PROGRAM, DEFAULT_WORKSTATION};
use smb_auth_sweep::sweep;
use smb_auth_sweep::types::{SweepConfig, Target};
use smb_auth_sweep::wordlist::Wordlist;

use ::time::{format_description::well_known, OffsetDateTime};
use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// smb-auth-sweep — try every username/password pair against one SMB server and report
/// which authenticate. Only run it against servers you are authorized to audit.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "smb-auth-sweep",
    version,
    about = "Sequential SMB credential sweep against a single server (authorized audits only).",
    long_about = None
)]
struct Cli {
    /// Target SMB server IP or hostname.
    server: String,

    /// Path to newline-delimited username list.
    usernames: PathBuf,

    /// Path to newline-delimited password list.
    passwords: PathBuf,

    /// Domain or workgroup to authenticate against.
    #[arg(long, default_value = "")]
    domain: String,

    /// SMB port.
    #[arg(long, default_value_t = 445)]
    port: u16,

    /// Timeout in seconds for each network operation.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Seconds to wait after each attempt.
    #[arg(long, default_value = "0", value_parser = parse_delay)]
    delay: Duration,

    /// smbclient program used to authenticate and list shares.
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    smbclient: PathBuf,

    /// NetBIOS workstation name presented to the server.
    #[arg(long, default_value = DEFAULT_WORKSTATION)]
    workstation: String,

    /// Debug diagnostics on stderr (RUST_LOG overrides).
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Both lists must be usable before the first attempt.
    let usernames = Wordlist::load(&cli.usernames, "usernames")?;
    let passwords = Wordlist::load(&cli.passwords, "passwords")?;

    let config = SweepConfig {
        target: Target {
            server: cli.server,
            port: cli.port,
            domain: cli.domain,
            timeout: Duration::from_secs(cli.timeout),
        },
        usernames,
        passwords,
        delay: cli.delay,
    };
    info!(
        server = %config.target.server,
        port = config.target.port,
        domain = %config.target.domain,
        timeout_s = cli.timeout,
        delay = ?config.delay,
        usernames = config.usernames.len(),
        passwords = config.passwords.len(),
        pairs = config.total_pairs(),
        started = %now_rfc3339(),
        "sweep starting"
    );

    let connector = SmbclientConnector::new(cli.smbclient, cli.workstation);
    let mut stdout = io::stdout();
    tokio::select! {
        res = sweep::run(&config, &connector, &mut stdout) => {
            let summary = res?;
            info!(
                attempted = summary.attempted,
                valid = summary.valid,
                invalid = summary.invalid,
                errors = summary.errors,
                finished = %now_rfc3339(),
                "sweep finished"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, sweep stopped");
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_delay(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.trim().parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("delay must be a non-negative number of seconds: {s}"))
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_surface() {
        let cli = Cli::try_parse_from(["smb-auth-sweep", "10.0.0.5", "u.txt", "p.txt"]).unwrap();
        assert_eq!(cli.domain, "");
        assert_eq!(cli.port, 445);
        assert_eq!(cli.timeout, 10);
        assert_eq!(cli.delay, Duration::ZERO);
    }

    #[test]
    fn delay_accepts_fractions_and_rejects_negative() {
        assert_eq!(parse_delay("0.25").unwrap(), Duration::from_millis(250));
        assert!(parse_delay("-1").is_err());
        assert!(parse_delay("nan").is_err());
        assert!(parse_delay("soon").is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(
            Cli::try_parse_from(["smb-auth-sweep", "h", "u", "p", "--timeout", "0"]).is_err()
        );
    }
}
