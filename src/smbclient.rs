//! Production collaborator backed by the Samba `smbclient` program.
//!
//! `connect` probes the SMB port directly so unreachable servers are reported before
//! any credentials are sent. `list_shares` runs `smbclient -L -g`, which performs the
//! NTLM session setup and the share enumeration in one go. Credentials are handed over
//! in a per-session 0600 authentication file (`-A`), which Samba ranks above the
//! environment and ticket caches and reads verbatim; Kerberos is disabled so a cached
//! ticket can never stand in for the pair under test. The file is removed on `close`.

use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time;
use tracing::{debug, trace};

use crate::session::{SessionConnector, SessionError, Share, ShareSession};

pub const DEFAULT_PROGRAM: &str = "smbclient";
pub const DEFAULT_WORKSTATION: &str = "smb-auth-sweep";

/// NT status codes that mean the server rejected the credentials themselves.
const REJECTED_STATUSES: &[&str] = &[
    "NT_STATUS_LOGON_FAILURE",
    "NT_STATUS_WRONG_PASSWORD",
    "NT_STATUS_NO_SUCH_USER",
];

/// Share types kept from the grepable listing.
const SHARE_KINDS: &[&str] = &["Disk", "IPC", "Printer"];

static AUTH_FILE_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct SmbclientConnector {
    program: PathBuf,
    workstation: String,
}

impl SmbclientConnector {
    pub fn new(program: impl Into<PathBuf>, workstation: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            workstation: workstation.into(),
        }
    }
}

impl Default for SmbclientConnector {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_WORKSTATION)
    }
}

impl SessionConnector for SmbclientConnector {
    type Session = SmbclientSession;

    fn open(&self, username: &str, password: &str, domain: &str) -> SmbclientSession {
        SmbclientSession {
            program: self.program.clone(),
            workstation: self.workstation.clone(),
            username: username.to_string(),
            password: password.to_string(),
            domain: domain.to_string(),
            endpoint: None,
            auth_file: None,
        }
    }
}

pub struct SmbclientSession {
    program: PathBuf,
    workstation: String,
    username: String,
    password: String,
    domain: String,
    /// Set once the port probe succeeded.
    endpoint: Option<(String, u16)>,
    auth_file: Option<PathBuf>,
}

#[async_trait]
impl ShareSession for SmbclientSession {
    async fn connect(
        &mut self,
        server: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<bool, SessionError> {
        match time::timeout(timeout, TcpStream::connect((server, port))).await {
            Ok(Ok(_stream)) => {
                self.endpoint = Some((server.to_string(), port));
                Ok(true)
            }
            Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
                debug!(server, port, "connection refused");
                Ok(false)
            }
            Ok(Err(e)) => Err(SessionError::Protocol(e.to_string())),
            Err(_) => Err(SessionError::Protocol(format!(
                "timed out connecting to {server}:{port}"
            ))),
        }
    }

    async fn list_shares(&mut self, timeout: Duration) -> Result<Vec<Share>, SessionError> {
        let Some((server, port)) = self.endpoint.clone() else {
            return Err(SessionError::Protocol("session not established".into()));
        };

        let auth_file = match self.auth_file.clone() {
            Some(path) => path,
            None => {
                let path = write_auth_file(&self.username, &self.password).map_err(|e| {
                    SessionError::Protocol(format!("failed to write credentials file: {e}"))
                })?;
                self.auth_file = Some(path.clone());
                path
            }
        };

        let mut cmd = Command::new(&self.program);
        cmd.arg("-L")
            .arg(format!("//{server}"))
            .arg("-p")
            .arg(port.to_string())
            .arg("-g")
            .arg("-t")
            .arg(timeout.as_secs().max(1).to_string())
            .arg("-n")
            .arg(&self.workstation)
            .arg("--use-kerberos=disabled")
            .arg("-A")
            .arg(&auth_file)
            .env_remove("USER")
            .env_remove("PASSWD")
            .env_remove("PASSWD_FD")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if !self.domain.is_empty() {
            cmd.arg("-W").arg(&self.domain);
        }

        let output = match time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(SessionError::Protocol(format!(
                    "failed to run {}: {e}",
                    self.program.display()
                )))
            }
            Err(_) => {
                return Err(SessionError::Protocol(format!(
                    "timed out listing shares on {server}:{port}"
                )))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        trace!(status = ?output.status, %stdout, %stderr, "smbclient finished");
        if output.status.success() {
            Ok(parse_share_listing(&stdout))
        } else {
            Err(classify_failure(&format!("{stdout}\n{stderr}")))
        }
    }

    fn close(&mut self) {
        self.endpoint = None;
        self.password.clear();
        if let Some(path) = self.auth_file.take() {
            if let Err(e) = fs::remove_file(&path) {
                debug!(path = %path.display(), error = %e, "failed to remove credentials file");
            }
        }
    }
}

/// Write an smbclient authentication file holding the pair verbatim, readable by the
/// owner only.
fn write_auth_file(username: &str, password: &str) -> io::Result<PathBuf> {
    let seq = AUTH_FILE_SEQ.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "smb-auth-sweep-{}-{seq}.auth",
        std::process::id()
    ));
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(&path)?;
    if let Err(e) = write!(file, "username = {username}\npassword = {password}\n") {
        let _ = fs::remove_file(&path);
        return Err(e);
    }
    Ok(path)
}

/// Extract shares from `smbclient -g` output (`Kind|Name|Comment` per line).
pub fn parse_share_listing(output: &str) -> Vec<Share> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.trim().splitn(3, '|');
            let kind = parts.next()?;
            let name = parts.next()?;
            if !SHARE_KINDS.contains(&kind) || name.is_empty() {
                return None;
            }
            Some(Share {
                name: name.to_string(),
                comment: parts.next().unwrap_or("").to_string(),
            })
        })
        .collect()
}

/// Turn failed `smbclient` output into a typed error.
pub fn classify_failure(output: &str) -> SessionError {
    let status = output
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .find(|word| word.starts_with("NT_STATUS_"));
    if let Some(status) = status {
        if REJECTED_STATUSES.contains(&status) {
            return SessionError::AuthenticationRejected;
        }
    }

    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let message = lines
        .iter()
        .find(|l| l.contains("NT_STATUS_"))
        .or_else(|| lines.last())
        .copied()
        .unwrap_or("smbclient failed without output");
    SessionError::Protocol(message.to_string())
}
