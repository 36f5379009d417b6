use std::time::Duration;

use crate::wordlist::Wordlist;

/// One (username, password) pair, built per iteration and dropped after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub username: String,
    pub password: String,
}

impl CredentialPair {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Classified result of a single authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Session authenticated; shares exactly as the server listed them.
    Valid { shares: Vec<String> },
    /// Server rejected the credentials.
    Invalid,
    /// Neither valid nor invalid could be determined.
    ProtocolError { message: String },
}

impl AttemptOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, AttemptOutcome::Valid { .. })
    }
}

/// Where and how each attempt connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub server: String,
    pub port: u16,
    /// Domain or workgroup; empty means none.
    pub domain: String,
    /// Applied to each network operation (establish, list) independently.
    pub timeout: Duration,
}

impl Target {
    pub const DEFAULT_PORT: u16 = 445;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            port: Self::DEFAULT_PORT,
            domain: String::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Immutable input of one sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub target: Target,
    pub usernames: Wordlist,
    pub passwords: Wordlist,
    /// Pause after every attempt; zero disables it.
    pub delay: Duration,
}

impl SweepConfig {
    /// Number of attempts a full sweep makes.
    pub fn total_pairs(&self) -> u64 {
        self.usernames.len() as u64 * self.passwords.len() as u64
    }
}

/// Counters for a finished (or interrupted) sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub attempted: u64,
    pub valid: u64,
    pub invalid: u64,
    pub errors: u64,
}

impl SweepSummary {
    pub fn record(&mut self, outcome: &AttemptOutcome) {
        self.attempted += 1;
        match outcome {
            AttemptOutcome::Valid { .. } => self.valid += 1,
            AttemptOutcome::Invalid => self.invalid += 1,
            AttemptOutcome::ProtocolError { .. } => self.errors += 1,
        }
    }
}
