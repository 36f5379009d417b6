//! Scripted collaborator for tests and dry runs.
//!
//! Every credential pair maps to a [`Script`]; pairs without one are rejected the way
//! a text-only SMB client rejects them, with the not-authenticated message.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::session::{
    SessionConnector, SessionError, Share, ShareSession, NOT_AUTHENTICATED_MESSAGE,
};

/// How a scripted session behaves for one credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Connects and lists these shares.
    Authenticate(Vec<String>),
    /// `connect` returns `Ok(false)`.
    Unreachable,
    /// `connect` fails with this message.
    ConnectFails(String),
    /// `connect` succeeds, `list_shares` fails with this message.
    ListFails(String),
    /// `connect` succeeds, `list_shares` never completes.
    Stall,
}

/// Observable calls made against scripted sessions, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open { username: String, password: String },
    Connect { server: String, port: u16 },
    ListShares,
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    scripts: HashMap<(String, String), Script>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the behaviour for one username/password pair.
    pub fn with(mut self, username: &str, password: &str, script: Script) -> Self {
        self.scripts
            .insert((username.to_string(), password.to_string()), script);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// (username, password) of every opened session, in open order.
    pub fn attempted_pairs(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Open { username, password } => Some((username, password)),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Close))
            .count()
    }
}

impl SessionConnector for ScriptedConnector {
    type Session = ScriptedSession;

    fn open(&self, username: &str, password: &str, _domain: &str) -> ScriptedSession {
        let script = self
            .scripts
            .get(&(username.to_string(), password.to_string()))
            .cloned()
            .unwrap_or_else(|| Script::ListFails(NOT_AUTHENTICATED_MESSAGE.to_string()));
        push(
            &self.events,
            Event::Open {
                username: username.to_string(),
                password: password.to_string(),
            },
        );
        ScriptedSession {
            script,
            events: self.events.clone(),
            closed: false,
        }
    }
}

pub struct ScriptedSession {
    script: Script,
    events: Arc<Mutex<Vec<Event>>>,
    closed: bool,
}

#[async_trait]
impl ShareSession for ScriptedSession {
    async fn connect(
        &mut self,
        server: &str,
        port: u16,
        _timeout: Duration,
    ) -> Result<bool, SessionError> {
        push(
            &self.events,
            Event::Connect {
                server: server.to_string(),
                port,
            },
        );
        match &self.script {
            Script::Unreachable => Ok(false),
            Script::ConnectFails(msg) => Err(SessionError::from_message(msg)),
            Script::Authenticate(_) | Script::ListFails(_) | Script::Stall => Ok(true),
        }
    }

    async fn list_shares(&mut self, _timeout: Duration) -> Result<Vec<Share>, SessionError> {
        push(&self.events, Event::ListShares);
        match &self.script {
            Script::Authenticate(shares) => Ok(shares.iter().map(Share::named).collect()),
            Script::ListFails(msg) => Err(SessionError::from_message(msg)),
            Script::Stall => std::future::pending().await,
            Script::Unreachable | Script::ConnectFails(_) => {
                Err(SessionError::Protocol("session not established".into()))
            }
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            push(&self.events, Event::Close);
        }
    }
}

fn push(events: &Arc<Mutex<Vec<Event>>>, event: Event) {
    if let Ok(mut guard) = events.lock() {
        guard.push(event);
    }
}
