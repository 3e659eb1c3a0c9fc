//! Server session: credential handshake state machine.
//!
//! One credential round-trip per connection epoch:
//!
//! 1. Transport connects; the device sends its pre-shared credential.
//! 2. Server answers `authentication` with `true` or `false`.
//! 3. On `true` the device sends its robot id and regulation may run.
//!
//! ```text
//!                 connect                 "true"
//!  Disconnected ──────────▶ Awaiting ───────────────▶ Authenticated
//!       ▲                     │  ▲ (malformed)             │
//!       │                     │  └──┘                      │
//!       │                     │ "false"                    │
//!       │                     ▼                            │
//!       └──── disconnect ── Rejected ◀──── (terminal) ─────┘ disconnect
//! ```
//!
//! A rejection is final for the epoch; only a fresh `connect` starts a new
//! attempt.

use log::{info, warn};

// ── Types ────────────────────────────────────────────────────

/// Connection-level authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    /// Credential sent, waiting for the server verdict.
    AwaitingCredential,
    /// Server refused the credential; nothing more this epoch.
    Rejected,
    Authenticated,
}

/// Server verdict carried by an inbound `authentication` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialResult {
    Accepted,
    Rejected,
    /// Neither `true` nor `false`.
    Malformed,
}

/// Outbound message the session asks the caller to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    SendCredential,
    SendRobotId,
}

// ── Session state machine ────────────────────────────────────

/// Tracks the server session through the credential handshake.
#[derive(Debug, Clone)]
pub struct SessionState {
    state: LinkState,
    /// Incremented on every `connect`.
    epoch: u32,
    robot_id_sent: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            state: LinkState::Disconnected,
            epoch: 0,
            robot_id_sent: false,
        }
    }

    /// Transport came up.  Starts a new epoch even when already connected,
    /// since the server treats every `connect` as a fresh client.
    pub fn on_connected(&mut self) -> SessionAction {
        self.epoch = self.epoch.wrapping_add(1);
        self.robot_id_sent = false;
        self.state = LinkState::AwaitingCredential;
        info!("session: connected (epoch {}), sending credential", self.epoch);
        SessionAction::SendCredential
    }

    /// Apply the server verdict.
    ///
    /// Returns [`SessionAction::SendRobotId`] on the first acceptance of the
    /// epoch only.
    pub fn on_credential_result(&mut self, result: CredentialResult) -> Option<SessionAction> {
        match (self.state, result) {
            (LinkState::AwaitingCredential, CredentialResult::Accepted) => {
                self.state = LinkState::Authenticated;
                info!("session: credential accepted (epoch {})", self.epoch);
                if self.robot_id_sent {
                    None
                } else {
                    self.robot_id_sent = true;
                    Some(SessionAction::SendRobotId)
                }
            }
            (LinkState::AwaitingCredential, CredentialResult::Rejected) => {
                self.state = LinkState::Rejected;
                warn!("session: credential rejected (epoch {})", self.epoch);
                None
            }
            (LinkState::AwaitingCredential, CredentialResult::Malformed) => {
                warn!("session: malformed authentication reply ignored");
                None
            }
            (LinkState::Authenticated, CredentialResult::Accepted) => None,
            (state, result) => {
                warn!("session: {result:?} ignored in state {state:?}");
                None
            }
        }
    }

    /// Transport went down.  Safe to call repeatedly.
    pub fn on_disconnected(&mut self) {
        if self.state != LinkState::Disconnected {
            info!("session: disconnected (epoch {})", self.epoch);
        }
        self.state = LinkState::Disconnected;
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == LinkState::Authenticated
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────
