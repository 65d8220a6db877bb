//! Cloud connection state machine
//!
//! `Disconnected -> Validating -> (Connected | Disconnected on error)`;
//! `Connected -> Validating` when switching accounts; `Connected ->
//! Disconnected` only by explicit disconnect. Transient
//! push/pull failures never demote the connection — they are reported as
//! events so later retries can succeed.
//!
//! A `Connected` target is only *armed* for automatic pushes after at least
//! one pull attempt since connecting. This prevents a fresh, empty local
//! state from overwriting a populated remote backup before the remote has
//! been read at least once.

use crate::error::{Result, SyncError};

/// Cloud connection state, including the armed flag gating auto-push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudConnection {
    Disconnected,
    Validating { account_id: String },
    Connected { account_id: String, armed: bool },
}

impl CloudConnection {
    pub fn describe(&self) -> &'static str {
        match self {
            CloudConnection::Disconnected => "Disconnected",
            CloudConnection::Validating { .. } => "Validating",
            CloudConnection::Connected { .. } => "Connected",
        }
    }

    /// The account id, in any state that carries one.
    pub fn account_id(&self) -> Option<&str> {
        match self {
            CloudConnection::Disconnected => None,
            CloudConnection::Validating { account_id }
            | CloudConnection::Connected { account_id, .. } => Some(account_id),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, CloudConnection::Connected { .. })
    }

    /// Whether automatic pushes are permitted.
    pub fn is_armed(&self) -> bool {
        matches!(self, CloudConnection::Connected { armed: true, .. })
    }

    /// `Disconnected -> Validating`, or `Connected -> Validating` when the
    /// user switches accounts without disconnecting first.
    pub fn begin_validation(&mut self, account_id: impl Into<String>) -> Result<()> {
        match self {
            CloudConnection::Disconnected | CloudConnection::Connected { .. } => {
                *self = CloudConnection::Validating {
                    account_id: account_id.into(),
                };
                Ok(())
            }
            CloudConnection::Validating { .. } => {
                Err(self.invalid_transition("Validating", "a connection is already in progress"))
            }
        }
    }

    /// `Validating -> Connected`
    pub fn connect(&mut self, armed: bool) -> Result<()> {
        match self {
            CloudConnection::Validating { account_id } => {
                *self = CloudConnection::Connected {
                    account_id: std::mem::take(account_id),
                    armed,
                };
                Ok(())
            }
            _ => Err(self.invalid_transition("Connected", "validation has not started")),
        }
    }

    /// `Validating -> Disconnected` (validation failed)
    pub fn fail_validation(&mut self) -> Result<()> {
        match self {
            CloudConnection::Validating { .. } => {
                *self = CloudConnection::Disconnected;
                Ok(())
            }
            _ => Err(self.invalid_transition("Disconnected", "no validation in progress")),
        }
    }

    /// Resume a previously persisted connection at startup, unarmed until
    /// the initial pull attempt completes.
    pub fn resume(&mut self, account_id: impl Into<String>) -> Result<()> {
        match self {
            CloudConnection::Disconnected => {
                *self = CloudConnection::Connected {
                    account_id: account_id.into(),
                    armed: false,
                };
                Ok(())
            }
            _ => Err(self.invalid_transition("Connected", "already connected or validating")),
        }
    }

    /// Arm auto-push after a pull attempt. Idempotent while connected.
    pub fn arm(&mut self) -> Result<()> {
        match self {
            CloudConnection::Connected { armed, .. } => {
                *armed = true;
                Ok(())
            }
            _ => Err(self.invalid_transition("Connected(armed)", "not connected")),
        }
    }

    /// Explicit disconnect, valid from any state.
    pub fn disconnect(&mut self) {
        *self = CloudConnection::Disconnected;
    }

    fn invalid_transition(&self, to: &str, reason: &str) -> SyncError {
        SyncError::InvalidStateTransition {
            from: self.describe().to_string(),
            to: to.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Default for CloudConnection {
    fn default() -> Self {
        CloudConnection::Disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_connect() {
        let mut conn = CloudConnection::default();
        conn.begin_validation("acct-1").unwrap();
        assert_eq!(conn.describe(), "Validating");
        assert_eq!(conn.account_id(), Some("acct-1"));

        conn.connect(true).unwrap();
        assert!(conn.is_connected());
        assert!(conn.is_armed());
    }

    #[test]
    fn failed_validation_returns_to_disconnected() {
        let mut conn = CloudConnection::default();
        conn.begin_validation("acct-1").unwrap();
        conn.fail_validation().unwrap();
        assert_eq!(conn, CloudConnection::Disconnected);
    }

    #[test]
    fn resume_is_unarmed_until_pull_attempt() {
        let mut conn = CloudConnection::default();
        conn.resume("acct-1").unwrap();
        assert!(conn.is_connected());
        assert!(!conn.is_armed());

        conn.arm().unwrap();
        assert!(conn.is_armed());
    }

    #[test]
    fn switching_accounts_revalidates_from_connected() {
        let mut conn = CloudConnection::default();
        conn.resume("acct-1").unwrap();

        conn.begin_validation("acct-2").unwrap();
        assert_eq!(conn.describe(), "Validating");
        assert_eq!(conn.account_id(), Some("acct-2"));

        conn.connect(true).unwrap();
        assert!(conn.is_armed());
    }

    #[test]
    fn cannot_validate_while_validating() {
        let mut conn = CloudConnection::default();
        conn.begin_validation("acct-1").unwrap();

        let err = conn.begin_validation("acct-2").unwrap_err();
        assert!(matches!(
            err,
            SyncError::InvalidStateTransition { ref from, .. } if from == "Validating"
        ));
    }

    #[test]
    fn arm_requires_connection() {
        let mut conn = CloudConnection::default();
        assert!(conn.arm().is_err());
    }

    #[test]
    fn disconnect_from_any_state() {
        let mut conn = CloudConnection::default();
        conn.begin_validation("acct-1").unwrap();
        conn.disconnect();
        assert_eq!(conn, CloudConnection::Disconnected);

        conn.resume("acct-1").unwrap();
        conn.disconnect();
        assert_eq!(conn, CloudConnection::Disconnected);
    }
}
