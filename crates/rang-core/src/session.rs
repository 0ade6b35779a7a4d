//! Client session state.
//!
//! The session is a plain struct handed to whatever needs it. Loading and
//! saving are separate pure functions over JSON text; [`SessionFile`] only
//! moves that text to and from disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(String),
}

/// Identity and room membership of the local user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub room_id: Option<String>,
    #[serde(default)]
    pub is_room_owner: bool,
}

/// Borrowed view of a session that is fully inside a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomMembership<'a> {
    pub user_id: &'a str,
    pub user_name: &'a str,
    pub room_id: &'a str,
    pub is_room_owner: bool,
}

impl SessionConfig {
    /// Record the local user's identity.
    pub fn set_user(&mut self, user_id: impl Into<String>, user_name: impl Into<String>) {
        self.user_id = Some(user_id.into());
        self.user_name = Some(user_name.into());
    }

    /// Record the room the user is in.
    pub fn set_room(&mut self, room_id: impl Into<String>, is_owner: bool) {
        self.room_id = Some(room_id.into());
        self.is_room_owner = is_owner;
    }

    /// Forget the user's identity.
    pub fn clear_user(&mut self) {
        self.user_id = None;
        self.user_name = None;
    }

    /// Leave the current room.
    pub fn clear_room(&mut self) {
        self.room_id = None;
        self.is_room_owner = false;
    }

    /// Membership details when user and room are both known.
    pub fn membership(&self) -> Option<RoomMembership<'_>> {
        Some(RoomMembership {
            user_id: self.user_id.as_deref()?,
            user_name: self.user_name.as_deref()?,
            room_id: self.room_id.as_deref()?,
            is_room_owner: self.is_room_owner,
        })
    }
}

/// Parse a saved session.
///
/// A user id without a name (or the reverse) is treated as no user, matching
/// how a half-written session would be read back.
pub fn load_session(json: &str) -> Result<SessionConfig, SessionError> {
    let mut session: SessionConfig = serde_json::from_str(json)?;
    if session.user_id.is_none() || session.user_name.is_none() {
        session.clear_user();
    }
    if session.room_id.is_none() {
        session.is_room_owner = false;
    }
    Ok(session)
}

/// Serialize a session for storage.
pub fn save_session(session: &SessionConfig) -> Result<String, SessionError> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// Session persisted as a JSON file.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Use the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Session file in the default location.
    ///
    /// On Unix: `~/.config/rang/session.json`
    pub fn default_location() -> Result<Self, SessionError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| SessionError::Io("Could not determine home directory".to_string()))?;
        Ok(Self::new(base.join("rang").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the session; a missing file is an empty session.
    pub fn load(&self) -> Result<SessionConfig, SessionError> {
        if !self.path.exists() {
            return Ok(SessionConfig::default());
        }
        let json = fs::read_to_string(&self.path).map_err(|e| {
            SessionError::Io(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        load_session(&json)
    }

    /// Write the session, creating parent directories as needed.
    pub fn save(&self, session: &SessionConfig) -> Result<(), SessionError> {
        let json = save_session(session)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SessionError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, json).map_err(|e| {
            SessionError::Io(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn joined() -> SessionConfig {
        let mut session = SessionConfig::default();
        session.set_user("u1", "Rahul");
        session.set_room("r1", true);
        session
    }

    #[test]
    fn test_membership_requires_user_and_room() {
        let mut session = SessionConfig::default();
        assert!(session.membership().is_none());

        session.set_user("u1", "Rahul");
        assert!(session.membership().is_none());

        session.set_room("r1", true);
        let membership = session.membership().unwrap();
        assert_eq!(membership.user_name, "Rahul");
        assert!(membership.is_room_owner);
    }

    #[test]
    fn test_clear_room_resets_ownership() {
        let mut session = joined();
        session.clear_room();
        assert!(session.room_id.is_none());
        assert!(!session.is_room_owner);
        assert_eq!(session.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_save_then_load() {
        let session = joined();
        let json = save_session(&session).unwrap();
        assert_eq!(load_session(&json).unwrap(), session);
    }

    #[test]
    fn test_load_drops_half_user() {
        let session = load_session(r#"{"userId":"u1","roomId":"r1","isRoomOwner":true}"#).unwrap();
        assert!(session.user_id.is_none());
        assert_eq!(session.room_id.as_deref(), Some("r1"));
        assert!(session.is_room_owner);
    }

    #[test]
    fn test_load_owner_flag_needs_room() {
        let session = load_session(r#"{"isRoomOwner":true}"#).unwrap();
        assert!(!session.is_room_owner);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        assert!(matches!(load_session("{"), Err(SessionError::Serialization(_))));
    }

    #[test]
    fn test_session_file_roundtrip() {
        let dir = tempdir().unwrap();
        let file = SessionFile::new(dir.path().join("nested").join("session.json"));

        assert_eq!(file.load().unwrap(), SessionConfig::default());

        file.save(&joined()).unwrap();
        assert_eq!(file.load().unwrap(), joined());
    }
}
