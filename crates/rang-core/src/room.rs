//! Room and participant records.

use serde::{Deserialize, Serialize};

/// Identifier of a room.
pub type RoomId = String;

/// Identifier of a participant.
pub type UserId = String;

/// A collaborative canvas session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Creator; the only user allowed to clear the canvas.
    pub created_by: UserId,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub active_users: u32,
}

impl Room {
    /// Whether `user_id` created this room.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }

    /// Rooms with active participants cannot be deleted.
    pub fn can_delete(&self) -> bool {
        self.active_users == 0
    }
}

/// Presence record of a participant. Tied to a session, not an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub room_id: RoomId,
    /// Milliseconds since the Unix epoch of the last status update.
    pub last_active: i64,
    pub is_active: bool,
    #[serde(default)]
    pub is_drawing: bool,
}

/// Result of a privileged operation. Refusals are values, not errors, so the
/// caller can show the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OpResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Refusal message for a clear attempted by someone other than the creator.
pub const NOT_ROOM_OWNER: &str = "Only room owner can clear canvas";

/// Refusal message for deleting a missing or occupied room.
pub const ROOM_ACTIVE: &str = "Cannot delete active room";
