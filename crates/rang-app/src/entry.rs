//! Entering a room: nickname checks, create-or-join, session bookkeeping.

use rang_core::backend::{Backend, BackendError};
use rang_core::room::{Room, User};
use rang_core::session::SessionConfig;
use thiserror::Error;

/// Longest nickname kept, in characters.
pub const MAX_NICKNAME_LEN: usize = 20;

/// Longest room name kept, in characters.
pub const MAX_ROOM_NAME_LEN: usize = 30;

/// Errors while entering a room.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Please enter a nickname")]
    MissingNickname,
    #[error("Please enter a room name")]
    MissingRoomName,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// How to get into a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomChoice {
    /// Create a new room with this name and own it.
    Create { name: String },
    /// Join an existing room by id.
    Join { room_id: String },
}

/// A room the local user is now in.
#[derive(Debug, Clone)]
pub struct RoomEntry {
    pub room: Room,
    /// The user's presence record in the room's directory.
    pub presence: User,
}

fn trimmed(input: &str, max_chars: usize) -> String {
    input.trim().chars().take(max_chars).collect()
}

/// Enter a room and record the identity in `session`.
///
/// The session's user id is the local identity: it authors strokes and owns
/// rooms it creates. An existing identity is reused, otherwise a new one is
/// generated. The directory's presence record is separate and returned in the
/// entry.
pub async fn enter_room(
    backend: &dyn Backend,
    session: &mut SessionConfig,
    nickname: &str,
    choice: RoomChoice,
) -> Result<RoomEntry, EntryError> {
    let nickname = trimmed(nickname, MAX_NICKNAME_LEN);
    if nickname.is_empty() {
        return Err(EntryError::MissingNickname);
    }
    let user_id = session
        .user_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let room = match choice {
        RoomChoice::Create { name } => {
            let name = trimmed(&name, MAX_ROOM_NAME_LEN);
            if name.is_empty() {
                return Err(EntryError::MissingRoomName);
            }
            backend.create_room(&name, &user_id).await?
        }
        RoomChoice::Join { room_id } => {
            let room_id = room_id.trim();
            if room_id.is_empty() {
                return Err(EntryError::MissingRoomName);
            }
            backend
                .get_room(room_id)
                .await?
                .ok_or_else(|| BackendError::NotFound(room_id.to_string()))?
        }
    };

    let presence = backend.create_user(&nickname, &room.id).await?;
    let is_owner = room.is_owned_by(&user_id);

    session.set_user(user_id, nickname);
    session.set_room(room.id.clone(), is_owner);
    log::info!(
        "Entered room {} ({}) as {}",
        room.id,
        room.name,
        if is_owner { "owner" } else { "guest" }
    );

    Ok(RoomEntry { room, presence })
}
