//! Backend contracts: the stroke log, the room directory and live subscriptions.
//!
//! The production backend is an external reactive database. The traits here
//! are what the drawing core relies on; [`MemoryBackend`] implements all of
//! them in process and [`FileBackend`] keeps rooms on disk for the CLI.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::room::{OpResult, Room, User};
use crate::stroke::{NewStroke, Stroke, StrokeId};
use futures::stream::BoxStream;
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Backend errors.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Backend error: {0}")]
    Other(String),
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Boxed future for backend operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Change to a room's stroke log, as pushed to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeEvent {
    /// A stroke was appended.
    Appended(Stroke),
    /// Every stroke in the room was removed.
    Cleared,
}

/// Append-only, per-room ordered log of completed strokes.
pub trait StrokeLog: Send + Sync {
    /// Append a stroke. The backend assigns its id and timestamp.
    fn submit_stroke(&self, stroke: NewStroke) -> BoxFuture<'_, BackendResult<StrokeId>>;

    /// All strokes of a room in ascending timestamp order.
    fn fetch_strokes(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Vec<Stroke>>>;

    /// Remove every stroke of a room in one step. Only the room's creator
    /// succeeds; anyone else gets a refused [`OpResult`] and the log is unchanged.
    fn clear_room_strokes(&self, room_id: &str, user_id: &str)
        -> BoxFuture<'_, BackendResult<OpResult>>;
}

/// Room metadata and participant presence.
pub trait RoomDirectory: Send + Sync {
    /// Create a room with no active users.
    fn create_room(&self, name: &str, created_by: &str) -> BoxFuture<'_, BackendResult<Room>>;

    fn get_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Option<Room>>>;

    /// Rooms with at least one active user.
    fn active_rooms(&self) -> BoxFuture<'_, BackendResult<Vec<Room>>>;

    /// Delete an empty room together with its strokes.
    fn delete_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<OpResult>>;

    /// Register a participant in an existing room and count them as active.
    fn create_user(&self, name: &str, room_id: &str) -> BoxFuture<'_, BackendResult<User>>;

    fn get_user(&self, user_id: &str) -> BoxFuture<'_, BackendResult<Option<User>>>;

    /// Refresh a participant's presence. `is_drawing: None` leaves the flag as is.
    /// Returns `None` for unknown users.
    fn update_user_status(
        &self,
        user_id: &str,
        is_active: bool,
        is_drawing: Option<bool>,
    ) -> BoxFuture<'_, BackendResult<Option<User>>>;

    /// Active participants of a room.
    fn users_in_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Vec<User>>>;
}

/// Live feeds of a room's presence and strokes.
///
/// Streams carry changes made after subscribing; fetch the current state
/// separately. Dropping a stream unsubscribes.
pub trait Subscriptions: Send + Sync {
    /// Every presence change of a user in the room.
    fn subscribe_users(&self, room_id: &str) -> BoxStream<'static, User>;

    /// Every change to the room's stroke log.
    fn subscribe_strokes(&self, room_id: &str) -> BoxStream<'static, StrokeEvent>;
}

/// Everything the drawing core needs from a backend.
pub trait Backend: StrokeLog + RoomDirectory {}

impl<T: StrokeLog + RoomDirectory + ?Sized> Backend for T {}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Next log timestamp: wall-clock millis, bumped past `last` so the log stays
/// strictly increasing even within one millisecond.
pub(crate) fn next_timestamp(last: i64) -> i64 {
    now_millis().max(last.saturating_add(1))
}

/// Fresh backend-assigned identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
