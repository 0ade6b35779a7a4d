//! In-process reactive backend.

use super::{
    BackendError, BackendResult, BoxFuture, RoomDirectory, StrokeEvent, StrokeLog, Subscriptions,
    new_id, next_timestamp, now_millis,
};
use crate::room::{NOT_ROOM_OWNER, OpResult, ROOM_ACTIVE, Room, User};
use crate::stroke::{NewStroke, Stroke, StrokeId};
use futures::channel::mpsc::{UnboundedSender, unbounded};
use futures::stream::{BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

#[derive(Default)]
struct State {
    rooms: HashMap<String, Room>,
    users: HashMap<String, User>,
    /// Strokes per room, in commit order.
    strokes: HashMap<String, Vec<Stroke>>,
    last_timestamp: i64,
}

#[derive(Default)]
struct Subscribers {
    users: HashMap<String, Vec<UnboundedSender<User>>>,
    strokes: HashMap<String, Vec<UnboundedSender<StrokeEvent>>>,
}

/// Backend held entirely in memory, pushing changes to its subscribers.
///
/// Used for tests and single-process sessions. Writes can be made to fail
/// with [`MemoryBackend::set_offline`] to exercise transport failures.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<State>,
    subscribers: Mutex<Subscribers>,
    offline: AtomicBool,
}

fn lock_error(e: impl std::fmt::Display) -> BackendError {
    BackendError::Other(format!("Lock error: {}", e))
}

/// Send to every live subscriber, dropping the ones whose stream was closed.
fn publish<T: Clone>(senders: Option<&mut Vec<UnboundedSender<T>>>, item: &T) {
    if let Some(senders) = senders {
        senders.retain(|tx| tx.unbounded_send(item.clone()).is_ok());
    }
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing the connection: while offline every write fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> BackendResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(BackendError::Unavailable("backend is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn publish_user(&self, user: &User) {
        match self.subscribers.lock() {
            Ok(mut subs) => publish(subs.users.get_mut(&user.room_id), user),
            Err(e) => log::warn!("Dropping presence update: {}", e),
        }
    }

    fn publish_stroke(&self, room_id: &str, event: &StrokeEvent) {
        match self.subscribers.lock() {
            Ok(mut subs) => publish(subs.strokes.get_mut(room_id), event),
            Err(e) => log::warn!("Dropping stroke event: {}", e),
        }
    }

    /// Adjust a room's active count when a user's active flag flips.
    fn track_activity(state: &mut State, room_id: &str, was_active: bool, is_active: bool) {
        if let Some(room) = state.rooms.get_mut(room_id) {
            match (was_active, is_active) {
                (true, false) => room.active_users = room.active_users.saturating_sub(1),
                (false, true) => room.active_users += 1,
                _ => {}
            }
        }
    }
}

impl StrokeLog for MemoryBackend {
    fn submit_stroke(&self, stroke: NewStroke) -> BoxFuture<'_, BackendResult<StrokeId>> {
        Box::pin(async move {
            self.check_online()?;
            stroke.validate().map_err(BackendError::Rejected)?;

            let committed = {
                let mut state = self.state.write().map_err(lock_error)?;
                if !state.rooms.contains_key(&stroke.room_id) {
                    return Err(BackendError::NotFound(stroke.room_id));
                }
                let timestamp = next_timestamp(state.last_timestamp);
                state.last_timestamp = timestamp;

                let committed = stroke.commit(new_id(), timestamp);
                state
                    .strokes
                    .entry(committed.room_id.clone())
                    .or_default()
                    .push(committed.clone());
                committed
            };

            log::debug!(
                "Stroke {} appended to room {} ({} points)",
                committed.id,
                committed.room_id,
                committed.points.len()
            );
            let id = committed.id.clone();
            let room_id = committed.room_id.clone();
            self.publish_stroke(&room_id, &StrokeEvent::Appended(committed));
            Ok(id)
        })
    }

    fn fetch_strokes(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Vec<Stroke>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let state = self.state.read().map_err(lock_error)?;
            Ok(state.strokes.get(&room_id).cloned().unwrap_or_default())
        })
    }

    fn clear_room_strokes(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> BoxFuture<'_, BackendResult<OpResult>> {
        let room_id = room_id.to_string();
        let user_id = user_id.to_string();
        Box::pin(async move {
            self.check_online()?;
            {
                let mut state = self.state.write().map_err(lock_error)?;
                let owner = state.rooms.get(&room_id).is_some_and(|r| r.is_owned_by(&user_id));
                if !owner {
                    log::info!("Refused clear of room {} by {}", room_id, user_id);
                    return Ok(OpResult::refused(NOT_ROOM_OWNER));
                }
                state.strokes.remove(&room_id);
            }
            log::info!("Room {} cleared by its owner", room_id);
            self.publish_stroke(&room_id, &StrokeEvent::Cleared);
            Ok(OpResult::ok())
        })
    }
}

impl RoomDirectory for MemoryBackend {
    fn create_room(&self, name: &str, created_by: &str) -> BoxFuture<'_, BackendResult<Room>> {
        let room = Room {
            id: new_id(),
            name: name.to_string(),
            created_by: created_by.to_string(),
            created_at: now_millis(),
            active_users: 0,
        };
        Box::pin(async move {
            self.check_online()?;
            let mut state = self.state.write().map_err(lock_error)?;
            state.rooms.insert(room.id.clone(), room.clone());
            log::info!("Room {} ({}) created", room.id, room.name);
            Ok(room)
        })
    }

    fn get_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Option<Room>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let state = self.state.read().map_err(lock_error)?;
            Ok(state.rooms.get(&room_id).cloned())
        })
    }

    fn active_rooms(&self) -> BoxFuture<'_, BackendResult<Vec<Room>>> {
        Box::pin(async move {
            let state = self.state.read().map_err(lock_error)?;
            let mut rooms: Vec<Room> = state
                .rooms
                .values()
                .filter(|r| r.active_users > 0)
                .cloned()
                .collect();
            rooms.sort_by_key(|r| r.created_at);
            Ok(rooms)
        })
    }

    fn delete_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<OpResult>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            self.check_online()?;
            let mut state = self.state.write().map_err(lock_error)?;
            match state.rooms.get(&room_id) {
                Some(room) if room.can_delete() => {}
                _ => return Ok(OpResult::refused(ROOM_ACTIVE)),
            }
            state.rooms.remove(&room_id);
            state.strokes.remove(&room_id);
            state.users.retain(|_, u| u.room_id != room_id);
            log::info!("Room {} deleted", room_id);
            Ok(OpResult::ok())
        })
    }

    fn create_user(&self, name: &str, room_id: &str) -> BoxFuture<'_, BackendResult<User>> {
        let name = name.to_string();
        let room_id = room_id.to_string();
        Box::pin(async move {
            self.check_online()?;
            let user = {
                let mut state = self.state.write().map_err(lock_error)?;
                let Some(room) = state.rooms.get_mut(&room_id) else {
                    return Err(BackendError::NotFound(room_id));
                };
                room.active_users += 1;

                let user = User {
                    id: new_id(),
                    name,
                    room_id,
                    last_active: now_millis(),
                    is_active: true,
                    is_drawing: false,
                };
                state.users.insert(user.id.clone(), user.clone());
                user
            };
            log::info!("User {} ({}) joined room {}", user.id, user.name, user.room_id);
            self.publish_user(&user);
            Ok(user)
        })
    }

    fn get_user(&self, user_id: &str) -> BoxFuture<'_, BackendResult<Option<User>>> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            let state = self.state.read().map_err(lock_error)?;
            Ok(state.users.get(&user_id).cloned())
        })
    }

    fn update_user_status(
        &self,
        user_id: &str,
        is_active: bool,
        is_drawing: Option<bool>,
    ) -> BoxFuture<'_, BackendResult<Option<User>>> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            self.check_online()?;
            let updated = {
                let mut state = self.state.write().map_err(lock_error)?;
                let Some(user) = state.users.get_mut(&user_id) else {
                    return Ok(None);
                };
                let was_active = user.is_active;
                user.last_active = now_millis();
                user.is_active = is_active;
                if let Some(drawing) = is_drawing {
                    user.is_drawing = drawing;
                }
                let updated = user.clone();
                Self::track_activity(&mut state, &updated.room_id, was_active, is_active);
                updated
            };
            self.publish_user(&updated);
            Ok(Some(updated))
        })
    }

    fn users_in_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Vec<User>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let state = self.state.read().map_err(lock_error)?;
            let mut users: Vec<User> = state
                .users
                .values()
                .filter(|u| u.room_id == room_id && u.is_active)
                .cloned()
                .collect();
            users.sort_by(|a, b| a.last_active.cmp(&b.last_active).then_with(|| a.id.cmp(&b.id)));
            Ok(users)
        })
    }
}

impl Subscriptions for MemoryBackend {
    fn subscribe_users(&self, room_id: &str) -> BoxStream<'static, User> {
        let (tx, rx) = unbounded();
        match self.subscribers.lock() {
            Ok(mut subs) => subs.users.entry(room_id.to_string()).or_default().push(tx),
            Err(e) => log::warn!("Presence subscription not registered: {}", e),
        }
        rx.boxed()
    }

    fn subscribe_strokes(&self, room_id: &str) -> BoxStream<'static, StrokeEvent> {
        let (tx, rx) = unbounded();
        match self.subscribers.lock() {
            Ok(mut subs) => subs.strokes.entry(room_id.to_string()).or_default().push(tx),
            Err(e) => log::warn!("Stroke subscription not registered: {}", e),
        }
        rx.boxed()
    }
}
