//! Who is in the room, kept current from the presence feed.

use futures::FutureExt;
use futures::stream::{BoxStream, StreamExt};
use rang_core::backend::{BackendResult, RoomDirectory};
use rang_core::room::User;

/// Active participants of one room, in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct PresenceList {
    room_id: String,
    users: Vec<User>,
}

impl PresenceList {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            users: Vec::new(),
        }
    }

    /// Seed the list from the directory's current view of the room.
    pub async fn load(directory: &dyn RoomDirectory, room_id: &str) -> BackendResult<Self> {
        let mut list = Self::new(room_id);
        for user in directory.users_in_room(room_id).await? {
            list.apply(user);
        }
        Ok(list)
    }

    /// Apply one presence update. Inactive users leave the list; updates for
    /// other rooms are ignored.
    pub fn apply(&mut self, user: User) {
        if user.room_id != self.room_id {
            return;
        }
        let existing = self.users.iter().position(|u| u.id == user.id);
        match (existing, user.is_active) {
            (Some(i), true) => self.users[i] = user,
            (Some(i), false) => {
                let left = self.users.remove(i);
                log::info!("{} left room {}", left.name, self.room_id);
            }
            (None, true) => {
                log::info!("{} joined room {}", user.name, self.room_id);
                self.users.push(user);
            }
            (None, false) => {}
        }
    }

    /// Apply every update already waiting on `feed` without blocking.
    /// Returns how many were applied.
    pub fn poll(&mut self, feed: &mut BoxStream<'static, User>) -> usize {
        let mut applied = 0;
        while let Some(Some(user)) = feed.next().now_or_never() {
            self.apply(user);
            applied += 1;
        }
        applied
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Participants currently drawing.
    pub fn drawing(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.is_drawing)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use rang_core::backend::{MemoryBackend, Subscriptions};

    fn user(id: &str, room_id: &str, is_active: bool, is_drawing: bool) -> User {
        User {
            id: id.to_string(),
            name: id.to_uppercase(),
            room_id: room_id.to_string(),
            last_active: 0,
            is_active,
            is_drawing,
        }
    }

    #[test]
    fn test_apply_upserts_and_removes() {
        let mut list = PresenceList::new("r");
        list.apply(user("a", "r", true, false));
        list.apply(user("b", "r", true, false));
        list.apply(user("a", "r", true, true));
        assert_eq!(list.len(), 2);
        assert_eq!(list.drawing().map(|u| u.id.as_str()).collect::<Vec<_>>(), vec!["a"]);

        list.apply(user("a", "r", false, false));
        assert!(!list.contains("a"));
        assert!(list.contains("b"));
    }

    #[test]
    fn test_apply_ignores_other_rooms_and_unknown_leavers() {
        let mut list = PresenceList::new("r");
        list.apply(user("a", "elsewhere", true, false));
        list.apply(user("b", "r", false, false));
        assert!(list.is_empty());
    }

    #[test]
    fn test_follows_backend_feed() {
        let backend = MemoryBackend::new();
        let room = block_on(backend.create_room("Holi", "owner")).unwrap();
        let early = block_on(backend.create_user("Amit", &room.id)).unwrap();

        let mut list = block_on(PresenceList::load(&backend, &room.id)).unwrap();
        let mut feed = backend.subscribe_users(&room.id);
        assert_eq!(list.len(), 1);

        let late = block_on(backend.create_user("Priya", &room.id)).unwrap();
        block_on(backend.update_user_status(&late.id, true, Some(true))).unwrap();
        block_on(backend.update_user_status(&early.id, false, None)).unwrap();

        assert_eq!(list.poll(&mut feed), 3);
        assert_eq!(list.users().len(), 1);
        assert_eq!(list.users()[0].id, late.id);
        assert_eq!(list.drawing().count(), 1);
        assert_eq!(list.poll(&mut feed), 0);
    }
}
