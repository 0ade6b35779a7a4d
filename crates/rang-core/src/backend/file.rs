//! File-based backend for native tools.

use super::{
    BackendError, BackendResult, BoxFuture, RoomDirectory, StrokeLog, new_id, next_timestamp,
    now_millis,
};
use crate::room::{NOT_ROOM_OWNER, OpResult, ROOM_ACTIVE, Room, User};
use crate::stroke::{NewStroke, Stroke, StrokeId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Everything stored about one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoomFile {
    room: Room,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    strokes: Vec<Stroke>,
}

/// Backend keeping each room as a JSON file in a directory.
///
/// Every write replaces the whole room file through a temporary file, so a
/// clear or append is never half-applied on disk. There are no live feeds;
/// readers fetch again.
pub struct FileBackend {
    /// Directory holding one `<room id>.json` per room.
    base_path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Open the backend in `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> BackendResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                BackendError::Io(format!("Failed to create data directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Backend in the default location.
    ///
    /// On Unix: `~/.local/share/rang/rooms/`
    pub fn default_location() -> BackendResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| BackendError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("rang").join("rooms"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn room_path(&self, room_id: &str) -> PathBuf {
        let safe_id: String = room_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Distinct ids can share a file name once sanitized; only the exact id matches.
    fn read_room(&self, room_id: &str) -> BackendResult<Option<RoomFile>> {
        Ok(read_room_file(&self.room_path(room_id))?.filter(|f| f.room.id == room_id))
    }

    fn write_room(&self, file: &RoomFile) -> BackendResult<()> {
        let path = self.room_path(&file.room.id);
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| BackendError::Serialization(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| BackendError::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .map_err(|e| BackendError::Io(format!("Failed to replace {}: {}", path.display(), e)))
    }

    /// Run `f` on a room file under the write lock and store the result.
    fn modify_room<T>(
        &self,
        room_id: &str,
        f: impl FnOnce(&mut RoomFile) -> BackendResult<T>,
    ) -> BackendResult<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| BackendError::Other(format!("Lock error: {}", e)))?;
        let mut file = self
            .read_room(room_id)?
            .ok_or_else(|| BackendError::NotFound(room_id.to_string()))?;
        let result = f(&mut file)?;
        self.write_room(&file)?;
        Ok(result)
    }

    /// Every stored room, occupied or not, oldest first.
    pub fn list_rooms(&self) -> BackendResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self.room_files()?.into_iter().map(|f| f.room).collect();
        rooms.sort_by_key(|r| r.created_at);
        Ok(rooms)
    }

    fn room_files(&self) -> BackendResult<Vec<RoomFile>> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| BackendError::Io(format!("Failed to read directory: {}", e)))?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                match read_room_file(&path) {
                    Ok(Some(file)) => files.push(file),
                    Ok(None) => {}
                    Err(e) => log::warn!("Skipping unreadable room file: {}", e),
                }
            }
        }
        Ok(files)
    }

    fn find_user_room(&self, user_id: &str) -> BackendResult<Option<String>> {
        Ok(self
            .room_files()?
            .into_iter()
            .find(|f| f.users.iter().any(|u| u.id == user_id))
            .map(|f| f.room.id))
    }
}

fn read_room_file(path: &Path) -> BackendResult<Option<RoomFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)
        .map_err(|e| BackendError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&json).map(Some).map_err(|e| {
        BackendError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

impl StrokeLog for FileBackend {
    fn submit_stroke(&self, stroke: NewStroke) -> BoxFuture<'_, BackendResult<StrokeId>> {
        Box::pin(async move {
            stroke.validate().map_err(BackendError::Rejected)?;
            let room_id = stroke.room_id.clone();
            let id = self.modify_room(&room_id, |file| {
                let last = file.strokes.last().map(|s| s.timestamp).unwrap_or_default();
                let committed = stroke.commit(new_id(), next_timestamp(last));
                let id = committed.id.clone();
                file.strokes.push(committed);
                Ok(id)
            })?;
            log::debug!("Stroke {} appended to room {}", id, room_id);
            Ok(id)
        })
    }

    fn fetch_strokes(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Vec<Stroke>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            Ok(self
                .read_room(&room_id)?
                .map(|f| f.strokes)
                .unwrap_or_default())
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
            let result = self.modify_room(&room_id, |file| {
                if !file.room.is_owned_by(&user_id) {
                    return Ok(OpResult::refused(NOT_ROOM_OWNER));
                }
                file.strokes.clear();
                Ok(OpResult::ok())
            });
            match result {
                Err(BackendError::NotFound(_)) => Ok(OpResult::refused(NOT_ROOM_OWNER)),
                Ok(op) if !op.success => {
                    log::info!("Refused clear of room {} by {}", room_id, user_id);
                    Ok(op)
                }
                other => other,
            }
        })
    }
}

impl RoomDirectory for FileBackend {
    fn create_room(&self, name: &str, created_by: &str) -> BoxFuture<'_, BackendResult<Room>> {
        let room = Room {
            id: new_id(),
            name: name.to_string(),
            created_by: created_by.to_string(),
            created_at: now_millis(),
            active_users: 0,
        };
        Box::pin(async move {
            self.write_room(&RoomFile {
                room: room.clone(),
                users: Vec::new(),
                strokes: Vec::new(),
            })?;
            log::info!("Room {} ({}) created in {}", room.id, room.name, self.base_path.display());
            Ok(room)
        })
    }

    fn get_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Option<Room>>> {
        let room_id = room_id.to_string();
        Box::pin(async move { Ok(self.read_room(&room_id)?.map(|f| f.room)) })
    }

    fn active_rooms(&self) -> BoxFuture<'_, BackendResult<Vec<Room>>> {
        Box::pin(async move {
            Ok(self
                .list_rooms()?
                .into_iter()
                .filter(|r| r.active_users > 0)
                .collect())
        })
    }

    fn delete_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<OpResult>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let _guard = self
                .write_lock
                .lock()
                .map_err(|e| BackendError::Other(format!("Lock error: {}", e)))?;
            match self.read_room(&room_id)? {
                Some(file) if file.room.can_delete() => {}
                _ => return Ok(OpResult::refused(ROOM_ACTIVE)),
            }
            let path = self.room_path(&room_id);
            fs::remove_file(&path).map_err(|e| {
                BackendError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
            log::info!("Room {} deleted", room_id);
            Ok(OpResult::ok())
        })
    }

    fn create_user(&self, name: &str, room_id: &str) -> BoxFuture<'_, BackendResult<User>> {
        let name = name.to_string();
        let room_id = room_id.to_string();
        Box::pin(async move {
            self.modify_room(&room_id, |file| {
                let user = User {
                    id: new_id(),
                    name,
                    room_id: file.room.id.clone(),
                    last_active: now_millis(),
                    is_active: true,
                    is_drawing: false,
                };
                file.room.active_users += 1;
                file.users.push(user.clone());
                Ok(user)
            })
        })
    }

    fn get_user(&self, user_id: &str) -> BoxFuture<'_, BackendResult<Option<User>>> {
        let user_id = user_id.to_string();
        Box::pin(async move {
            Ok(self
                .room_files()?
                .into_iter()
                .flat_map(|f| f.users)
                .find(|u| u.id == user_id))
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
            let Some(room_id) = self.find_user_room(&user_id)? else {
                return Ok(None);
            };
            self.modify_room(&room_id, |file| {
                let Some(user) = file.users.iter_mut().find(|u| u.id == user_id) else {
                    return Ok(None);
                };
                match (user.is_active, is_active) {
                    (true, false) => {
                        file.room.active_users = file.room.active_users.saturating_sub(1)
                    }
                    (false, true) => file.room.active_users += 1,
                    _ => {}
                }
                user.is_active = is_active;
                user.last_active = now_millis();
                if let Some(drawing) = is_drawing {
                    user.is_drawing = drawing;
                }
                Ok(Some(user.clone()))
            })
        })
    }

    fn users_in_room(&self, room_id: &str) -> BoxFuture<'_, BackendResult<Vec<User>>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            Ok(self
                .read_room(&room_id)?
                .map(|f| f.users.into_iter().filter(|u| u.is_active).collect())
                .unwrap_or_default())
        })
    }
}
