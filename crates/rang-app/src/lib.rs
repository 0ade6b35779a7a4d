//! Rang Application
//!
//! Ties the core pipeline, the raster surface and a backend together into a
//! drawing room, plus the pieces the `rang` command line tool needs.

mod config;
mod entry;
mod presence;
mod room;

pub use config::{AppConfig, ConfigError};
pub use entry::{EntryError, MAX_NICKNAME_LEN, MAX_ROOM_NAME_LEN, RoomChoice, RoomEntry, enter_room};
pub use presence::PresenceList;
pub use room::{DrawingRoom, FlushReport, Outgoing, RoomError};
