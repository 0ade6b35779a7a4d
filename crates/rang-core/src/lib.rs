//! Rang Core Library
//!
//! Platform-agnostic data model and logic for the Rang collaborative
//! whiteboard: pointer sampling, stroke simplification, tool state, room
//! records and the backend contracts strokes are committed through.

pub mod backend;
pub mod color;
pub mod input;
pub mod room;
pub mod session;
pub mod simplify;
pub mod stroke;
pub mod tools;

pub use backend::{
    Backend, BackendError, BackendResult, FileBackend, MemoryBackend, RoomDirectory, StrokeEvent,
    StrokeLog, Subscriptions,
};
pub use color::{ColorParseError, DEFAULT_COLOR, parse_css_color, random_holi_color};
pub use input::{DrawingSignal, PointerEvent, Sample, StrokeSampler};
pub use room::{OpResult, Room, RoomId, User, UserId};
pub use session::{SessionConfig, SessionError, SessionFile};
pub use simplify::{DEFAULT_TOLERANCE, simplify_stroke};
pub use stroke::{NewStroke, Stroke, StrokeId, StrokeStyle, Tool};
pub use tools::ToolManager;

pub use kurbo::Point;
