//! The drawing room: local input, live painting, stroke commits and remote replay.

use crate::config::AppConfig;
use futures::FutureExt;
use futures::stream::{BoxStream, StreamExt};
use kurbo::Point;
use peniko::Color;
use rang_core::backend::{Backend, BackendResult, StrokeEvent};
use rang_core::input::{DrawingSignal, PointerEvent, Sample, StrokeSampler};
use rang_core::room::{OpResult, UserId};
use rang_core::session::SessionConfig;
use rang_core::simplify::simplify_stroke;
use rang_core::stroke::{NewStroke, Stroke, StrokeId, StrokeStyle, sort_for_replay};
use rang_core::tools::ToolManager;
use rang_render::{RenderResult, RendererError, StrokeRenderer, Surface};
use std::collections::HashSet;
use thiserror::Error;

/// Errors setting up a drawing room.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Session is not in a room")]
    NotInRoom,
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// A write waiting to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    /// A finished stroke.
    Stroke(NewStroke),
    /// The local user started or stopped drawing.
    Presence { is_drawing: bool },
}

/// Outcome of draining the outgoing queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    pub dropped: usize,
}


/// A local stroke painted live that the log has not echoed back yet.
#[derive(Debug, Clone)]
struct LiveStroke {
    /// Points as captured, which is what was painted.
    raw: Vec<Point>,
    style: StrokeStyle,
    /// What was queued for the log.
    payload: NewStroke,
}

impl LiveStroke {
    fn is_committed_as(&self, stroke: &Stroke) -> bool {
        self.payload.user_id == stroke.user_id
            && self.payload.points == stroke.points
            && self.payload.color == stroke.color
            && self.payload.size == stroke.size
            && self.payload.tool == stroke.tool
    }
}

/// One user's view of a room.
///
/// Input events are handled synchronously and never wait on the backend:
/// writes are queued and sent by [`DrawingRoom::flush`], and their failures
/// are logged and dropped. Local strokes stay on the surface across replays
/// until the log echoes them back.
pub struct DrawingRoom {
    room_id: String,
    user_id: UserId,
    user_name: String,
    is_owner: bool,
    /// Directory record used for presence updates.
    presence_id: Option<UserId>,

    tools: ToolManager,
    sampler: StrokeSampler,
    surface: Surface,
    /// Surface as it was before the stroke in progress.
    stroke_base: Option<Surface>,
    tolerance: Option<f64>,
    background: Option<Color>,

    /// Known strokes in replay order.
    strokes: Vec<Stroke>,
    known: HashSet<StrokeId>,
    newest: Option<i64>,
    /// Finished local strokes not yet seen in the log, oldest first.
    live: Vec<LiveStroke>,

    /// Pending writes, oldest first.
    outgoing: Vec<Outgoing>,
}

impl DrawingRoom {
    /// Open the room the session is in.
    pub fn new(
        session: &SessionConfig,
        presence_id: Option<UserId>,
        config: &AppConfig,
    ) -> Result<Self, RoomError> {
        let membership = session.membership().ok_or(RoomError::NotInRoom)?;
        Ok(Self {
            room_id: membership.room_id.to_string(),
            user_id: membership.user_id.to_string(),
            user_name: membership.user_name.to_string(),
            is_owner: membership.is_room_owner,
            presence_id,
            tools: ToolManager::with_defaults(config.default_color.clone(), config.brush_size),
            sampler: StrokeSampler::new(),
            surface: Surface::new(config.width, config.height)?,
            stroke_base: None,
            tolerance: config.tolerance,
            background: config.background_color()?,
            strokes: Vec::new(),
            known: HashSet::new(),
            newest: None,
            live: Vec::new(),
            outgoing: Vec::new(),
        })
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolManager {
        &mut self.tools
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Strokes known to this client, in replay order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn pending(&self) -> &[Outgoing] {
        &self.outgoing
    }

    /// Move the surface origin, e.g. after the surface was laid out again.
    pub fn set_surface_origin(&mut self, origin: Point) {
        self.sampler.set_origin(origin);
    }

    /// Feed one pointer or touch event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<DrawingSignal> {
        let sample = self.sampler.handle(event);
        let signal = sample.signal();
        match sample {
            Sample::Ignored => {}
            Sample::Started { .. } => {
                self.tools.begin_stroke();
                self.stroke_base = Some(self.surface.clone());
                self.outgoing.push(Outgoing::Presence { is_drawing: true });
            }
            Sample::Extended { .. } => self.paint_in_progress(),
            Sample::Ended { points } => {
                self.stroke_base = None;
                self.finish_stroke(points);
            }
        }
        signal
    }

    /// Repaint the stroke in progress as one polyline over the surface it
    /// started on, so translucent joints are not blended twice.
    fn paint_in_progress(&mut self) {
        if let (Some(base), Some(style)) = (&self.stroke_base, self.tools.active_style()) {
            self.surface.copy_from(base);
            self.surface.paint_points(self.sampler.points(), style);
        }
    }

    fn finish_stroke(&mut self, raw: Vec<Point>) {
        self.outgoing.push(Outgoing::Presence { is_drawing: false });
        let Some(style) = self.tools.end_stroke() else {
            return;
        };
        if raw.is_empty() {
            return;
        }
        let points = match self.tolerance {
            Some(tolerance) => simplify_stroke(&raw, tolerance),
            None => raw.clone(),
        };

        log::debug!("Queued {} stroke with {} points", style.tool, points.len());
        let payload = NewStroke {
            room_id: self.room_id.clone(),
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            points,
            color: style.color.clone(),
            size: style.size,
            tool: style.tool,
        };
        self.live.push(LiveStroke {
            raw,
            style,
            payload: payload.clone(),
        });
        self.outgoing.push(Outgoing::Stroke(payload));
    }

    /// Send every queued write. Failures are logged and dropped, never retried.
    pub async fn flush(&mut self, backend: &dyn Backend) -> FlushReport {
        let mut report = FlushReport::default();
        for write in std::mem::take(&mut self.outgoing) {
            let result = match &write {
                Outgoing::Stroke(stroke) => {
                    backend.submit_stroke(stroke.clone()).await.map(|id| {
                        log::debug!("Stroke {} committed", id);
                    })
                }
                Outgoing::Presence { is_drawing } => match &self.presence_id {
                    Some(id) => backend
                        .update_user_status(id, true, Some(*is_drawing))
                        .await
                        .map(|_| ()),
                    None => Ok(()),
                },
            };
            match result {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    log::warn!("Dropping write to room {}: {}", self.room_id, e);
                    if let Outgoing::Stroke(stroke) = &write {
                        // It will never be echoed; the next replay lets it go.
                        if let Some(i) = self.live.iter().position(|l| &l.payload == stroke) {
                            self.live.remove(i);
                        }
                    }
                    report.dropped += 1;
                }
            }
        }
        report
    }

    /// Drop the live copy of `stroke` if it is one of ours. Returns whether it was.
    fn confirm_live(&mut self, stroke: &Stroke) -> bool {
        match self.live.iter().position(|l| l.is_committed_as(stroke)) {
            Some(i) => {
                self.live.remove(i);
                true
            }
            None => false,
        }
    }

    fn paint_committed(&mut self, stroke: &Stroke) {
        self.surface.paint_stroke(stroke);
        if let Some(base) = &mut self.stroke_base {
            base.paint_stroke(stroke);
        }
    }

    /// Replay the log, then put local strokes the log does not have yet back on top.
    fn repaint(&mut self) {
        self.surface.replay(&self.strokes);
        for live in &self.live {
            self.surface.paint_points(&live.raw, &live.style);
        }
        if self.stroke_base.is_some() {
            self.stroke_base = Some(self.surface.clone());
            self.paint_in_progress();
        }
    }

    /// Apply one change from the room's stroke feed.
    pub fn apply_event(&mut self, event: StrokeEvent) {
        match event {
            StrokeEvent::Appended(stroke) => {
                if stroke.room_id != self.room_id || !self.known.insert(stroke.id.clone()) {
                    return;
                }
                let painted_live = self.confirm_live(&stroke);
                let in_order = self.newest.is_none_or(|newest| stroke.timestamp >= newest);
                if in_order {
                    self.newest = Some(stroke.timestamp);
                    if !painted_live {
                        self.paint_committed(&stroke);
                    }
                    self.strokes.push(stroke);
                } else {
                    log::debug!("Out-of-order stroke, replaying room {}", self.room_id);
                    self.strokes.push(stroke);
                    sort_for_replay(&mut self.strokes);
                    self.repaint();
                }
            }
            StrokeEvent::Cleared => {
                log::info!("Room {} was cleared", self.room_id);
                // Strokes still queued are committed after the clear and survive it.
                let outgoing = &self.outgoing;
                self.live.retain(|l| {
                    outgoing
                        .iter()
                        .any(|o| matches!(o, Outgoing::Stroke(p) if *p == l.payload))
                });
                self.reset(Vec::new());
            }
        }
    }

    /// Apply every event already waiting on `feed` without blocking.
    pub fn poll_remote(&mut self, feed: &mut BoxStream<'static, StrokeEvent>) -> usize {
        let mut applied = 0;
        while let Some(Some(event)) = feed.next().now_or_never() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    fn reset(&mut self, mut strokes: Vec<Stroke>) {
        sort_for_replay(&mut strokes);
        for stroke in &strokes {
            self.confirm_live(stroke);
        }
        self.known = strokes.iter().map(|s| s.id.clone()).collect();
        self.newest = strokes.last().map(|s| s.timestamp);
        self.strokes = strokes;
        self.repaint();
    }

    /// Replace local state with the room's log and repaint.
    pub async fn resync(&mut self, backend: &dyn Backend) -> BackendResult<usize> {
        let strokes = backend.fetch_strokes(&self.room_id).await?;
        let count = strokes.len();
        self.reset(strokes);
        log::info!("Replayed {} strokes in room {}", count, self.room_id);
        Ok(count)
    }

    /// Ask the backend to clear the room. Only the creator succeeds; the
    /// surface is cleared when it does.
    pub async fn clear_canvas(&mut self, backend: &dyn Backend) -> BackendResult<OpResult> {
        let result = backend
            .clear_room_strokes(&self.room_id, &self.user_id)
            .await?;
        if result.success {
            self.apply_event(StrokeEvent::Cleared);
        } else {
            log::warn!(
                "Clear refused: {}",
                result.message.as_deref().unwrap_or("no reason given")
            );
        }
        Ok(result)
    }

    /// Flatten the surface to PNG.
    pub fn export_png(&self) -> RenderResult<Vec<u8>> {
        self.surface.to_png(self.background)
    }

    /// Send what is still queued, then mark the local user as gone.
    pub async fn leave(&mut self, backend: &dyn Backend) -> BackendResult<()> {
        if !self.outgoing.is_empty() {
            let report = self.flush(backend).await;
            log::info!(
                "Flushed before leaving: {} sent, {} dropped",
                report.sent,
                report.dropped
            );
        }
        if let Some(id) = &self.presence_id {
            backend.update_user_status(id, false, Some(false)).await?;
        }
        log::info!("{} left room {}", self.user_name, self.room_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use rang_core::backend::{MemoryBackend, RoomDirectory, StrokeLog, Subscriptions};
    use rang_core::stroke::Tool;

    fn config() -> AppConfig {
        AppConfig {
            width: 100,
            height: 100,
            ..AppConfig::default()
        }
    }

    fn session(user_id: &str, room_id: &str, owner: bool) -> SessionConfig {
        let mut session = SessionConfig::default();
        session.set_user(user_id, user_id.to_uppercase());
        session.set_room(room_id, owner);
        session
    }

    fn drag(room: &mut DrawingRoom, from: (f64, f64), to: (f64, f64)) {
        room.handle_pointer(PointerEvent::Down { position: Point::new(from.0, from.1) });
        for i in 1..=10 {
            let t = i as f64 / 10.0;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            room.handle_pointer(PointerEvent::Move { position: Point::new(x, y) });
        }
        room.handle_pointer(PointerEvent::Up);
    }

    fn remote(id: &str, timestamp: i64, y: f64) -> Stroke {
        Stroke {
            id: id.to_string(),
            room_id: "r".to_string(),
            user_id: "someone".to_string(),
            user_name: "Someone".to_string(),
            points: vec![Point::new(10.0, y), Point::new(90.0, y)],
            color: "#ff0000".to_string(),
            size: 6.0,
            tool: Tool::Brush,
            timestamp,
        }
    }

    #[test]
    fn test_requires_membership() {
        let result = DrawingRoom::new(&SessionConfig::default(), None, &config());
        assert!(matches!(result, Err(RoomError::NotInRoom)));
    }

    #[test]
    fn test_drag_paints_live_and_queues_simplified_stroke() {
        let mut room = DrawingRoom::new(&session("u", "r", true), None, &config()).unwrap();
        drag(&mut room, (10.0, 50.0), (90.0, 50.0));

        assert_eq!(room.surface().pixel(50, 50).map(|p| p[3]), Some(255));
        match room.pending() {
            [
                Outgoing::Presence { is_drawing: true },
                Outgoing::Presence { is_drawing: false },
                Outgoing::Stroke(stroke),
            ] => {
                // 11 raw points 8 apart survive a tolerance of 5.
                assert_eq!(stroke.points.len(), 11);
                assert_eq!(stroke.color, "#9b87f5");
                assert_eq!(stroke.user_id, "u");
            }
            other => panic!("unexpected queue: {other:?}"),
        }
    }

    #[test]
    fn test_tolerance_drops_dense_points() {
        let mut room = DrawingRoom::new(&session("u", "r", true), None, &config()).unwrap();
        drag(&mut room, (10.0, 50.0), (20.0, 50.0));
        let Some(Outgoing::Stroke(stroke)) = room.pending().last() else {
            panic!("no stroke queued");
        };
        assert!(stroke.points.len() < 11);
        assert_eq!(stroke.points.first(), Some(&Point::new(10.0, 50.0)));
        assert_eq!(stroke.points.last(), Some(&Point::new(20.0, 50.0)));
    }

    #[test]
    fn test_remote_strokes_paint_and_dedupe() {
        let mut room = DrawingRoom::new(&session("u", "r", false), None, &config()).unwrap();
        room.apply_event(StrokeEvent::Appended(remote("a", 10, 30.0)));
        room.apply_event(StrokeEvent::Appended(remote("a", 10, 30.0)));
        room.apply_event(StrokeEvent::Appended(remote("b", 20, 70.0)));

        assert_eq!(room.strokes().len(), 2);
        assert_eq!(room.surface().pixel(50, 30).map(|p| p[3]), Some(255));
        assert_eq!(room.surface().pixel(50, 70).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_out_of_order_stroke_triggers_replay() {
        let mut room = DrawingRoom::new(&session("u", "r", false), None, &config()).unwrap();
        room.apply_event(StrokeEvent::Appended(remote("late", 20, 50.0)));
        let mut eraser = remote("early", 10, 50.0);
        eraser.tool = Tool::Eraser;
        room.apply_event(StrokeEvent::Appended(eraser));

        let ids: Vec<&str> = room.strokes().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        // The eraser is older, so the brush stroke stays on top.
        assert_eq!(room.surface().pixel(50, 50).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_cleared_event_wipes_surface() {
        let mut room = DrawingRoom::new(&session("u", "r", false), None, &config()).unwrap();
        room.apply_event(StrokeEvent::Appended(remote("a", 10, 30.0)));
        room.apply_event(StrokeEvent::Cleared);
        assert!(room.strokes().is_empty());
        assert!(room.surface().is_blank());
    }

    #[test]
    fn test_flush_drops_failed_writes() {
        let backend = MemoryBackend::new();
        let created = block_on(backend.create_room("Holi", "u")).unwrap();
        let mut room =
            DrawingRoom::new(&session("u", &created.id, true), None, &config()).unwrap();
        drag(&mut room, (10.0, 50.0), (90.0, 50.0));

        backend.set_offline(true);
        let report = block_on(room.flush(&backend));
        assert_eq!(report, FlushReport { sent: 2, dropped: 1 });
        assert!(room.pending().is_empty());

        // The local drawing is unaffected by the lost write.
        assert_eq!(room.surface().pixel(50, 50).map(|p| p[3]), Some(255));
        backend.set_offline(false);
        assert!(block_on(backend.fetch_strokes(&created.id)).unwrap().is_empty());
    }

    #[test]
    fn test_clear_canvas_respects_ownership() {
        let backend = MemoryBackend::new();
        let created = block_on(backend.create_room("Holi", "owner")).unwrap();
        let mut guest =
            DrawingRoom::new(&session("guest", &created.id, false), None, &config()).unwrap();
        drag(&mut guest, (10.0, 50.0), (90.0, 50.0));
        block_on(guest.flush(&backend));

        let refused = block_on(guest.clear_canvas(&backend)).unwrap();
        assert!(!refused.success);
        assert_eq!(block_on(backend.fetch_strokes(&created.id)).unwrap().len(), 1);
        assert!(!guest.surface().is_blank());

        let mut owner =
            DrawingRoom::new(&session("owner", &created.id, true), None, &config()).unwrap();
        assert_eq!(block_on(owner.resync(&backend)).unwrap(), 1);
        assert!(!owner.surface().is_blank());
        assert!(block_on(owner.clear_canvas(&backend)).unwrap().success);
        assert!(owner.surface().is_blank());
        assert!(block_on(backend.fetch_strokes(&created.id)).unwrap().is_empty());
    }

    #[test]
    fn test_export_png() {
        let room = DrawingRoom::new(&session("u", "r", true), None, &config()).unwrap();
        let png = room.export_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    fn remote_in(room_id: &str, id: &str, timestamp: i64, y: f64) -> Stroke {
        Stroke {
            room_id: room_id.to_string(),
            ..remote(id, timestamp, y)
        }
    }

    #[test]
    fn test_pending_stroke_survives_replay_and_echo() {
        let backend = MemoryBackend::new();
        let created = block_on(backend.create_room("Holi", "u")).unwrap();
        let mut room =
            DrawingRoom::new(&session("u", &created.id, true), None, &config()).unwrap();
        let mut feed = backend.subscribe_strokes(&created.id);

        drag(&mut room, (10.0, 80.0), (90.0, 80.0));
        assert_eq!(room.surface().pixel(50, 80).map(|p| p[3]), Some(255));

        // Remote strokes arrive out of order before ours is sent.
        room.apply_event(StrokeEvent::Appended(remote_in(&created.id, "a", 20, 30.0)));
        room.apply_event(StrokeEvent::Appended(remote_in(&created.id, "b", 10, 50.0)));
        assert_eq!(room.surface().pixel(50, 80).map(|p| p[3]), Some(255));

        let report = block_on(room.flush(&backend));
        assert_eq!(report.dropped, 0);
        assert_eq!(room.poll_remote(&mut feed), 1);

        assert_eq!(room.strokes().len(), 3);
        assert_eq!(room.surface().pixel(50, 80).map(|p| p[3]), Some(255));
        assert_eq!(room.surface().pixel(50, 30).map(|p| p[3]), Some(255));
        assert_eq!(room.surface().pixel(50, 50).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_resync_keeps_pending_stroke() {
        let backend = MemoryBackend::new();
        let created = block_on(backend.create_room("Holi", "u")).unwrap();
        let mut room =
            DrawingRoom::new(&session("u", &created.id, true), None, &config()).unwrap();

        drag(&mut room, (10.0, 80.0), (90.0, 80.0));
        assert_eq!(block_on(room.resync(&backend)).unwrap(), 0);
        assert_eq!(room.surface().pixel(50, 80).map(|p| p[3]), Some(255));

        // Once committed, a resync paints it from the log instead.
        block_on(room.flush(&backend));
        assert_eq!(block_on(room.resync(&backend)).unwrap(), 1);
        assert_eq!(room.surface().pixel(50, 80).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_stroke_drawn_after_clear_survives_echo() {
        let backend = MemoryBackend::new();
        let created = block_on(backend.create_room("Holi", "u")).unwrap();
        let mut room =
            DrawingRoom::new(&session("u", &created.id, true), None, &config()).unwrap();
        let mut feed = backend.subscribe_strokes(&created.id);

        drag(&mut room, (10.0, 30.0), (90.0, 30.0));
        block_on(room.flush(&backend));
        room.poll_remote(&mut feed);

        assert!(block_on(room.clear_canvas(&backend)).unwrap().success);
        drag(&mut room, (10.0, 70.0), (90.0, 70.0));
        // The clear is echoed after the new stroke was queued.
        room.poll_remote(&mut feed);
        assert_eq!(room.surface().pixel(50, 70).map(|p| p[3]), Some(255));

        block_on(room.flush(&backend));
        room.poll_remote(&mut feed);
        assert_eq!(room.strokes().len(), 1);
        assert_eq!(room.surface().pixel(50, 70).map(|p| p[3]), Some(255));
        assert_eq!(room.surface().pixel(50, 30).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_failed_write_is_dropped_on_next_replay() {
        let backend = MemoryBackend::new();
        let created = block_on(backend.create_room("Holi", "u")).unwrap();
        let mut room =
            DrawingRoom::new(&session("u", &created.id, true), None, &config()).unwrap();
        drag(&mut room, (10.0, 80.0), (90.0, 80.0));

        backend.set_offline(true);
        block_on(room.flush(&backend));
        backend.set_offline(false);

        block_on(room.resync(&backend)).unwrap();
        assert!(room.surface().is_blank());
    }

    #[test]
    fn test_remote_stroke_mid_drag_stays_under_live_stroke() {
        let mut room = DrawingRoom::new(&session("u", "r", false), None, &config()).unwrap();
        room.handle_pointer(PointerEvent::Down { position: Point::new(10.0, 50.0) });
        room.handle_pointer(PointerEvent::Move { position: Point::new(30.0, 50.0) });

        room.apply_event(StrokeEvent::Appended(remote("a", 10, 20.0)));
        room.handle_pointer(PointerEvent::Move { position: Point::new(50.0, 50.0) });
        assert_eq!(room.surface().pixel(50, 20).map(|p| p[3]), Some(255));
        assert_eq!(room.surface().pixel(40, 50).map(|p| p[3]), Some(255));

        // An out-of-order arrival replays beneath the stroke in progress.
        room.apply_event(StrokeEvent::Appended(remote("b", 5, 80.0)));
        room.handle_pointer(PointerEvent::Move { position: Point::new(70.0, 50.0) });
        assert_eq!(room.surface().pixel(50, 80).map(|p| p[3]), Some(255));
        assert_eq!(room.surface().pixel(60, 50).map(|p| p[3]), Some(255));
        room.handle_pointer(PointerEvent::Up);
        assert_eq!(room.surface().pixel(50, 20).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_translucent_live_stroke_matches_single_polyline() {
        let config = AppConfig {
            default_color: "#ff000080".to_string(),
            tolerance: None,
            ..config()
        };
        let mut room = DrawingRoom::new(&session("u", "r", true), None, &config).unwrap();
        room.handle_pointer(PointerEvent::Down { position: Point::new(10.0, 10.0) });
        let turns = [(50.0, 10.0), (50.0, 50.0), (90.0, 50.0), (90.0, 90.0)];
        for (x, y) in turns {
            room.handle_pointer(PointerEvent::Move { position: Point::new(x, y) });
        }

        let mut points = vec![Point::new(10.0, 10.0)];
        points.extend(turns.iter().map(|&(x, y)| Point::new(x, y)));
        let mut expected = Surface::new(100, 100).unwrap();
        expected.paint_points(&points, &StrokeStyle::brush("#ff000080", config.brush_size));
        assert_eq!(room.surface().data(), expected.data());

        room.handle_pointer(PointerEvent::Up);
        assert_eq!(room.surface().data(), expected.data());
    }

    #[test]
    fn test_leave_sends_queued_stroke() {
        let backend = MemoryBackend::new();
        let created = block_on(backend.create_room("Holi", "u")).unwrap();
        let mut room =
            DrawingRoom::new(&session("u", &created.id, true), None, &config()).unwrap();
        drag(&mut room, (10.0, 50.0), (90.0, 50.0));

        block_on(room.leave(&backend)).unwrap();
        assert!(room.pending().is_empty());
        assert_eq!(block_on(backend.fetch_strokes(&created.id)).unwrap().len(), 1);
    }
}
