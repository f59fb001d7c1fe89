//! InteractionLoop: the frame-synchronous heart of AirKeys.
//!
//! Each pass acquires one frame, detects hands, evaluates the pinch-click
//! detector for every hand and the two-hand detector for the first pair,
//! resolves accepted clicks against the keyboard state, and forwards typed
//! text to the input sink.  A pass finishes completely before the next frame
//! is requested, and nothing else mutates the state.
//!
//! # Architecture
//!
//! The loop depends only on the four ports defined here (`FrameSource`,
//! `HandDetector`, `InputSink`, `TextExporter`) and on `airkeys-core`.
//! Infrastructure implementations are injected at construction time, so the
//! whole pipeline can be driven from tests with scripted frames.
//!
//! # Errors
//!
//! Nothing that happens inside a pass is fatal.  A sink or exporter failure
//! is logged and dropped; debounce and cooldown rejections are normal
//! outcomes.  Only the frame source can end the loop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use airkeys_core::{
    ButtonOverlay, ButtonSet, ClickEvent, HandObservation, KeyOutcome, KeyboardState, LayoutError,
    LayoutId, LayoutRegistry, PinchClickDetector, PinchConfig, PinchReading, Point, TwoHandConfig,
    TwoHandDetector, TwoHandReading,
};

use super::control::ControlCommand;
use super::render_state::{
    tail_lines, AdvisoryLine, ButtonView, DisplaySettings, PinchReadout, RenderSnapshot,
    StatusLine,
};
use crate::infrastructure::frame_source::{Frame, FrameError};

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Error type for the input-injection sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("input sink I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input sink rejected {text:?}: {reason}")]
    Rejected { text: String, reason: String },
}

/// Error type for exporting the text buffer.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Produces frames, one at a time.
#[async_trait]
pub trait FrameSource: Send {
    /// Waits for the next frame.
    ///
    /// [`FrameError::Exhausted`] ends the loop normally; any other error ends
    /// it as a failure.  Neither is retried.
    async fn next_frame(&mut self) -> Result<Frame, FrameError>;

    /// Releases the underlying device or file.  Called once when the loop exits.
    fn release(&mut self);
}

/// Finds hands in a frame.
pub trait HandDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Vec<HandObservation>;
}

/// Receives typed characters, as if from a physical keyboard.
pub trait InputSink: Send + Sync {
    fn inject(&self, text: &str) -> Result<(), SinkError>;
}

/// Persists the text buffer on `save`.
pub trait TextExporter: Send + Sync {
    fn export(&self, text: &str) -> Result<(), ExportError>;
}

// ── Loop configuration and reports ────────────────────────────────────────────

/// Tunables for one loop instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopConfig {
    pub pinch: PinchConfig,
    pub two_hand: TwoHandConfig,
    pub display: DisplaySettings,
}

/// An accepted click and what it did.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickReport {
    pub event: ClickEvent,
    pub outcome: KeyOutcome,
    /// Text forwarded to the sink, if the outcome had any and the sink took it.
    pub injected: Option<String>,
}

/// Everything that happened during one pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    pub sequence: u64,
    /// One pinch reading per detected hand, in detection order.
    pub hands: Vec<PinchReading>,
    pub clicks: Vec<ClickReport>,
    pub two_hand: Option<TwoHandReading>,
    /// New active layout when this frame triggered a switch.
    ///
    /// A switch regenerates the buttons and clears the overlay, so clicks
    /// accepted earlier in the same pass show up in `clicks` (and in the
    /// snapshot's click positions) but no button is flagged as pressed.
    pub layout_switched: Option<LayoutId>,
}

/// Result of handling a control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFlow {
    Continue,
    Quit,
}

/// Why [`InteractionLoop::run`] returned.
#[derive(Debug)]
pub enum LoopExit {
    /// A `quit` command was received.
    Quit,
    /// The shutdown flag was raised.
    Cancelled,
    /// The frame source ran out of frames.
    Exhausted,
    /// The frame source failed.
    SourceFailed(FrameError),
}

// ── The loop ──────────────────────────────────────────────────────────────────

/// Owns all mutable AirKeys state and drives it frame by frame.
pub struct InteractionLoop {
    registry: LayoutRegistry,
    buttons: ButtonSet,
    overlay: ButtonOverlay,
    keyboard: KeyboardState,
    pinch: PinchClickDetector,
    two_hand: TwoHandDetector,
    display: DisplaySettings,
    detector: Box<dyn HandDetector>,
    sink: Arc<dyn InputSink>,
    exporter: Arc<dyn TextExporter>,
    last_hands: Vec<HandObservation>,
    last_report: FrameReport,
    frames_processed: u64,
}

impl InteractionLoop {
    /// Creates a loop showing `initial_layout`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownLayout`] if `initial_layout` is not
    /// registered.
    pub fn new(
        registry: LayoutRegistry,
        initial_layout: &LayoutId,
        config: LoopConfig,
        detector: Box<dyn HandDetector>,
        sink: Arc<dyn InputSink>,
        exporter: Arc<dyn TextExporter>,
    ) -> Result<Self, LayoutError> {
        let buttons = registry.generate(initial_layout)?;
        Ok(Self {
            registry,
            buttons,
            overlay: ButtonOverlay::new(),
            keyboard: KeyboardState::new(initial_layout.clone()),
            pinch: PinchClickDetector::new(config.pinch),
            two_hand: TwoHandDetector::new(config.two_hand),
            display: config.display,
            detector,
            sink,
            exporter,
            last_hands: Vec::new(),
            last_report: FrameReport::default(),
            frames_processed: 0,
        })
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn buttons(&self) -> &ButtonSet {
        &self.buttons
    }

    pub fn overlay(&self) -> &ButtonOverlay {
        &self.overlay
    }

    /// Report of the most recent pass.
    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Runs one complete pass over `frame`.
    ///
    /// `now` is the single clock sample used for every timing decision in
    /// this pass.
    pub fn process_frame(&mut self, frame: &Frame, now: Instant) -> &FrameReport {
        self.frames_processed += 1;
        self.overlay.clear();
        self.last_hands = self.detector.detect(frame);

        let mut report = FrameReport {
            sequence: frame.sequence,
            ..FrameReport::default()
        };

        for hand in &self.last_hands {
            let reading = self.pinch.evaluate(hand, &self.buttons, now);
            if let Some(id) = reading.hovered {
                self.overlay.mark_hovered(id);
            }
            if let Some(click) = &reading.click {
                self.overlay.mark_pressed(click.button);
                report.clicks.push(resolve_click(&mut self.keyboard, self.sink.as_ref(), click));
            }
            report.hands.push(reading);
        }

        report.two_hand = self.two_hand.evaluate(&self.last_hands, now);
        if report.two_hand.is_some_and(|r| r.switch.is_some()) {
            match self.switch_layout() {
                Ok(id) => report.layout_switched = Some(id),
                Err(e) => warn!("layout switch failed: {e}"),
            }
        }

        self.last_report = report;
        &self.last_report
    }

    /// Applies an operator command.
    pub fn handle_command(&mut self, command: ControlCommand) -> CommandFlow {
        debug!(%command, "control command");
        match command {
            ControlCommand::Quit => return CommandFlow::Quit,
            ControlCommand::Save => {
                if let Err(e) = self.save() {
                    warn!("save failed: {e}");
                }
            }
            ControlCommand::CycleLayout => {
                if let Err(e) = self.switch_layout() {
                    warn!("layout switch failed: {e}");
                }
            }
            ControlCommand::Clear => self.keyboard.clear(),
        }
        CommandFlow::Continue
    }

    /// Exports the text buffer.  Returns `Ok(false)` when it is empty and
    /// nothing was written.
    ///
    /// # Errors
    ///
    /// Propagates the exporter's [`ExportError`].
    pub fn save(&self) -> Result<bool, ExportError> {
        let text = self.keyboard.text();
        if text.is_empty() {
            debug!("text buffer empty; nothing saved");
            return Ok(false);
        }
        self.exporter.export(text)?;
        info!(chars = text.chars().count(), "text buffer saved");
        Ok(true)
    }

    /// Advances to the next layout and regenerates the buttons.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownLayout`] if the active layout has
    /// somehow left the registry.
    pub fn switch_layout(&mut self) -> Result<LayoutId, LayoutError> {
        let next = self.registry.cycle(self.keyboard.active_layout())?.clone();
        self.buttons = self.registry.generate(&next)?;
        self.overlay.clear();
        self.keyboard.set_active_layout(next.clone());
        info!(layout = %next, "layout switched");
        Ok(next)
    }

    /// Builds the read-only view a renderer draws from.
    pub fn snapshot(&self) -> RenderSnapshot {
        let active = self.keyboard.active_layout();
        let layout_name = self
            .registry
            .get(active)
            .map_or_else(|| active.to_string(), |layout| layout.name.clone());

        let landmarks: Vec<Vec<Point>> = if self.display.show_landmarks {
            self.last_hands
                .iter()
                .map(|hand| hand.keypoints.iter().map(|k| k.to_point()).collect())
                .collect()
        } else {
            Vec::new()
        };

        let pinch_readouts: Vec<PinchReadout> = if self.display.show_distance {
            self.last_report
                .hands
                .iter()
                .enumerate()
                .filter_map(|(hand, reading)| {
                    Some(PinchReadout {
                        hand,
                        distance: reading.distance?,
                        midpoint: reading.midpoint?,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let advisory = self
            .last_report
            .two_hand
            .filter(|reading| reading.advisory)
            .map(|reading| AdvisoryLine {
                from: reading.wrists.0,
                to: reading.wrists.1,
                distance: reading.wrist_distance,
            });

        RenderSnapshot {
            buttons: self
                .buttons
                .iter()
                .map(|button| ButtonView::new(button, &self.overlay))
                .collect(),
            text_lines: tail_lines(
                self.keyboard.text(),
                self.display.wrap_width,
                self.display.display_lines,
            ),
            status: StatusLine {
                layout_name,
                caps_lock: self.keyboard.caps_lock(),
                shift: self.keyboard.shift(),
            },
            landmarks,
            pinch_readouts,
            advisory,
            click_positions: self
                .last_report
                .clicks
                .iter()
                .map(|c| c.event.position)
                .collect(),
            theme: self.display.theme.clone(),
        }
    }

    /// Drives the loop until a quit command, the shutdown flag, or the end
    /// of the frame source.  The source is released before returning.
    ///
    /// Commands and the shutdown flag are checked once at the start of each
    /// pass.  A closed command channel is not a reason to stop.
    ///
    /// Timing decisions use each frame's capture time, anchored to the moment
    /// the first frame arrives, so a recording replayed at any speed types
    /// the same text.
    pub async fn run(
        &mut self,
        source: &mut dyn FrameSource,
        commands: &mut mpsc::Receiver<ControlCommand>,
        shutdown: &AtomicBool,
    ) -> LoopExit {
        info!(layout = %self.keyboard.active_layout(), "interaction loop started");

        let mut clock = CaptureClock::default();
        let exit = loop {
            if shutdown.load(Ordering::Relaxed) {
                break LoopExit::Cancelled;
            }
            if self.drain_commands(commands) == CommandFlow::Quit {
                break LoopExit::Quit;
            }
            match source.next_frame().await {
                Ok(frame) => {
                    let now = clock.instant_for(&frame);
                    self.process_frame(&frame, now);
                }
                Err(FrameError::Exhausted) => break LoopExit::Exhausted,
                Err(e) => {
                    warn!("frame acquisition failed: {e}");
                    break LoopExit::SourceFailed(e);
                }
            }
        };

        source.release();
        info!(frames = self.frames_processed, ?exit, "interaction loop stopped");
        exit
    }

    fn drain_commands(&mut self, commands: &mut mpsc::Receiver<ControlCommand>) -> CommandFlow {
        while let Ok(command) = commands.try_recv() {
            if self.handle_command(command) == CommandFlow::Quit {
                return CommandFlow::Quit;
            }
        }
        CommandFlow::Continue
    }
}

/// Maps frame capture times onto the monotonic clock.
///
/// The first frame seen is pinned to `Instant::now()`; later frames land at
/// that instant plus their capture offset.  A timestamp earlier than the
/// first one maps to the anchor itself.
#[derive(Debug, Default)]
struct CaptureClock {
    anchor: Option<(Instant, Duration)>,
}

impl CaptureClock {
    fn instant_for(&mut self, frame: &Frame) -> Instant {
        let (origin, first) = *self
            .anchor
            .get_or_insert_with(|| (Instant::now(), frame.timestamp));
        origin + frame.timestamp.saturating_sub(first)
    }
}

/// Applies an accepted click and forwards typed text to the sink.
fn resolve_click(keyboard: &mut KeyboardState, sink: &dyn InputSink, click: &ClickEvent) -> ClickReport {
    let outcome = keyboard.apply(&click.action);
    let injected = outcome.injection().and_then(|text| match sink.inject(text) {
        Ok(()) => Some(text.to_string()),
        Err(e) => {
            warn!(key = %click.label, "input injection failed: {e}");
            None
        }
    });
    ClickReport {
        event: click.clone(),
        outcome,
        injected,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use airkeys_core::KeyAction;

    use crate::infrastructure::frame_source::mock::{MockEnding, MockFrameSource};
    use crate::infrastructure::frame_source::replay::RecordedHandDetector;
    use crate::infrastructure::input_injection::mock::MockInputSink;

    // ── Test doubles ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingExporter {
        exports: Mutex<Vec<String>>,
    }

    impl TextExporter for RecordingExporter {
        fn export(&self, text: &str) -> Result<(), ExportError> {
            self.exports.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Fixture {
        looper: InteractionLoop,
        sink: Arc<MockInputSink>,
        exporter: Arc<RecordingExporter>,
    }

    fn fixture_with(config: LoopConfig, sink: MockInputSink) -> Fixture {
        let sink = Arc::new(sink);
        let exporter = Arc::new(RecordingExporter::default());
        let looper = InteractionLoop::new(
            LayoutRegistry::default(),
            &LayoutId::new("qwerty"),
            config,
            Box::new(RecordedHandDetector::new(false)),
            sink.clone(),
            exporter.clone(),
        )
        .unwrap();
        Fixture {
            looper,
            sink,
            exporter,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(LoopConfig::default(), MockInputSink::default())
    }

    fn centre_of(buttons: &ButtonSet, label: &str) -> Point {
        let b = buttons.iter().find(|b| b.label == label).unwrap();
        Point::new(b.rect.x + b.rect.width / 2.0, b.rect.y + b.rect.height / 2.0)
    }

    fn pointing(tip: Point, gap: f32) -> HandObservation {
        HandObservation::synthetic(
            Point::new(tip.x, tip.y + 400.0),
            tip,
            Point::new(tip.x + gap, tip.y),
        )
    }

    fn frame(sequence: u64, hands: Vec<HandObservation>) -> Frame {
        Frame {
            sequence,
            timestamp: Duration::from_millis(sequence * 33),
            width: 1280,
            height: 720,
            detections: hands,
        }
    }

    // ── process_frame ─────────────────────────────────────────────────────────

    #[test]
    fn test_pinch_on_key_types_and_injects() {
        // Arrange
        let mut f = fixture();
        let tip = centre_of(f.looper.buttons(), "Q");

        // Act
        let report = f.looper.process_frame(&frame(0, vec![pointing(tip, 10.0)]), Instant::now()).clone();

        // Assert
        assert_eq!(f.looper.keyboard().text(), "q");
        assert_eq!(*f.sink.injected.lock().unwrap(), vec!["q".to_string()]);
        assert_eq!(report.clicks.len(), 1);
        assert_eq!(report.clicks[0].injected.as_deref(), Some("q"));
        let id = report.clicks[0].event.button;
        assert!(f.looper.overlay().is_pressed(id));
        assert!(f.looper.overlay().is_hovered(id));
    }

    #[test]
    fn test_frame_without_hands_changes_nothing() {
        let mut f = fixture();
        let report = f.looper.process_frame(&frame(0, Vec::new()), Instant::now()).clone();

        assert!(report.hands.is_empty());
        assert!(report.clicks.is_empty());
        assert!(report.two_hand.is_none());
        assert!(f.looper.overlay().is_empty());
        assert_eq!(f.looper.keyboard().text(), "");
        assert_eq!(f.looper.frames_processed(), 1);
    }

    #[test]
    fn test_hover_flags_reset_every_frame() {
        let mut f = fixture();
        let tip = centre_of(f.looper.buttons(), "W");
        let now = Instant::now();

        f.looper.process_frame(&frame(0, vec![pointing(tip, 60.0)]), now);
        assert!(!f.looper.overlay().is_empty());

        f.looper.process_frame(&frame(1, Vec::new()), now + Duration::from_millis(33));
        assert!(f.looper.overlay().is_empty());
    }

    #[test]
    fn test_special_keys_are_not_injected() {
        let mut f = fixture();
        let tip = centre_of(f.looper.buttons(), "Caps");

        f.looper.process_frame(&frame(0, vec![pointing(tip, 5.0)]), Instant::now());

        assert!(f.looper.keyboard().caps_lock());
        assert!(f.sink.injected.lock().unwrap().is_empty());
    }

    #[test]
    fn test_sink_failure_does_not_stop_typing() {
        let mut f = fixture_with(
            LoopConfig::default(),
            MockInputSink::failing(),
        );
        let tip = centre_of(f.looper.buttons(), "A");

        let report = f.looper.process_frame(&frame(0, vec![pointing(tip, 5.0)]), Instant::now()).clone();

        assert_eq!(f.looper.keyboard().text(), "a");
        assert_eq!(report.clicks[0].injected, None);
    }

    #[test]
    fn test_click_delay_is_shared_across_hands_in_one_frame() {
        let mut f = fixture();
        let q = centre_of(f.looper.buttons(), "Q");
        let p = centre_of(f.looper.buttons(), "P");
        // Wrists far apart so no layout switch interferes.
        let hands = vec![pointing(q, 5.0), pointing(p, 5.0)];

        let report = f.looper.process_frame(&frame(0, hands), Instant::now()).clone();

        assert_eq!(report.hands.len(), 2);
        assert_eq!(report.clicks.len(), 1);
        assert_eq!(f.looper.keyboard().text(), "q");
    }

    #[test]
    fn test_close_wrists_switch_layout_and_regenerate_buttons() {
        let mut f = fixture();
        let left = HandObservation::synthetic(
            Point::new(600.0, 700.0),
            Point::new(600.0, 1000.0),
            Point::new(650.0, 1000.0),
        );
        let right = HandObservation::synthetic(
            Point::new(660.0, 700.0),
            Point::new(660.0, 1000.0),
            Point::new(710.0, 1000.0),
        );

        let report = f.looper.process_frame(&frame(0, vec![left, right]), Instant::now()).clone();

        assert_eq!(report.layout_switched, Some(LayoutId::new("numeric")));
        assert_eq!(f.looper.keyboard().active_layout().as_str(), "numeric");
        assert_eq!(f.looper.buttons().layout_id().as_str(), "numeric");
        assert_eq!(f.looper.buttons().len(), 16);
    }

    #[test]
    fn test_switch_in_click_frame_keeps_click_but_drops_pressed_flag() {
        // Arrange: one hand pinches "Q" while the other wrist is 20px away.
        let mut f = fixture();
        let q = centre_of(f.looper.buttons(), "Q");
        let clicking = pointing(q, 5.0);
        let other = HandObservation::synthetic(
            Point::new(q.x + 20.0, q.y + 400.0),
            Point::new(q.x + 20.0, 1000.0),
            Point::new(q.x + 80.0, 1000.0),
        );

        // Act
        let report = f
            .looper
            .process_frame(&frame(0, vec![clicking, other]), Instant::now())
            .clone();
        let snapshot = f.looper.snapshot();

        // Assert
        assert_eq!(report.clicks.len(), 1);
        assert_eq!(report.layout_switched, Some(LayoutId::new("numeric")));
        assert_eq!(f.looper.keyboard().text(), "q");
        assert_eq!(snapshot.click_positions.len(), 1);
        assert!(snapshot.buttons.iter().all(|b| !b.pressed));
    }

    // ── handle_command ────────────────────────────────────────────────────────

    #[test]
    fn test_save_skips_empty_buffer() {
        let mut f = fixture();
        assert_eq!(f.looper.handle_command(ControlCommand::Save), CommandFlow::Continue);
        assert!(f.exporter.exports.lock().unwrap().is_empty());
        assert!(!f.looper.save().unwrap());
    }

    #[test]
    fn test_save_exports_buffer_verbatim() {
        let mut f = fixture();
        f.looper.keyboard.apply(&KeyAction::Text("h".to_string()));
        f.looper.keyboard.apply(&KeyAction::Enter);
        f.looper.keyboard.apply(&KeyAction::Text("i".to_string()));

        f.looper.handle_command(ControlCommand::Save);

        assert_eq!(*f.exporter.exports.lock().unwrap(), vec!["h\ni".to_string()]);
    }

    #[test]
    fn test_clear_empties_buffer_but_keeps_history() {
        let mut f = fixture();
        f.looper.keyboard.apply(&KeyAction::Text("x".to_string()));
        f.looper.keyboard.apply(&KeyAction::Enter);

        f.looper.handle_command(ControlCommand::Clear);

        assert_eq!(f.looper.keyboard().text(), "");
        assert_eq!(f.looper.keyboard().history().len(), 1);
    }

    #[test]
    fn test_cycle_layout_command_wraps_around() {
        let mut f = fixture();
        for expected in ["numeric", "symbols", "qwerty"] {
            f.looper.handle_command(ControlCommand::CycleLayout);
            assert_eq!(f.looper.keyboard().active_layout().as_str(), expected);
        }
    }

    #[test]
    fn test_quit_command_stops() {
        let mut f = fixture();
        assert_eq!(f.looper.handle_command(ControlCommand::Quit), CommandFlow::Quit);
    }

    // ── snapshot ──────────────────────────────────────────────────────────────

    #[test]
    fn test_snapshot_reflects_state() {
        let mut f = fixture();
        let tip = centre_of(f.looper.buttons(), "T");
        f.looper.keyboard.apply(&KeyAction::Shift);

        f.looper.process_frame(&frame(0, vec![pointing(tip, 8.0)]), Instant::now());
        let snap = f.looper.snapshot();

        assert_eq!(snap.status.to_string(), "Layout: QWERTY | Caps: OFF | Shift: ON");
        assert_eq!(snap.text_lines, vec!["T".to_string()]);
        assert_eq!(snap.buttons.len(), f.looper.buttons().len());
        assert_eq!(snap.buttons.iter().filter(|b| b.pressed).count(), 1);
        assert_eq!(snap.pinch_readouts.len(), 1);
        assert_eq!(snap.pinch_readouts[0].distance, 8.0);
        assert_eq!(snap.landmarks.len(), 1);
        assert_eq!(snap.click_positions.len(), 1);
        assert_eq!(snap.theme, "dark");
    }

    #[test]
    fn test_snapshot_hides_disabled_overlays() {
        let config = LoopConfig {
            display: DisplaySettings {
                show_distance: false,
                show_landmarks: false,
                ..DisplaySettings::default()
            },
            ..LoopConfig::default()
        };
        let mut f = fixture_with(config, MockInputSink::default());
        let tip = centre_of(f.looper.buttons(), "T");

        f.looper.process_frame(&frame(0, vec![pointing(tip, 50.0)]), Instant::now());
        let snap = f.looper.snapshot();

        assert!(snap.pinch_readouts.is_empty());
        assert!(snap.landmarks.is_empty());
        assert_eq!(snap.buttons.iter().filter(|b| b.hovered).count(), 1);
    }

    #[test]
    fn test_snapshot_shows_advisory_line_between_wrists() {
        let mut f = fixture();
        let a = HandObservation::synthetic(
            Point::new(400.0, 700.0),
            Point::new(400.0, 1000.0),
            Point::new(450.0, 1000.0),
        );
        let b = HandObservation::synthetic(
            Point::new(550.0, 700.0),
            Point::new(550.0, 1000.0),
            Point::new(600.0, 1000.0),
        );

        f.looper.process_frame(&frame(0, vec![a, b]), Instant::now());
        let advisory = f.looper.snapshot().advisory.expect("150px apart is advisory");

        assert_eq!(advisory.distance, 150.0);
        assert_eq!(advisory.from, Point::new(400.0, 700.0));
        assert_eq!(f.looper.keyboard().active_layout().as_str(), "qwerty");
    }

    // ── run ───────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_run_until_exhausted_releases_source() {
        let mut f = fixture();
        let tip = centre_of(f.looper.buttons(), "Q");
        let mut source = MockFrameSource::new();
        source.push(0, vec![pointing(tip, 5.0)]).push(33, Vec::new());
        let (_tx, mut rx) = mpsc::channel(4);

        let exit = f.looper.run(&mut source, &mut rx, &AtomicBool::new(false)).await;

        assert!(matches!(exit, LoopExit::Exhausted));
        assert!(source.released);
        assert_eq!(f.looper.frames_processed(), 2);
        assert_eq!(f.looper.keyboard().text(), "q");
    }

    #[tokio::test]
    async fn test_run_stops_on_queued_quit_before_next_frame() {
        let mut f = fixture();
        let mut source = MockFrameSource::new();
        source.push(0, Vec::new());
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(ControlCommand::Quit).await.unwrap();

        let exit = f.looper.run(&mut source, &mut rx, &AtomicBool::new(false)).await;

        assert!(matches!(exit, LoopExit::Quit));
        assert_eq!(source.served, 0);
        assert!(source.released);
    }

    #[tokio::test]
    async fn test_run_honours_shutdown_flag() {
        let mut f = fixture();
        let mut source = MockFrameSource::new();
        source.push(0, Vec::new());
        let (_tx, mut rx) = mpsc::channel(4);

        let exit = f.looper.run(&mut source, &mut rx, &AtomicBool::new(true)).await;

        assert!(matches!(exit, LoopExit::Cancelled));
        assert!(source.released);
    }

    #[tokio::test]
    async fn test_run_ends_on_source_failure_without_retry() {
        let mut f = fixture();
        let mut source = MockFrameSource::new().ending(MockEnding::Failure);
        source.push(0, Vec::new());
        let (_tx, mut rx) = mpsc::channel(4);

        let exit = f.looper.run(&mut source, &mut rx, &AtomicBool::new(false)).await;

        assert!(matches!(exit, LoopExit::SourceFailed(FrameError::Read(_))));
        assert_eq!(source.served, 1);
        assert!(source.released);
    }

    #[tokio::test]
    async fn test_run_continues_when_command_channel_closes() {
        let mut f = fixture();
        let mut source = MockFrameSource::new();
        source.push(0, Vec::new()).push(33, Vec::new());
        let (tx, mut rx) = mpsc::channel(4);
        drop(tx);

        let exit = f.looper.run(&mut source, &mut rx, &AtomicBool::new(false)).await;

        assert!(matches!(exit, LoopExit::Exhausted));
        assert_eq!(f.looper.frames_processed(), 2);
    }

    #[tokio::test]
    async fn test_run_debounces_on_capture_time_not_arrival_time() {
        // Arrange: one pinch held on "Q", frames served back to back.
        let mut f = fixture();
        let tip = centre_of(f.looper.buttons(), "Q");
        let mut source = MockFrameSource::new();
        for t_ms in [0, 100, 299, 300, 350, 599, 600] {
            source.push(t_ms, vec![pointing(tip, 5.0)]);
        }
        let (_tx, mut rx) = mpsc::channel(4);

        // Act
        f.looper.run(&mut source, &mut rx, &AtomicBool::new(false)).await;

        // Assert: accepted at 0, 300 and 600 ms of capture time.
        assert_eq!(f.looper.keyboard().text(), "qqq");
    }

    #[test]
    fn test_capture_clock_offsets_from_first_frame() {
        let mut clock = CaptureClock::default();

        let first = clock.instant_for(&frame(3, Vec::new()));
        let later = clock.instant_for(&frame(10, Vec::new()));
        let mut rewound = frame(11, Vec::new());
        rewound.timestamp = Duration::ZERO;

        // Frames 3 and 10 were captured 99 ms and 330 ms in.
        assert_eq!(later - first, Duration::from_millis(231));
        assert_eq!(clock.instant_for(&rewound), first);
    }
}
