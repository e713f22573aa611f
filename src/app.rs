//! Application Coordinator
//!
//! The session context and the single-threaded dispatch loop. One tick is
//! one captured frame: tracker → normalizer → classifier → state machine →
//! canvas mutation → composite → present → keyboard commands. The speak
//! pipeline runs synchronously inside the tick that requested it; the loop
//! pausing for synthesis is a deliberate, user-initiated wait.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use tracing::{error, info, warn};

use crate::canvas::render::{self, RenderStyle};
use crate::canvas::{Canvas, StrokeKind};
use crate::capture::{CapturedFrame, Command, CommandQueue, VideoSource};
use crate::config::AppConfig;
use crate::error::{CaptureError, SpeakError};
use crate::gesture::{GestureClassifier, GestureState};
use crate::intent::{HeaderLayout, IntentEvent, ModeMachine, PaintMode};
use crate::speech::{AudioOutput, Language, SpeechSynthesizer, Translator};
use crate::tracking::{read_hand, HandTracker, LandmarkSet, Point};
use crate::vision::{prepare_for_ocr, TextRecognizer};

/// How long a transient notice stays on screen, in ticks.
const NOTICE_TICKS: u32 = 90;

/// A transient on-screen message for recoverable conditions.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub remaining_ticks: u32,
}

/// Per-tick view handed to the presenter alongside the composite.
#[derive(Debug, Clone)]
pub struct TickInfo {
    pub mode: PaintMode,
    pub gesture: GestureState,
    /// Raised-finger readout while the counting demo is active.
    pub finger_count: Option<u8>,
    pub notices: Vec<String>,
}

/// The display collaborator: shows the composite frame. The keyboard it owns
/// feeds the [`CommandQueue`] out of band.
pub trait Presenter {
    fn present(&mut self, composite: &RgbaImage, info: &TickInfo) -> Result<()>;
}

/// Side effects a tick requests from the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Export to the configured canvas path (header save button).
    Export,
    /// Export to a timestamped quick-save file (keyboard).
    QuickSave,
    /// Run the recognize-and-speak pipeline.
    Speak(Language),
}

struct SpokenAudio {
    text: String,
    language: Language,
    audio: Vec<u8>,
}

/// All mutable per-session state, threaded explicitly through every tick so
/// each component can be exercised with constructed inputs.
pub struct PaintSession {
    config: AppConfig,
    canvas: Canvas,
    classifier: GestureClassifier,
    machine: ModeMachine,
    notices: Vec<Notice>,
    finger_count: Option<u8>,
    fingertip: Option<Point>,
    spoken_cache: Option<SpokenAudio>,
    tick_count: u64,
}

impl PaintSession {
    pub fn new(config: AppConfig) -> Self {
        let canvas = Canvas::new(
            config.canvas.width,
            config.canvas.height,
            config.brush.smoothing_window,
            config.brush.min_point_spacing,
        );
        let layout = HeaderLayout::standard(config.canvas.width, config.canvas.header_height);
        let machine = ModeMachine::new(
            layout,
            config.gesture.hover_confirm_ticks,
            config.gesture.mode_cooldown_ticks,
        );
        let classifier = GestureClassifier::new(config.gesture.debounce_ticks);

        Self {
            config,
            canvas,
            classifier,
            machine,
            notices: Vec::new(),
            finger_count: None,
            fingertip: None,
            spoken_cache: None,
            tick_count: 0,
        }
    }

    /// Process one frame's observation. Canvas and mode mutations happen
    /// here; blocking side effects come back as [`SessionAction`]s for the
    /// loop to perform.
    pub fn tick(&mut self, observation: Option<LandmarkSet>) -> Vec<SessionAction> {
        self.tick_count += 1;
        self.age_notices();
        self.finger_count = None;

        let reading = observation
            .as_ref()
            .map(|lm| read_hand(lm, self.config.gesture.extension_margin));
        let fingers = reading.as_ref().map(|r| r.fingers);

        let counting = self.machine.mode() == PaintMode::FingerCounter;
        let gesture = self.classifier.observe(fingers, counting);

        let (width, height) = self.canvas.dimensions();
        self.fingertip = reading.map(|r| r.fingertip.to_pixels(width, height));

        let events = self.machine.update(gesture, fingers, self.fingertip);

        let mut actions = Vec::new();
        for event in events {
            match event {
                IntentEvent::ModeSelected(mode) => {
                    self.push_notice(format!("{mode} mode"));
                }
                IntentEvent::DrawTo(point) => {
                    if self.canvas.open_stroke().is_none() {
                        self.canvas
                            .begin_stroke(StrokeKind::Ink, self.config.brush.thickness);
                    }
                    self.canvas.extend(point);
                }
                IntentEvent::EraseAt(point) => {
                    if self.canvas.open_stroke().is_none() {
                        self.canvas
                            .begin_stroke(StrokeKind::Erase, self.config.brush.eraser_thickness);
                    }
                    self.canvas.extend(point);
                }
                IntentEvent::SealStroke => self.canvas.seal(),
                IntentEvent::ClearCanvas => {
                    self.canvas.clear();
                    self.push_notice("canvas cleared");
                }
                IntentEvent::SaveCanvas => actions.push(SessionAction::Export),
                IntentEvent::Speak(language) => actions.push(SessionAction::Speak(language)),
                IntentEvent::FingersCounted(count) => self.finger_count = Some(count),
            }
        }
        actions
    }

    /// Apply a discrete keyboard command. Quit is the loop's business, not
    /// the session's.
    pub fn handle_command(&mut self, command: Command) -> Option<SessionAction> {
        match command {
            Command::ClearCanvas => {
                self.canvas.clear();
                self.push_notice("canvas cleared");
                None
            }
            Command::SaveCanvas => Some(SessionAction::QuickSave),
            Command::Quit => None,
        }
    }

    /// The full speak pipeline: snapshot → preprocess → OCR → (translate) →
    /// synthesize → play. Returns the recognized text. Identical repeated
    /// requests replay the cached audio instead of calling the service
    /// again. Failures leave the canvas and the cache untouched.
    pub fn speak<R, T, S, A>(
        &mut self,
        language: Language,
        recognizer: &R,
        translator: &T,
        synthesizer: &S,
        audio_out: &mut A,
    ) -> Result<String, SpeakError>
    where
        R: TextRecognizer + ?Sized,
        T: Translator + ?Sized,
        S: SpeechSynthesizer + ?Sized,
        A: AudioOutput + ?Sized,
    {
        let snapshot = self.canvas.snapshot();
        let prepared = prepare_for_ocr(&snapshot, &self.config.ocr);

        let text = recognizer.recognize(&prepared)?.trim().to_string();
        if text.is_empty() {
            return Err(SpeakError::RecognitionEmpty);
        }
        info!(%text, ?language, "canvas text recognized");

        if let Some(cache) = &self.spoken_cache {
            if cache.text == text && cache.language == language {
                info!("replaying cached audio");
                audio_out.play(&cache.audio)?;
                return Ok(text);
            }
        }

        let spoken = match language {
            Language::English => text.clone(),
            Language::French => translator.translate(&text, Language::English, Language::French)?,
        };

        let voice = self.config.speech.voice_for(language).to_string();
        let audio = synthesizer.synthesize(&spoken, &voice)?;
        audio_out.play(&audio)?;

        self.spoken_cache = Some(SpokenAudio {
            text: text.clone(),
            language,
            audio,
        });
        Ok(text)
    }

    /// Export to the configured canvas path (header save button).
    pub fn export(&self) -> Result<PathBuf> {
        let path = self.config.canvas.export_path.clone();
        self.canvas.export(&path)?;
        Ok(path)
    }

    /// Export to a tick-stamped quick-save file (keyboard command).
    pub fn quicksave(&self) -> Result<PathBuf> {
        let path = PathBuf::from(format!(
            "{}{}.png",
            self.config.canvas.quicksave_prefix, self.tick_count
        ));
        self.canvas.export(&path)?;
        Ok(path)
    }

    /// Seal whatever is open and export to an explicit path.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        self.canvas.seal();
        self.canvas.export(path)
    }

    pub fn push_notice(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            message: message.into(),
            remaining_ticks: NOTICE_TICKS,
        });
    }

    fn age_notices(&mut self) {
        for notice in &mut self.notices {
            notice.remaining_ticks = notice.remaining_ticks.saturating_sub(1);
        }
        self.notices.retain(|n| n.remaining_ticks > 0);
    }

    pub fn tick_info(&self) -> TickInfo {
        TickInfo {
            mode: self.machine.mode(),
            gesture: self.classifier.confirmed(),
            finger_count: self.finger_count,
            notices: self.notices.iter().map(|n| n.message.clone()).collect(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn mode(&self) -> PaintMode {
        self.machine.mode()
    }

    pub fn layout(&self) -> &HeaderLayout {
        self.machine.layout()
    }

    pub fn fingertip(&self) -> Option<Point> {
        self.fingertip
    }
}

/// The external collaborators the loop drives.
pub struct Collaborators {
    pub video: Box<dyn VideoSource>,
    pub tracker: Box<dyn HandTracker>,
    pub presenter: Box<dyn Presenter>,
    pub recognizer: Box<dyn TextRecognizer>,
    pub translator: Box<dyn Translator>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
    pub audio: Box<dyn AudioOutput>,
}

/// The dispatch loop: owns the session, the collaborators and the command
/// queue, and runs until quit or capture failure.
pub struct PaintApp {
    session: PaintSession,
    video: Box<dyn VideoSource>,
    tracker: Box<dyn HandTracker>,
    presenter: Box<dyn Presenter>,
    recognizer: Box<dyn TextRecognizer>,
    translator: Box<dyn Translator>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    audio: Box<dyn AudioOutput>,
    commands: CommandQueue,
    style: RenderStyle,
}

impl PaintApp {
    pub fn new(session: PaintSession, collaborators: Collaborators, commands: CommandQueue) -> Self {
        let [r, g, b] = session.config.brush.color;
        let style = RenderStyle {
            brush_color: Rgba([r, g, b, 255]),
            ..RenderStyle::default()
        };
        Self {
            session,
            video: collaborators.video,
            tracker: collaborators.tracker,
            presenter: collaborators.presenter,
            recognizer: collaborators.recognizer,
            translator: collaborators.translator,
            synthesizer: collaborators.synthesizer,
            audio: collaborators.audio,
            commands,
            style,
        }
    }

    /// Run to completion. Returns the session so callers can inspect or
    /// export the final canvas.
    pub fn run(mut self) -> Result<PaintSession> {
        info!("dispatch loop starting");
        loop {
            let frame = match self.video.next_frame() {
                Ok(frame) => frame,
                Err(CaptureError::EndOfStream) => {
                    info!("video source exhausted, shutting down");
                    break;
                }
                Err(err) => {
                    error!("fatal capture failure: {err}");
                    return Err(err.into());
                }
            };

            let observation = self.tracker.detect(&frame);
            let actions = self.session.tick(observation);
            for action in actions {
                self.perform(action);
            }

            let composite = self.compose(frame);
            let info = self.session.tick_info();
            self.presenter
                .present(&composite, &info)
                .context("presenter failed")?;

            for command in self.commands.drain() {
                if command == Command::Quit {
                    info!("quit command received");
                    return Ok(self.session);
                }
                if let Some(action) = self.session.handle_command(command) {
                    self.perform(action);
                }
            }
        }
        Ok(self.session)
    }

    fn compose(&self, frame: CapturedFrame) -> RgbaImage {
        let mut composite = frame.image;
        render::compose(
            &mut composite,
            self.session.canvas(),
            self.session.layout(),
            self.session.mode(),
            self.session.fingertip(),
            &self.style,
        );
        composite
    }

    fn perform(&mut self, action: SessionAction) {
        match action {
            SessionAction::Export => match self.session.export() {
                Ok(path) => self.session.push_notice(format!("saved {}", path.display())),
                Err(err) => {
                    warn!("canvas export failed: {err:#}");
                    self.session.push_notice("save failed");
                }
            },
            SessionAction::QuickSave => match self.session.quicksave() {
                Ok(path) => self
                    .session
                    .push_notice(format!("quick save: {}", path.display())),
                Err(err) => {
                    warn!("quick save failed: {err:#}");
                    self.session.push_notice("save failed");
                }
            },
            SessionAction::Speak(language) => {
                let result = self.session.speak(
                    language,
                    self.recognizer.as_ref(),
                    self.translator.as_ref(),
                    self.synthesizer.as_ref(),
                    self.audio.as_mut(),
                );
                match result {
                    Ok(text) => self.session.push_notice(format!("\u{201c}{text}\u{201d}")),
                    Err(err) => {
                        warn!("speak pipeline aborted: {err}");
                        self.session.push_notice(err.to_string());
                    }
                }
            }
        }
    }
}
