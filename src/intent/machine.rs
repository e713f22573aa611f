//! Mode/intent state machine
//!
//! The mode is sticky: it survives ticks, stop gestures and tracking loss,
//! and changes only through a hover-confirmed header selection. Dwell
//! confirmation plus a post-switch cooldown keep a fast pass-through of the
//! header from flipping modes.

use tracing::info;

use crate::gesture::GestureState;
use crate::speech::Language;
use crate::tracking::{FingerFlags, Point};

use super::header::HeaderLayout;
use super::{IntentEvent, PaintMode};

pub struct ModeMachine {
    layout: HeaderLayout,
    hover_confirm_ticks: u32,
    cooldown_ticks: u32,

    mode: PaintMode,
    prev_gesture: GestureState,
    /// Button currently dwelled on and for how many ticks.
    hover: Option<(PaintMode, u32)>,
    /// Ticks left before another selection may confirm.
    cooldown: u32,
}

impl ModeMachine {
    pub fn new(layout: HeaderLayout, hover_confirm_ticks: u32, cooldown_ticks: u32) -> Self {
        Self {
            layout,
            hover_confirm_ticks: hover_confirm_ticks.max(1),
            cooldown_ticks,
            mode: PaintMode::Idle,
            prev_gesture: GestureState::NoHand,
            hover: None,
            cooldown: 0,
        }
    }

    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    pub fn layout(&self) -> &HeaderLayout {
        &self.layout
    }

    /// Advance one tick. `fingertip` is the index fingertip in pixel space;
    /// `None` whenever there is no hand.
    pub fn update(
        &mut self,
        gesture: GestureState,
        fingers: Option<FingerFlags>,
        fingertip: Option<Point>,
    ) -> Vec<IntentEvent> {
        let mut events = Vec::new();
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }

        // The open stroke closes the moment the confirmed gesture leaves the
        // pointing pose, whatever it leaves to.
        if self.prev_gesture == GestureState::Pointing
            && gesture != GestureState::Pointing
            && self.mode.is_drawing()
        {
            events.push(IntentEvent::SealStroke);
        }

        match gesture {
            GestureState::NoHand => {
                // Tracking lost: hold the mode, mutate nothing.
                self.hover = None;
            }
            GestureState::Idle => {
                self.hover = None;
            }
            GestureState::Stop => {
                self.hover = None;
                if self.mode == PaintMode::Erase && fingers.is_some_and(|f| f.all_extended()) {
                    events.push(IntentEvent::ClearCanvas);
                }
            }
            GestureState::Pointing => {
                if let Some(tip) = fingertip {
                    self.track_pointing(tip, &mut events);
                }
            }
            GestureState::Count(n) => {
                events.push(IntentEvent::FingersCounted(n));
                // An index-only point still reaches the header, otherwise the
                // counting demo could never be left.
                if n == 1 && fingers.is_some_and(|f| f.only_index()) {
                    if let Some(tip) = fingertip {
                        if self.layout.contains(tip) {
                            self.hover_header(tip, &mut events);
                        }
                    }
                }
            }
        }

        self.prev_gesture = gesture;
        events
    }

    fn track_pointing(&mut self, tip: Point, events: &mut Vec<IntentEvent>) {
        if self.layout.contains(tip) {
            self.hover_header(tip, events);
            return;
        }
        self.hover = None;
        match self.mode {
            PaintMode::Draw => events.push(IntentEvent::DrawTo(tip)),
            PaintMode::Erase => events.push(IntentEvent::EraseAt(tip)),
            _ => {}
        }
    }

    fn hover_header(&mut self, tip: Point, events: &mut Vec<IntentEvent>) {
        if self.cooldown > 0 {
            self.hover = None;
            return;
        }
        let Some(target) = self.layout.hit_test(tip) else {
            self.hover = None;
            return;
        };

        let dwell = match self.hover {
            Some((held, ticks)) if held == target => ticks + 1,
            _ => 1,
        };
        self.hover = Some((target, dwell));

        if dwell >= self.hover_confirm_ticks {
            self.hover = None;
            self.cooldown = self.cooldown_ticks;
            self.confirm(target, events);
        }
    }

    fn confirm(&mut self, target: PaintMode, events: &mut Vec<IntentEvent>) {
        // Whatever was being drawn is finished before the selection acts.
        if self.mode.is_drawing() {
            events.push(IntentEvent::SealStroke);
        }

        match target {
            PaintMode::Save => {
                info!("header select: save canvas");
                events.push(IntentEvent::SaveCanvas);
                self.mode = PaintMode::Idle;
            }
            PaintMode::SpeakEn => {
                info!("header select: speak (english)");
                events.push(IntentEvent::Speak(Language::English));
                self.mode = PaintMode::Idle;
            }
            PaintMode::SpeakFr => {
                info!("header select: speak (french)");
                events.push(IntentEvent::Speak(Language::French));
                self.mode = PaintMode::Idle;
            }
            other => {
                if self.mode != other {
                    info!(from = ?self.mode, to = ?other, "mode change");
                    self.mode = other;
                    events.push(IntentEvent::ModeSelected(other));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOVER: u32 = 3;
    const COOLDOWN: u32 = 5;

    fn machine() -> ModeMachine {
        ModeMachine::new(HeaderLayout::standard(1280, 137), HOVER, COOLDOWN)
    }

    fn pointing_flags() -> Option<FingerFlags> {
        Some(FingerFlags::new([false, true, false, false, false]))
    }

    fn open_palm() -> Option<FingerFlags> {
        Some(FingerFlags::new([true; 5]))
    }

    /// Dwell on a header point until the selection confirms.
    fn select(m: &mut ModeMachine, tip: Point) -> Vec<IntentEvent> {
        let mut last = Vec::new();
        for _ in 0..HOVER {
            last = m.update(GestureState::Pointing, pointing_flags(), Some(tip));
        }
        last
    }

    const DRAW_BUTTON: Point = Point { x: 100.0, y: 50.0 };
    const ERASE_BUTTON: Point = Point { x: 300.0, y: 50.0 };
    const SAVE_BUTTON: Point = Point { x: 500.0, y: 50.0 };
    const SPEAK_EN_BUTTON: Point = Point { x: 700.0, y: 50.0 };
    const BELOW_HEADER: Point = Point { x: 640.0, y: 400.0 };

    #[test]
    fn test_single_tick_pass_through_does_not_select() {
        let mut m = machine();
        let events = m.update(GestureState::Pointing, pointing_flags(), Some(DRAW_BUTTON));
        assert!(events.is_empty());
        assert_eq!(m.mode(), PaintMode::Idle);
    }

    #[test]
    fn test_hover_confirm_selects_mode() {
        let mut m = machine();
        let events = select(&mut m, DRAW_BUTTON);
        assert!(events.contains(&IntentEvent::ModeSelected(PaintMode::Draw)));
        assert_eq!(m.mode(), PaintMode::Draw);
    }

    #[test]
    fn test_moving_between_buttons_resets_dwell() {
        let mut m = machine();
        m.update(GestureState::Pointing, pointing_flags(), Some(DRAW_BUTTON));
        m.update(GestureState::Pointing, pointing_flags(), Some(DRAW_BUTTON));
        // Jump to another button on the tick that would have confirmed.
        let events = m.update(GestureState::Pointing, pointing_flags(), Some(ERASE_BUTTON));
        assert!(events.is_empty());
        assert_eq!(m.mode(), PaintMode::Idle);
    }

    #[test]
    fn test_cooldown_blocks_immediate_reselection() {
        let mut m = machine();
        select(&mut m, DRAW_BUTTON);
        // Dwell on erase right away; cooldown must swallow it.
        for _ in 0..HOVER {
            m.update(GestureState::Pointing, pointing_flags(), Some(ERASE_BUTTON));
        }
        assert_eq!(m.mode(), PaintMode::Draw);
        // After the cooldown expires the same dwell works.
        for _ in 0..COOLDOWN {
            m.update(GestureState::Idle, pointing_flags(), None);
        }
        select(&mut m, ERASE_BUTTON);
        assert_eq!(m.mode(), PaintMode::Erase);
    }

    #[test]
    fn test_pointing_in_draw_mode_emits_draw_events() {
        let mut m = machine();
        select(&mut m, DRAW_BUTTON);
        for _ in 0..COOLDOWN {
            m.update(GestureState::Idle, pointing_flags(), None);
        }
        let events = m.update(GestureState::Pointing, pointing_flags(), Some(BELOW_HEADER));
        assert_eq!(events, vec![IntentEvent::DrawTo(BELOW_HEADER)]);
    }

    #[test]
    fn test_stop_after_pointing_seals() {
        let mut m = machine();
        select(&mut m, DRAW_BUTTON);
        for _ in 0..COOLDOWN {
            m.update(GestureState::Idle, pointing_flags(), None);
        }
        m.update(GestureState::Pointing, pointing_flags(), Some(BELOW_HEADER));
        let events = m.update(GestureState::Stop, open_palm(), Some(BELOW_HEADER));
        assert!(events.contains(&IntentEvent::SealStroke));
    }

    #[test]
    fn test_no_hand_holds_mode_and_emits_nothing() {
        let mut m = machine();
        select(&mut m, DRAW_BUTTON);
        let events = m.update(GestureState::NoHand, None, None);
        assert!(events.is_empty() || events == vec![IntentEvent::SealStroke]);
        assert_eq!(m.mode(), PaintMode::Draw);
    }

    #[test]
    fn test_open_palm_clears_only_in_erase_mode() {
        let mut m = machine();
        select(&mut m, ERASE_BUTTON);
        let events = m.update(GestureState::Stop, open_palm(), Some(BELOW_HEADER));
        assert!(events.contains(&IntentEvent::ClearCanvas));

        let mut m = machine();
        select(&mut m, DRAW_BUTTON);
        let events = m.update(GestureState::Stop, open_palm(), Some(BELOW_HEADER));
        assert!(!events.contains(&IntentEvent::ClearCanvas));
    }

    #[test]
    fn test_save_is_momentary() {
        let mut m = machine();
        let events = select(&mut m, SAVE_BUTTON);
        assert!(events.contains(&IntentEvent::SaveCanvas));
        assert_eq!(m.mode(), PaintMode::Idle);
    }

    #[test]
    fn test_speak_selection_emits_language() {
        let mut m = machine();
        let events = select(&mut m, SPEAK_EN_BUTTON);
        assert!(events.contains(&IntentEvent::Speak(Language::English)));
        assert_eq!(m.mode(), PaintMode::Idle);
    }

    #[test]
    fn test_counting_mode_reports_counts() {
        let mut m = machine();
        let events = m.update(
            GestureState::Count(4),
            Some(FingerFlags::new([true, true, true, true, false])),
            Some(BELOW_HEADER),
        );
        assert_eq!(events, vec![IntentEvent::FingersCounted(4)]);
    }
}
