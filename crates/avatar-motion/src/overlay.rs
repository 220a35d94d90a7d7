//! Speech bubble timing
//!
//! The host renders the bubble (a styled, fixed-position text panel); this
//! module decides what it shows and when. Transitions follow the bubble's
//! CSS-style fade: `show` makes it visible at once and settles it 50ms later,
//! `hide` fades it out and removes it from display 300ms later.

/// Delay before a shown bubble settles into its resting transform
pub const REVEAL_DELAY_MS: f64 = 50.0;

/// Delay before a hidden bubble is removed from display
pub const REMOVE_DELAY_MS: f64 = 300.0;

/// Transform of the bubble, animated by the host's transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BubbleTransform {
    /// Slightly below and shrunk, before a reveal
    #[default]
    Below,
    /// Resting position
    Rest,
    /// Slightly above and shrunk, while leaving
    Above,
}

impl BubbleTransform {
    /// CSS transform value
    pub fn css(self) -> &'static str {
        match self {
            Self::Below => "translateY(20px) scale(0.8)",
            Self::Rest => "translateY(0) scale(1)",
            Self::Above => "translateY(-20px) scale(0.8)",
        }
    }
}

/// What the host should currently render
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BubbleState {
    /// Bubble text
    pub text: String,
    /// Whether the bubble takes part in layout (`display: block`)
    pub displayed: bool,
    /// Target opacity, 0.0 or 1.0
    pub opacity: f32,
    /// Target transform
    pub transform: BubbleTransform,
}

impl BubbleState {
    /// Check if the bubble is displayed and opaque
    pub fn is_visible(&self) -> bool {
        self.displayed && self.opacity > 0.0
    }
}

/// Static style of the bubble panel
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct BubbleStyle {
    /// Distance from the top of the viewport
    pub top: String,
    /// Distance from the right of the viewport
    pub right: String,
    /// Inner padding
    pub padding: String,
    /// Corner radius
    pub border_radius: String,
    /// Background fill, usually a gradient
    pub background: String,
    /// Text color
    pub color: String,
    /// Font weight
    pub font_weight: String,
    /// Font size
    pub font_size: String,
    /// Font family list
    pub font_family: String,
    /// Drop shadow
    pub box_shadow: String,
    /// Maximum panel width before text wraps
    pub max_width: String,
    /// Text alignment
    pub text_align: String,
    /// Stacking order above the canvas
    pub z_index: i32,
    /// Transition applied to opacity and transform changes
    pub transition: String,
}

impl Default for BubbleStyle {
    fn default() -> Self {
        Self {
            top: "15%".into(),
            right: "10%".into(),
            padding: "15px 25px".into(),
            border_radius: "25px".into(),
            background: "linear-gradient(135deg, #ff6b6b 0%, #feca57 100%)".into(),
            color: "white".into(),
            font_weight: "bold".into(),
            font_size: "22px".into(),
            font_family: "Comic Sans MS, cursive".into(),
            box_shadow: "0 8px 32px rgba(0,0,0,0.3)".into(),
            max_width: "250px".into(),
            text_align: "center".into(),
            z_index: 1000,
            transition: "all 0.3s cubic-bezier(0.68, -0.55, 0.265, 1.55)".into(),
        }
    }
}

impl BubbleStyle {
    /// Inline CSS for the panel in a given state
    pub fn to_css(&self, state: &BubbleState) -> String {
        format!(
            "position: absolute; top: {}; right: {}; padding: {}; border-radius: {}; \
             background: {}; color: {}; font-weight: {}; font-size: {}; box-shadow: {}; \
             z-index: {}; transition: {}; max-width: {}; text-align: {}; font-family: {}; \
             display: {}; opacity: {}; transform: {};",
            self.top,
            self.right,
            self.padding,
            self.border_radius,
            self.background,
            self.color,
            self.font_weight,
            self.font_size,
            self.box_shadow,
            self.z_index,
            self.transition,
            self.max_width,
            self.text_align,
            self.font_family,
            if state.displayed { "block" } else { "none" },
            state.opacity,
            state.transform.css()
        )
    }
}

/// Messages shown in sequence when the intro plays
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct IntroScript {
    /// Messages in order
    pub messages: Vec<String>,
    /// Time between message changes
    pub interval_ms: f64,
    /// How long the last message lingers once the sequence has run out
    pub linger_ms: f64,
}

impl Default for IntroScript {
    fn default() -> Self {
        Self {
            messages: vec![
                "QUACK QUACK! 🐔".into(),
                "BAWK BAWK! 🐓".into(),
                "CLUCK CLUCK! 🐔".into(),
                "QUACK! 🐣".into(),
            ],
            interval_ms: 800.0,
            linger_ms: 1500.0,
        }
    }
}

impl IntroScript {
    /// Message showing `elapsed_ms` after the script started
    pub fn message_at(&self, elapsed_ms: f64) -> Option<&str> {
        if elapsed_ms < 0.0 || elapsed_ms >= self.hide_at_ms() {
            return None;
        }
        let index = if self.interval_ms > 0.0 {
            (elapsed_ms / self.interval_ms) as usize
        } else {
            0
        };
        self.messages
            .get(index.min(self.messages.len().saturating_sub(1)))
            .map(String::as_str)
    }

    /// Offset at which the bubble starts hiding
    ///
    /// The interval ticks once past the last message before it stops.
    pub fn hide_at_ms(&self) -> f64 {
        self.messages.len() as f64 * self.interval_ms + self.linger_ms
    }
}

#[derive(Debug, Clone, PartialEq)]
enum OverlayEvent {
    Show(String),
    Hide,
    Reveal { generation: u64 },
    Remove { generation: u64 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    at_ms: f64,
    seq: u64,
    event: OverlayEvent,
}

/// Speech bubble state machine driven by host timestamps
#[derive(Debug, Clone, Default)]
pub struct SpeechOverlay {
    style: BubbleStyle,
    state: BubbleState,
    pending: Vec<Scheduled>,
    generation: u64,
    next_seq: u64,
}

impl SpeechOverlay {
    /// Create a hidden overlay
    pub fn new(style: BubbleStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Current render state
    pub fn state(&self) -> &BubbleState {
        &self.state
    }

    /// Panel style
    pub fn style(&self) -> &BubbleStyle {
        &self.style
    }

    /// Inline CSS for the current state
    pub fn css(&self) -> String {
        self.style.to_css(&self.state)
    }

    /// Number of timers still pending
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Show a message now
    pub fn show(&mut self, text: &str, now_ms: f64) {
        log::debug!("Speech bubble: {text}");
        self.generation += 1;
        self.state.text = text.to_string();
        self.state.displayed = true;
        self.schedule(
            now_ms + REVEAL_DELAY_MS,
            OverlayEvent::Reveal {
                generation: self.generation,
            },
        );
    }

    /// Start hiding the bubble now
    pub fn hide(&mut self, now_ms: f64) {
        self.generation += 1;
        self.state.opacity = 0.0;
        self.state.transform = BubbleTransform::Above;
        self.schedule(
            now_ms + REMOVE_DELAY_MS,
            OverlayEvent::Remove {
                generation: self.generation,
            },
        );
    }

    /// Show a message and hide it after `hold_ms`
    pub fn flash(&mut self, text: &str, now_ms: f64, hold_ms: f64) {
        self.show(text, now_ms);
        self.schedule(now_ms + hold_ms, OverlayEvent::Hide);
    }

    /// Play an intro script starting now
    pub fn play_script(&mut self, script: &IntroScript, now_ms: f64) {
        let Some(first) = script.messages.first() else {
            return;
        };
        self.show(first, now_ms);
        for (index, message) in script.messages.iter().enumerate().skip(1) {
            self.schedule(
                now_ms + index as f64 * script.interval_ms,
                OverlayEvent::Show(message.clone()),
            );
        }
        self.schedule(now_ms + script.hide_at_ms(), OverlayEvent::Hide);
    }

    /// Fire every timer due at or before `now_ms`
    pub fn tick(&mut self, now_ms: f64) {
        while let Some(position) = self.next_due(now_ms) {
            let Scheduled { at_ms, event, .. } = self.pending.swap_remove(position);
            match event {
                OverlayEvent::Show(text) => self.show(&text, at_ms),
                OverlayEvent::Hide => self.hide(at_ms),
                OverlayEvent::Reveal { generation } if generation == self.generation => {
                    self.state.opacity = 1.0;
                    self.state.transform = BubbleTransform::Rest;
                }
                OverlayEvent::Remove { generation } if generation == self.generation => {
                    self.state.displayed = false;
                    self.state.transform = BubbleTransform::Below;
                }
                OverlayEvent::Reveal { .. } | OverlayEvent::Remove { .. } => {
                    log::trace!("Dropped stale bubble transition");
                }
            }
        }
    }

    fn schedule(&mut self, at_ms: f64, event: OverlayEvent) {
        self.pending.push(Scheduled {
            at_ms,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    fn next_due(&self, now_ms: f64) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.at_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.at_ms.total_cmp(&b.at_ms).then(a.seq.cmp(&b.seq)))
            .map(|(position, _)| position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_then_reveal() {
        let mut overlay = SpeechOverlay::default();
        overlay.show("Hello!", 0.0);
        assert!(overlay.state().displayed);
        assert_eq!(overlay.state().opacity, 0.0);
        assert_eq!(overlay.state().transform, BubbleTransform::Below);

        overlay.tick(49.0);
        assert!(!overlay.state().is_visible());

        overlay.tick(50.0);
        assert!(overlay.state().is_visible());
        assert_eq!(overlay.state().transform, BubbleTransform::Rest);
        assert_eq!(overlay.pending(), 0);
    }

    #[test]
    fn test_hide_then_remove() {
        let mut overlay = SpeechOverlay::default();
        overlay.show("Hello!", 0.0);
        overlay.tick(100.0);
        overlay.hide(100.0);
        assert!(overlay.state().displayed);
        assert_eq!(overlay.state().transform, BubbleTransform::Above);

        overlay.tick(399.0);
        assert!(overlay.state().displayed);
        overlay.tick(400.0);
        assert!(!overlay.state().displayed);
    }

    #[test]
    fn test_show_during_hide_keeps_bubble() {
        let mut overlay = SpeechOverlay::default();
        overlay.show("one", 0.0);
        overlay.tick(60.0);
        overlay.hide(100.0);
        overlay.show("two", 200.0);

        // The removal scheduled by the hide is stale by now
        overlay.tick(500.0);
        assert!(overlay.state().is_visible());
        assert_eq!(overlay.state().text, "two");
    }

    #[test]
    fn test_intro_script_schedule() {
        let script = IntroScript::default();
        let mut overlay = SpeechOverlay::default();
        overlay.play_script(&script, 1000.0);

        overlay.tick(1050.0);
        assert_eq!(overlay.state().text, "QUACK QUACK! 🐔");
        overlay.tick(1800.0);
        assert_eq!(overlay.state().text, "BAWK BAWK! 🐓");
        overlay.tick(2600.0);
        assert_eq!(overlay.state().text, "CLUCK CLUCK! 🐔");
        overlay.tick(3400.0);
        assert_eq!(overlay.state().text, "QUACK! 🐣");
        assert!(overlay.state().is_visible());

        // 4 * 800 + 1500 after the start
        overlay.tick(5699.0);
        assert!(overlay.state().is_visible());
        overlay.tick(5700.0);
        assert!(!overlay.state().is_visible());
        assert!(overlay.state().displayed);
        overlay.tick(6000.0);
        assert!(!overlay.state().displayed);
        assert_eq!(overlay.pending(), 0);
    }

    #[test]
    fn test_tick_catches_up_in_order() {
        let script = IntroScript::default();
        let mut overlay = SpeechOverlay::default();
        overlay.play_script(&script, 0.0);

        // One late tick applies every due timer in time order
        overlay.tick(10_000.0);
        assert!(!overlay.state().displayed);
        assert_eq!(overlay.state().text, "QUACK! 🐣");
        assert_eq!(overlay.pending(), 0);
    }

    #[test]
    fn test_empty_script_is_noop() {
        let script = IntroScript {
            messages: Vec::new(),
            ..IntroScript::default()
        };
        let mut overlay = SpeechOverlay::default();
        overlay.play_script(&script, 0.0);
        assert_eq!(overlay.pending(), 0);
        assert!(!overlay.state().displayed);
    }

    #[test]
    fn test_flash() {
        let mut overlay = SpeechOverlay::default();
        overlay.flash("BAWK! 🐓", 0.0, 1000.0);
        overlay.tick(500.0);
        assert!(overlay.state().is_visible());
        overlay.tick(1000.0);
        assert!(!overlay.state().is_visible());
        overlay.tick(1300.0);
        assert!(!overlay.state().displayed);
    }

    #[test]
    fn test_message_at() {
        let script = IntroScript::default();
        assert_eq!(script.message_at(-1.0), None);
        assert_eq!(script.message_at(0.0), Some("QUACK QUACK! 🐔"));
        assert_eq!(script.message_at(1700.0), Some("CLUCK CLUCK! 🐔"));
        assert_eq!(script.message_at(4000.0), Some("QUACK! 🐣"));
        assert_eq!(script.message_at(4700.0), None);
    }

    #[test]
    fn test_css_reflects_state() {
        let mut overlay = SpeechOverlay::default();
        assert!(overlay.css().contains("display: none"));
        overlay.show("hi", 0.0);
        overlay.tick(50.0);
        let css = overlay.css();
        assert!(css.contains("display: block"));
        assert!(css.contains("opacity: 1"));
        assert!(css.contains("top: 15%"));
    }
}
