//! Stage: the context object wiring a loaded avatar to its gestures
//!
//! A stage owns everything that has to survive between frames: the skeleton
//! pose, the resolved joints, the gesture driver, the speech bubble and the
//! "intro has played" flag. The host calls [`AvatarStage::frame`] once per
//! display refresh and forwards pointer hits from its own raycaster.

use std::path::Path;

use avatar_rig::{JointSet, ModelHandle, RigTarget, RootLayer, Skeleton, derive_joints, load_model};
use glam::Vec2;

use crate::error::{MotionError, Result, StageError};
use crate::gesture::{GestureDriver, GesturePreset, StepOutcome};
use crate::idle::IdleMotion;
use crate::overlay::{BubbleStyle, IntroScript, SpeechOverlay};

/// Stage configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct StageConfig {
    /// Uniform scale applied to the avatar root
    pub avatar_scale: f32,
    /// Delay between model load and the intro
    pub intro_delay_ms: f64,
    /// Gesture played by the intro and by click replays
    pub gesture: GesturePreset,
    /// Speech bubble messages of the intro
    pub intro: IntroScript,
    /// Message flashed when the avatar is clicked
    pub click_message: String,
    /// How long the click message stays up
    pub click_hold_ms: f64,
    /// Whether a click also restarts the gesture
    pub click_replays_gesture: bool,
    /// Idle breathing after the intro (None disables it)
    pub idle: Option<IdleMotion>,
    /// Speech bubble style
    pub bubble: BubbleStyle,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            avatar_scale: 1.3,
            intro_delay_ms: 500.0,
            gesture: GesturePreset::Flap,
            intro: IntroScript::default(),
            click_message: "BAWK! 🐓".into(),
            click_hold_ms: 1000.0,
            click_replays_gesture: false,
            idle: Some(IdleMotion::default()),
            bubble: BubbleStyle::default(),
        }
    }
}

impl StageConfig {
    /// Check values that would make playback meaningless
    pub fn validate(&self) -> Result<()> {
        if !(self.avatar_scale.is_finite() && self.avatar_scale > 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "avatar_scale must be positive, got {}",
                self.avatar_scale
            )));
        }
        if !(self.intro_delay_ms.is_finite() && self.intro_delay_ms >= 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "intro_delay_ms must not be negative, got {}",
                self.intro_delay_ms
            )));
        }
        if !(self.intro.interval_ms.is_finite() && self.intro.interval_ms > 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "intro.interval_ms must be positive, got {}",
                self.intro.interval_ms
            )));
        }
        if !(self.intro.linger_ms.is_finite() && self.intro.linger_ms >= 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "intro.linger_ms must not be negative, got {}",
                self.intro.linger_ms
            )));
        }
        if let Some(idle) = &self.idle
            && !(idle.amplitude.is_finite() && idle.rate.is_finite())
        {
            return Err(MotionError::InvalidConfig(format!(
                "idle motion must be finite, got amplitude {} and rate {}",
                idle.amplitude, idle.rate
            )));
        }
        if !(self.click_hold_ms.is_finite() && self.click_hold_ms >= 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "click_hold_ms must not be negative, got {}",
                self.click_hold_ms
            )));
        }
        Ok(())
    }
}

/// Cursor the host should show over the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "lowercase"))]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Gesture driver outcome
    pub gesture: StepOutcome,
    /// Cursor hint from the hover test
    pub cursor: Cursor,
    /// Whether the intro started on this frame
    pub intro_started: bool,
}

/// A loaded avatar with its gesture and speech bubble state
#[derive(Debug, Clone)]
pub struct AvatarStage {
    config: StageConfig,
    skeleton: Skeleton,
    joints: JointSet,
    driver: GestureDriver,
    overlay: SpeechOverlay,
    has_played: bool,
    intro_due_ms: Option<f64>,
    origin_ms: Option<f64>,
}

impl AvatarStage {
    /// Build a stage around an already loaded model
    ///
    /// The configuration is validated first; a rejected config never
    /// reaches the driver or the speech bubble.
    pub fn new(model: &ModelHandle, config: StageConfig) -> Result<Self> {
        config.validate()?;
        let joints = derive_joints(model);
        let skeleton = Skeleton::from_model(model, config.avatar_scale);
        let overlay = SpeechOverlay::new(config.bubble.clone());
        Ok(Self {
            config,
            skeleton,
            joints,
            driver: GestureDriver::new(),
            overlay,
            has_played: false,
            intro_due_ms: None,
            origin_ms: None,
        })
    }

    /// Load a model from disk and build a stage around it
    pub fn load<P: AsRef<Path>>(
        path: P,
        config: StageConfig,
    ) -> std::result::Result<Self, StageError> {
        config.validate()?;
        let model = load_model(path)?;
        Ok(Self::new(&model, config)?)
    }

    /// Schedule the intro after the configured delay
    pub fn arm_intro(&mut self, now_ms: f64) {
        if self.has_played {
            return;
        }
        self.intro_due_ms = Some(now_ms + self.config.intro_delay_ms);
    }

    /// Play the intro now unless it already played
    pub fn play_intro(&mut self, now_ms: f64) -> bool {
        if self.has_played {
            log::debug!("Intro already played");
            return false;
        }
        self.has_played = true;
        self.intro_due_ms = None;
        self.overlay.play_script(&self.config.intro, now_ms);
        self.play_gesture(self.config.gesture, now_ms);
        true
    }

    /// Start a gesture now, cancelling any gesture still running
    pub fn play_gesture(&mut self, preset: GesturePreset, now_ms: f64) {
        self.driver
            .start(self.joints, preset.session(now_ms), &mut self.skeleton);
    }

    /// Advance the stage to `now_ms`
    ///
    /// `hovered` is the host's raycast result for the pointer this frame.
    pub fn frame(&mut self, now_ms: f64, hovered: bool) -> FrameReport {
        let origin_ms = *self.origin_ms.get_or_insert(now_ms);

        let mut intro_started = false;
        if self.intro_due_ms.is_some_and(|due| now_ms >= due) {
            intro_started = self.play_intro(now_ms);
        }

        let gesture = self.driver.step(now_ms, &mut self.skeleton);

        if self.has_played
            && let Some(idle) = &self.config.idle
        {
            let offset = idle.offset((now_ms - origin_ms) / 1000.0);
            self.skeleton.set_root_offset(RootLayer::Idle, offset);
        }

        self.overlay.tick(now_ms);

        let cursor = if self.has_played && hovered {
            Cursor::Pointer
        } else {
            Cursor::Default
        };

        FrameReport {
            gesture,
            cursor,
            intro_started,
        }
    }

    /// Handle a click; `hit` is the host's raycast result
    ///
    /// Returns true if the click was handled.
    pub fn click(&mut self, now_ms: f64, hit: bool) -> bool {
        if !self.has_played || !hit {
            return false;
        }
        self.overlay
            .flash(&self.config.click_message, now_ms, self.config.click_hold_ms);
        if self.config.click_replays_gesture {
            self.play_gesture(self.config.gesture, now_ms);
        }
        true
    }

    /// Whether the intro has played
    pub fn has_played(&self) -> bool {
        self.has_played
    }

    /// Configuration
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Current skeleton pose
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Joints resolved from the model
    pub fn joints(&self) -> &JointSet {
        &self.joints
    }

    /// Gesture driver
    pub fn driver(&self) -> &GestureDriver {
        &self.driver
    }

    /// Speech bubble
    pub fn overlay(&self) -> &SpeechOverlay {
        &self.overlay
    }
}

/// Convert a pointer position in pixels to normalized device coordinates
///
/// x grows to the right and y grows upwards, both in `[-1, 1]`.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}
