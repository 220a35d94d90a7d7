//! Built-in gestures

use std::fmt;
use std::str::FromStr;

use avatar_rig::{Axis, JointRole};

use super::session::{Channel, GestureSession, RootMotion};
use crate::error::MotionError;

/// Built-in gesture presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "lowercase"))]
pub enum GesturePreset {
    /// Fast chicken-wing flapping with body bob
    #[default]
    Flap,
    /// Right-hand wave
    Wave,
    /// Slow two-armed greeting
    Greet,
}

impl GesturePreset {
    /// All presets
    pub const ALL: [Self; 3] = [Self::Flap, Self::Wave, Self::Greet];

    /// Preset name
    pub fn name(self) -> &'static str {
        match self {
            Self::Flap => "flap",
            Self::Wave => "wave",
            Self::Greet => "greet",
        }
    }

    /// One-line description
    pub fn description(self) -> &'static str {
        match self {
            Self::Flap => "Chicken-wing flapping of both arms with body bob and sway",
            Self::Wave => "Right shoulder wave with a secondary elbow swing",
            Self::Greet => "Slow two-armed opening gesture with a gentle sway",
        }
    }

    /// Session length in milliseconds
    pub fn duration_ms(self) -> f64 {
        match self {
            Self::Flap => 4000.0,
            Self::Wave => 3000.0,
            Self::Greet => 3500.0,
        }
    }

    /// Build a session starting at `start_ms`
    pub fn session(self, start_ms: f64) -> GestureSession {
        let session = GestureSession {
            name: self.name().to_string(),
            start_ms,
            duration_ms: self.duration_ms(),
            channels: Vec::new(),
            root_motion: None,
        };

        match self {
            Self::Flap => {
                const SPEED: f32 = 8.0;
                session
                    .with_mirrored(Channel::new(JointRole::RightArm, Axis::Z, 1.2, SPEED))
                    .with_channel(
                        Channel::new(JointRole::RightArm, Axis::X, 0.15, SPEED).with_harmonic(2.0),
                    )
                    .with_channel(
                        Channel::new(JointRole::LeftArm, Axis::X, 0.15, SPEED).with_harmonic(2.0),
                    )
                    .with_mirrored(Channel::new(JointRole::RightForearm, Axis::Z, 0.8, SPEED))
                    .with_root_motion(RootMotion {
                        bob_amplitude: 0.02,
                        bob_frequency: SPEED,
                        sway_amplitude: 0.1,
                        sway_rate: 4.0,
                    })
            }
            Self::Wave => session
                .with_channel(Channel::new(JointRole::RightArm, Axis::Z, 0.8, 4.0))
                .with_channel(
                    Channel::new(JointRole::RightForearm, Axis::X, 0.4, 4.0).with_harmonic(2.0),
                )
                .with_root_motion(RootMotion {
                    bob_amplitude: 0.0,
                    bob_frequency: 0.0,
                    sway_amplitude: 0.05,
                    sway_rate: 2.0,
                }),
            Self::Greet => session
                .with_mirrored(Channel::new(JointRole::RightArm, Axis::Z, 0.5, 1.0))
                .with_mirrored(
                    Channel::new(JointRole::RightForearm, Axis::X, 0.3, 1.0).with_harmonic(2.0),
                )
                .with_root_motion(RootMotion {
                    bob_amplitude: 0.01,
                    bob_frequency: 1.0,
                    sway_amplitude: 0.04,
                    sway_rate: 1.5,
                }),
        }
    }
}

impl fmt::Display for GesturePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GesturePreset {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MotionError::UnknownPreset(s.to_string()))
    }
}
