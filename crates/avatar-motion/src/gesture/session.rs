//! Gesture sessions and their channels

use std::f64::consts::PI;

use avatar_rig::{Axis, JointRole, RootOffset};

use super::envelope;
use crate::error::{MotionError, Result};

/// One sinusoidal rotation written into a joint axis
///
/// `angle = sin(t * frequency * π * harmonic + phase) * amplitude * sign * intensity`
/// with `t` in seconds since the session started.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    /// Joint role the channel drives
    pub role: JointRole,
    /// Rotation axis written
    pub axis: Axis,
    /// Peak angle in radians
    pub amplitude: f32,
    /// Oscillation speed (multiplied by π)
    pub frequency: f32,
    /// Rate multiplier, 2.0 for secondary motion
    pub harmonic: f32,
    /// Phase offset in radians
    pub phase: f32,
    /// Direction, +1.0 or -1.0
    pub sign: f32,
}

impl Channel {
    /// Create a primary channel
    pub fn new(role: JointRole, axis: Axis, amplitude: f32, frequency: f32) -> Self {
        Self {
            role,
            axis,
            amplitude,
            frequency,
            harmonic: 1.0,
            phase: 0.0,
            sign: 1.0,
        }
    }

    /// Set the rate multiplier
    #[must_use]
    pub fn with_harmonic(mut self, harmonic: f32) -> Self {
        self.harmonic = harmonic;
        self
    }

    /// Set the phase offset
    #[must_use]
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Flip the direction of the channel
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.sign = -self.sign;
        self
    }

    /// Same channel on the other side of the body, moving opposite
    #[must_use]
    pub fn mirrored(self) -> Self {
        Self {
            role: self.role.mirrored(),
            ..self.inverted()
        }
    }

    /// Angle at `elapsed_s` seconds under the given envelope intensity
    pub fn angle(&self, elapsed_s: f64, intensity: f64) -> f32 {
        let wave = (elapsed_s * f64::from(self.frequency) * PI * f64::from(self.harmonic)
            + f64::from(self.phase))
        .sin();
        (wave * f64::from(self.amplitude) * f64::from(self.sign) * intensity) as f32
    }
}

/// Root bob and sway played alongside the joint channels
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct RootMotion {
    /// Vertical bob amplitude
    pub bob_amplitude: f32,
    /// Bob speed (multiplied by π)
    pub bob_frequency: f32,
    /// Yaw sway amplitude in radians
    pub sway_amplitude: f32,
    /// Sway rate in radians per second
    pub sway_rate: f32,
}

impl RootMotion {
    /// Root offset at `elapsed_s` seconds under the given intensity
    pub fn offset(&self, elapsed_s: f64, intensity: f64) -> RootOffset {
        let bob = (elapsed_s * f64::from(self.bob_frequency) * PI).sin()
            * f64::from(self.bob_amplitude)
            * intensity;
        let sway =
            (elapsed_s * f64::from(self.sway_rate)).sin() * f64::from(self.sway_amplitude) * intensity;
        RootOffset {
            bob: bob as f32,
            sway: sway as f32,
        }
    }
}

/// One bounded playback of a procedural gesture
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct GestureSession {
    /// Name used in logs
    pub name: String,
    /// Start timestamp in milliseconds
    pub start_ms: f64,
    /// Duration in milliseconds
    pub duration_ms: f64,
    /// Joint channels
    pub channels: Vec<Channel>,
    /// Optional root bob/sway
    pub root_motion: Option<RootMotion>,
}

impl GestureSession {
    /// Create an empty session
    pub fn new(name: impl Into<String>, start_ms: f64, duration_ms: f64) -> Result<Self> {
        if !start_ms.is_finite() {
            return Err(MotionError::InvalidSession(format!(
                "start time must be finite, got {start_ms}"
            )));
        }
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(MotionError::InvalidSession(format!(
                "duration must be positive, got {duration_ms}ms"
            )));
        }
        Ok(Self {
            name: name.into(),
            start_ms,
            duration_ms,
            channels: Vec::new(),
            root_motion: None,
        })
    }

    /// Add a channel
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Add a channel and its mirror on the other side
    #[must_use]
    pub fn with_mirrored(self, channel: Channel) -> Self {
        self.with_channel(channel).with_channel(channel.mirrored())
    }

    /// Set the root motion
    #[must_use]
    pub fn with_root_motion(mut self, root_motion: RootMotion) -> Self {
        self.root_motion = Some(root_motion);
        self
    }

    /// Milliseconds elapsed at `now_ms`
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.start_ms
    }

    /// Progress at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f64 {
        envelope::progress(self.elapsed_ms(now_ms), self.duration_ms)
    }

    /// Timestamp at which the session completes
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// The same session started at a different time
    #[must_use]
    pub fn restarted_at(&self, start_ms: f64) -> Self {
        Self {
            start_ms,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_angle_matches_reference_frame() {
        let channel = Channel::new(JointRole::RightArm, Axis::Z, 0.8, 4.0);
        let intensity = envelope::intensity(125.0 / 3000.0);
        let angle = channel.angle(0.125, intensity);
        assert!((angle - 0.104_42).abs() < 1e-4, "angle was {angle}");
    }

    #[test]
    fn test_channel_harmonic_and_sign() {
        let channel = Channel::new(JointRole::RightArm, Axis::X, 0.15, 8.0).with_harmonic(2.0);
        // sin(0.03125 * 8π * 2) = sin(π/2) = 1
        assert!((channel.angle(0.031_25, 1.0) - 0.15).abs() < 1e-6);
        assert!((channel.inverted().angle(0.031_25, 1.0) + 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_mirrored_channel() {
        let channel = Channel::new(JointRole::RightForearm, Axis::Z, 0.8, 8.0);
        let mirror = channel.mirrored();
        assert_eq!(mirror.role, JointRole::LeftForearm);
        assert_eq!(mirror.sign, -1.0);
        assert!((channel.angle(0.05, 0.7) + mirror.angle(0.05, 0.7)).abs() < 1e-6);
    }

    #[test]
    fn test_root_motion_offset() {
        let motion = RootMotion {
            bob_amplitude: 0.02,
            bob_frequency: 8.0,
            sway_amplitude: 0.1,
            sway_rate: 4.0,
        };
        let offset = motion.offset(0.0625, 1.0);
        // sin(0.0625 * 8π) = sin(π/2) = 1, sin(0.25) ≈ 0.2474
        assert!((offset.bob - 0.02).abs() < 1e-6);
        assert!((offset.sway - 0.024_74).abs() < 1e-4);
        assert_eq!(motion.offset(0.0625, 0.0), RootOffset::ZERO);
    }

    #[test]
    fn test_session_validation() {
        assert!(GestureSession::new("wave", 0.0, 3000.0).is_ok());
        assert!(matches!(
            GestureSession::new("wave", 0.0, 0.0),
            Err(MotionError::InvalidSession(_))
        ));
        assert!(GestureSession::new("wave", 0.0, f64::NAN).is_err());
        assert!(GestureSession::new("wave", f64::INFINITY, 100.0).is_err());
    }

    #[test]
    fn test_session_timing() {
        let session = GestureSession::new("wave", 1000.0, 3000.0).unwrap();
        assert!((session.progress(2500.0) - 0.5).abs() < 1e-12);
        assert!((session.end_ms() - 4000.0).abs() < 1e-12);
        assert!((session.restarted_at(0.0).end_ms() - 3000.0).abs() < 1e-12);
    }
}
