//! Idle breathing once the intro has played

use avatar_rig::RootOffset;

/// Gentle vertical bob of the avatar root
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(default))]
pub struct IdleMotion {
    /// Bob amplitude
    pub amplitude: f32,
    /// Bob rate in radians per second
    pub rate: f32,
}

impl Default for IdleMotion {
    fn default() -> Self {
        Self {
            amplitude: 0.001,
            rate: 1.5,
        }
    }
}

impl IdleMotion {
    /// Root offset at `time_s` seconds of stage time
    pub fn offset(&self, time_s: f64) -> RootOffset {
        RootOffset {
            bob: ((time_s * f64::from(self.rate)).sin() * f64::from(self.amplitude)) as f32,
            sway: 0.0,
        }
    }
}
