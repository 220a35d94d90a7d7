//! Gesture playback state machine
//!
//! The driver is stepped by the host's render loop; it never schedules
//! itself. Each step writes every channel whose role resolved to a joint and
//! skips the rest. When the session completes, every component the session
//! animated is written back to zero together with the gesture root offset.

use avatar_rig::{Axis, JointId, JointSet, RigTarget, RootLayer, RootOffset};

use super::envelope;
use super::session::GestureSession;

/// Playback state of a [`GestureDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// Never started
    #[default]
    Idle,
    /// A session is playing
    Running,
    /// The last session completed or was cancelled; joints are at rest
    Finished,
}

/// Result of a single [`GestureDriver::step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// No session has been started
    Idle,
    /// A frame was written
    Animating {
        /// Session progress in `[0, 1)`
        progress: f64,
        /// Envelope value
        intensity: f64,
    },
    /// The session just completed and joints were reset
    Completed,
    /// Nothing left to do
    Finished,
}

impl StepOutcome {
    /// Check if this step wrote an animation frame
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Animating { .. })
    }
}

/// Drives one gesture session at a time
#[derive(Debug, Clone, Default)]
pub struct GestureDriver {
    state: DriverState,
    session: Option<GestureSession>,
    joints: JointSet,
    frames: u64,
}

impl GestureDriver {
    /// Create an idle driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Check if a session is playing
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Session currently (or last) played
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Number of frames written for the current session
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start a session
    ///
    /// Starting while another session is still running cancels it first:
    /// its joints are reset and the new session plays from its own start
    /// time. Sessions never layer on top of each other.
    pub fn start<T: RigTarget + ?Sized>(
        &mut self,
        joints: JointSet,
        session: GestureSession,
        target: &mut T,
    ) {
        if self.is_running() {
            if let Some(previous) = &self.session {
                log::warn!(
                    "Restarting gesture: '{}' cancelled after {} frames for '{}'",
                    previous.name,
                    self.frames,
                    session.name
                );
            }
            self.reset(target);
        }

        for channel in &session.channels {
            if joints.get(channel.role).is_none() {
                log::debug!(
                    "Gesture '{}': no joint for {}, channel skipped",
                    session.name,
                    channel.role
                );
            }
        }
        log::debug!(
            "Gesture '{}' started at {:.1}ms for {:.1}ms",
            session.name,
            session.start_ms,
            session.duration_ms
        );

        self.joints = joints;
        self.session = Some(session);
        self.frames = 0;
        self.state = DriverState::Running;
    }

    /// Advance to `now_ms` and write the frame into `target`
    pub fn step<T: RigTarget + ?Sized>(&mut self, now_ms: f64, target: &mut T) -> StepOutcome {
        match self.state {
            DriverState::Idle => return StepOutcome::Idle,
            DriverState::Finished => return StepOutcome::Finished,
            DriverState::Running => {}
        }
        let Some(session) = &self.session else {
            self.state = DriverState::Idle;
            return StepOutcome::Idle;
        };

        let elapsed_ms = session.elapsed_ms(now_ms);
        let progress = envelope::progress(elapsed_ms, session.duration_ms);

        if progress >= 1.0 {
            log::debug!(
                "Gesture '{}' completed after {} frames",
                session.name,
                self.frames
            );
            self.reset(target);
            self.state = DriverState::Finished;
            return StepOutcome::Completed;
        }

        let intensity = envelope::intensity(progress);
        let elapsed_s = elapsed_ms / 1000.0;

        for channel in &session.channels {
            if let Some(joint) = self.joints.get(channel.role) {
                target.set_rotation(joint, channel.axis, channel.angle(elapsed_s, intensity));
            }
        }
        if let Some(root_motion) = &session.root_motion {
            target.set_root_offset(RootLayer::Gesture, root_motion.offset(elapsed_s, intensity));
        }

        self.frames += 1;
        log::trace!(
            "Gesture '{}' frame {}: progress {:.4}, intensity {:.4}",
            session.name,
            self.frames,
            progress,
            intensity
        );

        StepOutcome::Animating {
            progress,
            intensity,
        }
    }

    /// Stop the running session and reset its joints
    ///
    /// Returns false if nothing was running.
    pub fn cancel<T: RigTarget + ?Sized>(&mut self, target: &mut T) -> bool {
        if !self.is_running() {
            return false;
        }
        self.reset(target);
        self.state = DriverState::Finished;
        true
    }

    /// Joint components the current session writes, without duplicates
    pub fn animated_components(&self) -> Vec<(JointId, Axis)> {
        let mut components: Vec<(JointId, Axis)> = Vec::new();
        let Some(session) = &self.session else {
            return components;
        };
        for channel in &session.channels {
            if let Some(joint) = self.joints.get(channel.role)
                && !components.contains(&(joint, channel.axis))
            {
                components.push((joint, channel.axis));
            }
        }
        components
    }

    fn reset<T: RigTarget + ?Sized>(&self, target: &mut T) {
        for (joint, axis) in self.animated_components() {
            target.set_rotation(joint, axis, 0.0);
        }
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.root_motion.is_some())
        {
            target.set_root_offset(RootLayer::Gesture, RootOffset::ZERO);
        }
    }
}
