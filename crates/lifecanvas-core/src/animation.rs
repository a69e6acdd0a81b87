#![forbid(unsafe_code)]

//! Play/pause state machine for the frame cycle.
//!
//! The host calls back once per display refresh for each request made here.
//! [`Animator`] tracks the single outstanding request: `pause` cancels it
//! synchronously, and a callback that arrives without a matching request is
//! rejected by [`Animator::begin_frame`], so a late host callback can never
//! resurrect a paused animation.

use crate::error::LifeError;
use crate::host::{FrameHandle, FrameScheduler};

/// Whether frame requests are being scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationState {
    #[default]
    Paused,
    Running,
}

impl AnimationState {
    /// Label for the play/pause control: the action a click would take.
    #[must_use]
    pub const fn control_label(self) -> &'static str {
        match self {
            Self::Paused => "▶",
            Self::Running => "⏸",
        }
    }
}

/// Frame-cycle scheduler state.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    state: AnimationState,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl Animator {
    /// A paused animator with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> AnimationState {
        self.state
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Running)
    }

    /// The outstanding frame request, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frame cycles accepted so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Switch to `Running` and request the first frame.
    ///
    /// Returns `Ok(false)` when already running. If the host refuses the
    /// request the animator stays paused.
    pub fn play<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> Result<bool, LifeError> {
        if self.is_running() {
            return Ok(false);
        }
        self.state = AnimationState::Running;
        self.arm(scheduler)?;
        Ok(true)
    }

    /// Switch to `Paused` and cancel the outstanding request.
    ///
    /// Returns `false` when already paused.
    pub fn pause<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = AnimationState::Paused;
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        true
    }

    /// Accept a host frame callback. Returns whether the cycle should run.
    ///
    /// Consumes the outstanding request; the caller re-arms with
    /// [`Animator::end_frame`] once the cycle completes.
    pub fn begin_frame(&mut self) -> bool {
        match (self.state, self.pending.take()) {
            (AnimationState::Running, Some(_)) => {
                self.frames += 1;
                true
            }
            _ => false,
        }
    }

    /// Request the next frame if still running.
    pub fn end_frame<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> Result<(), LifeError> {
        if self.is_running() && self.pending.is_none() {
            self.arm(scheduler)?;
        }
        Ok(())
    }

    /// Replace a request whose callback the host fired but could not deliver.
    ///
    /// The replaced handle is cancelled, so at most one request stays
    /// outstanding. Returns `Ok(false)` without requesting anything while
    /// paused.
    pub fn rearm_missed<F: FrameScheduler + ?Sized>(
        &mut self,
        scheduler: &mut F,
    ) -> Result<bool, LifeError> {
        if !self.is_running() {
            return Ok(false);
        }
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.arm(scheduler)?;
        Ok(true)
    }

    fn arm<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> Result<(), LifeError> {
        debug_assert!(self.pending.is_none(), "frame already requested");
        match scheduler.request_frame() {
            Ok(handle) => {
                self.pending = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.state = AnimationState::Paused;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::ManualScheduler;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_paused_with_nothing_pending() {
        let anim = Animator::new();
        assert_eq!(anim.state(), AnimationState::Paused);
        assert_eq!(anim.pending(), None);
    }

    #[test]
    fn play_requests_exactly_one_frame() {
        let mut sched = ManualScheduler::new();
        let mut anim = Animator::new();
        assert!(anim.play(&mut sched).unwrap());
        assert!(!anim.play(&mut sched).unwrap());
        assert_eq!(sched.requested(), 1);
        assert_eq!(anim.pending(), sched.pending());
    }

    #[test]
    fn pause_cancels_pending_request() {
        let mut sched = ManualScheduler::new();
        let mut anim = Animator::new();
        anim.play(&mut sched).unwrap();
        let handle = anim.pending().unwrap();

        assert!(anim.pause(&mut sched));
        assert!(!anim.pause(&mut sched));
        assert_eq!(sched.cancelled(), &[handle]);
        assert_eq!(sched.pending(), None);
        assert!(!anim.begin_frame(), "stale callback must be rejected");
    }

    #[test]
    fn missed_callback_is_replaced_only_while_running() {
        let mut sched = ManualScheduler::new();
        let mut anim = Animator::new();
        assert!(!anim.rearm_missed(&mut sched).unwrap());
        assert_eq!(sched.requested(), 0);

        anim.play(&mut sched).unwrap();
        let lost = sched.take_pending().unwrap();
        assert!(anim.rearm_missed(&mut sched).unwrap());
        assert_eq!(sched.requested(), 2);
        assert_ne!(anim.pending(), Some(lost));
        assert_eq!(anim.pending(), sched.pending());
        sched.take_pending().unwrap();
        assert!(anim.begin_frame());

        // Replacing a live request cancels it first.
        anim.end_frame(&mut sched).unwrap();
        let live = sched.pending().unwrap();
        assert!(anim.rearm_missed(&mut sched).unwrap());
        assert_eq!(sched.cancelled().last(), Some(&live));
        assert_eq!(sched.pending(), anim.pending());
        assert_ne!(sched.pending(), Some(live));
    }

    #[test]
    fn frame_cycle_rearms_while_running() {
        let mut sched = ManualScheduler::new();
        let mut anim = Animator::new();
        anim.play(&mut sched).unwrap();

        for _ in 0..3 {
            sched.take_pending().unwrap();
            assert!(anim.begin_frame());
            anim.end_frame(&mut sched).unwrap();
        }
        assert_eq!(anim.frames(), 3);
        assert_eq!(sched.requested(), 4);
        assert!(sched.pending().is_some());
    }

    #[test]
    fn refused_request_leaves_animator_paused() {
        let mut sched = ManualScheduler::new();
        sched.refuse_requests(true);
        let mut anim = Animator::new();
        assert!(anim.play(&mut sched).is_err());
        assert_eq!(anim.state(), AnimationState::Paused);
    }

    #[test]
    fn labels() {
        assert_eq!(AnimationState::Paused.control_label(), "▶");
        assert_eq!(AnimationState::Running.control_label(), "⏸");
    }
}
