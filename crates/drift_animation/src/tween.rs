//! Property tweens
//!
//! A [`Tween`] interpolates a handful of [`Property`] values on one target
//! element over a fixed duration. It is driven by [`Tween::tick`] with a
//! frame delta and controlled with play/reverse/restart, which is all a
//! scroll trigger needs to animate content in and back out.
//!
//! Tweens are normally created through the scheduler
//! ([`SchedulerHandle::register_tween`](crate::SchedulerHandle::register_tween))
//! rather than directly.

use drift_core::{Property, Target};
use smallvec::SmallVec;

use crate::easing::Easing;

/// One animated property
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyTween {
    pub property: Property,
    /// Start value; `None` starts from whatever the element shows when the
    /// tween is created
    pub from: Option<f32>,
    pub to: f32,
}

/// How often a tween repeats after its first iteration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    /// Play a single iteration
    #[default]
    Once,
    /// Number of additional iterations (`Count(0)` plays once)
    Count(u32),
    /// Repeat until cancelled
    Infinite,
}

/// What to animate and how, independent of any target
///
/// # Example
///
/// ```rust
/// use drift_animation::{Easing, Motion};
/// use drift_core::Property;
///
/// let entrance = Motion::new(800)
///     .from_to(Property::Opacity, 0.0, 1.0)
///     .from_to(Property::TranslateY, 80.0, 0.0)
///     .easing(Easing::EaseOutQuad);
/// assert_eq!(entrance.properties.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    pub properties: SmallVec<[PropertyTween; 4]>,
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub easing: Easing,
    pub repeat: Repeat,
    /// Reverse direction on every other iteration (ping-pong)
    pub yoyo: bool,
}

impl Motion {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            properties: SmallVec::new(),
            duration_ms,
            delay_ms: 0,
            easing: Easing::default(),
            repeat: Repeat::Once,
            yoyo: false,
        }
    }

    /// Animate `property` from an explicit start value
    pub fn from_to(mut self, property: Property, from: f32, to: f32) -> Self {
        self.properties.push(PropertyTween {
            property,
            from: Some(from),
            to,
        });
        self
    }

    /// Animate `property` from its current value
    pub fn to(mut self, property: Property, to: f32) -> Self {
        self.properties.push(PropertyTween {
            property,
            from: None,
            to,
        });
        self
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Repeat forever, reversing every other iteration
    pub fn ping_pong_forever(self) -> Self {
        self.repeat(Repeat::Infinite).yoyo(true)
    }

    pub fn is_infinite(&self) -> bool {
        self.repeat == Repeat::Infinite
    }

    /// Collapse to an instant jump to the end values
    pub fn instant(mut self) -> Self {
        self.duration_ms = 0;
        self.delay_ms = 0;
        self.repeat = Repeat::Once;
        self.yoyo = false;
        self
    }
}

/// A motion bound to a target element
#[derive(Clone, Debug)]
pub struct TweenSpec {
    pub target: Target,
    pub motion: Motion,
}

impl TweenSpec {
    pub fn new(target: Target, motion: Motion) -> Self {
        Self { target, motion }
    }
}

/// Playback state of a tween
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenState {
    /// Created or fully reversed, not advancing
    Idle,
    /// Waiting out its delay before playing forward
    Delayed,
    Playing,
    Paused,
    /// Reached the end of its last iteration
    Finished,
    /// Target element was removed; the tween is inert
    Detached,
    /// Cancelled; the tween is inert
    Cancelled,
}

impl TweenState {
    /// Check whether the tween will never animate again
    pub fn is_terminal(self) -> bool {
        matches!(self, TweenState::Detached | TweenState::Cancelled)
    }
}

/// Direction the playhead moves in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayDirection {
    #[default]
    Forward,
    Reverse,
}

#[derive(Clone, Copy, Debug)]
struct Track {
    property: Property,
    from: f32,
    to: f32,
    /// Value before the tween first touched the element
    original: f32,
}

/// A running property animation
#[derive(Debug)]
pub struct Tween {
    target: Target,
    motion: Motion,
    tracks: SmallVec<[Track; 4]>,
    state: TweenState,
    direction: PlayDirection,
    /// State to go back to after `resume()`
    paused_from: Option<TweenState>,
    delay_remaining: f32,
    /// Time into the current iteration (ms)
    elapsed: f32,
    iteration: u32,
}

impl Tween {
    /// Create a tween and render its start values immediately
    pub fn new(spec: TweenSpec) -> Self {
        let TweenSpec { target, motion } = spec;
        let tracks = motion
            .properties
            .iter()
            .map(|p| {
                let current = target
                    .get(p.property)
                    .unwrap_or_else(|| p.property.default_value());
                Track {
                    property: p.property,
                    from: p.from.unwrap_or(current),
                    to: p.to,
                    original: current,
                }
            })
            .collect();

        let state = if target.is_attached() {
            TweenState::Idle
        } else {
            TweenState::Detached
        };

        let tween = Self {
            target,
            motion,
            tracks,
            state,
            direction: PlayDirection::Forward,
            paused_from: None,
            delay_remaining: 0.0,
            elapsed: 0.0,
            iteration: 0,
        };
        tween.render();
        tween
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn direction(&self) -> PlayDirection {
        self.direction
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Check whether the next tick will advance the tween
    pub fn is_active(&self) -> bool {
        matches!(self.state, TweenState::Playing | TweenState::Delayed)
    }

    /// Linear progress through the current iteration (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let duration = self.motion.duration_ms as f32;
        if duration <= 0.0 {
            return if self.state == TweenState::Finished {
                1.0
            } else {
                0.0
            };
        }
        (self.elapsed / duration).clamp(0.0, 1.0)
    }

    fn at_start(&self) -> bool {
        self.iteration == 0 && self.elapsed <= 0.0 && self.state != TweenState::Finished
    }

    /// Start or resume playing forward
    ///
    /// The delay is honored whenever playback starts from the very
    /// beginning; resuming a partially reversed tween continues immediately.
    pub fn play(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        if self.direction == PlayDirection::Forward
            && matches!(self.state, TweenState::Playing | TweenState::Delayed)
        {
            return;
        }

        self.direction = PlayDirection::Forward;
        self.paused_from = None;
        if self.state == TweenState::Finished {
            return;
        }
        if self.at_start() && self.motion.delay_ms > 0 {
            self.delay_remaining = self.motion.delay_ms as f32;
            self.state = TweenState::Delayed;
        } else {
            self.state = TweenState::Playing;
        }
    }

    /// Play backwards from the current position towards the start
    pub fn reverse(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.direction = PlayDirection::Reverse;
        self.paused_from = None;
        match self.state {
            TweenState::Delayed => {
                self.delay_remaining = 0.0;
                self.state = TweenState::Idle;
            }
            _ if self.at_start() => self.state = TweenState::Idle,
            _ => self.state = TweenState::Playing,
        }
    }

    /// Jump back to the start and play forward
    pub fn restart(&mut self, include_delay: bool) {
        if self.state.is_terminal() {
            return;
        }
        self.rewind();
        self.render();
        if include_delay && self.motion.delay_ms > 0 {
            self.delay_remaining = self.motion.delay_ms as f32;
            self.state = TweenState::Delayed;
        } else {
            self.state = TweenState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.is_active() {
            self.paused_from = Some(self.state);
            self.state = TweenState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TweenState::Paused {
            self.state = self.paused_from.take().unwrap_or(TweenState::Playing);
        }
    }

    /// Jump back to the start and stop
    pub fn reset(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.rewind();
        self.render();
        self.state = TweenState::Idle;
    }

    /// Jump to the end values and stop
    pub fn complete(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.direction = PlayDirection::Forward;
        self.paused_from = None;
        self.delay_remaining = 0.0;
        self.elapsed = self.motion.duration_ms as f32;
        self.iteration = match self.motion.repeat {
            Repeat::Count(n) => n,
            Repeat::Once | Repeat::Infinite => 0,
        };
        self.state = TweenState::Finished;
        self.render();
    }

    /// Stop permanently, optionally restoring the values the element had
    /// before this tween was created
    pub fn cancel(&mut self, restore: bool) {
        if self.state == TweenState::Cancelled {
            return;
        }
        self.state = TweenState::Cancelled;
        if restore {
            for track in &self.tracks {
                self.target.set(track.property, track.original);
            }
        }
    }

    /// Advance by `dt_ms` milliseconds and write the new values
    ///
    /// Returns true while the tween needs further ticks.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !dt_ms.is_finite() {
            tracing::debug!(dt_ms, "ignoring non-finite frame delta");
            return self.is_active();
        }
        let mut dt = dt_ms.max(0.0);
        match self.state {
            TweenState::Delayed => {
                self.delay_remaining -= dt;
                if self.delay_remaining > 0.0 {
                    return true;
                }
                dt = -self.delay_remaining;
                self.delay_remaining = 0.0;
                self.state = TweenState::Playing;
            }
            TweenState::Playing => {}
            _ => return false,
        }

        if !self.target.is_attached() {
            tracing::trace!(target_id = %self.target.id(), "tween target detached");
            self.state = TweenState::Detached;
            return false;
        }

        self.advance(dt);
        self.render();
        self.state == TweenState::Playing
    }

    fn rewind(&mut self) {
        self.direction = PlayDirection::Forward;
        self.paused_from = None;
        self.delay_remaining = 0.0;
        self.elapsed = 0.0;
        self.iteration = 0;
    }

    fn has_next_iteration(&self) -> bool {
        match self.motion.repeat {
            Repeat::Once => false,
            Repeat::Count(n) => self.iteration < n,
            Repeat::Infinite => true,
        }
    }

    fn advance(&mut self, dt: f32) {
        let duration = self.motion.duration_ms as f32;
        if duration <= 0.0 {
            // Zero-length tweens jump straight to an end
            match self.direction {
                PlayDirection::Forward => self.complete(),
                PlayDirection::Reverse => {
                    self.elapsed = 0.0;
                    self.iteration = 0;
                    self.state = TweenState::Idle;
                }
            }
            return;
        }

        match self.direction {
            PlayDirection::Forward => {
                self.elapsed += dt;
                if self.elapsed < duration {
                    return;
                }
                let wraps = (self.elapsed / duration).floor();
                let remaining = match self.motion.repeat {
                    Repeat::Once => 0,
                    Repeat::Count(n) => n.saturating_sub(self.iteration),
                    Repeat::Infinite => {
                        // Only the parity of the counter matters from here on
                        let steps = wraps.rem_euclid(4_294_967_296.0) as u32;
                        self.iteration = self.iteration.wrapping_add(steps);
                        self.elapsed = self.elapsed.rem_euclid(duration);
                        return;
                    }
                };
                if wraps > remaining as f32 {
                    self.iteration = self.iteration.saturating_add(remaining);
                    self.elapsed = duration;
                    self.state = TweenState::Finished;
                } else {
                    self.iteration = self.iteration.saturating_add(wraps as u32);
                    self.elapsed = self.elapsed.rem_euclid(duration);
                }
            }
            PlayDirection::Reverse => {
                self.elapsed -= dt;
                if self.elapsed > 0.0 {
                    return;
                }
                // Iterations to step back so the playhead lands inside one
                let rewinds = (-self.elapsed / duration).floor() + 1.0;
                if rewinds > self.iteration as f32 {
                    self.iteration = 0;
                    self.elapsed = 0.0;
                    self.state = TweenState::Idle;
                } else {
                    self.iteration -= rewinds as u32;
                    let wrapped = self.elapsed.rem_euclid(duration);
                    self.elapsed = if wrapped > 0.0 { wrapped } else { duration };
                }
            }
        }
    }

    /// Eased progress, accounting for yoyo iterations
    fn eased_progress(&self) -> f32 {
        let mut t = self.progress();
        if self.motion.yoyo && self.iteration % 2 == 1 {
            t = 1.0 - t;
        }
        self.motion.easing.apply(t)
    }

    fn render(&self) {
        if self.state.is_terminal() {
            return;
        }
        let eased = self.eased_progress();
        for track in &self.tracks {
            let value = track.from + (track.to - track.from) * eased;
            self.target.set(track.property, value);
        }
    }
}
