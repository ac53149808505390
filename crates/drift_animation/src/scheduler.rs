//! Animation scheduler
//!
//! Owns every live tween and advances them once per frame. The host's render
//! loop calls [`AnimationScheduler::tick`] (or [`tick_frame`] to measure the
//! delta itself); everything else talks to the scheduler through a weak
//! [`SchedulerHandle`], which turns into a no-op once the scheduler is gone.
//!
//! [`tick_frame`]: AnimationScheduler::tick_frame

use std::sync::{Arc, OnceLock, Weak};
use std::time::Instant;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::{AnimationError, Result};
use crate::tween::{PlayDirection, Tween, TweenSpec, TweenState};

// ============================================================================
// Global Animation Scheduler State
// ============================================================================

/// Process-wide scheduler handle, installed once at startup
static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Install the process-wide scheduler handle
///
/// Call once at startup, after creating the [`AnimationScheduler`] the host
/// loop will tick. A second call fails and leaves the first handle in place.
pub fn set_global_scheduler(handle: SchedulerHandle) -> Result<()> {
    GLOBAL_SCHEDULER
        .set(handle)
        .map_err(|_| AnimationError::AlreadyInstalled("scheduler"))
}

/// Get the process-wide scheduler (None if not installed)
pub fn try_get_scheduler() -> Option<SchedulerHandle> {
    GLOBAL_SCHEDULER.get().cloned()
}

/// Check if the global scheduler has been installed
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

new_key_type! {
    /// Handle to a registered tween
    pub struct TweenId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    tweens: SlotMap<TweenId, Tween>,
    last_frame: Instant,
    target_fps: u32,
    frames: u64,
}

impl SchedulerInner {
    fn tick(&mut self, dt_ms: f32) -> bool {
        self.frames += 1;
        let mut active = false;
        for (_, tween) in self.tweens.iter_mut() {
            active |= tween.tick(dt_ms);
        }
        // Finished tweens stay registered so triggers can reverse or
        // restart them; they are only removed by cancel().
        active
    }

    fn has_active(&self) -> bool {
        self.tweens.iter().any(|(_, t)| t.is_active())
    }
}

/// The scheduler that ticks all registered tweens
///
/// Held by the host (typically the page runtime) and shared via
/// [`SchedulerHandle`].
///
/// ```rust
/// use drift_animation::{AnimationScheduler, Motion, TweenSpec};
/// use drift_core::{Bounds, Property, VisualElement};
///
/// let scheduler = AnimationScheduler::new();
/// let handle = scheduler.handle();
///
/// let title = VisualElement::new("hero-title", Bounds::default());
/// let id = handle
///     .register_tween(TweenSpec::new(
///         title.target(),
///         Motion::new(1200).from_to(Property::Opacity, 0.0, 1.0),
///     ))
///     .unwrap();
/// handle.play(id);
///
/// scheduler.tick(16.0);
/// assert!(title.get(Property::Opacity) > 0.0);
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                tweens: SlotMap::with_key(),
                last_frame: Instant::now(),
                target_fps: 60,
                frames: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn set_target_fps(&self, fps: u32) {
        self.inner.lock().target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.inner.lock().target_fps
    }

    /// Nominal frame duration in milliseconds for the target frame rate
    pub fn frame_interval_ms(&self) -> f32 {
        1000.0 / self.target_fps() as f32
    }

    /// Advance every tween by `dt_ms` milliseconds
    ///
    /// Returns true if any tween still needs ticks.
    pub fn tick(&self, dt_ms: f32) -> bool {
        let mut inner = self.inner.lock();
        inner.last_frame = Instant::now();
        inner.tick(dt_ms)
    }

    /// Advance every tween by the wall-clock time since the previous frame
    pub fn tick_frame(&self) -> bool {
        let mut inner = self.inner.lock();
        let now = Instant::now();
        let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
        inner.last_frame = now;
        inner.tick(dt_ms)
    }

    /// Check if any tweens are still playing or waiting out a delay
    pub fn has_active_animations(&self) -> bool {
        self.inner.lock().has_active()
    }

    /// Number of registered tweens (active or not)
    pub fn tween_count(&self) -> usize {
        self.inner.lock().tweens.len()
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.inner.lock().frames
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// This is passed to components that need to register animations.
/// It won't prevent the scheduler from being dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a tween and return its ID
    ///
    /// The tween renders its start values immediately but does not play
    /// until [`play`](Self::play) is called.
    pub fn register_tween(&self, spec: TweenSpec) -> Option<TweenId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock();
            // Prevent a huge first dt for frame-measured ticking
            guard.last_frame = Instant::now();
            guard.tweens.insert(Tween::new(spec))
        })
    }

    /// Run a closure against a tween if it exists
    pub fn with_tween<F, R>(&self, id: TweenId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Tween) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().tweens.get_mut(id).map(f))
    }

    pub fn play(&self, id: TweenId) {
        self.with_tween(id, Tween::play);
    }

    pub fn reverse(&self, id: TweenId) {
        self.with_tween(id, Tween::reverse);
    }

    pub fn restart(&self, id: TweenId, include_delay: bool) {
        self.with_tween(id, |t| t.restart(include_delay));
    }

    pub fn pause(&self, id: TweenId) {
        self.with_tween(id, Tween::pause);
    }

    pub fn resume(&self, id: TweenId) {
        self.with_tween(id, Tween::resume);
    }

    pub fn reset(&self, id: TweenId) {
        self.with_tween(id, Tween::reset);
    }

    pub fn complete(&self, id: TweenId) {
        self.with_tween(id, Tween::complete);
    }

    /// Cancel and remove a tween
    ///
    /// Any in-flight interpolation is discarded; the next tick will not
    /// touch the target. With `restore`, the target gets back the values
    /// it had before the tween was created. Returns false if the tween was
    /// already gone.
    pub fn cancel(&self, id: TweenId, restore: bool) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let removed = inner.lock().tweens.remove(id);
        match removed {
            Some(mut tween) => {
                tween.cancel(restore);
                true
            }
            None => false,
        }
    }

    pub fn tween_state(&self, id: TweenId) -> Option<TweenState> {
        self.with_tween(id, |t| t.state())
    }

    pub fn tween_direction(&self, id: TweenId) -> Option<PlayDirection> {
        self.with_tween(id, |t| t.direction())
    }

    /// Progress through the current iteration (0.0 to 1.0)
    pub fn tween_progress(&self, id: TweenId) -> Option<f32> {
        self.with_tween(id, |t| t.progress())
    }

    /// Check if a tween is still registered
    pub fn contains(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().tweens.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::tween::Motion;
    use drift_core::{Bounds, Property, VisualElement};

    fn fade_spec(el: &std::sync::Arc<VisualElement>) -> TweenSpec {
        TweenSpec::new(
            el.target(),
            Motion::new(1000)
                .from_to(Property::Opacity, 0.0, 1.0)
                .easing(Easing::Linear),
        )
    }

    #[test]
    fn test_scheduler_tick() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let el = VisualElement::new("title", Bounds::default());

        let id = handle.register_tween(fade_spec(&el)).unwrap();
        assert!(!scheduler.has_active_animations());

        handle.play(id);
        assert!(scheduler.tick(250.0));
        assert!((el.get(Property::Opacity) - 0.25).abs() < 1e-4);
        assert_eq!(handle.tween_state(id), Some(TweenState::Playing));
        assert_eq!(scheduler.frame_count(), 1);
    }

    #[test]
    fn test_finished_tweens_stay_registered() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let el = VisualElement::new("title", Bounds::default());

        let id = handle.register_tween(fade_spec(&el)).unwrap();
        handle.play(id);
        assert!(!scheduler.tick(2000.0));
        assert_eq!(scheduler.tween_count(), 1);

        handle.reverse(id);
        assert!(scheduler.tick(500.0));
        assert!((el.get(Property::Opacity) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_cancel_discards_in_flight_ticks() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let el = VisualElement::new("title", Bounds::default());

        let id = handle.register_tween(fade_spec(&el)).unwrap();
        handle.play(id);
        scheduler.tick(100.0);

        assert!(handle.cancel(id, true));
        assert!(!handle.contains(id));
        assert_eq!(el.get(Property::Opacity), 1.0);

        let writes = el.mutation_count();
        scheduler.tick(100.0);
        assert_eq!(el.mutation_count(), writes);

        // Second cancel is a no-op
        assert!(!handle.cancel(id, true));
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };

        // Scheduler is dropped, handle should not be alive
        assert!(!handle.is_alive());

        // Operations should safely no-op
        let el = VisualElement::new("title", Bounds::default());
        assert!(handle.register_tween(fade_spec(&el)).is_none());
        assert_eq!(handle.tween_state(TweenId::default()), None);
    }

    #[test]
    fn test_frame_interval() {
        let scheduler = AnimationScheduler::new();
        scheduler.set_target_fps(120);
        assert!((scheduler.frame_interval_ms() - 8.333).abs() < 0.01);

        scheduler.set_target_fps(0);
        assert_eq!(scheduler.target_fps(), 1);
    }
}
