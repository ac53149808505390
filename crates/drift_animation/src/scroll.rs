//! Scroll runtime
//!
//! The process-wide scroll stream. Owns the [`TriggerEvaluator`] and
//! [`ScrollScrubber`], receives scroll positions from the host and turns
//! crossings into toggle actions on scheduler tweens (or host callbacks).
//!
//! Like the scheduler, the runtime is held by the host and shared through a
//! weak [`ScrollHandle`].

use std::sync::{Arc, OnceLock, Weak};

use drift_core::Viewport;
use parking_lot::Mutex;

use crate::error::{AnimationError, Result};
use crate::scheduler::{SchedulerHandle, TweenId};
use crate::scrub::{ScrollScrubber, ScrubId, ScrubSpec};
use crate::trigger::{
    Crossing, RestartMode, ToggleAction, TriggerConfig, TriggerConsumer, TriggerEvaluator,
    TriggerId, TriggerState,
};

static GLOBAL_SCROLL: OnceLock<ScrollHandle> = OnceLock::new();

/// Install the process-wide scroll runtime handle
pub fn set_global_scroll_runtime(handle: ScrollHandle) -> Result<()> {
    GLOBAL_SCROLL
        .set(handle)
        .map_err(|_| AnimationError::AlreadyInstalled("scroll runtime"))
}

/// Get the process-wide scroll runtime (None if not installed)
pub fn try_get_scroll_runtime() -> Option<ScrollHandle> {
    GLOBAL_SCROLL.get().cloned()
}

struct ScrollInner {
    evaluator: TriggerEvaluator,
    scrubber: ScrollScrubber,
    viewport: Viewport,
    position: f32,
}

/// Owner of the scroll-driven bindings
pub struct ScrollRuntime {
    inner: Arc<Mutex<ScrollInner>>,
    scheduler: SchedulerHandle,
}

impl ScrollRuntime {
    /// Create a runtime that drives tweens on `scheduler`
    pub fn new(scheduler: SchedulerHandle, viewport: Viewport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScrollInner {
                evaluator: TriggerEvaluator::new(),
                scrubber: ScrollScrubber::new(),
                viewport,
                position: 0.0,
            })),
            scheduler,
        }
    }

    pub fn handle(&self) -> ScrollHandle {
        ScrollHandle {
            inner: Arc::downgrade(&self.inner),
            scheduler: self.scheduler.clone(),
        }
    }

    /// Feed a new scroll position; returns the number of crossings delivered
    pub fn update(&self, position: f32) -> usize {
        self.handle().update(position)
    }

    /// Evaluate bindings registered since the last update
    pub fn sync(&self) -> usize {
        self.handle().sync()
    }

    /// Change the viewport; returns the number of crossings delivered
    pub fn resize(&self, viewport: Viewport) -> usize {
        self.handle().resize(viewport)
    }

    pub fn position(&self) -> f32 {
        self.inner.lock().position
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.lock().viewport
    }

    pub fn trigger_count(&self) -> usize {
        self.inner.lock().evaluator.len()
    }

    pub fn scrub_count(&self) -> usize {
        self.inner.lock().scrubber.len()
    }
}

/// A weak handle to the scroll runtime
///
/// Every operation is a no-op (returning `None`/`false`/`0`) once the
/// runtime has been dropped.
#[derive(Clone)]
pub struct ScrollHandle {
    inner: Weak<Mutex<ScrollInner>>,
    scheduler: SchedulerHandle,
}

impl ScrollHandle {
    /// The scheduler crossings are dispatched to
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    pub fn register_trigger(
        &self,
        config: TriggerConfig,
        consumer: TriggerConsumer,
    ) -> Option<TriggerId> {
        let inner = self.inner.upgrade()?;
        let id = inner.lock().evaluator.register(config, consumer);
        tracing::trace!(?id, "registered trigger");
        Some(id)
    }

    /// Remove a trigger binding; safe mid-dispatch and when already removed
    pub fn unregister_trigger(&self, id: TriggerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().evaluator.unregister(id))
            .unwrap_or(false)
    }

    /// Bind a scrub and write its value for the current position
    pub fn bind_scrub(&self, spec: ScrubSpec) -> Option<ScrubId> {
        let inner = self.inner.upgrade()?;
        let mut guard = inner.lock();
        let id = guard.scrubber.bind(spec);
        let (position, viewport) = (guard.position, guard.viewport);
        guard.scrubber.apply(id, position, &viewport);
        Some(id)
    }

    /// Remove a scrub, optionally restoring the value its property had
    /// before the scrub was bound
    pub fn unbind_scrub(&self, id: ScrubId, restore: bool) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().scrubber.unbind(id, restore).is_some())
            .unwrap_or(false)
    }

    /// Feed a new scroll position
    ///
    /// Scrubs are written immediately. Crossings are collected under the
    /// lock and delivered after it is released, so consumers may register
    /// or remove bindings. Returns the number of crossings delivered.
    pub fn update(&self, position: f32) -> usize {
        let Some(inner) = self.inner.upgrade() else {
            return 0;
        };
        let crossings = {
            let mut guard = inner.lock();
            let viewport = guard.viewport;
            guard.position = position;
            guard.scrubber.update(position, &viewport);
            guard.evaluator.on_scroll_update(position, &viewport)
        };
        self.dispatch(&inner, crossings)
    }

    /// Evaluate bindings registered since the last update
    pub fn sync(&self) -> usize {
        let Some(inner) = self.inner.upgrade() else {
            return 0;
        };
        let crossings = {
            let mut guard = inner.lock();
            let viewport = guard.viewport;
            guard.evaluator.sync(&viewport)
        };
        self.dispatch(&inner, crossings)
    }

    /// Change the viewport and re-evaluate everything for the new geometry
    ///
    /// Scrubs are rewritten and every trigger range is recomputed at the
    /// current position. Ranges that moved across the position deliver
    /// their crossings like a scroll would. Returns the number delivered.
    pub fn resize(&self, viewport: Viewport) -> usize {
        let Some(inner) = self.inner.upgrade() else {
            return 0;
        };
        let crossings = {
            let mut guard = inner.lock();
            guard.viewport = viewport;
            let position = guard.position;
            guard.scrubber.update(position, &viewport);
            guard.evaluator.reflow(&viewport)
        };
        self.dispatch(&inner, crossings)
    }

    pub fn position(&self) -> Option<f32> {
        self.inner.upgrade().map(|inner| inner.lock().position)
    }

    pub fn trigger_state(&self, id: TriggerId) -> Option<TriggerState> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().evaluator.state(id))
    }

    pub fn contains_trigger(&self, id: TriggerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().evaluator.contains(id))
            .unwrap_or(false)
    }

    pub fn contains_scrub(&self, id: ScrubId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().scrubber.contains(id))
            .unwrap_or(false)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn dispatch(&self, inner: &Arc<Mutex<ScrollInner>>, crossings: Vec<Crossing>) -> usize {
        let mut delivered = 0;
        for crossing in crossings {
            // An earlier consumer may have removed this binding
            let resolved = {
                let guard = inner.lock();
                let evaluator = &guard.evaluator;
                evaluator
                    .config(crossing.trigger)
                    .zip(evaluator.consumer(crossing.trigger))
                    .map(|(config, consumer)| {
                        (
                            config.toggle_actions.action_for(crossing.event),
                            config.restart_mode,
                            consumer.clone(),
                        )
                    })
            };
            let Some((action, restart_mode, consumer)) = resolved else {
                tracing::trace!(trigger = ?crossing.trigger, "binding removed before delivery");
                continue;
            };

            tracing::trace!(
                trigger = ?crossing.trigger,
                event = ?crossing.event,
                action = action.name(),
                "trigger crossed"
            );
            match consumer {
                TriggerConsumer::Tweens(ids) => {
                    for id in ids {
                        apply_toggle(&self.scheduler, id, action, restart_mode);
                    }
                }
                TriggerConsumer::Callback(callback) => callback(crossing.event),
            }
            delivered += 1;
        }
        delivered
    }
}

impl std::fmt::Debug for ScrollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

fn apply_toggle(
    scheduler: &SchedulerHandle,
    id: TweenId,
    action: ToggleAction,
    restart_mode: RestartMode,
) {
    match action {
        ToggleAction::Play => scheduler.play(id),
        ToggleAction::Pause => scheduler.pause(id),
        ToggleAction::Resume => scheduler.resume(id),
        ToggleAction::Reverse => scheduler.reverse(id),
        ToggleAction::Restart => scheduler.restart(id, restart_mode == RestartMode::Staggered),
        ToggleAction::Reset => scheduler.reset(id),
        ToggleAction::Complete => scheduler.complete(id),
        ToggleAction::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::scheduler::AnimationScheduler;
    use crate::scrub::ScrubRange;
    use crate::trigger::{CrossingEvent, Membership, ToggleActions};
    use crate::tween::{Motion, PlayDirection, TweenSpec, TweenState};
    use drift_core::{Bounds, Property, VisualElement};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn runtime() -> (AnimationScheduler, ScrollRuntime) {
        let scheduler = AnimationScheduler::new();
        let scroll = ScrollRuntime::new(scheduler.handle(), Viewport::new(1280.0, 800.0));
        (scheduler, scroll)
    }

    #[test]
    fn test_play_reverse_play_reverse() {
        let (scheduler, scroll) = runtime();
        let handle = scroll.handle();
        let card = VisualElement::new("card", Bounds::new(0.0, 2000.0, 300.0, 300.0));

        let tween = scheduler
            .handle()
            .register_tween(TweenSpec::new(
                card.target(),
                Motion::new(1000)
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .easing(Easing::Linear),
            ))
            .unwrap();
        handle
            .register_trigger(
                TriggerConfig::new(card.target())
                    .start("top 80%".parse().unwrap())
                    .toggle_actions(ToggleActions::ENTRANCE),
                TriggerConsumer::tweens([tween]),
            )
            .unwrap();
        let sched = scheduler.handle();

        // start = 2000 - 640 = 1360
        assert_eq!(scroll.update(1400.0), 1);
        assert_eq!(sched.tween_state(tween), Some(TweenState::Playing));
        scheduler.tick(600.0);

        assert_eq!(scroll.update(1000.0), 1);
        assert_eq!(sched.tween_direction(tween), Some(PlayDirection::Reverse));
        scheduler.tick(200.0);
        assert!((card.get(Property::Opacity) - 0.4).abs() < 1e-4);

        // Resumes forward from 0.4 rather than restarting
        scroll.update(1500.0);
        assert_eq!(sched.tween_direction(tween), Some(PlayDirection::Forward));
        scheduler.tick(100.0);
        assert!((card.get(Property::Opacity) - 0.5).abs() < 1e-4);

        scroll.update(0.0);
        assert_eq!(sched.tween_direction(tween), Some(PlayDirection::Reverse));
        scheduler.tick(1000.0);
        assert_eq!(card.get(Property::Opacity), 0.0);
        assert_eq!(sched.tween_state(tween), Some(TweenState::Idle));
    }

    #[test]
    fn test_callback_consumer() {
        let (_scheduler, scroll) = runtime();
        let handle = scroll.handle();
        let section = VisualElement::new("section", Bounds::new(0.0, 1000.0, 1280.0, 500.0));

        let enters = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&enters);
        handle.register_trigger(
            TriggerConfig::new(section.target()),
            TriggerConsumer::callback(move |event| {
                if event.is_enter() {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            }),
        );

        scroll.update(500.0);
        scroll.update(3000.0);
        scroll.update(1000.0);
        assert_eq!(enters.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_binding_removed_mid_dispatch_gets_nothing() {
        let (_scheduler, scroll) = runtime();
        let handle = scroll.handle();
        let first = VisualElement::new("first", Bounds::new(0.0, 1000.0, 100.0, 100.0));
        let second = VisualElement::new("second", Bounds::new(0.0, 1200.0, 100.0, 100.0));

        let second_hits = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&second_hits);
        let second_id = handle
            .register_trigger(
                TriggerConfig::new(second.target()),
                TriggerConsumer::callback(move |_| {
                    hits.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        let remover = handle.clone();
        handle.register_trigger(
            TriggerConfig::new(first.target()),
            TriggerConsumer::callback(move |_| {
                remover.unregister_trigger(second_id);
            }),
        );

        // Both ranges are crossed in one update; the first removes the second
        assert_eq!(scroll.update(5000.0), 2);
        assert_eq!(second_hits.load(Ordering::SeqCst), 0);
        assert!(!handle.contains_trigger(second_id));
    }

    #[test]
    fn test_restart_mode() {
        let (scheduler, scroll) = runtime();
        let handle = scroll.handle();
        let sched = scheduler.handle();
        let section = VisualElement::new("section", Bounds::new(0.0, 1000.0, 1280.0, 400.0));
        let card = VisualElement::new("card", Bounds::new(0.0, 1100.0, 300.0, 300.0));

        let tween = sched
            .register_tween(TweenSpec::new(
                card.target(),
                Motion::new(500).from_to(Property::Opacity, 0.0, 1.0).delay(400),
            ))
            .unwrap();
        let restart_on_enter = "restart none restart none".parse().unwrap();

        handle.register_trigger(
            TriggerConfig::new(section.target())
                .toggle_actions(restart_on_enter)
                .restart_mode(RestartMode::Simultaneous),
            TriggerConsumer::tweens([tween]),
        );
        scroll.update(500.0);
        assert_eq!(sched.tween_state(tween), Some(TweenState::Playing));

        let staggered = sched
            .register_tween(TweenSpec::new(
                card.target(),
                Motion::new(500).from_to(Property::Scale, 0.8, 1.0).delay(400),
            ))
            .unwrap();
        handle.register_trigger(
            TriggerConfig::new(section.target()).toggle_actions(restart_on_enter),
            TriggerConsumer::tweens([staggered]),
        );
        assert_eq!(scroll.sync(), 1);
        assert_eq!(sched.tween_state(staggered), Some(TweenState::Delayed));
    }

    #[test]
    fn test_scrub_follows_scroll() {
        let (_scheduler, scroll) = runtime();
        let handle = scroll.handle();
        let background = VisualElement::new("hero-bg", Bounds::new(0.0, 0.0, 1280.0, 900.0));

        let id = handle
            .bind_scrub(ScrubSpec::new(
                background.target(),
                Property::YPercent,
                ScrubRange::while_visible(background.target()),
                0.0,
                -20.0,
            ))
            .unwrap();
        // Written at bind time: range is -800..900, position 0
        let at_top = background.get(Property::YPercent);
        assert!((at_top - (-20.0 * 800.0 / 1700.0)).abs() < 1e-3);

        scroll.update(900.0);
        assert_eq!(background.get(Property::YPercent), -20.0);

        assert!(handle.unbind_scrub(id, false));
        scroll.update(0.0);
        assert_eq!(background.get(Property::YPercent), -20.0);
    }

    #[test]
    fn test_resize_moves_ranges_across_position() {
        let (scheduler, scroll) = runtime();
        let handle = scroll.handle();
        let sched = scheduler.handle();
        let card = VisualElement::new("card", Bounds::new(0.0, 2000.0, 300.0, 300.0));

        let tween = sched
            .register_tween(TweenSpec::new(
                card.target(),
                Motion::new(1000)
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .easing(Easing::Linear),
            ))
            .unwrap();
        let trigger = handle
            .register_trigger(
                TriggerConfig::new(card.target())
                    .start("top 80%".parse().unwrap())
                    .toggle_actions(ToggleActions::ENTRANCE),
                TriggerConsumer::tweens([tween]),
            )
            .unwrap();

        // start = 2000 - 640 = 1360
        assert_eq!(scroll.update(1400.0), 1);
        scheduler.tick(1000.0);
        assert_eq!(card.get(Property::Opacity), 1.0);

        // Shorter viewport: start = 2000 - 320 = 1680, now below the position
        assert_eq!(scroll.resize(Viewport::new(1280.0, 400.0)), 1);
        let state = handle.trigger_state(trigger).unwrap();
        assert_eq!(state.membership, Membership::Before);
        assert_eq!(state.last_event, Some(CrossingEvent::LeaveBackward));
        assert_eq!(sched.tween_direction(tween), Some(PlayDirection::Reverse));
        scheduler.tick(1000.0);
        assert_eq!(card.get(Property::Opacity), 0.0);

        // Same position again: nothing new to evaluate
        assert_eq!(scroll.update(1400.0), 0);
        assert_eq!(scroll.resize(Viewport::new(1280.0, 400.0)), 0);

        // Back to the original viewport: inside again
        assert_eq!(scroll.resize(Viewport::new(1280.0, 800.0)), 1);
        assert!(handle.trigger_state(trigger).unwrap().membership.is_inside());
        assert_eq!(sched.tween_direction(tween), Some(PlayDirection::Forward));
    }

    #[test]
    fn test_resize_rewrites_scrubs() {
        let (_scheduler, scroll) = runtime();
        let background = VisualElement::new("hero-bg", Bounds::new(0.0, 0.0, 1280.0, 900.0));
        scroll
            .handle()
            .bind_scrub(ScrubSpec::new(
                background.target(),
                Property::YPercent,
                ScrubRange::while_visible(background.target()),
                0.0,
                -20.0,
            ))
            .unwrap();

        // Range -400..900 at position 0
        scroll.resize(Viewport::new(1280.0, 400.0));
        let expected = -20.0 * 400.0 / 1300.0;
        assert!((background.get(Property::YPercent) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_handle_outlived_runtime() {
        let handle = {
            let (_scheduler, scroll) = runtime();
            scroll.handle()
        };
        let el = VisualElement::new("section", Bounds::default());
        assert!(!handle.is_alive());
        assert!(handle
            .register_trigger(TriggerConfig::new(el.target()), TriggerConsumer::tweens([]))
            .is_none());
        assert_eq!(handle.update(100.0), 0);
        assert_eq!(handle.position(), None);
    }
}
