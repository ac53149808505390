//! Animation contexts
//!
//! An [`AnimationContext`] owns every tween, trigger and scrub one section
//! creates while mounting. [`revert`](AnimationContext::revert) releases all
//! of them at once, in reverse registration order, and restores the values
//! the tweens and scrubs found on their targets.

use drift_core::Target;

use crate::scheduler::{SchedulerHandle, TweenId};
use crate::scroll::ScrollHandle;
use crate::scrub::{ScrubId, ScrubSpec};
use crate::trigger::{TriggerConfig, TriggerConsumer, TriggerId};
use crate::tween::TweenSpec;

/// Anything a context can release
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackedHandle {
    Tween(TweenId),
    Trigger(TriggerId),
    Scrub(ScrubId),
}

impl From<TweenId> for TrackedHandle {
    fn from(id: TweenId) -> Self {
        TrackedHandle::Tween(id)
    }
}

impl From<TriggerId> for TrackedHandle {
    fn from(id: TriggerId) -> Self {
        TrackedHandle::Trigger(id)
    }
}

impl From<ScrubId> for TrackedHandle {
    fn from(id: ScrubId) -> Self {
        TrackedHandle::Scrub(id)
    }
}

/// The owning scope for one mounted section's animations
///
/// ```rust
/// use drift_animation::{AnimationContext, AnimationScheduler, Motion, ScrollRuntime, TweenSpec};
/// use drift_core::{Bounds, Property, Viewport, VisualElement};
///
/// let scheduler = AnimationScheduler::new();
/// let scroll = ScrollRuntime::new(scheduler.handle(), Viewport::default());
///
/// let orb = VisualElement::new("float-orb", Bounds::default());
/// let mut ctx = AnimationContext::open("cta", scroll.handle());
/// let id = ctx
///     .tween(TweenSpec::new(
///         orb.target(),
///         Motion::new(3000).to(Property::TranslateY, 15.0).ping_pong_forever(),
///     ))
///     .unwrap();
/// ctx.scheduler().play(id);
///
/// ctx.revert();
/// assert_eq!(scheduler.tween_count(), 0);
/// ```
pub struct AnimationContext {
    scope: String,
    scheduler: SchedulerHandle,
    scroll: ScrollHandle,
    tracked: Vec<TrackedHandle>,
    reverted: bool,
}

impl AnimationContext {
    /// Open a context for the section named `scope`
    pub fn open(scope: impl Into<String>, scroll: ScrollHandle) -> Self {
        let scope = scope.into();
        tracing::debug!(%scope, "opened animation context");
        Self {
            scope,
            scheduler: scroll.scheduler().clone(),
            scroll,
            tracked: Vec::new(),
            reverted: false,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    pub fn scroll(&self) -> &ScrollHandle {
        &self.scroll
    }

    /// Record a handle for release on revert
    ///
    /// Ignored once the context has been reverted; returns whether the
    /// handle was recorded.
    pub fn track(&mut self, handle: impl Into<TrackedHandle>) -> bool {
        let handle = handle.into();
        if self.reverted {
            tracing::debug!(scope = %self.scope, ?handle, "registration after revert ignored");
            return false;
        }
        self.tracked.push(handle);
        true
    }

    /// Register a tween with the scheduler and track it
    pub fn tween(&mut self, spec: TweenSpec) -> Option<TweenId> {
        if self.refuse("tween", &spec.target) {
            return None;
        }
        let id = self.scheduler.register_tween(spec)?;
        self.track(id);
        Some(id)
    }

    /// Register a trigger binding and track it
    pub fn trigger(&mut self, config: TriggerConfig, consumer: TriggerConsumer) -> Option<TriggerId> {
        if self.refuse("trigger", &config.trigger) {
            return None;
        }
        let id = self.scroll.register_trigger(config, consumer)?;
        self.track(id);
        Some(id)
    }

    /// Bind a scrub and track it
    pub fn scrub(&mut self, spec: ScrubSpec) -> Option<ScrubId> {
        if self.refuse("scrub", &spec.target) {
            return None;
        }
        let id = self.scroll.bind_scrub(spec)?;
        self.track(id);
        Some(id)
    }

    fn refuse(&self, kind: &str, target: &Target) -> bool {
        if self.reverted {
            tracing::debug!(
                scope = %self.scope,
                kind,
                target = %target.id(),
                "registration after revert ignored"
            );
        }
        self.reverted
    }

    /// Handles recorded so far, in registration order
    pub fn tracked(&self) -> &[TrackedHandle] {
        &self.tracked
    }

    pub fn is_reverted(&self) -> bool {
        self.reverted
    }

    /// Release everything this context registered
    ///
    /// Triggers are unregistered, scrubs unbound and tweens cancelled,
    /// newest first. Tweens and scrubs restore the values their targets had
    /// before them. Calling this again does nothing.
    pub fn revert(&mut self) {
        if self.reverted {
            return;
        }
        self.reverted = true;

        let count = self.tracked.len();
        for handle in self.tracked.drain(..).rev() {
            match handle {
                TrackedHandle::Tween(id) => {
                    self.scheduler.cancel(id, true);
                }
                TrackedHandle::Trigger(id) => {
                    self.scroll.unregister_trigger(id);
                }
                TrackedHandle::Scrub(id) => {
                    self.scroll.unbind_scrub(id, true);
                }
            }
        }
        tracing::debug!(scope = %self.scope, released = count, "reverted animation context");
    }
}

impl Drop for AnimationContext {
    fn drop(&mut self) {
        if !self.reverted {
            tracing::debug!(scope = %self.scope, "animation context dropped without revert");
            self.revert();
        }
    }
}

impl std::fmt::Debug for AnimationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationContext")
            .field("scope", &self.scope)
            .field("tracked", &self.tracked.len())
            .field("reverted", &self.reverted)
            .finish()
    }
}
