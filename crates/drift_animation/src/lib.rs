//! Drift Animation System
//!
//! Scroll-driven animation for sectioned pages:
//!
//! - **Tweens**: property interpolation with delay, easing, repeat and yoyo
//! - **Scheduler**: ticks every tween once per frame, shared by weak handle
//! - **Stagger**: cascading delays across sibling elements
//! - **Triggers**: threshold ranges that fire enter/leave events on scroll
//! - **Scrubbing**: properties mapped directly onto scroll progress
//! - **Contexts**: per-section ownership with a single revert
//!
//! # Example
//!
//! ```rust
//! use drift_animation::{
//!     AnimationContext, AnimationScheduler, Motion, ScrollRuntime, ToggleActions,
//!     TriggerConfig, TriggerConsumer, TweenSpec,
//! };
//! use drift_core::{Bounds, Property, Viewport, VisualElement};
//!
//! let scheduler = AnimationScheduler::new();
//! let scroll = ScrollRuntime::new(scheduler.handle(), Viewport::new(1280.0, 800.0));
//!
//! let title = VisualElement::new("features-title", Bounds::new(0.0, 1600.0, 800.0, 80.0));
//! let mut ctx = AnimationContext::open("features", scroll.handle());
//! let fade = ctx
//!     .tween(TweenSpec::new(
//!         title.target(),
//!         Motion::new(1000).from_to(Property::Opacity, 0.0, 1.0),
//!     ))
//!     .unwrap();
//! ctx.trigger(
//!     TriggerConfig::new(title.target())
//!         .start("top 80%".parse().unwrap())
//!         .toggle_actions(ToggleActions::ENTRANCE),
//!     TriggerConsumer::tweens([fade]),
//! );
//!
//! // Content starts hidden and fades in once scrolled into range
//! assert_eq!(title.get(Property::Opacity), 0.0);
//! scroll.update(1200.0);
//! scheduler.tick(1000.0);
//! assert_eq!(title.get(Property::Opacity), 1.0);
//!
//! ctx.revert();
//! ```

pub mod context;
pub mod easing;
pub mod error;
pub mod scheduler;
pub mod scroll;
pub mod scrub;
pub mod stagger;
pub mod trigger;
pub mod tween;

pub use context::{AnimationContext, TrackedHandle};
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use scheduler::{
    is_scheduler_initialized, set_global_scheduler, try_get_scheduler, AnimationScheduler,
    SchedulerHandle, TweenId,
};
pub use scroll::{set_global_scroll_runtime, try_get_scroll_runtime, ScrollHandle, ScrollRuntime};
pub use scrub::{scrub_progress, ScrollScrubber, ScrubId, ScrubRange, ScrubSpec};
pub use stagger::{sequence, Stagger};
pub use trigger::{
    Anchor, Crossing, CrossingEvent, Membership, RestartMode, ScrollDirection, ToggleAction,
    ToggleActions, TriggerCallback, TriggerConfig, TriggerConsumer, TriggerEvaluator, TriggerId,
    TriggerPosition, TriggerState,
};
pub use tween::{Motion, PlayDirection, PropertyTween, Repeat, Tween, TweenSpec, TweenState};
