//! Drift Landing Page
//!
//! Wires the Drift animation layer to a six-section landing page: each
//! section declares its animations as a [`SectionPlan`], the
//! [`Orchestrator`] mounts plans into revertible contexts, and
//! [`LandingPage`] hosts the whole thing.
//!
//! # Example
//!
//! ```rust
//! use drift_app::{sections, DriftConfig, LandingPage};
//! use drift_core::Property;
//!
//! let mut page = LandingPage::new(DriftConfig::default());
//! page.mount_all().unwrap();
//!
//! let top = page.section_top(sections::FEATURES).unwrap();
//! page.scroll_to(top);
//! page.advance(3000.0);
//!
//! let title = &page.scope(sections::FEATURES).unwrap().elements("features-title")[0];
//! assert_eq!(title.get(Property::Opacity), 1.0);
//!
//! page.unmount_all();
//! ```

mod app;
mod config;
mod error;
pub mod logging;
mod orchestrator;
pub mod sections;


pub use app::LandingPage;
pub use config::{DriftConfig, MotionPreference};
pub use error::{DriftError, Result};
pub use orchestrator::{
    AmbientDecl, AnimationDecl, EntranceDecl, MountedSection, Orchestrator, ScrubDecl,
    SectionPlan, TargetSelector, TriggerDecl,
};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::LandingPage;
    pub use crate::config::{DriftConfig, MotionPreference};
    pub use crate::error::{DriftError, Result};
    pub use crate::orchestrator::{MountedSection, Orchestrator, SectionPlan};

    pub use drift_animation::{
        AnimationContext, AnimationScheduler, Easing, Motion, ScrollRuntime, TweenSpec,
    };
    pub use drift_core::{Bounds, Property, SectionScope, Target, Viewport, VisualElement};
}
