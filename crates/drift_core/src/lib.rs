//! Drift Core
//!
//! Foundational types shared by the Drift animation layer:
//!
//! - **Geometry**: document-space [`Bounds`] and the [`Viewport`]
//! - **Properties**: the small, fixed set of visual properties an animation
//!   may write ([`Property`], [`PropertyValues`])
//! - **Elements**: section-owned [`VisualElement`]s and the weak [`Target`]
//!   references the animation layer holds on to
//! - **Scopes**: [`SectionScope`], the root of one section's elements,
//!   queryable by structural role
//!
//! # Example
//!
//! ```rust
//! use drift_core::{Bounds, Property, SectionScope};
//!
//! let mut scope = SectionScope::new("features", Bounds::new(0.0, 900.0, 1280.0, 1100.0));
//! scope.insert("feature-card", Bounds::new(80.0, 1100.0, 300.0, 220.0));
//! scope.insert("feature-card", Bounds::new(400.0, 1100.0, 300.0, 220.0));
//!
//! let cards = scope.query("feature-card");
//! assert_eq!(cards.len(), 2);
//! assert_eq!(cards[0].get(Property::Opacity), Some(1.0));
//! ```

pub mod element;
pub mod geometry;
pub mod property;
pub mod scope;

pub use element::{ElementId, Target, VisualElement};
pub use geometry::{Bounds, Viewport};
pub use property::{Property, PropertyValues};
pub use scope::SectionScope;
