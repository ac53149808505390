//! Visual elements and weak animation targets
//!
//! A [`VisualElement`] is owned by the section that rendered it (through an
//! `Arc`). The animation layer only ever holds a [`Target`], which wraps a
//! `Weak` reference: once the section drops the element, every target
//! pointing at it reads as detached and writes become no-ops.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::geometry::Bounds;
use crate::property::{Property, PropertyValues};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique element identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An element rendered by a section
///
/// Bounds are written by layout; property values are written by the
/// animation layer. Both sit behind their own lock so a renderer can read
/// values while layout is being refreshed.
pub struct VisualElement {
    id: ElementId,
    role: Arc<str>,
    bounds: RwLock<Bounds>,
    values: RwLock<PropertyValues>,
    /// Number of property writes, used to observe animation activity
    mutations: AtomicU64,
}

impl VisualElement {
    /// Create a new element with default property values
    pub fn new(role: impl Into<Arc<str>>, bounds: Bounds) -> Arc<Self> {
        Arc::new(Self {
            id: ElementId::next(),
            role: role.into(),
            bounds: RwLock::new(bounds),
            values: RwLock::new(PropertyValues::new()),
            mutations: AtomicU64::new(0),
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Structural role the section gave this element (e.g. `"feature-card"`)
    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn bounds(&self) -> Bounds {
        *self.bounds.read()
    }

    /// Update layout bounds (resize, reflow)
    pub fn set_bounds(&self, bounds: Bounds) {
        *self.bounds.write() = bounds;
    }

    pub fn get(&self, property: Property) -> f32 {
        self.values.read().get(property)
    }

    pub fn set(&self, property: Property, value: f32) {
        self.values.write().set(property, value);
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of all property values
    pub fn values(&self) -> PropertyValues {
        *self.values.read()
    }

    /// Total number of property writes so far
    pub fn mutation_count(&self) -> u64 {
        self.mutations.load(Ordering::Relaxed)
    }

    /// Create a weak target pointing at this element
    pub fn target(self: &Arc<Self>) -> Target {
        Target {
            element: Arc::downgrade(self),
            id: self.id,
            role: Arc::clone(&self.role),
        }
    }
}

impl fmt::Debug for VisualElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualElement")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("bounds", &self.bounds())
            .finish()
    }
}

/// A weak reference to a [`VisualElement`]
///
/// Never extends the element's lifetime. Every accessor degrades to `None`
/// or a no-op once the element is gone.
#[derive(Clone)]
pub struct Target {
    element: Weak<VisualElement>,
    id: ElementId,
    role: Arc<str>,
}

impl Target {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn upgrade(&self) -> Option<Arc<VisualElement>> {
        self.element.upgrade()
    }

    /// Check if the element still exists
    pub fn is_attached(&self) -> bool {
        self.element.strong_count() > 0
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.upgrade().map(|e| e.bounds())
    }

    pub fn get(&self, property: Property) -> Option<f32> {
        self.upgrade().map(|e| e.get(property))
    }

    /// Write a property value
    ///
    /// Returns `false` (and writes nothing) if the element has been removed.
    pub fn set(&self, property: Property, value: f32) -> bool {
        match self.upgrade() {
            Some(element) => {
                element.set(property, value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Target {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_does_not_extend_lifetime() {
        let element = VisualElement::new("hero-title", Bounds::new(0.0, 100.0, 800.0, 120.0));
        let target = element.target();

        assert!(target.is_attached());
        assert!(target.set(Property::Opacity, 0.5));
        assert_eq!(element.get(Property::Opacity), 0.5);

        drop(element);

        assert!(!target.is_attached());
        assert!(!target.set(Property::Opacity, 1.0));
        assert_eq!(target.get(Property::Opacity), None);
        assert_eq!(target.bounds(), None);
        assert_eq!(target.role(), "hero-title");
    }

    #[test]
    fn test_mutation_count() {
        let element = VisualElement::new("card", Bounds::default());
        assert_eq!(element.mutation_count(), 0);

        element.set(Property::TranslateY, 10.0);
        element.set(Property::Scale, 0.9);
        assert_eq!(element.mutation_count(), 2);
    }

    #[test]
    fn test_element_ids_are_unique() {
        let a = VisualElement::new("a", Bounds::default());
        let b = VisualElement::new("a", Bounds::default());
        assert_ne!(a.id(), b.id());
        assert_ne!(a.target(), b.target());
    }
}
