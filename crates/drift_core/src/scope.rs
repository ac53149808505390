//! Section scopes
//!
//! A [`SectionScope`] is the root element of one page section plus every
//! element rendered inside it, grouped by structural role. It owns the
//! elements strongly; queries hand out weak [`Target`]s in document order.

use std::sync::Arc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::element::{Target, VisualElement};
use crate::geometry::Bounds;

/// The elements of one mounted section
pub struct SectionScope {
    name: String,
    root: Arc<VisualElement>,
    /// Elements by role, each list in document (insertion) order
    elements: IndexMap<String, Vec<Arc<VisualElement>>>,
}

impl SectionScope {
    /// Create a scope whose root element covers `bounds`
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        let name = name.into();
        let root = VisualElement::new(name.as_str(), bounds);
        Self {
            name,
            root,
            elements: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target for the section root
    pub fn root(&self) -> Target {
        self.root.target()
    }

    pub fn root_bounds(&self) -> Bounds {
        self.root.bounds()
    }

    /// Add an element with the given role, after any existing ones
    pub fn insert(&mut self, role: &str, bounds: Bounds) -> Arc<VisualElement> {
        let element = VisualElement::new(role, bounds);
        self.elements
            .entry(role.to_string())
            .or_default()
            .push(Arc::clone(&element));
        element
    }

    /// All elements with the given role, in document order
    ///
    /// Returns an empty list when nothing matches.
    pub fn query(&self, role: &str) -> SmallVec<[Target; 8]> {
        self.elements
            .get(role)
            .map(|list| list.iter().map(|e| e.target()).collect())
            .unwrap_or_default()
    }

    /// First element with the given role
    pub fn query_one(&self, role: &str) -> Option<Target> {
        self.elements
            .get(role)
            .and_then(|list| list.first())
            .map(|e| e.target())
    }

    /// Strong access to the elements with a role (for renderers and layout)
    pub fn elements(&self, role: &str) -> &[Arc<VisualElement>] {
        self.elements.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove every element with the given role
    ///
    /// Targets already handed out become detached.
    pub fn remove(&mut self, role: &str) -> usize {
        let removed = self
            .elements
            .shift_remove(role)
            .map(|list| list.len())
            .unwrap_or(0);
        if removed > 0 {
            tracing::debug!(scope = %self.name, role, removed, "detached elements");
        }
        removed
    }

    /// Move the whole section (root and children) vertically
    pub fn shift_y(&self, dy: f32) {
        let shift = |element: &Arc<VisualElement>| {
            let mut bounds = element.bounds();
            bounds.y += dy;
            element.set_bounds(bounds);
        };
        shift(&self.root);
        for list in self.elements.values() {
            list.iter().for_each(&shift);
        }
    }

    /// Roles present in this scope, in first-insertion order
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Total number of child elements
    pub fn len(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
