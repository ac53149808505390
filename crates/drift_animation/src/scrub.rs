//! Scroll scrubbing
//!
//! A scrub maps scroll progress through a range straight onto one property,
//! with no time, easing or play state. Used for parallax layers.

use drift_core::{Property, Target, Viewport};
use slotmap::{new_key_type, SlotMap};

use crate::trigger::TriggerPosition;

new_key_type! {
    /// Handle to a registered scrub binding
    pub struct ScrubId;
}

/// The scroll range a scrub covers
#[derive(Clone, Debug)]
pub enum ScrubRange {
    /// Fixed scroll positions
    Fixed { start: f32, end: f32 },
    /// Derived from an element's live bounds, like a trigger
    Trigger {
        trigger: Target,
        start: TriggerPosition,
        end: TriggerPosition,
    },
}

impl ScrubRange {
    /// Range over the whole time `trigger` is in view (`top bottom` to
    /// `bottom top`)
    pub fn while_visible(trigger: Target) -> Self {
        ScrubRange::Trigger {
            trigger,
            start: TriggerPosition::TOP_BOTTOM,
            end: TriggerPosition::BOTTOM_TOP,
        }
    }

    /// Current `(start, end)` scroll positions, `None` once a trigger
    /// element is gone
    pub fn resolve(&self, viewport: &Viewport) -> Option<(f32, f32)> {
        match self {
            ScrubRange::Fixed { start, end } => Some((*start, *end)),
            ScrubRange::Trigger {
                trigger,
                start,
                end,
            } => {
                let bounds = trigger.bounds()?;
                Some((
                    start.scroll_offset(&bounds, viewport),
                    end.scroll_offset(&bounds, viewport),
                ))
            }
        }
    }
}

/// One property scrubbed across a scroll range
#[derive(Clone, Debug)]
pub struct ScrubSpec {
    pub target: Target,
    pub property: Property,
    pub range: ScrubRange,
    /// Value at the start and end of the range
    pub output: (f32, f32),
}

impl ScrubSpec {
    pub fn new(target: Target, property: Property, range: ScrubRange, from: f32, to: f32) -> Self {
        Self {
            target,
            property,
            range,
            output: (from, to),
        }
    }

    /// Value for a scroll position
    pub fn value_at(&self, position: f32, viewport: &Viewport) -> Option<f32> {
        let (start, end) = self.range.resolve(viewport)?;
        let progress = scrub_progress(position, start, end);
        let (from, to) = self.output;
        Some(from + progress * (to - from))
    }
}

/// Linear progress of `position` through `start..end`, clamped to 0..=1
///
/// A degenerate range (`end <= start`) is a step at `start`.
pub fn scrub_progress(position: f32, start: f32, end: f32) -> f32 {
    if end <= start {
        return if position < start { 0.0 } else { 1.0 };
    }
    ((position - start) / (end - start)).clamp(0.0, 1.0)
}

struct ScrubBinding {
    spec: ScrubSpec,
    /// Value the property had before the scrub first wrote it
    original: Option<f32>,
}

/// Every live scrub binding
pub struct ScrollScrubber {
    bindings: SlotMap<ScrubId, ScrubBinding>,
}

impl ScrollScrubber {
    pub fn new() -> Self {
        Self {
            bindings: SlotMap::with_key(),
        }
    }

    pub fn bind(&mut self, spec: ScrubSpec) -> ScrubId {
        let original = spec.target.get(spec.property);
        self.bindings.insert(ScrubBinding { spec, original })
    }

    /// Remove a binding
    ///
    /// With `restore` the property goes back to the value it had when the
    /// binding was made; otherwise it keeps its last written value.
    pub fn unbind(&mut self, id: ScrubId, restore: bool) -> Option<ScrubSpec> {
        let ScrubBinding { spec, original } = self.bindings.remove(id)?;
        if let (true, Some(value)) = (restore, original) {
            spec.target.set(spec.property, value);
        }
        Some(spec)
    }

    /// Write every bound property for `position`
    ///
    /// Returns the number of properties written. Detached targets are
    /// skipped.
    pub fn update(&self, position: f32, viewport: &Viewport) -> usize {
        self.bindings
            .values()
            .map(|binding| &binding.spec)
            .filter(|spec| {
                spec.value_at(position, viewport)
                    .is_some_and(|value| spec.target.set(spec.property, value))
            })
            .count()
    }

    /// Write a single binding (used right after binding it)
    pub fn apply(&self, id: ScrubId, position: f32, viewport: &Viewport) -> bool {
        self.bindings.get(id).is_some_and(|ScrubBinding { spec, .. }| {
            spec.value_at(position, viewport)
                .is_some_and(|value| spec.target.set(spec.property, value))
        })
    }

    pub fn get(&self, id: ScrubId) -> Option<&ScrubSpec> {
        self.bindings.get(id).map(|binding| &binding.spec)
    }

    pub fn contains(&self, id: ScrubId) -> bool {
        self.bindings.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for ScrollScrubber {
    fn default() -> Self {
        Self::new()
    }
}
