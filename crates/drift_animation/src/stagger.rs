//! Stagger sequencing
//!
//! Turns one [`Motion`] and an ordered list of sibling targets into one
//! [`TweenSpec`] per sibling, each starting `each_ms` after the previous.

use drift_core::Target;

use crate::error::{AnimationError, Result};
use crate::tween::{Motion, TweenSpec};

/// Cascading delay between siblings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stagger {
    /// Delay between each sibling's start (ms)
    each_ms: u32,
}

impl Stagger {
    /// Create a stagger with `each_ms` between siblings
    ///
    /// A zero offset is rejected: siblings must start at strictly
    /// increasing times.
    pub fn new(each_ms: u32) -> Result<Self> {
        if each_ms == 0 {
            return Err(AnimationError::InvalidStagger);
        }
        Ok(Self { each_ms })
    }

    pub fn each_ms(&self) -> u32 {
        self.each_ms
    }

    /// Extra delay for the sibling at `index`, `None` if it overflows
    pub fn delay_for_index(&self, index: usize) -> Option<u32> {
        u32::try_from(index).ok()?.checked_mul(self.each_ms)
    }

    /// Build one spec per target, in caller order
    ///
    /// Fails with [`AnimationError::InvalidStagger`] if a delay no longer
    /// fits in a `u32`.
    pub fn apply(&self, targets: &[Target], base: &Motion) -> Result<Vec<TweenSpec>> {
        targets
            .iter()
            .enumerate()
            .map(|(i, target)| {
                let delay = self
                    .delay_for_index(i)
                    .and_then(|extra| base.delay_ms.checked_add(extra))
                    .ok_or(AnimationError::InvalidStagger)?;
                Ok(TweenSpec::new(target.clone(), base.clone().delay(delay)))
            })
            .collect()
    }
}

/// Sequence `base` across `targets` with `each_ms` between starts
///
/// Item `i` gets `base.delay_ms + i * each_ms`; every other field is copied.
///
/// ```rust
/// use drift_animation::{sequence, Motion};
/// use drift_core::{Bounds, Property, VisualElement};
///
/// let cards: Vec<_> = (0..3)
///     .map(|_| VisualElement::new("feature-card", Bounds::default()))
///     .collect();
/// let targets: Vec<_> = cards.iter().map(|c| c.target()).collect();
///
/// let specs = sequence(&targets, &Motion::new(800).from_to(Property::Opacity, 0.0, 1.0), 200).unwrap();
/// let delays: Vec<_> = specs.iter().map(|s| s.motion.delay_ms).collect();
/// assert_eq!(delays, vec![0, 200, 400]);
/// ```
pub fn sequence(targets: &[Target], base: &Motion, each_ms: u32) -> Result<Vec<TweenSpec>> {
    Stagger::new(each_ms)?.apply(targets, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use drift_core::{Bounds, Property, VisualElement};
    use std::sync::Arc;

    fn siblings(n: usize) -> Vec<Arc<VisualElement>> {
        (0..n)
            .map(|i| VisualElement::new("step-card", Bounds::new(i as f32 * 320.0, 0.0, 300.0, 300.0)))
            .collect()
    }

    #[test]
    fn test_four_items_two_hundred_ms() {
        let elements = siblings(4);
        let targets: Vec<_> = elements.iter().map(|e| e.target()).collect();
        let base = Motion::new(800).from_to(Property::Opacity, 0.0, 1.0);

        let specs = sequence(&targets, &base, 200).unwrap();
        let delays: Vec<_> = specs.iter().map(|s| s.motion.delay_ms).collect();
        assert_eq!(delays, vec![0, 200, 400, 600]);
    }

    #[test]
    fn test_base_delay_is_added() {
        let elements = siblings(3);
        let targets: Vec<_> = elements.iter().map(|e| e.target()).collect();
        let base = Motion::new(800)
            .from_to(Property::TranslateY, 20.0, 0.0)
            .delay(1400)
            .easing(Easing::EaseOutCubic);

        let specs = sequence(&targets, &base, 200).unwrap();
        let delays: Vec<_> = specs.iter().map(|s| s.motion.delay_ms).collect();
        assert_eq!(delays, vec![1400, 1600, 1800]);

        // Everything but the delay is copied
        for spec in &specs {
            assert_eq!(spec.motion.duration_ms, 800);
            assert_eq!(spec.motion.easing, Easing::EaseOutCubic);
            assert_eq!(spec.motion.properties, base.properties);
        }
    }

    #[test]
    fn test_preserves_caller_order() {
        let elements = siblings(5);
        let mut targets: Vec<_> = elements.iter().map(|e| e.target()).collect();
        targets.reverse();

        let specs = sequence(&targets, &Motion::new(100), 300).unwrap();
        for (spec, target) in specs.iter().zip(&targets) {
            assert_eq!(spec.target.id(), target.id());
        }
    }

    #[test]
    fn test_delays_strictly_increase() {
        let elements = siblings(12);
        let targets: Vec<_> = elements.iter().map(|e| e.target()).collect();

        for each in [1, 7, 100, 300] {
            let specs = sequence(&targets, &Motion::new(100).delay(50), each).unwrap();
            assert!(specs
                .windows(2)
                .all(|w| w[0].motion.delay_ms < w[1].motion.delay_ms));
        }
    }

    #[test]
    fn test_zero_offset_rejected() {
        let elements = siblings(2);
        let targets: Vec<_> = elements.iter().map(|e| e.target()).collect();
        assert_eq!(
            sequence(&targets, &Motion::new(100), 0).unwrap_err(),
            AnimationError::InvalidStagger
        );
    }

    #[test]
    fn test_overflowing_delay_rejected() {
        let elements = siblings(3);
        let targets: Vec<_> = elements.iter().map(|e| e.target()).collect();

        let stagger = Stagger::new(u32::MAX / 2 + 1).unwrap();
        assert_eq!(stagger.delay_for_index(1), Some(u32::MAX / 2 + 1));
        assert_eq!(stagger.delay_for_index(2), None);
        assert_eq!(
            sequence(&targets, &Motion::new(100), u32::MAX / 2 + 1).unwrap_err(),
            AnimationError::InvalidStagger
        );

        // The base delay counts too
        let late = Motion::new(100).delay(u32::MAX - 100);
        assert_eq!(
            sequence(&targets, &late, 100).unwrap_err(),
            AnimationError::InvalidStagger
        );
    }

    #[test]
    fn test_empty_targets() {
        assert!(sequence(&[], &Motion::new(100), 100).unwrap().is_empty());
    }
}
