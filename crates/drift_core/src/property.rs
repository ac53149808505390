//! Animatable visual properties
//!
//! The animation layer only ever writes this fixed set of properties. It
//! never computes layout, so everything here is a plain `f32` applied on top
//! of the element's laid-out position by whoever renders it.

use std::fmt;

/// A visual property that can be animated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Opacity in `0.0..=1.0`
    Opacity,
    /// Horizontal translation in pixels
    TranslateX,
    /// Vertical translation in pixels
    TranslateY,
    /// Vertical translation as a percentage of the element's height
    YPercent,
    /// Uniform scale multiplier
    Scale,
    /// Horizontal-only scale multiplier
    ScaleX,
    /// Rotation in degrees
    Rotation,
}

impl Property {
    /// Number of animatable properties
    pub const COUNT: usize = 7;

    /// Every property, in storage order
    pub const ALL: [Property; Property::COUNT] = [
        Property::Opacity,
        Property::TranslateX,
        Property::TranslateY,
        Property::YPercent,
        Property::Scale,
        Property::ScaleX,
        Property::Rotation,
    ];

    /// Value an element has before anything animates it
    pub fn default_value(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale | Property::ScaleX => 1.0,
            Property::TranslateX
            | Property::TranslateY
            | Property::YPercent
            | Property::Rotation => 0.0,
        }
    }

    /// Short name used in logs
    pub fn name(self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::TranslateX => "x",
            Property::TranslateY => "y",
            Property::YPercent => "yPercent",
            Property::Scale => "scale",
            Property::ScaleX => "scaleX",
            Property::Rotation => "rotation",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current value of every animatable property of one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyValues {
    values: [f32; Property::COUNT],
}

impl PropertyValues {
    pub fn new() -> Self {
        let mut values = [0.0; Property::COUNT];
        for property in Property::ALL {
            values[property.index()] = property.default_value();
        }
        Self { values }
    }

    pub fn get(&self, property: Property) -> f32 {
        self.values[property.index()]
    }

    pub fn set(&mut self, property: Property, value: f32) {
        self.values[property.index()] = value;
    }

    /// Check whether every property is back at its default
    pub fn is_identity(&self) -> bool {
        Property::ALL
            .iter()
            .all(|p| (self.get(*p) - p.default_value()).abs() < f32::EPSILON)
    }
}

impl Default for PropertyValues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let values = PropertyValues::new();
        assert_eq!(values.get(Property::Opacity), 1.0);
        assert_eq!(values.get(Property::Scale), 1.0);
        assert_eq!(values.get(Property::ScaleX), 1.0);
        assert_eq!(values.get(Property::TranslateY), 0.0);
        assert_eq!(values.get(Property::Rotation), 0.0);
        assert!(values.is_identity());
    }

    #[test]
    fn test_set_is_independent_per_property() {
        let mut values = PropertyValues::new();
        values.set(Property::TranslateY, 50.0);
        values.set(Property::Opacity, 0.0);

        assert_eq!(values.get(Property::TranslateY), 50.0);
        assert_eq!(values.get(Property::Opacity), 0.0);
        assert_eq!(values.get(Property::TranslateX), 0.0);
        assert!(!values.is_identity());
    }
}
