//! The landing page sections
//!
//! Each section has a plan (its animation declarations) and a default
//! layout that builds its [`SectionScope`]. Layout here is a fixed stand-in
//! for the real renderer: only the element roles and rough positions matter
//! to the animations.

use drift_animation::Motion;
use drift_core::{Bounds, Property, SectionScope};

use crate::orchestrator::{AmbientDecl, EntranceDecl, ScrubDecl, SectionPlan, TargetSelector, TriggerDecl};

use TargetSelector::{Role, Root};

pub const HEADER: &str = "header";
pub const HERO: &str = "hero";
pub const FEATURES: &str = "features";
pub const HOW_IT_WORKS: &str = "how-it-works";
pub const TESTIMONIALS: &str = "testimonials";
pub const CTA: &str = "cta";

/// Sections in page order
pub const PAGE_ORDER: [&str; 6] = [HEADER, HERO, FEATURES, HOW_IT_WORKS, TESTIMONIALS, CTA];

/// Plan for a section by name
pub fn plan(name: &str) -> Option<SectionPlan> {
    Some(match name {
        HEADER => header(),
        HERO => hero(),
        FEATURES => features(),
        HOW_IT_WORKS => how_it_works(),
        TESTIMONIALS => testimonials(),
        CTA => cta(),
        _ => return None,
    })
}

/// Fade in while moving from `dy` pixels below
fn rise(duration_ms: u32, dy: f32) -> Motion {
    Motion::new(duration_ms)
        .from_to(Property::Opacity, 0.0, 1.0)
        .from_to(Property::TranslateY, dy, 0.0)
}

/// Decorative floating orbs, offset by a second each
fn float_orbs() -> AmbientDecl {
    AmbientDecl {
        target: Role("float-orb"),
        motion: Motion::new(3000)
            .to(Property::TranslateY, -20.0)
            .ping_pong_forever(),
        ease: Some("sine.inOut"),
        stagger_ms: Some(1000),
    }
}

pub fn header() -> SectionPlan {
    SectionPlan::new(HEADER)
        .with(EntranceDecl::new(Role("header-logo"), rise(1000, -30.0).delay(200)))
        .with(EntranceDecl::new(Role("nav-link"), rise(800, -20.0).delay(400)).stagger(100))
}

pub fn hero() -> SectionPlan {
    SectionPlan::new(HERO)
        .with(EntranceDecl::new(Role("hero-title"), rise(1200, 50.0).delay(500)))
        .with(EntranceDecl::new(Role("hero-subtitle"), rise(1000, 30.0).delay(800)))
        .with(EntranceDecl::new(Role("hero-buttons"), rise(800, 20.0).delay(1100)))
        .with(
            EntranceDecl::new(
                Role("hero-features"),
                Motion::new(800)
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .from_to(Property::Scale, 0.9, 1.0)
                    .delay(1400),
            )
            .stagger(200),
        )
        .with(ScrubDecl {
            target: Role("hero-bg"),
            property: Property::YPercent,
            from: 0.0,
            to: -20.0,
            trigger: Root,
            start: "top bottom",
            end: "bottom top",
        })
        .with(AmbientDecl {
            target: Role("hero-image-container"),
            motion: Motion::new(3000)
                .to(Property::TranslateY, 15.0)
                .ping_pong_forever(),
            ease: Some("power2.inOut"),
            stagger_ms: None,
        })
}

pub fn features() -> SectionPlan {
    SectionPlan::new(FEATURES)
        .with(
            EntranceDecl::new(Role("features-title"), rise(1000, 50.0))
                .on(TriggerDecl::new(Role("features-title"), "top 80%").end("bottom 20%")),
        )
        .with(
            EntranceDecl::new(
                Role("feature-card"),
                rise(800, 80.0).from_to(Property::Scale, 0.9, 1.0),
            )
            .stagger(200)
            .on(TriggerDecl::new(Role("features-grid"), "top 70%").end("bottom 30%")),
        )
        .with(
            EntranceDecl::new(
                Role("app-mockup"),
                Motion::new(1200)
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .from_to(Property::TranslateX, 100.0, 0.0)
                    .from_to(Property::Rotation, 5.0, 0.0),
            )
            .on(TriggerDecl::new(Role("app-mockup"), "top 80%").end("bottom 20%")),
        )
        .with(float_orbs())
}

pub fn how_it_works() -> SectionPlan {
    SectionPlan::new(HOW_IT_WORKS)
        .with(
            EntranceDecl::new(Role("how-title"), rise(1000, 50.0))
                .on(TriggerDecl::new(Role("how-title"), "top 80%")),
        )
        .with(
            EntranceDecl::new(
                Role("step-card"),
                rise(800, 100.0).from_to(Property::Scale, 0.8, 1.0),
            )
            .stagger(300)
            .on(TriggerDecl::new(Role("steps-container"), "top 70%")),
        )
        .with(
            EntranceDecl::new(
                Role("connection-line"),
                Motion::new(800).from_to(Property::ScaleX, 0.0, 1.0),
            )
            .stagger(300)
            .on(TriggerDecl::new(Role("steps-container"), "top 60%")),
        )
}

pub fn testimonials() -> SectionPlan {
    SectionPlan::new(TESTIMONIALS)
        .with(
            EntranceDecl::new(Role("testimonials-title"), rise(1000, 50.0))
                .on(TriggerDecl::new(Role("testimonials-title"), "top 80%")),
        )
        .with(
            EntranceDecl::new(
                Role("testimonial-card"),
                rise(800, 80.0).from_to(Property::Rotation, 2.0, 0.0),
            )
            .stagger(200)
            .on(TriggerDecl::new(Role("testimonials-grid"), "top 70%")),
        )
}

pub fn cta() -> SectionPlan {
    SectionPlan::new(CTA)
        .with(
            EntranceDecl::new(Role("cta-content"), rise(1000, 50.0))
                .on(TriggerDecl::new(Root, "top 80%")),
        )
        .with(
            EntranceDecl::new(
                Role("stat-item"),
                Motion::new(600)
                    .from_to(Property::Opacity, 0.0, 1.0)
                    .from_to(Property::Scale, 0.8, 1.0),
            )
            .stagger(100)
            .on(TriggerDecl::new(Role("stats-container"), "top 85%")),
        )
        .with(
            EntranceDecl::new(Role("cta-button"), rise(800, 30.0))
                .stagger(200)
                .on(TriggerDecl::new(Role("cta-buttons"), "top 85%")),
        )
        .with(float_orbs())
}

// ============================================================================
// Default layout
// ============================================================================

/// Height of a section in the default layout
pub fn section_height(name: &str, viewport_height: f32) -> f32 {
    match name {
        HEADER => 80.0,
        HERO => viewport_height.max(720.0),
        FEATURES => 1400.0,
        HOW_IT_WORKS => 1100.0,
        TESTIMONIALS => 900.0,
        CTA => 1000.0,
        _ => 0.0,
    }
}

/// Build the scope of a section placed at document position `top`
///
/// Positions inside a section are relative offsets from its top. The hero
/// renders no `hero-image-container`, so its float loop finds no target.
pub fn layout(name: &str, top: f32, width: f32, viewport_height: f32) -> Option<SectionScope> {
    let height = section_height(name, viewport_height);
    let mut scope = SectionScope::new(name, Bounds::new(0.0, top, width, height));
    let at = |x: f32, y: f32, w: f32, h: f32| Bounds::new(x, top + y, w, h);

    match name {
        HEADER => {
            scope.insert("header-logo", at(32.0, 20.0, 160.0, 40.0));
            for i in 0..4 {
                scope.insert("nav-link", at(width - 520.0 + i as f32 * 120.0, 24.0, 100.0, 32.0));
            }
        }
        HERO => {
            scope.insert("hero-bg", at(0.0, 0.0, width, height));
            scope.insert("hero-title", at(160.0, 180.0, width - 320.0, 140.0));
            scope.insert("hero-subtitle", at(240.0, 340.0, width - 480.0, 60.0));
            scope.insert("hero-buttons", at(440.0, 430.0, width - 880.0, 56.0));
            for i in 0..3 {
                scope.insert("hero-features", at(160.0 + i as f32 * 330.0, 540.0, 300.0, 120.0));
            }
        }
        FEATURES => {
            scope.insert("features-title", at(240.0, 80.0, width - 480.0, 80.0));
            scope.insert("features-grid", at(80.0, 240.0, 560.0, 900.0));
            for i in 0..6 {
                let (col, row) = ((i % 2) as f32, (i / 2) as f32);
                scope.insert("feature-card", at(80.0 + col * 290.0, 240.0 + row * 300.0, 270.0, 280.0));
            }
            scope.insert("app-mockup", at(720.0, 300.0, 420.0, 760.0));
            for i in 0..3 {
                scope.insert("float-orb", at(700.0 + i as f32 * 220.0, 260.0 + i as f32 * 300.0, 48.0, 48.0));
            }
        }
        HOW_IT_WORKS => {
            scope.insert("how-title", at(240.0, 80.0, width - 480.0, 80.0));
            scope.insert("steps-container", at(80.0, 240.0, width - 160.0, 700.0));
            for i in 0..3 {
                let x = 80.0 + i as f32 * 380.0;
                scope.insert("step-card", at(x, 240.0, 340.0, 420.0));
                if i < 2 {
                    scope.insert("connection-line", at(x + 340.0, 320.0, 40.0, 2.0));
                }
            }
        }
        TESTIMONIALS => {
            scope.insert("testimonials-title", at(240.0, 80.0, width - 480.0, 80.0));
            scope.insert("testimonials-grid", at(80.0, 240.0, width - 160.0, 560.0));
            for i in 0..3 {
                scope.insert("testimonial-card", at(80.0 + i as f32 * 380.0, 240.0, 340.0, 300.0));
            }
        }
        CTA => {
            scope.insert("cta-content", at(240.0, 100.0, width - 480.0, 240.0));
            scope.insert("stats-container", at(160.0, 400.0, width - 320.0, 140.0));
            for i in 0..4 {
                scope.insert("stat-item", at(160.0 + i as f32 * 250.0, 400.0, 220.0, 140.0));
            }
            scope.insert("cta-buttons", at(400.0, 620.0, width - 800.0, 72.0));
            for i in 0..2 {
                scope.insert("cta-button", at(400.0 + i as f32 * 250.0, 620.0, 220.0, 72.0));
            }
            for i in 0..3 {
                scope.insert("float-orb", at(60.0 + i as f32 * 500.0, 80.0 + i as f32 * 260.0, 64.0, 64.0));
            }
        }
        _ => return None,
    }
    Some(scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::AnimationDecl;

    #[test]
    fn test_every_section_has_plan_and_layout() {
        for name in PAGE_ORDER {
            let plan = plan(name).unwrap();
            assert_eq!(plan.name, name);
            assert!(!plan.decls.is_empty());
            let scope = layout(name, 0.0, 1280.0, 800.0).unwrap();
            assert_eq!(scope.name(), name);
        }
        assert!(plan("footer").is_none());
        assert!(layout("footer", 0.0, 1280.0, 800.0).is_none());
    }

    #[test]
    fn test_triggered_entrances_use_reverse_on_leave_back() {
        for name in PAGE_ORDER {
            for decl in plan(name).unwrap().decls {
                if let AnimationDecl::Entrance(entrance) = decl {
                    if let Some(trigger) = entrance.trigger {
                        assert_eq!(trigger.actions, "play none none reverse");
                    }
                }
            }
        }
    }

    #[test]
    fn test_layout_is_relative_to_top() {
        let scope = layout(CTA, 5000.0, 1280.0, 800.0).unwrap();
        assert_eq!(scope.root_bounds().y, 5000.0);
        assert_eq!(scope.elements("cta-content")[0].bounds().y, 5100.0);
        assert_eq!(scope.query("stat-item").len(), 4);
    }
}
