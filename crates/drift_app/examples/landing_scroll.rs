//! Landing Page Scroll Demo
//!
//! Mounts every section of the landing page and scrolls through it the way
//! a reader would, logging what each section's animations are doing:
//! - Header and hero entrances play on load
//! - Below-the-fold sections reveal as their triggers enter the viewport
//! - The hero background scrubs with scroll position
//! - Scrolling back to the top reverses the reveals
//!
//! Pass a TOML config path as the first argument to override the defaults
//! (viewport size, frame rate, `motion = "reduced"`, log filter).
//!
//! Run with: cargo run -p drift_app --example landing_scroll

use drift_app::prelude::*;
use drift_app::{logging, sections};

/// Pixels scrolled per step
const SCROLL_STEP: f32 = 240.0;

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => DriftConfig::load(path)?,
        None => DriftConfig::standard(),
    };
    logging::init(&config.log_filter);

    let mut page = LandingPage::new(config);
    page.install_global()?;

    let skipped = page.mount_all()?;
    tracing::info!(?page, skipped, "page mounted");

    page.advance(3000.0);
    report(&page);

    // Scroll down to the bottom
    let mut position = 0.0;
    while position < page.max_scroll() {
        position = (position + SCROLL_STEP).min(page.max_scroll());
        let crossings = page.scroll_to(position);
        let active = page.advance(250.0);
        tracing::info!(position, crossings, active, "scrolled");
    }
    page.advance(3000.0);
    report(&page);

    // And back up
    let crossings = page.scroll_to(0.0);
    tracing::info!(crossings, "jumped to top");
    page.advance(3000.0);
    report(&page);

    page.unmount_all();
    tracing::info!(
        tweens = page.scheduler().tween_count(),
        triggers = page.scroll().trigger_count(),
        scrubs = page.scroll().scrub_count(),
        "page unmounted"
    );
    Ok(())
}

/// Log the first element of every role in every section
fn report(page: &LandingPage) {
    for name in sections::PAGE_ORDER {
        let Some(scope) = page.scope(name) else {
            continue;
        };
        for role in scope.roles() {
            if let Some(element) = scope.elements(role).first() {
                tracing::info!(
                    section = name,
                    role,
                    opacity = element.get(Property::Opacity),
                    y = element.get(Property::TranslateY),
                    y_percent = element.get(Property::YPercent),
                    "element"
                );
            }
        }
    }
}
