//! Landing page host
//!
//! Owns the scheduler and scroll runtime, lays the sections out top to
//! bottom, and mounts each one through the orchestrator. The embedding
//! renderer forwards scroll positions to [`LandingPage::scroll_to`] and
//! frame time to [`LandingPage::tick`].

use drift_animation::{
    set_global_scheduler, set_global_scroll_runtime, AnimationScheduler, ScrollRuntime,
};
use drift_core::SectionScope;
use rustc_hash::FxHashMap;

use crate::config::DriftConfig;
use crate::error::{DriftError, Result};
use crate::orchestrator::{MountedSection, Orchestrator};
use crate::sections;

/// The whole page: six sections and their live animations
pub struct LandingPage {
    // Declared first so sections revert before the runtimes go away
    mounted: FxHashMap<&'static str, MountedSection>,
    scopes: Vec<SectionScope>,
    orchestrator: Orchestrator,
    scroll: ScrollRuntime,
    scheduler: AnimationScheduler,
    config: DriftConfig,
    document_height: f32,
}

impl LandingPage {
    /// Lay out every section; nothing is mounted yet
    pub fn new(config: DriftConfig) -> Self {
        let scheduler = AnimationScheduler::new();
        scheduler.set_target_fps(config.target_fps);
        let scroll = ScrollRuntime::new(scheduler.handle(), config.viewport());
        let orchestrator = Orchestrator::new(scroll.handle(), config.motion);

        let mut top = 0.0;
        let mut scopes = Vec::with_capacity(sections::PAGE_ORDER.len());
        for name in sections::PAGE_ORDER {
            if let Some(scope) =
                sections::layout(name, top, config.viewport_width, config.viewport_height)
            {
                top += scope.root_bounds().height;
                scopes.push(scope);
            }
        }
        tracing::debug!(sections = scopes.len(), document_height = top, "laid out page");

        Self {
            mounted: FxHashMap::default(),
            scopes,
            orchestrator,
            scroll,
            scheduler,
            config,
            document_height: top,
        }
    }

    /// Make this page's runtimes the process-wide ones
    pub fn install_global(&self) -> Result<()> {
        set_global_scheduler(self.scheduler.handle())?;
        set_global_scroll_runtime(self.scroll.handle())?;
        Ok(())
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn scroll(&self) -> &ScrollRuntime {
        &self.scroll
    }

    pub fn scope(&self, name: &str) -> Option<&SectionScope> {
        self.scopes.iter().find(|s| s.name() == name)
    }

    pub fn mounted(&self, name: &str) -> Option<&MountedSection> {
        self.mounted.get(name)
    }

    pub fn is_mounted(&self, name: &str) -> bool {
        self.mounted.contains_key(name)
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    /// Largest scroll position that still fills the viewport
    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.config.viewport_height).max(0.0)
    }

    /// Document position of a section's top edge
    pub fn section_top(&self, name: &str) -> Option<f32> {
        self.scope(name).map(|s| s.root_bounds().y)
    }

    /// Mount a section, replacing its previous mount if any
    ///
    /// Returns the number of skipped registrations.
    pub fn mount(&mut self, name: &str) -> Result<usize> {
        let plan = sections::plan(name).ok_or_else(|| DriftError::UnknownSection(name.to_string()))?;
        let scope = self
            .scopes
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| DriftError::UnknownSection(name.to_string()))?;

        if let Some(previous) = self.mounted.remove(plan.name) {
            previous.unmount();
        }
        let mounted = self.orchestrator.mount(&plan, scope);
        let skipped = mounted.skipped().len();
        self.mounted.insert(plan.name, mounted);
        Ok(skipped)
    }

    /// Mount every section in page order; returns total skipped registrations
    pub fn mount_all(&mut self) -> Result<usize> {
        let mut skipped = 0;
        for name in sections::PAGE_ORDER {
            skipped += self.mount(name)?;
        }
        tracing::debug!(skipped, "mounted page");
        Ok(skipped)
    }

    /// Revert a section's animations; false if it was not mounted
    pub fn unmount(&mut self, name: &str) -> bool {
        match self.mounted.remove(name) {
            Some(mounted) => {
                mounted.unmount();
                true
            }
            None => false,
        }
    }

    pub fn unmount_all(&mut self) {
        for (_, mounted) in self.mounted.drain() {
            mounted.unmount();
        }
    }

    /// Unmount and mount again, as on a re-render
    pub fn remount(&mut self, name: &str) -> Result<usize> {
        self.unmount(name);
        self.mount(name)
    }

    /// Forward a scroll position (clamped to the page)
    ///
    /// Returns the number of trigger crossings delivered.
    pub fn scroll_to(&self, position: f32) -> usize {
        let position = position.clamp(0.0, self.max_scroll());
        self.scroll.update(position)
    }

    /// Advance animations by one frame of `dt_ms`
    pub fn tick(&self, dt_ms: f32) -> bool {
        self.scheduler.tick(dt_ms)
    }

    /// Advance animations by `duration_ms` in frames of the target rate
    ///
    /// Returns true if animations are still running afterwards.
    pub fn advance(&self, duration_ms: f32) -> bool {
        let frame = self.config.frame_ms();
        let mut remaining = duration_ms;
        let mut active = self.scheduler.has_active_animations();
        while remaining > 0.0 {
            let dt = remaining.min(frame);
            active = self.scheduler.tick(dt);
            remaining -= dt;
        }
        active
    }
}

impl std::fmt::Debug for LandingPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandingPage")
            .field("sections", &self.scopes.len())
            .field("mounted", &self.mounted.len())
            .field("document_height", &self.document_height)
            .finish()
    }
}
