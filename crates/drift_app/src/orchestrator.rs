//! Section orchestration
//!
//! A [`SectionPlan`] is the fixed list of animations one section declares.
//! The [`Orchestrator`] mounts a plan against a [`SectionScope`]: it opens one
//! [`AnimationContext`], issues every registration, then syncs triggers so a
//! section mounted mid-page starts in the right state. The returned
//! [`MountedSection`] is the single release.

use drift_animation::{
    sequence, AnimationContext, AnimationError, Easing, Motion, RestartMode, ScrollHandle,
    ScrubRange, ScrubSpec, ToggleActions, TriggerConfig, TriggerConsumer, TriggerPosition,
    TweenId, TweenSpec,
};
use drift_core::{Property, SectionScope, Target};
use smallvec::{smallvec, SmallVec};

use crate::config::MotionPreference;

type AnimationResult<T> = std::result::Result<T, AnimationError>;

/// Which element(s) of a section a declaration refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetSelector {
    /// The section's root element
    Root,
    /// Every element with this role, in document order
    Role(&'static str),
}

impl TargetSelector {
    fn resolve(&self, scope: &SectionScope) -> AnimationResult<SmallVec<[Target; 8]>> {
        let targets = match self {
            TargetSelector::Root => smallvec![scope.root()],
            TargetSelector::Role(role) => scope.query(role),
        };
        if targets.is_empty() {
            return Err(AnimationError::MissingTarget(self.describe(scope)));
        }
        Ok(targets)
    }

    fn resolve_one(&self, scope: &SectionScope) -> AnimationResult<Target> {
        match self {
            TargetSelector::Root => Ok(scope.root()),
            TargetSelector::Role(role) => scope
                .query_one(role)
                .ok_or_else(|| AnimationError::MissingTarget(self.describe(scope))),
        }
    }

    fn describe(&self, scope: &SectionScope) -> String {
        match self {
            TargetSelector::Root => scope.name().to_string(),
            TargetSelector::Role(role) => format!("{} .{}", scope.name(), role),
        }
    }
}

/// When a triggered entrance plays
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerDecl {
    pub on: TargetSelector,
    pub start: &'static str,
    /// Defaults to `bottom top`
    pub end: Option<&'static str>,
    pub actions: &'static str,
    pub restart_mode: RestartMode,
}

impl TriggerDecl {
    /// Trigger on `on` at `start`, playing in and reversing when scrolled
    /// back above
    pub fn new(on: TargetSelector, start: &'static str) -> Self {
        Self {
            on,
            start,
            end: None,
            actions: "play none none reverse",
            restart_mode: RestartMode::Staggered,
        }
    }

    pub fn end(mut self, end: &'static str) -> Self {
        self.end = Some(end);
        self
    }

    pub fn actions(mut self, actions: &'static str) -> Self {
        self.actions = actions;
        self
    }

    pub fn restart_mode(mut self, mode: RestartMode) -> Self {
        self.restart_mode = mode;
        self
    }

    fn build(&self, scope: &SectionScope) -> AnimationResult<TriggerConfig> {
        let trigger = self.on.resolve_one(scope)?;
        let start: TriggerPosition = self.start.parse()?;
        let end = match self.end {
            Some(end) => end.parse()?,
            None => TriggerPosition::BOTTOM_TOP,
        };
        let actions: ToggleActions = self.actions.parse()?;
        Ok(TriggerConfig::new(trigger)
            .start(start)
            .end(end)
            .toggle_actions(actions)
            .restart_mode(self.restart_mode))
    }
}

/// Content animating in, on mount or when its trigger fires
#[derive(Clone, Debug, PartialEq)]
pub struct EntranceDecl {
    pub target: TargetSelector,
    pub motion: Motion,
    /// Easing identifier overriding the motion's curve
    pub ease: Option<&'static str>,
    pub stagger_ms: Option<u32>,
    pub trigger: Option<TriggerDecl>,
}

impl EntranceDecl {
    pub fn new(target: TargetSelector, motion: Motion) -> Self {
        Self {
            target,
            motion,
            ease: None,
            stagger_ms: None,
            trigger: None,
        }
    }

    pub fn ease(mut self, ease: &'static str) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn stagger(mut self, each_ms: u32) -> Self {
        self.stagger_ms = Some(each_ms);
        self
    }

    pub fn on(mut self, trigger: TriggerDecl) -> Self {
        self.trigger = Some(trigger);
        self
    }
}

/// A property scrubbed by scroll across a trigger element's range
#[derive(Clone, Debug, PartialEq)]
pub struct ScrubDecl {
    pub target: TargetSelector,
    pub property: Property,
    pub from: f32,
    pub to: f32,
    pub trigger: TargetSelector,
    pub start: &'static str,
    pub end: &'static str,
}

/// A decorative loop that starts on mount and runs until unmount
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientDecl {
    pub target: TargetSelector,
    pub motion: Motion,
    pub ease: Option<&'static str>,
    pub stagger_ms: Option<u32>,
}

/// One registration in a section plan
#[derive(Clone, Debug, PartialEq)]
pub enum AnimationDecl {
    Entrance(EntranceDecl),
    Scrub(ScrubDecl),
    Ambient(AmbientDecl),
}

impl From<EntranceDecl> for AnimationDecl {
    fn from(decl: EntranceDecl) -> Self {
        AnimationDecl::Entrance(decl)
    }
}

impl From<ScrubDecl> for AnimationDecl {
    fn from(decl: ScrubDecl) -> Self {
        AnimationDecl::Scrub(decl)
    }
}

impl From<AmbientDecl> for AnimationDecl {
    fn from(decl: AmbientDecl) -> Self {
        AnimationDecl::Ambient(decl)
    }
}

/// The declarative animation list of one section
#[derive(Clone, Debug, PartialEq)]
pub struct SectionPlan {
    pub name: &'static str,
    pub decls: Vec<AnimationDecl>,
}

impl SectionPlan {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            decls: Vec::new(),
        }
    }

    pub fn with(mut self, decl: impl Into<AnimationDecl>) -> Self {
        self.decls.push(decl.into());
        self
    }
}

/// A section whose animations are live
///
/// Dropping it reverts the animations too; [`unmount`](Self::unmount) makes
/// the release explicit.
#[derive(Debug)]
pub struct MountedSection {
    name: &'static str,
    context: AnimationContext,
    skipped: Vec<AnimationError>,
}

impl MountedSection {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn context(&self) -> &AnimationContext {
        &self.context
    }

    /// Registrations that were skipped, with the reason
    pub fn skipped(&self) -> &[AnimationError] {
        &self.skipped
    }

    /// Revert every animation of this section
    pub fn unmount(mut self) {
        tracing::debug!(section = self.name, "unmounting section");
        self.context.revert();
    }
}

/// Mounts section plans onto the scroll runtime
#[derive(Clone, Debug)]
pub struct Orchestrator {
    scroll: ScrollHandle,
    motion: MotionPreference,
}

impl Orchestrator {
    pub fn new(scroll: ScrollHandle, motion: MotionPreference) -> Self {
        Self { scroll, motion }
    }

    /// Use the process-wide scroll runtime
    pub fn from_global(motion: MotionPreference) -> Option<Self> {
        drift_animation::try_get_scroll_runtime().map(|scroll| Self::new(scroll, motion))
    }

    pub fn motion(&self) -> MotionPreference {
        self.motion
    }

    /// Register every declaration of `plan` against `scope`
    ///
    /// A declaration that fails (missing element, bad position string) is
    /// skipped and logged; the rest still register. Triggers are synced
    /// against the current scroll position once everything is registered.
    pub fn mount(&self, plan: &SectionPlan, scope: &SectionScope) -> MountedSection {
        let mut context = AnimationContext::open(plan.name, self.scroll.clone());
        let mut skipped = Vec::new();

        for (index, decl) in plan.decls.iter().enumerate() {
            if let Err(err) = self.register(&mut context, scope, decl) {
                tracing::warn!(section = plan.name, index, error = %err, "skipped animation");
                skipped.push(err);
            }
        }

        let crossings = self.scroll.sync();
        tracing::debug!(
            section = plan.name,
            registered = context.tracked().len(),
            skipped = skipped.len(),
            crossings,
            "mounted section"
        );

        MountedSection {
            name: plan.name,
            context,
            skipped,
        }
    }

    fn register(
        &self,
        context: &mut AnimationContext,
        scope: &SectionScope,
        decl: &AnimationDecl,
    ) -> AnimationResult<()> {
        match decl {
            AnimationDecl::Entrance(entrance) => self.register_entrance(context, scope, entrance),
            AnimationDecl::Scrub(scrub) => self.register_scrub(context, scope, scrub),
            AnimationDecl::Ambient(ambient) => self.register_ambient(context, scope, ambient),
        }
    }

    fn register_entrance(
        &self,
        context: &mut AnimationContext,
        scope: &SectionScope,
        decl: &EntranceDecl,
    ) -> AnimationResult<()> {
        // Resolve and parse everything before registering anything
        let targets = decl.target.resolve(scope)?;
        let trigger = decl
            .trigger
            .as_ref()
            .map(|trigger| trigger.build(scope))
            .transpose()?;
        let mut motion = with_ease(&decl.motion, decl.ease)?;

        let specs = if self.motion.is_reduced() {
            motion = motion.instant();
            targets
                .iter()
                .map(|t| TweenSpec::new(t.clone(), motion.clone()))
                .collect()
        } else {
            build_specs(&targets, &motion, decl.stagger_ms)?
        };

        let ids = register_tweens(context, specs)?;
        match trigger {
            Some(config) => {
                context
                    .trigger(config, TriggerConsumer::tweens(ids))
                    .ok_or(AnimationError::RuntimeGone)?;
            }
            None => {
                for id in ids {
                    context.scheduler().play(id);
                }
            }
        }
        Ok(())
    }

    fn register_scrub(
        &self,
        context: &mut AnimationContext,
        scope: &SectionScope,
        decl: &ScrubDecl,
    ) -> AnimationResult<()> {
        if self.motion.is_reduced() {
            tracing::debug!(section = scope.name(), "reduced motion: scrub not registered");
            return Ok(());
        }
        let targets = decl.target.resolve(scope)?;
        let trigger = decl.trigger.resolve_one(scope)?;
        let start: TriggerPosition = decl.start.parse()?;
        let end: TriggerPosition = decl.end.parse()?;

        for target in targets {
            let range = ScrubRange::Trigger {
                trigger: trigger.clone(),
                start,
                end,
            };
            context
                .scrub(ScrubSpec::new(target, decl.property, range, decl.from, decl.to))
                .ok_or(AnimationError::RuntimeGone)?;
        }
        Ok(())
    }

    fn register_ambient(
        &self,
        context: &mut AnimationContext,
        scope: &SectionScope,
        decl: &AmbientDecl,
    ) -> AnimationResult<()> {
        if self.motion.is_reduced() {
            tracing::debug!(section = scope.name(), "reduced motion: loop not registered");
            return Ok(());
        }
        let targets = decl.target.resolve(scope)?;
        let motion = with_ease(&decl.motion, decl.ease)?;
        let specs = build_specs(&targets, &motion, decl.stagger_ms)?;

        // Loops are never trigger-gated
        for id in register_tweens(context, specs)? {
            context.scheduler().play(id);
        }
        Ok(())
    }
}

fn with_ease(motion: &Motion, ease: Option<&str>) -> AnimationResult<Motion> {
    let mut motion = motion.clone();
    if let Some(ease) = ease {
        motion.easing = ease.parse::<Easing>()?;
    }
    Ok(motion)
}

fn build_specs(
    targets: &[Target],
    motion: &Motion,
    stagger_ms: Option<u32>,
) -> AnimationResult<Vec<TweenSpec>> {
    match stagger_ms {
        Some(each) => sequence(targets, motion, each),
        None => Ok(targets
            .iter()
            .map(|t| TweenSpec::new(t.clone(), motion.clone()))
            .collect()),
    }
}

fn register_tweens(
    context: &mut AnimationContext,
    specs: Vec<TweenSpec>,
) -> AnimationResult<SmallVec<[TweenId; 4]>> {
    let mut ids = SmallVec::new();
    for spec in specs {
        ids.push(context.tween(spec).ok_or(AnimationError::RuntimeGone)?);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_animation::{AnimationScheduler, ScrollRuntime, TweenState};
    use drift_core::{Bounds, Viewport};

    fn runtime() -> (AnimationScheduler, ScrollRuntime) {
        let scheduler = AnimationScheduler::new();
        let scroll = ScrollRuntime::new(scheduler.handle(), Viewport::new(1280.0, 800.0));
        (scheduler, scroll)
    }

    fn fade_in(duration_ms: u32) -> Motion {
        Motion::new(duration_ms).from_to(Property::Opacity, 0.0, 1.0)
    }

    fn cards_scope() -> SectionScope {
        let mut scope = SectionScope::new("features", Bounds::new(0.0, 2000.0, 1280.0, 1000.0));
        scope.insert("features-title", Bounds::new(0.0, 2100.0, 800.0, 80.0));
        for i in 0..4 {
            scope.insert("feature-card", Bounds::new(i as f32 * 300.0, 2300.0, 280.0, 200.0));
        }
        scope
    }

    #[test]
    fn test_missing_target_does_not_block_others() {
        let (scheduler, scroll) = runtime();
        let scope = cards_scope();
        let plan = SectionPlan::new("features")
            .with(EntranceDecl::new(TargetSelector::Role("app-mockup"), fade_in(1200)))
            .with(EntranceDecl::new(TargetSelector::Role("feature-card"), fade_in(800)).stagger(200));

        let orchestrator = Orchestrator::new(scroll.handle(), MotionPreference::Full);
        let mounted = orchestrator.mount(&plan, &scope);

        assert_eq!(
            mounted.skipped(),
            &[AnimationError::MissingTarget("features .app-mockup".to_string())]
        );
        assert_eq!(scheduler.tween_count(), 4);
        mounted.unmount();
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn test_bad_declaration_registers_nothing() {
        let (scheduler, scroll) = runtime();
        let scope = cards_scope();
        let plan = SectionPlan::new("features").with(
            EntranceDecl::new(TargetSelector::Role("feature-card"), fade_in(800))
                .on(TriggerDecl::new(TargetSelector::Root, "top eighty")),
        );

        let mounted = Orchestrator::new(scroll.handle(), MotionPreference::Full).mount(&plan, &scope);
        assert!(matches!(
            mounted.skipped(),
            [AnimationError::InvalidPosition(_)]
        ));
        assert_eq!(scheduler.tween_count(), 0);
        assert_eq!(scroll.trigger_count(), 0);
        // Cards were never hidden
        assert_eq!(scope.elements("feature-card")[0].get(Property::Opacity), 1.0);
    }

    #[test]
    fn test_staggered_trigger_entrance() {
        let (scheduler, scroll) = runtime();
        let scope = cards_scope();
        let plan = SectionPlan::new("features").with(
            EntranceDecl::new(TargetSelector::Role("feature-card"), fade_in(800))
                .stagger(200)
                .on(TriggerDecl::new(TargetSelector::Root, "top 70%")),
        );
        let mounted = Orchestrator::new(scroll.handle(), MotionPreference::Full).mount(&plan, &scope);
        assert!(mounted.skipped().is_empty());

        let cards = scope.elements("feature-card");
        assert!(cards.iter().all(|c| c.get(Property::Opacity) == 0.0));

        // start = 2000 - 560
        scroll.update(1500.0);
        scheduler.tick(100.0);
        assert!(cards[0].get(Property::Opacity) > 0.0);
        assert_eq!(cards[1].get(Property::Opacity), 0.0);

        scheduler.tick(200.0);
        assert!(cards[1].get(Property::Opacity) > 0.0);
        assert_eq!(cards[3].get(Property::Opacity), 0.0);
    }

    #[test]
    fn test_untriggered_entrance_plays_on_mount() {
        let (scheduler, scroll) = runtime();
        let scope = cards_scope();
        let plan = SectionPlan::new("features").with(EntranceDecl::new(
            TargetSelector::Role("features-title"),
            fade_in(1000).delay(200),
        ));
        let mounted = Orchestrator::new(scroll.handle(), MotionPreference::Full).mount(&plan, &scope);
        let tween = first_tween(&mounted);
        assert_eq!(scheduler.handle().tween_state(tween), Some(TweenState::Delayed));
    }

    #[test]
    fn test_reduced_motion() {
        let (scheduler, scroll) = runtime();
        let mut scope = cards_scope();
        scope.insert("float-orb", Bounds::new(0.0, 2050.0, 40.0, 40.0));
        let plan = SectionPlan::new("features")
            .with(EntranceDecl::new(TargetSelector::Role("feature-card"), fade_in(800)).stagger(200))
            .with(AmbientDecl {
                target: TargetSelector::Role("float-orb"),
                motion: Motion::new(3000).to(Property::TranslateY, -20.0).ping_pong_forever(),
                ease: Some("sine.inOut"),
                stagger_ms: Some(1000),
            })
            .with(ScrubDecl {
                target: TargetSelector::Root,
                property: Property::YPercent,
                from: 0.0,
                to: -20.0,
                trigger: TargetSelector::Root,
                start: "top bottom",
                end: "bottom top",
            });

        let mounted =
            Orchestrator::new(scroll.handle(), MotionPreference::Reduced).mount(&plan, &scope);
        assert!(mounted.skipped().is_empty());
        assert_eq!(scheduler.tween_count(), 4);
        assert_eq!(scroll.scrub_count(), 0);

        scheduler.tick(0.0);
        assert!(scope
            .elements("feature-card")
            .iter()
            .all(|c| c.get(Property::Opacity) == 1.0));
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_unknown_ease_is_skipped() {
        let (_scheduler, scroll) = runtime();
        let scope = cards_scope();
        let plan = SectionPlan::new("features").with(
            EntranceDecl::new(TargetSelector::Role("features-title"), fade_in(1000)).ease("wobble"),
        );
        let mounted = Orchestrator::new(scroll.handle(), MotionPreference::Full).mount(&plan, &scope);
        assert_eq!(
            mounted.skipped(),
            &[AnimationError::UnknownEasing("wobble".to_string())]
        );
    }

    fn first_tween(mounted: &MountedSection) -> TweenId {
        match mounted.context().tracked().first() {
            Some(drift_animation::TrackedHandle::Tween(tween)) => *tween,
            other => panic!("expected a tween, got {other:?}"),
        }
    }
}
