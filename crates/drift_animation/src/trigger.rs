//! Scroll triggers
//!
//! A trigger binds a threshold range, derived from an element's bounds and
//! two [`TriggerPosition`]s, to a consumer. On every scroll update the
//! [`TriggerEvaluator`] places the scroll position before, inside or after
//! each range and reports the [`CrossingEvent`]s implied by the change.
//!
//! ```text
//!            start                 end
//!   Before     |       Inside       |     After
//!   ---------->|  EnterForward      |  LeaveForward ---------->
//!   <----------|  LeaveBackward     |  EnterBackward <---------
//! ```
//!
//! A jump straight across a range delivers both events, in order.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use drift_core::{Bounds, Target, Viewport};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{AnimationError, Result};
use crate::scheduler::TweenId;

new_key_type! {
    /// Handle to a registered trigger binding
    pub struct TriggerId;
}

// ============================================================================
// Positions
// ============================================================================

/// A point along one axis of an element or the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Fraction of the extent (`top` = 0, `center` = 0.5, `bottom` = 1)
    Fraction(f32),
    /// Fixed offset in pixels from the top edge
    Pixels(f32),
}

impl Anchor {
    pub const TOP: Anchor = Anchor::Fraction(0.0);
    pub const CENTER: Anchor = Anchor::Fraction(0.5);
    pub const BOTTOM: Anchor = Anchor::Fraction(1.0);

    /// Offset from the top edge for an extent of `extent` pixels
    pub fn resolve(&self, extent: f32) -> f32 {
        match *self {
            Anchor::Fraction(f) => f * extent,
            Anchor::Pixels(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnimationError::InvalidPosition(s.to_string());
        match s {
            "top" => return Ok(Anchor::TOP),
            "center" => return Ok(Anchor::CENTER),
            "bottom" => return Ok(Anchor::BOTTOM),
            _ => {}
        }
        if let Some(percent) = s.strip_suffix('%') {
            let value: f32 = percent.parse().map_err(|_| invalid())?;
            return Ok(Anchor::Fraction(value / 100.0));
        }
        let px = s.strip_suffix("px").unwrap_or(s);
        px.parse().map(Anchor::Pixels).map_err(|_| invalid())
    }
}

/// Where a threshold sits: "when `element` anchor meets `viewport` anchor"
///
/// Parsed from strings such as `"top 80%"` (the element's top edge reaches
/// 80% down the viewport) or `"bottom top"`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl TriggerPosition {
    /// Element top meets viewport bottom (default start)
    pub const TOP_BOTTOM: TriggerPosition = TriggerPosition::new(Anchor::TOP, Anchor::BOTTOM);
    /// Element bottom meets viewport top (default end)
    pub const BOTTOM_TOP: TriggerPosition = TriggerPosition::new(Anchor::BOTTOM, Anchor::TOP);

    pub const fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// Scroll position at which this threshold is reached
    pub fn scroll_offset(&self, bounds: &Bounds, viewport: &Viewport) -> f32 {
        bounds.y + self.element.resolve(bounds.height) - self.viewport.resolve(viewport.height)
    }
}

impl FromStr for TriggerPosition {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(element), Some(viewport), None) => Ok(Self {
                element: element
                    .parse()
                    .map_err(|_| AnimationError::InvalidPosition(s.to_string()))?,
                viewport: viewport
                    .parse()
                    .map_err(|_| AnimationError::InvalidPosition(s.to_string()))?,
            }),
            _ => Err(AnimationError::InvalidPosition(s.to_string())),
        }
    }
}

// ============================================================================
// Toggle actions
// ============================================================================

/// What a crossing does to the bound tweens
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToggleAction {
    /// Start or continue forward
    Play,
    Pause,
    Resume,
    /// Play backwards from the current state
    Reverse,
    /// Rewind to the start and play forward
    Restart,
    /// Rewind to the start and stop
    Reset,
    /// Jump to the end
    Complete,
    #[default]
    None,
}

impl ToggleAction {
    pub fn name(&self) -> &'static str {
        match self {
            ToggleAction::Play => "play",
            ToggleAction::Pause => "pause",
            ToggleAction::Resume => "resume",
            ToggleAction::Reverse => "reverse",
            ToggleAction::Restart => "restart",
            ToggleAction::Reset => "reset",
            ToggleAction::Complete => "complete",
            ToggleAction::None => "none",
        }
    }
}

impl FromStr for ToggleAction {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "play" => ToggleAction::Play,
            "pause" => ToggleAction::Pause,
            "resume" => ToggleAction::Resume,
            "reverse" => ToggleAction::Reverse,
            "restart" => ToggleAction::Restart,
            "reset" => ToggleAction::Reset,
            "complete" => ToggleAction::Complete,
            "none" => ToggleAction::None,
            _ => return Err(AnimationError::InvalidToggleActions(s.to_string())),
        })
    }
}

/// One action per crossing event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    /// `play none none reverse`: animate in, undo when scrolled back above
    pub const ENTRANCE: ToggleActions = ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::Reverse,
    };

    pub fn action_for(&self, event: CrossingEvent) -> ToggleAction {
        match event {
            CrossingEvent::EnterForward => self.on_enter,
            CrossingEvent::LeaveForward => self.on_leave,
            CrossingEvent::EnterBackward => self.on_enter_back,
            CrossingEvent::LeaveBackward => self.on_leave_back,
        }
    }
}

impl Default for ToggleActions {
    /// `play none none none`
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = AnimationError;

    /// Parse four space-separated actions, in the order
    /// enter / leave / enter-back / leave-back
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnimationError::InvalidToggleActions(s.to_string());
        let actions = s
            .split_whitespace()
            .map(|a| a.parse::<ToggleAction>().map_err(|_| invalid()))
            .collect::<Result<SmallVec<[ToggleAction; 4]>>>()?;
        match actions.as_slice() {
            &[on_enter, on_leave, on_enter_back, on_leave_back] => Ok(Self {
                on_enter,
                on_leave,
                on_enter_back,
                on_leave_back,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter.name(),
            self.on_leave.name(),
            self.on_enter_back.name(),
            self.on_leave_back.name()
        )
    }
}

/// Whether `restart` re-applies each tween's delay
///
/// Staggered groups keep their cascade on restart by default; `Simultaneous`
/// restarts every sibling at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestartMode {
    #[default]
    Staggered,
    Simultaneous,
}

// ============================================================================
// Configuration
// ============================================================================

/// A threshold range bound to an element
#[derive(Clone, Debug)]
pub struct TriggerConfig {
    pub trigger: Target,
    pub start: TriggerPosition,
    pub end: TriggerPosition,
    pub toggle_actions: ToggleActions,
    pub restart_mode: RestartMode,
}

impl TriggerConfig {
    /// Trigger on `target` from `top bottom` to `bottom top`
    pub fn new(trigger: Target) -> Self {
        Self {
            trigger,
            start: TriggerPosition::TOP_BOTTOM,
            end: TriggerPosition::BOTTOM_TOP,
            toggle_actions: ToggleActions::default(),
            restart_mode: RestartMode::default(),
        }
    }

    pub fn start(mut self, start: TriggerPosition) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: TriggerPosition) -> Self {
        self.end = end;
        self
    }

    pub fn toggle_actions(mut self, actions: ToggleActions) -> Self {
        self.toggle_actions = actions;
        self
    }

    pub fn restart_mode(mut self, mode: RestartMode) -> Self {
        self.restart_mode = mode;
        self
    }

    /// Scroll range `(start, end)` for the trigger's current bounds
    ///
    /// `end` never precedes `start`. Returns `None` once the trigger
    /// element is gone.
    pub fn range(&self, viewport: &Viewport) -> Option<(f32, f32)> {
        let bounds = self.trigger.bounds()?;
        let start = self.start.scroll_offset(&bounds, viewport);
        let end = self.end.scroll_offset(&bounds, viewport).max(start);
        Some((start, end))
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// A threshold crossing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossingEvent {
    /// Scrolling down past `start`
    EnterForward,
    /// Scrolling down past `end`
    LeaveForward,
    /// Scrolling up past `end`
    EnterBackward,
    /// Scrolling up past `start`
    LeaveBackward,
}

impl CrossingEvent {
    pub fn is_enter(self) -> bool {
        matches!(self, CrossingEvent::EnterForward | CrossingEvent::EnterBackward)
    }

    /// Crossed while moving down the page
    pub fn is_forward(self) -> bool {
        matches!(self, CrossingEvent::EnterForward | CrossingEvent::LeaveForward)
    }
}

/// Where the scroll position sits relative to a trigger range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Membership {
    #[default]
    Before,
    Inside,
    After,
}

impl Membership {
    /// Range is `[start, end)`; an empty range has no inside
    fn locate(position: f32, start: f32, end: f32) -> Self {
        if position < start {
            Membership::Before
        } else if position < end {
            Membership::Inside
        } else {
            Membership::After
        }
    }

    pub fn is_inside(self) -> bool {
        self == Membership::Inside
    }

    /// Events implied by moving from `self` to `next`
    fn transition(self, next: Membership) -> SmallVec<[CrossingEvent; 2]> {
        use CrossingEvent::*;
        use Membership::*;
        match (self, next) {
            (Before, Inside) => SmallVec::from_slice(&[EnterForward]),
            (Before, After) => SmallVec::from_slice(&[EnterForward, LeaveForward]),
            (Inside, After) => SmallVec::from_slice(&[LeaveForward]),
            (After, Inside) => SmallVec::from_slice(&[EnterBackward]),
            (After, Before) => SmallVec::from_slice(&[EnterBackward, LeaveBackward]),
            (Inside, Before) => SmallVec::from_slice(&[LeaveBackward]),
            _ => SmallVec::new(),
        }
    }
}

/// Sign of the last non-zero scroll delta
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Per-binding evaluation state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    pub membership: Membership,
    pub last_event: Option<CrossingEvent>,
    pub direction: Option<ScrollDirection>,
}

/// Host callback receiving crossing events
pub type TriggerCallback = Arc<dyn Fn(CrossingEvent) + Send + Sync>;

/// Who reacts to a binding's crossings
#[derive(Clone)]
pub enum TriggerConsumer {
    /// Tweens driven through the scheduler by the binding's toggle actions
    Tweens(SmallVec<[TweenId; 4]>),
    /// A host callback
    Callback(TriggerCallback),
}

impl TriggerConsumer {
    pub fn tweens(ids: impl IntoIterator<Item = TweenId>) -> Self {
        TriggerConsumer::Tweens(ids.into_iter().collect())
    }

    pub fn callback(f: impl Fn(CrossingEvent) + Send + Sync + 'static) -> Self {
        TriggerConsumer::Callback(Arc::new(f))
    }
}

impl fmt::Debug for TriggerConsumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerConsumer::Tweens(ids) => f.debug_tuple("Tweens").field(ids).finish(),
            TriggerConsumer::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// A crossing reported by [`TriggerEvaluator::on_scroll_update`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crossing {
    pub trigger: TriggerId,
    pub event: CrossingEvent,
}

struct Binding {
    config: TriggerConfig,
    consumer: TriggerConsumer,
    state: TriggerState,
    /// Evaluated at least once since registration
    synced: bool,
}

impl Binding {
    /// Move to the region containing `position`, collecting events
    ///
    /// Each event is paired with the scroll offset of the threshold it
    /// crossed, for ordering across bindings.
    fn evaluate(
        &mut self,
        position: f32,
        viewport: &Viewport,
        direction: ScrollDirection,
    ) -> SmallVec<[(f32, CrossingEvent); 2]> {
        self.synced = true;
        let events = self.place(position, viewport);
        self.state.direction = Some(direction);
        events
    }

    /// Re-place an evaluated binding after its range moved under a fixed
    /// position
    ///
    /// The direction is relative: a range that moved up past the position
    /// reads as scrolling forward.
    fn reflow(&mut self, position: f32, viewport: &Viewport) -> SmallVec<[(f32, CrossingEvent); 2]> {
        let events = self.place(position, viewport);
        if let Some((_, first)) = events.first() {
            self.state.direction = Some(if first.is_forward() {
                ScrollDirection::Forward
            } else {
                ScrollDirection::Backward
            });
        }
        events
    }

    fn place(&mut self, position: f32, viewport: &Viewport) -> SmallVec<[(f32, CrossingEvent); 2]> {
        let Some((start, end)) = self.config.range(viewport) else {
            return SmallVec::new();
        };
        let next = Membership::locate(position, start, end);
        let events = self.state.membership.transition(next);

        self.state.membership = next;
        if let Some(last) = events.last() {
            self.state.last_event = Some(*last);
        }

        events
            .into_iter()
            .map(|event| {
                let offset = match event {
                    CrossingEvent::EnterForward | CrossingEvent::LeaveBackward => start,
                    CrossingEvent::LeaveForward | CrossingEvent::EnterBackward => end,
                };
                (offset, event)
            })
            .collect()
    }
}

/// Tracks every live trigger binding against the scroll position
pub struct TriggerEvaluator {
    bindings: SlotMap<TriggerId, Binding>,
    last_position: f32,
}

impl TriggerEvaluator {
    pub fn new() -> Self {
        Self {
            bindings: SlotMap::with_key(),
            last_position: 0.0,
        }
    }

    /// Add a binding
    ///
    /// The binding starts out before its range and is not evaluated until
    /// the next scroll update or [`sync`](Self::sync).
    pub fn register(&mut self, config: TriggerConfig, consumer: TriggerConsumer) -> TriggerId {
        self.bindings.insert(Binding {
            config,
            consumer,
            state: TriggerState::default(),
            synced: false,
        })
    }

    /// Remove a binding; returns false if it was already gone
    pub fn unregister(&mut self, id: TriggerId) -> bool {
        self.bindings.remove(id).is_some()
    }

    /// Re-evaluate every binding against a new scroll position
    ///
    /// Returns crossings in threshold order: ascending offsets when
    /// scrolling forward, descending when scrolling back. A position equal
    /// to the previous one produces nothing.
    ///
    /// Bindings registered since the last evaluation are first caught up
    /// at the previous position (as [`sync`](Self::sync) would), so the
    /// movement itself is reported in its true direction.
    pub fn on_scroll_update(&mut self, position: f32, viewport: &Viewport) -> Vec<Crossing> {
        let delta = position - self.last_position;
        if delta == 0.0 {
            return Vec::new();
        }
        let mut delivered = self.sync(viewport);
        self.last_position = position;
        let direction = if delta > 0.0 {
            ScrollDirection::Forward
        } else {
            ScrollDirection::Backward
        };

        let mut crossings: Vec<(f32, Crossing)> = Vec::new();
        for (trigger, binding) in self.bindings.iter_mut() {
            for (offset, event) in binding.evaluate(position, viewport, direction) {
                crossings.push((offset, Crossing { trigger, event }));
            }
        }
        sort_by_threshold(&mut crossings, direction);
        delivered.extend(crossings.into_iter().map(|(_, c)| c));
        delivered
    }

    /// Evaluate bindings registered since the last update at the current
    /// scroll position, as if scrolled forward to it from the page top
    pub fn sync(&mut self, viewport: &Viewport) -> Vec<Crossing> {
        let position = self.last_position;
        let mut crossings: Vec<(f32, Crossing)> = Vec::new();
        for (trigger, binding) in self.bindings.iter_mut().filter(|(_, b)| !b.synced) {
            for (offset, event) in binding.evaluate(position, viewport, ScrollDirection::Forward) {
                crossings.push((offset, Crossing { trigger, event }));
            }
        }
        sort_by_threshold(&mut crossings, ScrollDirection::Forward);
        crossings.into_iter().map(|(_, c)| c).collect()
    }

    /// Recompute every evaluated binding's range at the current position
    /// after layout or viewport changes
    ///
    /// Ranges that moved down past the position report backward crossings
    /// (descending), then ranges that moved up report forward ones
    /// (ascending).
    pub fn reflow(&mut self, viewport: &Viewport) -> Vec<Crossing> {
        let position = self.last_position;
        let mut backward: Vec<(f32, Crossing)> = Vec::new();
        let mut forward: Vec<(f32, Crossing)> = Vec::new();
        for (trigger, binding) in self.bindings.iter_mut().filter(|(_, b)| b.synced) {
            for (offset, event) in binding.reflow(position, viewport) {
                let crossing = (offset, Crossing { trigger, event });
                if event.is_forward() {
                    forward.push(crossing);
                } else {
                    backward.push(crossing);
                }
            }
        }
        sort_by_threshold(&mut backward, ScrollDirection::Backward);
        sort_by_threshold(&mut forward, ScrollDirection::Forward);
        backward
            .into_iter()
            .chain(forward)
            .map(|(_, c)| c)
            .collect()
    }

    pub fn state(&self, id: TriggerId) -> Option<TriggerState> {
        self.bindings.get(id).map(|b| b.state)
    }

    pub fn config(&self, id: TriggerId) -> Option<&TriggerConfig> {
        self.bindings.get(id).map(|b| &b.config)
    }

    pub fn consumer(&self, id: TriggerId) -> Option<&TriggerConsumer> {
        self.bindings.get(id).map(|b| &b.consumer)
    }

    pub fn contains(&self, id: TriggerId) -> bool {
        self.bindings.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn last_position(&self) -> f32 {
        self.last_position
    }
}

impl Default for TriggerEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable sort, so events of one binding at the same offset keep their order
fn sort_by_threshold(crossings: &mut [(f32, Crossing)], direction: ScrollDirection) {
    match direction {
        ScrollDirection::Forward => crossings.sort_by(|a, b| a.0.total_cmp(&b.0)),
        ScrollDirection::Backward => crossings.sort_by(|a, b| b.0.total_cmp(&a.0)),
    }
}
