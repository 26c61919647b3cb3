//! Decides when a routing pass runs.
//!
//! The host calls [`RecomputeScheduler::request`] from its event handlers and
//! [`RecomputeScheduler::take_pending`] once per frame. At most one pass is
//! pending at a time; a newer request replaces an older one that has not been
//! taken yet. Passes that finish with unmeasured nodes are retried after a
//! short delay, a bounded number of times per state change.
use std::time::Duration;

use crate::config::SchedulerConfig;
use crate::ir::LayoutState;
use crate::layout::RoutingResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    NodesChanged,
    LinksChanged,
    GroupsChanged,
    DragStarted,
    DragEnded,
    OrientationChanged,
    Scrolled,
    /// Re-run after some nodes could not be measured.
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTicket {
    generation: u64,
    pub trigger: Trigger,
    /// Number of retries already spent on the current state.
    pub attempt: u32,
}

impl PassTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// A newer request superseded this pass; its result should be dropped.
    Stale,
    /// Some nodes were unmeasured. A retry pass is queued and should be taken
    /// after the delay.
    RetryAfter(Duration),
    /// Unmeasured nodes remain and the retry budget is spent.
    GaveUp,
    Settled,
}

#[derive(Debug, Clone)]
pub struct RecomputeScheduler {
    config: SchedulerConfig,
    generation: u64,
    retries: u32,
    pending: Option<PassTicket>,
}

impl RecomputeScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            generation: 0,
            retries: 0,
            pending: None,
        }
    }

    /// Queues a pass and returns its generation.
    pub fn request(&mut self, trigger: Trigger) -> u64 {
        self.generation += 1;
        if trigger != Trigger::Retry {
            self.retries = 0;
        }
        self.pending = Some(PassTicket {
            generation: self.generation,
            trigger,
            attempt: self.retries,
        });
        self.generation
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_pending(&mut self) -> Option<PassTicket> {
        self.pending.take()
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn finish(&mut self, ticket: PassTicket, result: &RoutingResult) -> PassOutcome {
        if ticket.generation != self.generation {
            return PassOutcome::Stale;
        }
        if !result.needs_remeasure() {
            return PassOutcome::Settled;
        }
        if self.retries >= self.config.max_retries {
            log::debug!(
                "giving up on {} unmeasured nodes after {} retries",
                result.unmeasured.len(),
                self.retries
            );
            return PassOutcome::GaveUp;
        }
        self.retries += 1;
        self.request(Trigger::Retry);
        log::debug!(
            "{} nodes unmeasured, retry {}/{} scheduled",
            result.unmeasured.len(),
            self.retries,
            self.config.max_retries
        );
        PassOutcome::RetryAfter(self.config.retry_delay())
    }
}

impl Default for RecomputeScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

/// Triggers fired by moving from `prev` to `next`. Empty when nothing that
/// affects routing changed.
pub fn triggers_between(prev: &LayoutState, next: &LayoutState) -> Vec<Trigger> {
    let mut triggers = Vec::new();

    let placement = |s: &LayoutState| {
        s.nodes
            .iter()
            .map(|n| (n.id.clone(), n.tier_id.clone(), n.column_index))
            .collect::<Vec<_>>()
    };
    if placement(prev) != placement(next) {
        triggers.push(Trigger::NodesChanged);
    }

    let links = |s: &LayoutState| {
        s.nodes
            .iter()
            .map(|n| (n.id.clone(), n.parent_ids.clone()))
            .collect::<Vec<_>>()
    };
    if links(prev) != links(next) {
        triggers.push(Trigger::LinksChanged);
    }

    let tints = |s: &LayoutState| {
        s.nodes
            .iter()
            .map(|n| (n.id.clone(), n.group_id.clone()))
            .collect::<Vec<_>>()
    };
    if prev.groups != next.groups || tints(prev) != tints(next) {
        triggers.push(Trigger::GroupsChanged);
    }

    match (prev.drag.is_dragging, next.drag.is_dragging) {
        (false, true) => triggers.push(Trigger::DragStarted),
        (true, false) => triggers.push(Trigger::DragEnded),
        (true, true) if prev.drag.dragged_node_id != next.drag.dragged_node_id => {
            triggers.push(Trigger::DragStarted)
        }
        _ => {}
    }

    if prev.orientation != next.orientation {
        triggers.push(Trigger::OrientationChanged);
    }
    if prev.viewport != next.viewport {
        triggers.push(Trigger::Scrolled);
    }
    triggers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DragState, Group, LayoutOrientation, Node, NodeId};

    fn unmeasured() -> RoutingResult {
        RoutingResult {
            unmeasured: vec![NodeId::new("late")],
            ..Default::default()
        }
    }

    #[test]
    fn newer_request_replaces_pending_pass() {
        let mut scheduler = RecomputeScheduler::default();
        scheduler.request(Trigger::DragStarted);
        let latest = scheduler.request(Trigger::NodesChanged);
        let ticket = scheduler.take_pending().unwrap();
        assert_eq!(ticket.generation(), latest);
        assert_eq!(ticket.trigger, Trigger::NodesChanged);
        assert!(scheduler.take_pending().is_none());
    }

    #[test]
    fn superseded_pass_is_stale() {
        let mut scheduler = RecomputeScheduler::default();
        scheduler.request(Trigger::NodesChanged);
        let ticket = scheduler.take_pending().unwrap();
        scheduler.request(Trigger::Scrolled);
        assert_eq!(
            scheduler.finish(ticket, &RoutingResult::default()),
            PassOutcome::Stale
        );
        assert!(scheduler.has_pending());
    }

    #[test]
    fn retries_are_bounded() {
        let mut scheduler = RecomputeScheduler::default();
        scheduler.request(Trigger::NodesChanged);
        let delay = Duration::from_millis(100);

        for attempt in 0..3 {
            let ticket = scheduler.take_pending().unwrap();
            assert_eq!(ticket.attempt, attempt);
            if attempt > 0 {
                assert_eq!(ticket.trigger, Trigger::Retry);
            }
            assert_eq!(
                scheduler.finish(ticket, &unmeasured()),
                PassOutcome::RetryAfter(delay)
            );
        }
        let ticket = scheduler.take_pending().unwrap();
        assert_eq!(scheduler.finish(ticket, &unmeasured()), PassOutcome::GaveUp);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn new_state_resets_retry_budget() {
        let mut scheduler = RecomputeScheduler::default();
        scheduler.request(Trigger::NodesChanged);
        let ticket = scheduler.take_pending().unwrap();
        scheduler.finish(ticket, &unmeasured());
        assert_eq!(scheduler.retries(), 1);

        scheduler.request(Trigger::LinksChanged);
        assert_eq!(scheduler.retries(), 0);
        let ticket = scheduler.take_pending().unwrap();
        assert_eq!(
            scheduler.finish(ticket, &RoutingResult::default()),
            PassOutcome::Settled
        );
    }

    fn base_state() -> LayoutState {
        let mut state = LayoutState::new(vec![
            Node::new("a", "t1", 0).with_group("g"),
            Node::new("b", "t2", 0).with_parent("a"),
        ]);
        state.groups = vec![Group::new("g", "#4ade80")];
        state
    }

    #[test]
    fn identical_states_fire_nothing() {
        assert!(triggers_between(&base_state(), &base_state()).is_empty());
    }

    #[test]
    fn each_change_maps_to_its_trigger() {
        let prev = base_state();

        let mut next = base_state();
        next.nodes[1].column_index = 3;
        assert_eq!(triggers_between(&prev, &next), vec![Trigger::NodesChanged]);

        let mut next = base_state();
        next.nodes[1].parent_ids.clear();
        assert_eq!(triggers_between(&prev, &next), vec![Trigger::LinksChanged]);

        let mut next = base_state();
        next.groups[0].color = "#f87171".to_string();
        assert_eq!(triggers_between(&prev, &next), vec![Trigger::GroupsChanged]);

        let mut next = base_state();
        next.drag = DragState::dragging("a");
        assert_eq!(triggers_between(&prev, &next), vec![Trigger::DragStarted]);
        assert_eq!(triggers_between(&next, &prev), vec![Trigger::DragEnded]);

        let mut next = base_state();
        next.orientation = LayoutOrientation::Horizontal;
        assert_eq!(
            triggers_between(&prev, &next),
            vec![Trigger::OrientationChanged]
        );

        let mut next = base_state();
        next.viewport.scroll_top = 40.0;
        assert_eq!(triggers_between(&prev, &next), vec![Trigger::Scrolled]);
    }
}
