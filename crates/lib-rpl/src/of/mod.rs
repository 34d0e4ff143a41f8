//! Objective functions: how an instance ranks candidate parents and picks
//! its preferred DODAG parent and, among competing DODAGs, its preferred
//! DODAG (RFC 6550 §3.4, RFC 6552, RFC 6719).

mod mrhof;
mod of0;

pub use mrhof::Mrhof;
pub use of0::Of0;

use crate::model::{Dag, Instance, Parent};

/// A candidate parent together with the rank it would give the node if
/// selected, as computed by [`ObjectiveFunction::calculate_rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedParent {
    pub parent_index: usize,
    pub rank: u16,
}

/// Strategy for turning link/path metrics into a rank and a parent choice.
///
/// Implementors own no state of their own (the metrics they need live on
/// [`Parent`]/[`Dag`]); this keeps an instance free to switch objective
/// functions without losing history.
pub trait ObjectiveFunction {
    /// The Objective Code Point this objective function identifies itself
    /// with in a DODAG Configuration option (RFC 6550 §6.7.6).
    fn ocp(&self) -> u16;

    /// Rank this node would advertise if it joined `dag` via `parent`.
    fn calculate_rank(&self, dag: &Dag, parent: &Parent) -> u16;

    /// Picks the best parent among `candidates`, or `None` if every
    /// candidate's rank would violate the DAG's `MaxRankIncrease` or is
    /// otherwise unusable (RFC 6550 §3.4.1).
    fn best_parent<'a>(&self, dag: &Dag, candidates: &'a [Parent]) -> Option<RankedParent>;

    /// Chooses which of two competing DODAGs (for the same instance) to
    /// prefer. `true` means prefer `other` over `current` (RFC 6550 §3.4.2).
    fn prefer_dag(&self, current: &Dag, other: &Dag) -> bool;

    /// Feedback hook run when a fresh raw ETX `sample` for `parent` arrives
    /// from the [`crate::collab::LinkStats`] collaborator, giving the
    /// objective function a chance to smooth it into `parent.link_metric`
    /// before the next rank recalculation (RFC 6719 §3.2's ETX EWMA).
    fn on_link_feedback(&self, parent: &mut Parent, sample: u16) {
        parent.link_metric = sample;
    }

    /// Feedback hook run when a DAO-ACK (or its absence, at retransmission
    /// exhaustion) arrives for a parent a DAO was sent through.
    fn on_dao_ack(&self, _parent: &mut Parent, _status: u8) {}

    /// Clears whatever this objective function cached on `dag` when local
    /// repair detaches it (§4.10). The default just drops the advertised
    /// Metric Container, since rank itself is reset by the caller.
    fn reset(&self, dag: &mut Dag) {
        dag.metric_container = None;
    }

    /// Rebuilds the Metric Container this node should advertise in its next
    /// DIO, if this objective function uses one (RFC 6719 §3, RFC 6551).
    /// The default is a no-op: objective functions that rank purely by hop
    /// count (OF0) have nothing to put in one.
    fn update_metric_container(&self, _instance: &mut Instance) {}
}
