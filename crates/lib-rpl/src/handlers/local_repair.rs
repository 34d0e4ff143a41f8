use crate::handlers::{dio::build_dio, Effect};
use crate::model::Instance;
use crate::of::ObjectiveFunction;

/// Local repair (RFC 6550 §8.2.2.5, §9.12): the preferred parent is gone
/// (its link went stale, or DAO retransmission to it was exhausted with no
/// ack and no DCO explaining why) and this node has no other usable
/// parent. It poisons itself by advertising [`crate::INFINITE_RANK`] so its
/// own children stop routing through it, resets the objective function's
/// own cached state (§4.10), then solicits a fresh DIO to find a new parent
/// rather than waiting out its trickle timer.
pub fn local_repair(instance: &mut Instance, of: &dyn ObjectiveFunction) -> Vec<Effect> {
    if instance.dag.is_none() {
        return Vec::new();
    }

    {
        let dag = instance.dag.as_mut().expect("checked above");
        dag.rank = crate::INFINITE_RANK;
        dag.preferred_parent = None;
        of.reset(dag);
    }
    instance.stats.local_repairs += 1;

    let poison = build_dio(instance.dag.as_ref().expect("checked above"), None);

    vec![
        Effect::SendDio {
            dst: crate::ALL_RPL_NODES,
            msg: poison,
        },
        Effect::SendDis {
            dst: crate::ALL_RPL_NODES,
            msg: crate::codec::Dis::default(),
        },
    ]
}

/// Whether this instance's preferred parent should be considered lost,
/// given the last time it was heard from (§8.2.2.5's "parent unreachable").
pub fn parent_is_lost(instance: &Instance, now: u64, max_age_secs: u64) -> bool {
    match instance.dag.as_ref().and_then(|dag| dag.preferred_parent()) {
        Some(parent) => now.saturating_sub(parent.last_heard) > max_age_secs,
        None => instance.is_joined(),
    }
}
