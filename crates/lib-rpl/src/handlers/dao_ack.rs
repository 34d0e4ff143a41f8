use std::net::Ipv6Addr;

use crate::codec::DaoAck;
use crate::handlers::Effect;
use crate::model::Instance;
use crate::of::ObjectiveFunction;
use crate::retransmission::RetransmissionQueue;

/// Outcome of processing a DAO-ACK, mirroring [`RetransmissionQueue::acknowledge`]'s
/// bool but giving the caller enough to decide on a local repair (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaoAckOutcome {
    Acknowledged,
    /// No matching pending DAO; either a duplicate ack or one that arrived
    /// after this node gave up on it.
    Unmatched,
}

/// Handles a received DAO-ACK (§4.8). A non-success status still clears the
/// retransmission entry — retrying a DAO the parent has explicitly rejected
/// would just get rejected again — but is reported back to the objective
/// function as feedback on that parent.
///
/// On a match, also updates [`Instance::has_downward_route`] and, if this
/// ack was for a DAO this node had forwarded on a child's behalf (tracked
/// on the matching route via `dao_sequence_out`/`dao_pending`), relays a
/// rewritten ack back down to that child with its own original
/// `dao_sequence_in` so the deferred ack from `handle_dao` finally
/// completes (§4.6 step9).
pub fn handle_dao_ack(
    instance: &mut Instance,
    queue: &mut RetransmissionQueue,
    ack: &DaoAck,
    src: Ipv6Addr,
    of: &dyn ObjectiveFunction,
) -> (DaoAckOutcome, Vec<Effect>) {
    let matched = queue.acknowledge(&src, ack.dao_sequence);
    let mut effects = Vec::new();

    if crate::status::is_failure(ack.status) {
        if let Some(dag) = &mut instance.dag {
            if let Some(index) = dag.find_parent(&src) {
                of.on_dao_ack(&mut dag.parents[index], ack.status);
            }
        }
    }

    if matched {
        instance.has_downward_route = ack.status < 128;

        for route in &mut instance.routes {
            if route.dao_pending && route.dao_sequence_out == ack.dao_sequence {
                route.dao_pending = false;
                effects.push(Effect::SendDaoAck {
                    dst: route.next_hop,
                    msg: DaoAck {
                        rpl_instance_id: ack.rpl_instance_id,
                        dao_sequence: route.dao_sequence_in,
                        status: ack.status,
                        dodag_id: ack.dodag_id,
                    },
                });
            }
        }
    }

    let outcome = if matched {
        DaoAckOutcome::Acknowledged
    } else {
        DaoAckOutcome::Unmatched
    };

    (outcome, effects)
}

/// Expands a retransmission queue's due/exhausted report into the effects
/// a caller should apply: due entries get a fresh DAO, exhausted ones get
/// counted and surfaced as a [`crate::status::TIMEOUT`] DAO-ACK so the same
/// `on_dao_ack` feedback path handles both cases uniformly.
pub fn handle_retransmission_timeouts(
    instance: &mut Instance,
    due: &[crate::retransmission::PendingAck],
    exhausted: &[crate::retransmission::PendingAck],
    of: &dyn ObjectiveFunction,
    rebuild_dao: impl Fn(u8, u8) -> Option<crate::codec::Dao>,
) -> Vec<Effect> {
    let mut effects = Vec::new();

    for pending in due {
        instance.stats.dao_retransmissions += 1;
        if let Some(msg) = rebuild_dao(pending.sequence, pending.attempt) {
            effects.push(Effect::SendDao {
                dst: pending.parent,
                msg,
            });
        }
    }

    if let Some(dag) = &mut instance.dag {
        for pending in exhausted {
            if let Some(index) = dag.find_parent(&pending.parent) {
                of.on_dao_ack(&mut dag.parents[index], crate::status::TIMEOUT);
            }
        }
    }

    effects
}
