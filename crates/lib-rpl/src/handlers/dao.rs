use std::net::Ipv6Addr;

use crate::codec::suboption::{SubOption, SubOptionData, SubOptionTag, Target, Transit};
use crate::codec::{Dao, DaoAck, ModeOfOperation};
use crate::collab::NeighborCache;
use crate::handlers::Effect;
use crate::model::{Dag, Instance, RouteEntry, RouteState};

/// Lifetime value meaning "remove this route" (RFC 6550 §6.7.8, §9.5).
const NO_PATH_LIFETIME: u8 = 0;

/// Builds a storing-mode DAO advertising one target (§4.6). The sender's
/// own prefix is the common case; an intermediate router aggregating a
/// child's DAO instead re-advertises the child's target with itself as the
/// next hop, which is exactly this same shape one level up the tree.
pub fn build_dao_storing(
    dag: &Dag,
    sequence: u8,
    target: Ipv6Addr,
    target_prefix_length: u8,
    path_sequence: u8,
    lifetime: u8,
    ack_requested: bool,
) -> Dao {
    Dao {
        rpl_instance_id: dag.instance_id,
        ack_requested,
        dao_sequence: sequence,
        dodag_id: None,
        options: vec![
            SubOption {
                tag: SubOptionTag::Target,
                data: SubOptionData::Target(Target {
                    prefix_length: target_prefix_length,
                    prefix: target,
                }),
            },
            SubOption {
                tag: SubOptionTag::Transit,
                data: SubOptionData::Transit(Transit {
                    external: false,
                    path_control: 0,
                    path_sequence,
                    path_lifetime: lifetime,
                    parent_address: None,
                }),
            },
        ],
    }
}

/// Builds a non-storing-mode DAO (§4.7): sent straight to the root with the
/// `D` flag set, the sender's own address (or prefix) as `Target`, and its
/// selected parent's address in the Transit option so the root can stitch
/// per-node edges into a full source route.
pub fn build_dao_nonstoring(
    dag: &Dag,
    sequence: u8,
    own_target: Ipv6Addr,
    own_prefix_length: u8,
    path_sequence: u8,
    lifetime: u8,
    via_parent: Ipv6Addr,
    ack_requested: bool,
) -> Dao {
    Dao {
        rpl_instance_id: dag.instance_id,
        ack_requested,
        dao_sequence: sequence,
        dodag_id: Some(dag.dodag_id),
        options: vec![
            SubOption {
                tag: SubOptionTag::Target,
                data: SubOptionData::Target(Target {
                    prefix_length: own_prefix_length,
                    prefix: own_target,
                }),
            },
            SubOption {
                tag: SubOptionTag::Transit,
                data: SubOptionData::Transit(Transit {
                    external: false,
                    path_control: 0,
                    path_sequence,
                    path_lifetime: lifetime,
                    parent_address: Some(via_parent),
                }),
            },
        ],
    }
}

/// One Target+Transit pair pulled out of a DAO's options.
struct Advertisement {
    target: Ipv6Addr,
    target_prefix_length: u8,
    path_sequence: u8,
    path_lifetime: u8,
    parent_address: Option<Ipv6Addr>,
}

fn advertisements(dao: &Dao) -> Vec<Advertisement> {
    let mut out = Vec::new();
    let mut pending_target: Option<(Ipv6Addr, u8)> = None;

    for option in &dao.options {
        match &option.data {
            SubOptionData::Target(t) => pending_target = Some((t.prefix, t.prefix_length)),
            SubOptionData::Transit(t) => {
                if let Some((target, target_prefix_length)) = pending_target.take() {
                    out.push(Advertisement {
                        target,
                        target_prefix_length,
                        path_sequence: t.path_sequence,
                        path_lifetime: t.path_lifetime,
                        parent_address: t.parent_address,
                    });
                }
            }
            _ => {}
        }
    }

    out
}

fn dag_rank(dag: &Dag, rank: u16) -> u16 {
    if dag.min_hop_rank_increase == 0 {
        0
    } else {
        rank / dag.min_hop_rank_increase
    }
}

/// Outcome of admitting one advertisement into the storing-mode route
/// table, driving `handle_dao`'s forwarding/acking decision (§4.6).
enum StoringOutcome {
    /// The neighbour cache refused to admit `src` as a route's next hop.
    AdmissionFailed,
    /// A No-Path DAO: the matching route (if any) was marked to linger.
    NoPath,
    /// Nothing changed from what was already on file — an idempotent
    /// duplicate that doesn't need forwarding.
    Duplicate,
    /// A route was installed or refreshed with a new path. If the next hop
    /// changed, the old one is named so a DCO can be sent its way.
    Installed { previous_next_hop: Option<Ipv6Addr> },
}

/// Handles a received DAO (§4.6 storing mode, §4.7 non-storing mode).
///
/// `neighbors` gates admission of a fresh next hop into the route table
/// (step6): a node that's out of neighbour-cache space NACKs with
/// [`crate::status::UNABLE_TO_ACCEPT`] (or
/// [`crate::status::UNABLE_TO_ADD_ROUTE_AT_ROOT`] at the root) rather than
/// silently dropping the state it can't actually forward through.
pub fn handle_dao(
    instance: &mut Instance,
    dao: &Dao,
    src: Ipv6Addr,
    now: u64,
    neighbors: &mut dyn NeighborCache,
) -> Vec<Effect> {
    let Some(dag) = &instance.dag else {
        return Vec::new();
    };

    if dag.instance_id != dao.rpl_instance_id {
        return Vec::new();
    }

    if let Some(dodag_id) = dao.dodag_id {
        if dodag_id != dag.dodag_id {
            return Vec::new();
        }
    }

    // Loop detection (§4.6 step3): a DAO arriving from a node this one
    // routes *through* (or treats as upstream) can only mean the DODAG has
    // partitioned out from under them. Poison that parent rather than
    // install a route that would just bounce packets back up.
    if let Some(index) = dag.find_parent(&src) {
        let parent = &dag.parents[index];
        let sender_not_upstream = dag_rank(dag, parent.rank) >= dag_rank(dag, dag.rank);
        let is_preferred = dag.preferred_parent == Some(index);
        if sender_not_upstream || is_preferred {
            tracing::warn!(%src, "loop detected via DAO, poisoning parent");
            let dag = instance.dag.as_mut().expect("checked above");
            dag.parents[index].rank = crate::INFINITE_RANK;
            dag.parents[index].updated = true;
            return Vec::new();
        }
    }

    let dag = instance.dag.as_ref().expect("checked above");
    let is_root = dag.is_root();
    let storing = matches!(
        dag.mop,
        ModeOfOperation::StoringNoMulticast | ModeOfOperation::StoringWithMulticast
    );
    let preferred_parent = dag.preferred_parent().map(|p| p.address);

    let mut effects = Vec::new();
    let mut ack_now = true;
    let mut ack_status = crate::status::UNQUALIFIED_ACCEPT;

    for ad in advertisements(dao) {
        if storing {
            match apply_storing(instance, &ad, src, now, neighbors, is_root) {
                StoringOutcome::AdmissionFailed => {
                    ack_status = if is_root {
                        crate::status::UNABLE_TO_ADD_ROUTE_AT_ROOT
                    } else {
                        crate::status::UNABLE_TO_ACCEPT
                    };
                }
                StoringOutcome::NoPath => {
                    if !is_root {
                        if let Some(parent) = preferred_parent {
                            let sequence = instance.next_dao_sequence();
                            effects.push(Effect::SendDao {
                                dst: parent,
                                msg: build_dao_storing(
                                    instance.dag.as_ref().expect("checked above"),
                                    sequence,
                                    ad.target,
                                    ad.target_prefix_length,
                                    ad.path_sequence,
                                    NO_PATH_LIFETIME,
                                    false,
                                ),
                            });
                        }
                    }
                }
                StoringOutcome::Duplicate => {}
                StoringOutcome::Installed { previous_next_hop } => {
                    if let Some(old_next_hop) = previous_next_hop {
                        if old_next_hop != src {
                            effects.push(Effect::SendDco {
                                dst: old_next_hop,
                                msg: crate::handlers::dco::build_dco(
                                    dao.rpl_instance_id,
                                    false,
                                    None,
                                    instance.next_dco_sequence(),
                                    crate::status::UNQUALIFIED_ACCEPT,
                                    ad.target,
                                    ad.target_prefix_length,
                                    ad.path_sequence,
                                ),
                            });
                        }
                    }

                    if !is_root {
                        if let Some(parent) = preferred_parent {
                            let sequence = instance.next_dao_sequence();
                            let msg = build_dao_storing(
                                instance.dag.as_ref().expect("checked above"),
                                sequence,
                                ad.target,
                                ad.target_prefix_length,
                                ad.path_sequence,
                                ad.path_lifetime,
                                true,
                            );
                            if let Some(route) = instance
                                .routes
                                .iter_mut()
                                .find(|r| r.target == ad.target && r.target_prefix_length == ad.target_prefix_length)
                            {
                                route.dao_sequence_in = dao.dao_sequence;
                                route.dao_sequence_out = sequence;
                                route.dao_pending = true;
                            }
                            effects.push(Effect::SendDao { dst: parent, msg });
                            ack_now = false;
                        }
                    }
                }
            }
        } else {
            apply_non_storing(instance, &ad, &mut effects);
        }
    }

    if dao.ack_requested && ack_now {
        effects.push(Effect::SendDaoAck {
            dst: src,
            msg: DaoAck {
                rpl_instance_id: dao.rpl_instance_id,
                dao_sequence: dao.dao_sequence,
                status: ack_status,
                dodag_id: dao.dodag_id,
            },
        });
    }

    effects
}

fn apply_storing(
    instance: &mut Instance,
    ad: &Advertisement,
    src: Ipv6Addr,
    now: u64,
    neighbors: &mut dyn NeighborCache,
    is_root: bool,
) -> StoringOutcome {
    let existing_index = instance
        .routes
        .iter()
        .position(|r| r.target == ad.target && r.target_prefix_length == ad.target_prefix_length);

    if ad.path_lifetime == NO_PATH_LIFETIME {
        if let Some(index) = existing_index {
            instance.routes[index].state = RouteState::NoPathReceived { marked_at: now };
            instance.routes[index].lifetime = crate::NOPATH_REMOVAL_DELAY;
        }
        return StoringOutcome::NoPath;
    }

    if !neighbors.lookup(&src) && !neighbors.admit(src) {
        tracing::warn!(%src, root = is_root, "neighbour cache refused DAO next hop");
        return StoringOutcome::AdmissionFailed;
    }

    match existing_index {
        Some(index) => {
            let route = &mut instance.routes[index];
            if route.next_hop == src && route.path_sequence == ad.path_sequence && route.state == RouteState::Active {
                return StoringOutcome::Duplicate;
            }

            let previous_next_hop = route.next_hop;
            route.next_hop = src;
            route.path_sequence = ad.path_sequence;
            route.lifetime = ad.path_lifetime as u32;
            route.state = RouteState::Active;

            StoringOutcome::Installed {
                previous_next_hop: if previous_next_hop != src { Some(previous_next_hop) } else { None },
            }
        }
        None => {
            instance.routes.push(RouteEntry::new(
                ad.target,
                ad.target_prefix_length,
                src,
                ad.path_sequence,
                ad.path_lifetime as u32,
            ));
            StoringOutcome::Installed { previous_next_hop: None }
        }
    }
}

fn apply_non_storing(instance: &mut Instance, ad: &Advertisement, effects: &mut Vec<Effect>) {
    let Some(parent) = ad.parent_address else {
        return;
    };

    if ad.path_lifetime == NO_PATH_LIFETIME {
        instance
            .source_routes
            .retain(|r| !(r.target == ad.target && r.target_prefix_length == ad.target_prefix_length));
        effects.push(Effect::RemoveSourceRoute { target: ad.target });
        return;
    }

    let existing = instance
        .source_routes
        .iter_mut()
        .find(|r| r.target == ad.target && r.target_prefix_length == ad.target_prefix_length);

    match existing {
        Some(route) => {
            route.parent = parent;
            route.path_sequence = ad.path_sequence;
            route.lifetime = ad.path_lifetime as u32;
        }
        None => instance.source_routes.push(crate::model::SourceRouteEntry::new(
            ad.target,
            ad.target_prefix_length,
            parent,
            ad.path_sequence,
            ad.path_lifetime as u32,
        )),
    }

    effects.push(Effect::InstallSourceRoute {
        target: ad.target,
        prefix_length: ad.target_prefix_length,
        via_parent: parent,
    });
}
