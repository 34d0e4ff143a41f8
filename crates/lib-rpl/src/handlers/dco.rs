use std::net::Ipv6Addr;

use crate::codec::suboption::{SubOption, SubOptionData, SubOptionTag, Target, Transit};
use crate::codec::{Dco, DcoAck};
use crate::handlers::Effect;
use crate::model::{Instance, RouteState};

/// Builds a DCO telling `target`'s next hop to drop its route
/// (draft-ietf-roll-efficient-npdao §4). Unlike a No-Path DAO this
/// originates at the node that decided the route should go (typically the
/// root) and travels down, rather than bubbling up from a child. Carries a
/// Transit option alongside the Target so the recipient has a path
/// sequence to compare against what it already has on file (§4.9).
#[allow(clippy::too_many_arguments)]
pub fn build_dco(
    instance_id: u8,
    k_requested: bool,
    dodag_id: Option<Ipv6Addr>,
    sequence: u8,
    status: u8,
    target: Ipv6Addr,
    target_prefix_length: u8,
    path_sequence: u8,
) -> Dco {
    Dco {
        rpl_instance_id: instance_id,
        k_requested,
        status,
        dco_sequence: sequence,
        dodag_id,
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
                    path_lifetime: 0,
                    parent_address: None,
                }),
            },
        ],
    }
}

/// One Target+Transit pair pulled out of a DCO's options, mirroring
/// `handlers::dao`'s `advertisements`.
struct Advertisement {
    target: Ipv6Addr,
    target_prefix_length: u8,
    path_sequence: Option<u8>,
}

fn advertisements(dco: &Dco) -> Vec<Advertisement> {
    let mut out = Vec::new();
    let mut pending_target: Option<(Ipv6Addr, u8)> = None;

    for option in &dco.options {
        match &option.data {
            SubOptionData::Target(t) => pending_target = Some((t.prefix, t.prefix_length)),
            SubOptionData::Transit(t) => {
                if let Some((target, target_prefix_length)) = pending_target.take() {
                    out.push(Advertisement {
                        target,
                        target_prefix_length,
                        path_sequence: Some(t.path_sequence),
                    });
                }
            }
            _ => {}
        }
    }

    if out.is_empty() {
        if let Some((target, target_prefix_length)) = pending_target {
            out.push(Advertisement {
                target,
                target_prefix_length,
                path_sequence: None,
            });
        }
    }

    out
}

/// Handles a received DCO (§4.9): every advertised Target is checked
/// against the lollipop-ordered path sequence already on file for it
/// (`crate::lollipop::greater_than`) before its storing-mode route is torn
/// down, so a stale or reordered DCO can't undo a route a fresher DAO has
/// since re-established. `own_prefix` is this node's own advertised target,
/// used to tell a legitimate "no route, it's mine" case apart from one that
/// deserves a [`crate::status::NO_MATCHING_DAO_ROOT`] NACK.
///
/// Forwarding further down (to this node's own children, if any still
/// route through it for that target) is left to the caller: this crate
/// doesn't track children separately from the route table it's about to
/// edit, so it can only report that a forwardable [`Effect::SendDco`] is
/// warranted, not who to address it to beyond the route's own next hop.
pub fn handle_dco(
    instance: &mut Instance,
    dco: &Dco,
    src: Ipv6Addr,
    now: u64,
    own_prefix: (Ipv6Addr, u8),
) -> Vec<Effect> {
    let Some(dag) = &instance.dag else {
        return Vec::new();
    };

    if dag.instance_id != dco.rpl_instance_id {
        return Vec::new();
    }

    let mut effects = Vec::new();
    let mut status = crate::status::UNQUALIFIED_ACCEPT;

    for ad in advertisements(dco) {
        let existing_index = instance
            .routes
            .iter()
            .position(|r| r.target == ad.target && r.target_prefix_length == ad.target_prefix_length);

        match existing_index {
            Some(index) => {
                let stale = match ad.path_sequence {
                    Some(incoming) => !crate::lollipop::greater_than(incoming, instance.routes[index].path_sequence),
                    None => false,
                };
                if stale {
                    continue;
                }

                let next_hop = instance.routes[index].next_hop;
                instance.routes[index].state = RouteState::NoPathReceived { marked_at: now };
                effects.push(Effect::RemoveRoute { target: ad.target });

                if next_hop != src {
                    effects.push(Effect::SendDco {
                        dst: next_hop,
                        msg: build_dco(
                            dco.rpl_instance_id,
                            dco.k_requested,
                            dco.dodag_id,
                            instance.next_dco_sequence(),
                            crate::status::UNQUALIFIED_ACCEPT,
                            ad.target,
                            ad.target_prefix_length,
                            ad.path_sequence.unwrap_or(instance.path_sequence),
                        ),
                    });
                }
            }
            None if ad.target != own_prefix.0 || ad.target_prefix_length != own_prefix.1 => {
                status = crate::status::NO_MATCHING_DAO_ROOT;
            }
            None => {}
        }
    }

    if dco.k_requested {
        effects.push(Effect::SendDcoAck {
            dst: src,
            msg: DcoAck {
                rpl_instance_id: dco.rpl_instance_id,
                dco_sequence: dco.dco_sequence,
                status,
                dodag_id: dco.dodag_id,
            },
        });
    }

    effects
}
