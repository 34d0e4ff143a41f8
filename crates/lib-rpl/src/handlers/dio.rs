use std::net::Ipv6Addr;

use crate::codec::suboption::{DagConfiguration, PrefixInformation, SubOption, SubOptionData, SubOptionTag};
use crate::codec::{Dio, ModeOfOperation};
use crate::handlers::Effect;
use crate::model::{Dag, DagBuilder, Instance, Parent};
use crate::of::ObjectiveFunction;

/// A locally-configured on-link prefix to advertise in a DIO's Prefix
/// Information option (§4.5, RFC 6550 §6.7.9).
#[derive(Debug, Clone, Copy)]
pub struct DioPrefix {
    pub prefix: std::net::Ipv6Addr,
    pub prefix_length: u8,
    pub valid_lifetime: u32,
    pub preferred_lifetime: u32,
}

/// Builds the DIO this node would currently advertise for `dag`. Always
/// carries a DODAG Configuration option rebuilt from `dag`'s own fields;
/// carries a Metric Container iff the objective function in use populated
/// `dag.metric_container`; carries a Prefix Information option iff `prefix`
/// is given (§4.5).
pub fn build_dio(dag: &Dag, prefix: Option<DioPrefix>) -> Dio {
    let mut options = vec![SubOption {
        tag: SubOptionTag::DagConfiguration,
        data: SubOptionData::DagConfiguration(DagConfiguration {
            authentication_enabled: false,
            path_control_size: 0,
            dio_interval_doublings: dag.dio_interval_doublings,
            dio_interval_min: dag.dio_interval_min,
            dio_redundancy_constant: dag.dio_redundancy_constant,
            max_rank_increase: dag.max_rank_increase,
            min_hop_rank_increase: dag.min_hop_rank_increase,
            ocp: dag.ocp,
            default_lifetime: dag.default_lifetime,
            lifetime_unit: dag.lifetime_unit,
        }),
    }];

    if let Some(metric_container) = dag.metric_container {
        options.push(SubOption {
            tag: SubOptionTag::DagMetricContainer,
            data: SubOptionData::DagMetricContainer(metric_container),
        });
    }

    if let Some(p) = prefix {
        options.push(SubOption {
            tag: SubOptionTag::PrefixInformation,
            data: SubOptionData::PrefixInformation(PrefixInformation {
                prefix_length: p.prefix_length,
                on_link: true,
                autonomous: true,
                router_address: false,
                valid_lifetime: p.valid_lifetime,
                preferred_lifetime: p.preferred_lifetime,
                prefix: p.prefix,
            }),
        });
    }

    Dio {
        rpl_instance_id: dag.instance_id,
        version_number: dag.version_number,
        rank: dag.rank,
        grounded: dag.grounded,
        mop: dag.mop,
        dag_preference: dag.dag_preference,
        dtsn: dag.dtsn,
        dodag_id: dag.dodag_id,
        options,
    }
}

/// What changed in response to a DIO, so a caller can decide whether to
/// schedule a fresh DAO or just keep going (§4.2, §4.4, §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DioOutcome {
    Joined,
    RankUnchanged,
    RankChanged,
    ParentSwitched,
    /// The sender advertised a strictly newer DTSN than we had on file for
    /// it; storing-mode nodes use this to refresh their downward routes by
    /// issuing a new DAO (§4.2).
    DtsnIncreased,
    /// Rejected: malformed, a mismatched DODAG id under the wrong
    /// conditions, or nothing usable came out of parent selection.
    Ignored,
}

/// Handles a received DIO (RFC 6550 §8.3, §3.4). `link_metric` is the
/// caller-supplied ETX sample for `src`, read from the
/// [`crate::collab::LinkStats`] collaborator before calling in (pure
/// decision logic doesn't reach for collaborators itself).
pub fn handle_dio(
    instance: &mut Instance,
    dio: &Dio,
    src: Ipv6Addr,
    of: &dyn ObjectiveFunction,
    link_metric: Option<u16>,
    now: u64,
) -> DioOutcome {
    match &mut instance.dag {
        None => join_fresh(instance, dio, src, of, link_metric, now),
        Some(dag) => {
            if dag.instance_id != dio.rpl_instance_id {
                return DioOutcome::Ignored;
            }

            if dag.dodag_id != dio.dodag_id {
                return handle_competing_dodag(instance, dio, src, of, link_metric, now);
            }

            if crate::greater_than(dio.version_number, dag.version_number) {
                return global_repair(instance, dio, src, of, link_metric, now);
            }

            update_parent(instance, dio, src, of, link_metric, now)
        }
    }
}

fn upsert_parent(dag: &mut Dag, dio: &Dio, src: Ipv6Addr, link_metric: Option<u16>, now: u64) -> usize {
    match dag.find_parent(&src) {
        Some(index) => {
            let parent = &mut dag.parents[index];
            parent.rank = dio.rank;
            parent.dtsn = dio.dtsn;
            parent.last_heard = now;
            if let Some(sample) = link_metric {
                parent.link_metric = sample;
            }
            index
        }
        None => {
            let mut parent = Parent::new(src, dio.rank);
            parent.dtsn = dio.dtsn;
            parent.last_heard = now;
            if let Some(sample) = link_metric {
                parent.link_metric = sample;
            }
            dag.parents.push(parent);
            dag.parents.len() - 1
        }
    }
}

fn join_fresh(
    instance: &mut Instance,
    dio: &Dio,
    src: Ipv6Addr,
    of: &dyn ObjectiveFunction,
    link_metric: Option<u16>,
    now: u64,
) -> DioOutcome {
    if dio.rank == crate::INFINITE_RANK || matches!(dio.mop, ModeOfOperation::NoDownwardRoutes) {
        return DioOutcome::Ignored;
    }

    let mut dag = DagBuilder::from_dio(dio).build();
    upsert_parent(&mut dag, dio, src, link_metric, now);

    let Some(ranked) = of.best_parent(&dag, &dag.parents) else {
        return DioOutcome::Ignored;
    };

    dag.preferred_parent = Some(ranked.parent_index);
    dag.rank = ranked.rank;
    instance.dag = Some(dag);
    DioOutcome::Joined
}

fn global_repair(
    instance: &mut Instance,
    dio: &Dio,
    src: Ipv6Addr,
    of: &dyn ObjectiveFunction,
    link_metric: Option<u16>,
    now: u64,
) -> DioOutcome {
    instance.routes.clear();
    instance.source_routes.clear();
    join_fresh(instance, dio, src, of, link_metric, now)
}

fn handle_competing_dodag(
    instance: &mut Instance,
    dio: &Dio,
    src: Ipv6Addr,
    of: &dyn ObjectiveFunction,
    link_metric: Option<u16>,
    now: u64,
) -> DioOutcome {
    let current = instance.dag.as_ref().expect("checked by caller");

    if dio.rank == crate::INFINITE_RANK {
        return DioOutcome::Ignored;
    }

    let mut candidate = DagBuilder::from_dio(dio).build();
    upsert_parent(&mut candidate, dio, src, link_metric, now);

    let Some(ranked) = of.best_parent(&candidate, &candidate.parents) else {
        return DioOutcome::Ignored;
    };
    candidate.rank = ranked.rank;
    candidate.preferred_parent = Some(ranked.parent_index);

    if !of.prefer_dag(current, &candidate) {
        return DioOutcome::Ignored;
    }

    instance.routes.clear();
    instance.source_routes.clear();
    instance.dag = Some(candidate);
    DioOutcome::Joined
}

fn update_parent(
    instance: &mut Instance,
    dio: &Dio,
    src: Ipv6Addr,
    of: &dyn ObjectiveFunction,
    link_metric: Option<u16>,
    now: u64,
) -> DioOutcome {
    let dag = instance.dag.as_mut().expect("checked by caller");

    let previous_dtsn = dag.find_parent(&src).map(|i| dag.parents[i].dtsn);
    upsert_parent(dag, dio, src, link_metric, now);

    let previous_parent = dag.preferred_parent;
    let previous_rank = dag.rank;

    let Some(ranked) = of.best_parent(dag, &dag.parents) else {
        return DioOutcome::Ignored;
    };

    dag.preferred_parent = Some(ranked.parent_index);
    dag.rank = ranked.rank;

    if previous_parent != dag.preferred_parent {
        instance.stats.parent_switches += 1;
        return DioOutcome::ParentSwitched;
    }

    if let Some(prev) = previous_dtsn {
        if crate::greater_than(dio.dtsn, prev) {
            return DioOutcome::DtsnIncreased;
        }
    }

    if previous_rank != dag.rank {
        DioOutcome::RankChanged
    } else {
        DioOutcome::RankUnchanged
    }
}
