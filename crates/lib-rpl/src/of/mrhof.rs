use crate::codec::suboption::DagMetricContainer;
use crate::model::{Dag, Instance, Parent};
use crate::of::{ObjectiveFunction, RankedParent};

/// Minimum Rank with Hysteresis Objective Function (RFC 6719): ranks
/// parents by cumulative ETX path cost, switching away from the current
/// preferred parent only when a candidate beats it by more than a
/// hysteresis band.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mrhof;

/// MRHOF's Objective Code Point (RFC 6719 §2).
const OCP_MRHOF: u16 = 1;

impl Mrhof {
    fn path_cost(&self, dag: &Dag, parent: &Parent) -> u16 {
        let link_cost = (parent.link_metric as u32 * dag.min_hop_rank_increase as u32)
            / crate::ETX_DIVISOR as u32;
        parent.rank.saturating_add(link_cost.max(1) as u16)
    }

    fn switch_threshold(&self, dag: &Dag) -> u16 {
        dag.min_hop_rank_increase / crate::PARENT_SWITCH_THRESHOLD_DIV
    }
}

impl ObjectiveFunction for Mrhof {
    fn ocp(&self) -> u16 {
        OCP_MRHOF
    }

    fn calculate_rank(&self, dag: &Dag, parent: &Parent) -> u16 {
        self.path_cost(dag, parent).max(dag.min_hop_rank_increase)
    }

    fn best_parent<'a>(&self, dag: &Dag, candidates: &'a [Parent]) -> Option<RankedParent> {
        if candidates.is_empty() {
            return None;
        }

        let mut ranked: Vec<RankedParent> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.rank != crate::INFINITE_RANK)
            .map(|(index, c)| RankedParent {
                parent_index: index,
                rank: self.calculate_rank(dag, c),
            })
            .filter(|r| r.rank <= crate::MAX_PATH_COST)
            .collect();

        ranked.sort_by_key(|r| r.rank);
        let cheapest = ranked.first().copied();

        let current = dag.preferred_parent.and_then(|index| {
            candidates
                .get(index)
                .map(|p| RankedParent { parent_index: index, rank: self.calculate_rank(dag, p) })
        });

        match (cheapest, current) {
            (None, None) => None,
            (Some(cheapest), None) => Some(cheapest),
            (None, Some(current)) => Some(current),
            (Some(cheapest), Some(current)) => {
                if cheapest.rank.saturating_add(self.switch_threshold(dag)) < current.rank {
                    Some(cheapest)
                } else {
                    Some(current)
                }
            }
        }
    }

    fn prefer_dag(&self, current: &Dag, other: &Dag) -> bool {
        if other.grounded != current.grounded {
            return other.grounded;
        }
        other.rank < current.rank
    }

    fn on_link_feedback(&self, parent: &mut Parent, sample: u16) {
        let smoothed = (crate::ETX_ALPHA * parent.link_metric as u32
            + (crate::ETX_SCALE - crate::ETX_ALPHA) * sample as u32)
            / crate::ETX_SCALE;
        parent.link_metric = smoothed.min(crate::MAX_LINK_METRIC as u32) as u16;
    }

    fn update_metric_container(&self, instance: &mut Instance) {
        let Some(dag) = instance.dag.as_mut() else {
            return;
        };
        dag.metric_container = Some(DagMetricContainer::etx(dag.rank));
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use super::*;
    use crate::codec::ModeOfOperation;

    fn dag(rank: u16, preferred: Option<usize>) -> Dag {
        Dag {
            instance_id: 1,
            dodag_id: Ipv6Addr::LOCALHOST,
            version_number: 240,
            mop: ModeOfOperation::StoringNoMulticast,
            dag_preference: 0,
            grounded: true,
            rank,
            min_hop_rank_increase: 256,
            max_rank_increase: 0,
            ocp: 1,
            dio_interval_doublings: 20,
            dio_interval_min: 3,
            dio_redundancy_constant: 10,
            default_lifetime: 0xFF,
            lifetime_unit: 60,
            dtsn: 240,
            parents: Vec::new(),
            preferred_parent: preferred,
            metric_container: None,
        }
    }

    #[test]
    fn prefers_lower_path_cost_with_no_current_parent() {
        let mrhof = Mrhof;
        let dag = dag(crate::INFINITE_RANK, None);
        let mut cheap = Parent::new(Ipv6Addr::LOCALHOST, 256);
        cheap.link_metric = 1;
        let mut expensive = Parent::new(Ipv6Addr::UNSPECIFIED, 256);
        expensive.link_metric = 8;

        let candidates = vec![expensive, cheap];
        let best = mrhof.best_parent(&dag, &candidates).unwrap();
        assert_eq!(best.parent_index, 1);
    }

    #[test]
    fn hysteresis_keeps_current_parent_on_marginal_gain() {
        let mrhof = Mrhof;
        let mut current = Parent::new(Ipv6Addr::LOCALHOST, 256);
        current.link_metric = 2;
        let dag_state = dag(mrhof.calculate_rank(&dag(0, None), &current), Some(0));

        let mut slightly_better = current.clone();
        slightly_better.link_metric = current.link_metric.saturating_sub(1).max(1);

        let candidates = vec![current, Parent::new(Ipv6Addr::UNSPECIFIED, 256)];
        let mut candidates_with_alt = candidates.clone();
        candidates_with_alt[1] = slightly_better;

        let best = mrhof.best_parent(&dag_state, &candidates_with_alt).unwrap();
        assert_eq!(best.parent_index, 0, "a marginal improvement should not trigger a parent switch");
    }

    #[test]
    fn best_parent_rejects_candidates_past_max_path_cost() {
        let mrhof = Mrhof;
        let dag = dag(crate::INFINITE_RANK, None);
        let mut too_far = Parent::new(Ipv6Addr::LOCALHOST, crate::MAX_PATH_COST);
        too_far.link_metric = crate::MAX_LINK_METRIC;
        assert!(mrhof.best_parent(&dag, &[too_far]).is_none());
    }

    #[test]
    fn on_link_feedback_smooths_towards_sample() {
        let mrhof = Mrhof;
        let mut parent = Parent::new(Ipv6Addr::LOCALHOST, 256);
        parent.link_metric = 10;
        mrhof.on_link_feedback(&mut parent, 1);
        assert!(parent.link_metric < 10 && parent.link_metric > 1);
    }
}
