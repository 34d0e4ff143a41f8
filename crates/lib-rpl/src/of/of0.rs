use crate::model::{Dag, Parent};
use crate::of::{ObjectiveFunction, RankedParent};

/// Objective Function Zero (RFC 6552): ranks parents by hop count stepped
/// by each hop's ETX, rather than by a flat `min_hoprankinc` per hop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Of0;

/// OF0's Objective Code Point (RFC 6550 §6.7.6, RFC 6552 §7.1).
const OCP_OF0: u16 = 0;

impl Of0 {
    /// `DAG_Rank()`: a rank expressed in whole hops (RFC 6552 §3.1).
    fn dag_rank(&self, dag: &Dag, rank: u16) -> u16 {
        if dag.min_hop_rank_increase == 0 {
            0
        } else {
            rank / dag.min_hop_rank_increase
        }
    }

    /// `step_of_rank()` (RFC 6552 §4.1): how many rank increments this hop
    /// is "worth" given `parent`'s ETX, before scaling to rank units.
    fn step_of_rank(&self, parent: &Parent) -> i32 {
        (3 * parent.link_metric as i32) / crate::ETX_DIVISOR as i32 - 2
    }

    /// Whether `step_of_rank` falls inside the band OF0 will admit a parent
    /// under at all (RFC 6552 §4.1).
    fn is_acceptable(&self, parent: &Parent) -> bool {
        let step = self.step_of_rank(parent);
        (crate::OF0_MIN_STEP_OF_RANK..=crate::OF0_MAX_STEP_OF_RANK).contains(&step)
    }

    /// `rank_increase()` (RFC 6552 §4.1).
    fn rank_increase(&self, dag: &Dag, parent: &Parent) -> u32 {
        let step = self.step_of_rank(parent).max(0);
        let scaled = crate::OF0_RANK_FACTOR * step + crate::OF0_RANK_STRETCH;
        scaled.max(0) as u32 * dag.min_hop_rank_increase.max(1) as u32
    }

    /// `rank_via()` (RFC 6552 §4.1): the rank this node would end up with
    /// through `parent`, saturating at [`crate::INFINITE_RANK`].
    fn rank_via(&self, dag: &Dag, parent: &Parent) -> u16 {
        let rank = parent.rank as u32 + self.rank_increase(dag, parent);
        rank.min(crate::INFINITE_RANK as u32) as u16
    }

    /// The comparison metric `best_parent` ranks candidates by: DAG rank
    /// scaled back to rank units plus the parent's own link metric (RFC
    /// 6552 §4.2's `r1`/`r2`).
    fn parent_metric(&self, dag: &Dag, parent: &Parent) -> u32 {
        self.dag_rank(dag, parent.rank) as u32 * dag.min_hop_rank_increase.max(1) as u32
            + parent.link_metric as u32
    }
}

impl ObjectiveFunction for Of0 {
    fn ocp(&self) -> u16 {
        OCP_OF0
    }

    fn calculate_rank(&self, dag: &Dag, parent: &Parent) -> u16 {
        self.rank_via(dag, parent)
    }

    fn best_parent<'a>(&self, dag: &Dag, candidates: &'a [Parent]) -> Option<RankedParent> {
        let mut ranked: Vec<(usize, u32)> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.rank != crate::INFINITE_RANK && self.is_acceptable(c))
            .filter(|(_, c)| {
                dag.max_rank_increase == 0
                    || self.rank_via(dag, c) <= dag.rank.saturating_add(dag.max_rank_increase)
            })
            .map(|(index, c)| (index, self.parent_metric(dag, c)))
            .collect();

        ranked.sort_by_key(|(_, metric)| *metric);
        let (cheapest_index, cheapest_metric) = *ranked.first()?;

        let current = dag
            .preferred_parent
            .filter(|&index| candidates.get(index).is_some())
            .map(|index| (index, self.parent_metric(dag, &candidates[index])));

        let winner_index = match current {
            None => cheapest_index,
            Some((current_index, current_metric)) => {
                let margin = (dag.min_hop_rank_increase as f32) * crate::OF0_MIN_DIFFERENCE_FACTOR;
                let diff = (current_metric as f32 - cheapest_metric as f32).abs();
                if diff < margin {
                    current_index
                } else {
                    cheapest_index
                }
            }
        };

        Some(RankedParent {
            parent_index: winner_index,
            rank: self.rank_via(dag, &candidates[winner_index]),
        })
    }

    fn prefer_dag(&self, current: &Dag, other: &Dag) -> bool {
        if other.grounded != current.grounded {
            return other.grounded;
        }
        other.rank < current.rank
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use super::*;
    use crate::codec::ModeOfOperation;

    fn dag(rank: u16) -> Dag {
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
            ocp: 0,
            dio_interval_doublings: 20,
            dio_interval_min: 3,
            dio_redundancy_constant: 10,
            default_lifetime: 0xFF,
            lifetime_unit: 60,
            dtsn: 240,
            parents: Vec::new(),
            preferred_parent: None,
            metric_container: None,
        }
    }

    #[test]
    fn calculate_rank_adds_etx_stepped_increase() {
        let of0 = Of0;
        let dag = dag(crate::INFINITE_RANK);
        let mut parent = Parent::new(Ipv6Addr::LOCALHOST, 256);
        parent.link_metric = 128; // ETX 1.0, step_of_rank == 1
        assert_eq!(of0.calculate_rank(&dag, &parent), 512);
    }

    #[test]
    fn best_parent_picks_lowest_rank() {
        let of0 = Of0;
        let dag = dag(crate::INFINITE_RANK);
        let mut far = Parent::new(Ipv6Addr::LOCALHOST, 512);
        far.link_metric = 128;
        let mut near = Parent::new(Ipv6Addr::UNSPECIFIED, 256);
        near.link_metric = 128;
        let candidates = vec![far, near];

        let best = of0.best_parent(&dag, &candidates).unwrap();
        assert_eq!(best.parent_index, 1);
        assert_eq!(best.rank, 512);
    }

    #[test]
    fn best_parent_ignores_unreachable_candidates() {
        let of0 = Of0;
        let dag = dag(crate::INFINITE_RANK);
        let candidates = vec![Parent::new(Ipv6Addr::LOCALHOST, crate::INFINITE_RANK)];
        assert!(of0.best_parent(&dag, &candidates).is_none());
    }

    #[test]
    fn best_parent_rejects_candidates_with_step_of_rank_out_of_band() {
        let of0 = Of0;
        let dag = dag(crate::INFINITE_RANK);
        // default link_metric (RPL_INIT_LINK_METRIC == 5) yields a
        // negative step_of_rank, which RFC 6552 §4.1 says to reject.
        let candidates = vec![Parent::new(Ipv6Addr::LOCALHOST, 256)];
        assert!(of0.best_parent(&dag, &candidates).is_none());
    }

    #[test]
    fn hysteresis_keeps_current_parent_on_marginal_etx_difference() {
        let of0 = Of0;
        let mut a = Parent::new(Ipv6Addr::LOCALHOST, 256);
        a.link_metric = 128;
        let mut b = Parent::new(Ipv6Addr::UNSPECIFIED, 256);
        b.link_metric = 140;

        let dag = dag(512);
        let candidates = vec![a, b];
        let current = dag.clone();
        let mut with_preferred = current;
        with_preferred.preferred_parent = Some(0);

        let best = of0.best_parent(&with_preferred, &candidates).unwrap();
        assert_eq!(best.parent_index, 0, "B's slightly higher ETX shouldn't trigger a parent switch");
    }

    #[test]
    fn prefer_dag_prefers_grounded() {
        let of0 = Of0;
        let mut ungrounded = dag(256);
        ungrounded.grounded = false;
        let grounded = dag(512);
        assert!(of0.prefer_dag(&ungrounded, &grounded));
    }
}
