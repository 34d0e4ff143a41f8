use std::net::Ipv6Addr;

use rpl_core::codec::{Dio, ModeOfOperation};
use rpl_core::handlers::{handle_dio, DioOutcome};
use rpl_core::of::Of0;
use rpl_sim::SimNode;

fn root_dio() -> Dio {
    Dio {
        rpl_instance_id: 1,
        version_number: 240,
        rank: rpl_core::ROOT_RANK,
        grounded: true,
        mop: ModeOfOperation::StoringNoMulticast,
        dag_preference: 7,
        dtsn: 240,
        dodag_id: Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1),
        options: Vec::new(),
    }
}

#[test]
fn joins_dodag_from_first_dio() {
    let mut node = SimNode::new(1, 42);
    let of = Of0;
    let root = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1);

    let outcome = handle_dio(&mut node.instance, &root_dio(), root, &of, Some(128), node.clock.now_ms());

    assert_eq!(outcome, DioOutcome::Joined);
    let dag = node.instance.dag.as_ref().unwrap();
    assert_eq!(dag.rank, rpl_core::ROOT_RANK + dag.min_hop_rank_increase);
    assert_eq!(dag.preferred_parent, Some(0));
}

#[test]
fn ignores_dio_advertising_infinite_rank() {
    let mut node = SimNode::new(1, 7);
    let of = Of0;
    let mut dio = root_dio();
    dio.rank = rpl_core::INFINITE_RANK;

    let outcome = handle_dio(
        &mut node.instance,
        &dio,
        Ipv6Addr::LOCALHOST,
        &of,
        None,
        node.clock.now_ms(),
    );

    assert_eq!(outcome, DioOutcome::Ignored);
    assert!(node.instance.dag.is_none());
}
