use std::net::Ipv6Addr;

use crate::handlers::{dio::build_dio, Effect};
use crate::model::Instance;

/// Handles a received DIS (RFC 6550 §8.3). A joined node unicasts its
/// current DIO straight back rather than waiting for its trickle timer to
/// next fire; an unjoined node has nothing useful to answer with and is
/// silently ignored (it has no DODAG to reset a trickle timer for either,
/// since that's a collaborator this crate doesn't own).
pub fn handle_dis(instance: &Instance, src: Ipv6Addr) -> Vec<Effect> {
    match &instance.dag {
        Some(dag) => vec![Effect::SendDio {
            dst: src,
            msg: build_dio(dag, None),
        }],
        None => Vec::new(),
    }
}
