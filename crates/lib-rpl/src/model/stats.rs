/// Per-instance message counters, exposed for diagnostics (§6). Nothing in
/// this crate reads these back to make decisions; they exist for whatever
/// observability layer is wrapped around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub dis_rx: u64,
    pub dis_tx: u64,
    pub dio_rx: u64,
    pub dio_tx: u64,
    pub dao_rx: u64,
    pub dao_tx: u64,
    pub dao_ack_rx: u64,
    pub dao_ack_tx: u64,
    pub dco_rx: u64,
    pub dco_tx: u64,
    pub dco_ack_rx: u64,
    pub dco_ack_tx: u64,
    pub parent_switches: u64,
    pub local_repairs: u64,
    pub dao_retransmissions: u64,
    pub dropped_malformed: u64,
}
