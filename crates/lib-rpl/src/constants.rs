//! Protocol constants from RFC 6550/6552 and the OF0/MRHOF objective
//! function drafts (RFC 6552, RFC 6719).

/// Rank value meaning "unreachable" (RFC 6550 §17).
pub const INFINITE_RANK: u16 = 0xFFFF;

/// Default `MinHopRankIncrease`, used when an instance isn't configured
/// otherwise.
pub const DEFAULT_MIN_HOP_RANK_INCREASE: u16 = 256;

/// Rank a DODAG root advertises (RFC 6552 §3). Equal to the default
/// `MinHopRankIncrease`, i.e. a root counts as being one hop's worth of
/// rank above zero.
pub const ROOT_RANK: u16 = DEFAULT_MIN_HOP_RANK_INCREASE;

/// Fixed point divisor for ETX values (RFC 6551 §3.1.2 / contiki `ETX_DIVISOR`).
pub const ETX_DIVISOR: u16 = 128;

/// Largest link metric OF0/MRHOF will admit, in ETX units (pre-divisor).
pub const MAX_LINK_METRIC: u16 = 10;

/// Largest resulting rank MRHOF will admit for a candidate parent, a safety
/// ceiling against runaway paths rather than a realistic hop budget.
pub const MAX_PATH_COST: u16 = 0xFF00;

/// OF0 hysteresis band, expressed as a multiple of `min_hoprankinc`.
pub const OF0_MIN_DIFFERENCE_FACTOR: f32 = 1.5;

/// OF0's `RANK_FACTOR`: multiplies `step_of_rank` in the rank-increase
/// formula (RFC 6552 §4.1).
pub const OF0_RANK_FACTOR: i32 = 1;

/// OF0's `RANK_STRETCH`: added to the scaled step in the rank-increase
/// formula (RFC 6552 §4.1). Zero unless an implementation wants to
/// artificially inflate a parent's apparent distance.
pub const OF0_RANK_STRETCH: i32 = 0;

/// Smallest `step_of_rank` OF0 will accept from a parent (RFC 6552 §4.1).
pub const OF0_MIN_STEP_OF_RANK: i32 = 1;

/// Largest `step_of_rank` OF0 will accept from a parent (RFC 6552 §4.1).
pub const OF0_MAX_STEP_OF_RANK: i32 = 9;

/// EWMA weight on the previous link metric, out of [`ETX_SCALE`].
pub const ETX_ALPHA: u32 = 90;
pub const ETX_SCALE: u32 = 100;

/// Divides [`ETX_DIVISOR`] to get MRHOF's path-switch hysteresis band.
pub const PARENT_SWITCH_THRESHOLD_DIV: u16 = 2;

/// MRHOF's assumed link metric before any feedback has arrived, in ETX units
/// (pre-divisor).
pub const RPL_INIT_LINK_METRIC: u16 = 5;

/// ICMPv6 message type shared by every RPL control message (RFC 6550 §6).
pub const ICMPV6_RPL_TYPE: u8 = 155;

/// Link-local all-RPL-nodes multicast address.
pub const ALL_RPL_NODES: std::net::Ipv6Addr = std::net::Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0x1a);

/// Ticks a No-Path route lingers after being marked `NOPATH_RECEIVED` before
/// it is reclaimed (§3, invariants).
pub const NOPATH_REMOVAL_DELAY: u32 = 60;

/// Default number of DAO retransmissions before giving up (§4.8).
pub const RPL_DAO_MAX_RETRANSMISSIONS: u8 = 4;

/// Default initial DAO retransmission timeout, in milliseconds (§4.8).
pub const RPL_DAO_RETRANSMISSION_TIMEOUT_MS: u64 = 4_000;

/// DAO-ACK status codes (§4.1).
pub mod status {
    pub const UNQUALIFIED_ACCEPT: u8 = 0x00;
    pub const UNABLE_TO_ACCEPT: u8 = 0x80;
    pub const UNABLE_TO_ADD_ROUTE_AT_ROOT: u8 = 0x81;
    pub const NO_MATCHING_DAO_ROOT: u8 = 234;

    /// Internal-only pseudo status used to drive [`crate::of::ObjectiveFunction::on_dao_ack`]
    /// on retransmission exhaustion. Never appears on the wire (§4.1).
    pub const TIMEOUT: u8 = 0xFE;

    pub fn is_failure(status: u8) -> bool {
        status >= 128
    }
}
