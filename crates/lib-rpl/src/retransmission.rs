//! DAO (and DCO) retransmission timer (§4.8). A sent DAO that requested an
//! ack is tracked here until the ack arrives, the retry budget runs out, or
//! it's superseded by a newer DAO to the same parent.

use std::net::Ipv6Addr;

use crate::collab::Rng;

/// One in-flight DAO or DCO awaiting its ack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAck {
    pub parent: Ipv6Addr,
    pub sequence: u8,
    pub attempt: u8,
    /// Tick (per [`crate::collab::Clock`]) this attempt was sent at.
    pub sent_at: u64,
    /// Timeout rolled for this attempt, fixed at schedule time so it
    /// doesn't change underfoot between now and when it elapses.
    timeout_ms: u64,
}

impl PendingAck {
    pub fn new(parent: Ipv6Addr, sequence: u8, now: u64, rng: &mut dyn Rng) -> Self {
        Self {
            parent,
            sequence,
            attempt: 0,
            sent_at: now,
            timeout_ms: jittered_timeout(rng),
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.sent_at) >= self.timeout_ms
    }

    pub fn exhausted(&self) -> bool {
        self.attempt >= crate::RPL_DAO_MAX_RETRANSMISSIONS
    }
}

/// `T/2 + uniform[0, T/2)` around the fixed base
/// [`crate::RPL_DAO_RETRANSMISSION_TIMEOUT_MS`] (§4.8), not a doubling
/// backoff — every retry waits around the same base timeout, just jittered
/// so a batch of nodes retrying together don't resynchronize.
fn jittered_timeout(rng: &mut dyn Rng) -> u64 {
    let half = crate::RPL_DAO_RETRANSMISSION_TIMEOUT_MS / 2;
    let jitter = if half == 0 { 0 } else { rng.next_u16() as u64 % half };
    half + jitter
}

/// Tracks every [`PendingAck`] this node currently has outstanding.
#[derive(Debug, Clone, Default)]
pub struct RetransmissionQueue {
    pending: Vec<PendingAck>,
}

impl RetransmissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, parent: Ipv6Addr, sequence: u8, now: u64, rng: &mut dyn Rng) {
        self.pending.retain(|p| p.parent != parent);
        self.pending.push(PendingAck::new(parent, sequence, now, rng));
    }

    /// Clears the entry for `parent`/`sequence` once its ack arrives.
    /// Returns `true` if a matching entry was found and removed.
    pub fn acknowledge(&mut self, parent: &Ipv6Addr, sequence: u8) -> bool {
        let before = self.pending.len();
        self.pending
            .retain(|p| !(p.parent == *parent && p.sequence == sequence));
        self.pending.len() != before
    }

    /// Entries whose timeout has elapsed, each either due for another
    /// attempt (rescheduled in place with a freshly jittered timeout) or
    /// reported as exhausted and dropped.
    pub fn poll(&mut self, now_ms: u64, rng: &mut dyn Rng) -> (Vec<PendingAck>, Vec<PendingAck>) {
        let mut due = Vec::new();
        let mut exhausted = Vec::new();

        self.pending.retain_mut(|p| {
            if !p.is_due(now_ms) {
                return true;
            }

            if p.exhausted() {
                exhausted.push(*p);
                return false;
            }

            p.attempt += 1;
            p.sent_at = now_ms;
            p.timeout_ms = jittered_timeout(rng);
            due.push(*p);
            true
        });

        (due, exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StepRng(u16);

    impl Rng for StepRng {
        fn next_u16(&mut self) -> u16 {
            self.0
        }
    }

    #[test]
    fn timeout_is_bounded_around_half_the_base_timeout() {
        let mut rng = StepRng(0);
        let mut p = PendingAck::new(Ipv6Addr::LOCALHOST, 1, 0, &mut rng);
        let half = crate::RPL_DAO_RETRANSMISSION_TIMEOUT_MS / 2;
        assert_eq!(p.timeout_ms, half);

        let mut high_rng = StepRng(u16::MAX);
        p.timeout_ms = jittered_timeout(&mut high_rng);
        assert!(p.timeout_ms >= half && p.timeout_ms < half * 2);
    }

    #[test]
    fn acknowledge_removes_matching_entry() {
        let mut rng = StepRng(0);
        let mut q = RetransmissionQueue::new();
        q.track(Ipv6Addr::LOCALHOST, 5, 0, &mut rng);
        assert!(q.acknowledge(&Ipv6Addr::LOCALHOST, 5));
        assert!(!q.acknowledge(&Ipv6Addr::LOCALHOST, 5));
    }

    #[test]
    fn poll_exhausts_after_max_retransmissions() {
        let mut rng = StepRng(0);
        let mut q = RetransmissionQueue::new();
        q.track(Ipv6Addr::LOCALHOST, 1, 0, &mut rng);

        let mut now = 0u64;
        let mut total_exhausted = Vec::new();
        for _ in 0..=(crate::RPL_DAO_MAX_RETRANSMISSIONS as u64 + 1) {
            now += crate::RPL_DAO_RETRANSMISSION_TIMEOUT_MS * 16;
            let (_, exhausted) = q.poll(now, &mut rng);
            total_exhausted.extend(exhausted);
        }

        assert_eq!(total_exhausted.len(), 1);
    }
}
