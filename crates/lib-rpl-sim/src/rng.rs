use rpl_core::collab::Rng;

/// A small xorshift PRNG seeded explicitly, so a test's jitter sequence is
/// reproducible instead of depending on [`rand`]'s thread-local state.
#[derive(Debug, Clone, Copy)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }
}

impl Rng for SeededRng {
    fn next_u16(&mut self) -> u16 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        (self.state & 0xFFFF) as u16
    }
}
