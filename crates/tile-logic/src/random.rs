//! Seeded pseudo-random number generator
//!
//! Drives tile spawns. Keyed by the ticket id and the session's move
//! counter, with the board folded in through [`SeededRng::mix`].

/// xorshift64* stream; same seed, move index and mixed words give the same draws
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte seed and a move index
    pub fn new(seed: &[u8; 32], move_index: u32) -> Self {
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        state ^= (move_index as u64).wrapping_mul(0x517cc1b727220a95);

        // xorshift never leaves the all-zero state
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Fold extra entropy (e.g. the board cells) into the state
    pub fn mix(&mut self, words: impl IntoIterator<Item = u64>) {
        for (i, word) in words.into_iter().enumerate() {
            self.state ^= word.wrapping_add(i as u64).wrapping_mul(0x9e3779b97f4a7c15);
            if self.state == 0 {
                self.state = 0x9e3779b97f4a7c15;
            }
            self.next_u64();
        }
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a value 0-99 (for percentage checks)
    pub fn next_percent(&mut self) -> u8 {
        (self.next_u32() % 100) as u8
    }

    /// Generate a value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}
