/// Deterministic RNG based on splitmix32. One instance drives the whole map.

#[inline]
pub fn splitmix32(x: u32) -> u32 {
    let mut z = x;
    z = (z ^ (z >> 16)).wrapping_mul(0x21F0AAAD);
    z = (z ^ (z >> 15)).wrapping_mul(0x735A2D97);
    z ^ (z >> 15)
}

/// Sequential generator. Every stage draws from the same instance in a fixed order,
/// so equal seeds give bit-identical maps.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9E3779B9);
        splitmix32(self.state)
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4294967296.0
    }

    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    pub fn range_usize(&mut self, max: usize) -> usize {
        (self.next_f64() * max as f64) as usize
    }

    /// Fisher-Yates from the back, one draw per swap.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        let mut i = items.len();
        while i > 1 {
            i -= 1;
            let j = self.range_usize(i + 1);
            items.swap(i, j);
        }
    }
}
