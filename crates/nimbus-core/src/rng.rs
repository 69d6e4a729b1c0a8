//! Deterministic pseudo-random number generation.
//!
//! A linear congruential generator with fixed constants, used everywhere the
//! engine needs reproducible randomization: tap gains and positions, per-stage
//! diffuser detuning, and per-line delay jitter. The same seed must always
//! produce the same stream on every platform, so the recurrence is pure
//! wrapping integer arithmetic with no floating-point intermediates.

/// Linear congruential generator: `x' = (22695477·x + 1) mod 2^32`.
///
/// The multiplier/increment pair is the classic Borland LCG. Statistical
/// quality is unimportant here; what matters is that the stream is cheap,
/// stateless beyond one word, and bit-reproducible.
///
/// # Example
///
/// ```rust
/// use nimbus_core::LcgRng;
///
/// let mut a = LcgRng::new(1234);
/// let mut b = LcgRng::new(1234);
/// assert_eq!(a.next_u32(), b.next_u32());
/// ```
#[derive(Debug, Clone)]
pub struct LcgRng {
    x: u32,
}

const MULTIPLIER: u32 = 22695477;
const INCREMENT: u32 = 1;

impl LcgRng {
    /// Create a generator with the given seed.
    pub fn new(seed: u32) -> Self {
        Self { x: seed }
    }

    /// Reset the state to a new seed. No other state exists.
    pub fn reseed(&mut self, seed: u32) {
        self.x = seed;
    }

    /// Advance the recurrence and return the full 32-bit state.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.x = MULTIPLIER.wrapping_mul(self.x).wrapping_add(INCREMENT);
        self.x
    }

    /// Advance the recurrence with the state masked to 31 bits.
    ///
    /// The mask is applied to the state itself, not just the returned value,
    /// so the `next_i32` stream is distinct from the `next_u32` stream.
    #[inline]
    pub fn next_i32(&mut self) -> i32 {
        self.x = MULTIPLIER.wrapping_mul(self.x).wrapping_add(INCREMENT) & 0x7FFF_FFFF;
        self.x as i32
    }

    /// A float in [0, 1): `next_i32 / i32::MAX`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        const INV: f32 = 1.0 / i32::MAX as f32;
        self.next_i32() as f32 * INV
    }

    /// A float in [-1, 1).
    #[inline]
    pub fn next_f32_bipolar(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Fill a buffer with floats in [0, 1).
    pub fn fill(&mut self, buffer: &mut [f32]) {
        for slot in buffer.iter_mut() {
            *slot = self.next_f32();
        }
    }

    /// Fill a buffer with floats in [-1, 1).
    pub fn fill_bipolar(&mut self, buffer: &mut [f32]) {
        for slot in buffer.iter_mut() {
            *slot = self.next_f32_bipolar();
        }
    }
}
