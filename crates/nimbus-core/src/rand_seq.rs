//! Seeded vector generation with cross-seed blending.
//!
//! Consumers that need a batch of reproducible random values (diffuser stage
//! detuning, multitap gains, per-line jitter) draw them through this module.
//! The cross-seed mechanism lets two consumers share a base seed but diverge
//! by a controllable amount: 0 gives identical vectors, 1 gives fully
//! independent ones. The stereo channels use this for width — the left and
//! right channel request the same seed with different cross-seed values.
//!
//! All generation writes into caller-provided buffers; nothing here
//! allocates, so reseeding is safe from a parameter-update path.

use crate::rng::LcgRng;

/// Fill `out` with values in [0, 1) drawn from a generator seeded with `seed`.
///
/// Each element is `next_u32 / u32::MAX`.
pub fn generate_into(seed: u32, out: &mut [f32]) {
    const INV: f32 = 1.0 / u32::MAX as f32;
    let mut rng = LcgRng::new(seed);
    for slot in out.iter_mut() {
        *slot = rng.next_u32() as f32 * INV;
    }
}

/// Fill `out` with an element-wise blend of two independent sequences.
///
/// Sequence A is seeded with `seed`, sequence B with the bitwise complement
/// of `seed`. Each element is `a·(1−cross_seed) + b·cross_seed`, so
/// `cross_seed = 0` reproduces sequence A exactly and `cross_seed = 1`
/// reproduces sequence B.
pub fn generate_cross_into(seed: u32, cross_seed: f32, out: &mut [f32]) {
    const INV: f32 = 1.0 / u32::MAX as f32;
    let mut rng_a = LcgRng::new(seed);
    let mut rng_b = LcgRng::new(!seed);
    for slot in out.iter_mut() {
        let a = rng_a.next_u32() as f32 * INV;
        let b = rng_b.next_u32() as f32 * INV;
        *slot = a * (1.0 - cross_seed) + b * cross_seed;
    }
}
