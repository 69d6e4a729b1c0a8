//! Nimbus Core - DSP primitives for the nimbus reverberation engine
//!
//! This crate provides the signal-processing building blocks the engine crate
//! assembles into a feedback delay network: deterministic randomization,
//! filters, and modulated delay structures. Everything is designed for
//! real-time audio processing with zero allocation in the audio path.
//!
//! # Building Blocks
//!
//! ## Randomization
//!
//! - [`LcgRng`] - Bit-reproducible linear congruential generator
//! - [`rand_seq`] - Seeded vector generation with cross-seed blending,
//!   used to decorrelate parallel delay lines and stereo channels
//!
//! ## Filters
//!
//! - [`OnePole`] - Single-pole low/high-pass for damping and input conditioning
//! - [`Biquad`] - Second-order IIR filter with nine selectable responses
//!
//! ## Delay Structures
//!
//! - [`ModulatedDelay`] - Plain fractional delay with LFO-modulated tap
//! - [`ModulatedAllpass`] - Feedback all-pass with LFO-modulated tap
//! - [`AllpassDiffuser`] - Series chain of detuned all-pass stages
//! - [`MultitapDelay`] - Dense early-reflection generator (up to 256 taps)
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! nimbus-core = { version = "0.1", default-features = false }
//! ```
//!
//! Delay buffers are heap-allocated once at construction and never grow.
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks, or I/O while processing
//! - **Deterministic**: Identical seeds produce bit-identical output
//! - **No dependencies on std**: Pure `no_std` with `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod diffuser;
pub mod math;
pub mod modulated_allpass;
pub mod modulated_delay;
pub mod multitap;
pub mod one_pole;
pub mod rand_seq;
pub mod rng;

// Re-export main types at crate root
pub use biquad::{Biquad, FilterKind};
pub use diffuser::{AllpassDiffuser, MAX_STAGE_COUNT};
pub use math::{
    db_to_gain, gain_to_db, resp_1dec, resp_2dec, resp_3dec, resp_3oct, resp_4oct,
};
pub use modulated_allpass::ModulatedAllpass;
pub use modulated_delay::ModulatedDelay;
pub use multitap::{MAX_TAPS, MultitapDelay};
pub use one_pole::{OnePole, OnePoleKind};
pub use rng::LcgRng;
