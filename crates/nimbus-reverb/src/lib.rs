//! Nimbus Reverb - stereo feedback-delay-network reverberation engine
//!
//! Assembles the [`nimbus_core`] primitives into a complete reverb: a
//! multi-tap early-reflection stage, an early diffuser, and up to twelve
//! parallel feedback delay lines per channel, each with its own modulated
//! delay, diffuser, and EQ chain. Two independently decorrelated channels
//! form the stereo image.
//!
//! # Architecture
//!
//! - [`Parameter`] - the 45 normalized control parameters, with pure
//!   scaling and display formatting
//! - [`DelayLine`] - one feedback path of the late network
//! - [`ReverbChannel`] - a full mono processor (early + late network)
//! - [`ReverbController`] - the stereo pair plus input cross-mixing and
//!   arbitrary-length buffer chunking
//! - [`presets`] - factory programs
//!
//! # Usage
//!
//! ```rust
//! use nimbus_reverb::{ReverbController, presets};
//!
//! let mut reverb = ReverbController::new(48000.0);
//! presets::DARK_PLATE.apply(&mut reverb);
//!
//! let in_l = vec![0.0f32; 512];
//! let in_r = vec![0.0f32; 512];
//! let mut out_l = vec![0.0f32; 512];
//! let mut out_r = vec![0.0f32; 512];
//! reverb.process(&in_l, &in_r, &mut out_l, &mut out_r);
//! ```
//!
//! # Real-time contract
//!
//! All buffers are allocated at construction. `process` performs no
//! allocation, no locking, and no I/O. Parameter changes apply between
//! blocks; a sample-rate change is a discontinuity that reapplies every
//! parameter and clears all buffers.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

/// Fixed processing block length in samples. The controller splits host
/// buffers of arbitrary length into chunks of at most this size.
pub const BLOCK_SIZE: usize = 64;

pub mod channel;
pub mod controller;
pub mod delay_line;
pub mod params;
pub mod presets;

pub use channel::{ChannelSide, ReverbChannel};
pub use controller::ReverbController;
pub use delay_line::DelayLine;
pub use params::Parameter;
