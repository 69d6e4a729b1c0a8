//! Mathematical utility functions shared across the engine.
//!
//! Provides dB/linear conversions and the normalized response curves used by
//! parameter scaling. All functions are allocation-free and `no_std` friendly.
//!
//! # Response Curves
//!
//! The `resp_*` family maps a normalized control value in [0, 1] back onto
//! [0, 1] with progressively more resolution at the low end. The `dec`
//! variants span decades (powers of 10), the `oct` variants span octaves
//! (powers of 2); the digit is how many decades/octaves the curve covers.
//! They are used to give frequency and time parameters a perceptually even
//! sweep.

use libm::{log10f, powf};

/// Convert decibels to linear gain: `10^(dB/20)`.
///
/// # Example
/// ```rust
/// use nimbus_core::db_to_gain;
///
/// assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
/// assert!((db_to_gain(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    powf(10.0, db * 0.05)
}

/// Convert linear gain to decibels: `20·log10(gain)`.
///
/// The input is floored at 1e-10 to keep the result finite.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * log10f(gain.max(1e-10))
}

// Normalization constants so that resp(1.0) == 1.0 exactly.
const DEC1_MULT: f32 = (10.0 / 9.0) * 0.1;
const DEC2_MULT: f32 = (100.0 / 99.0) * 0.01;
const DEC3_MULT: f32 = (1000.0 / 999.0) * 0.001;

const OCT3_MULT: f32 = (8.0 / 7.0) * 0.125;
const OCT4_MULT: f32 = (16.0 / 15.0) * 0.0625;

/// One-decade response curve: `(10^x − 1) / 9`.
#[inline]
pub fn resp_1dec(x: f32) -> f32 {
    (powf(10.0, x) - 1.0) * DEC1_MULT
}

/// Two-decade response curve.
#[inline]
pub fn resp_2dec(x: f32) -> f32 {
    (powf(10.0, 2.0 * x) - 1.0) * DEC2_MULT
}

/// Three-decade response curve.
#[inline]
pub fn resp_3dec(x: f32) -> f32 {
    (powf(10.0, 3.0 * x) - 1.0) * DEC3_MULT
}

/// Three-octave response curve: `(2^(3x) − 1) / 7`.
#[inline]
pub fn resp_3oct(x: f32) -> f32 {
    (powf(2.0, 3.0 * x) - 1.0) * OCT3_MULT
}

/// Four-octave response curve.
#[inline]
pub fn resp_4oct(x: f32) -> f32 {
    (powf(2.0, 4.0 * x) - 1.0) * OCT4_MULT
}
