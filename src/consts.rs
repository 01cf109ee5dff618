//! Constants for the Oregon Scientific V3 pulse protocol.
//!
//! This module defines the numeric windows the V3 variant uses for pulse
//! classification, preamble detection, and frame completion, plus the
//! bounded frame-buffer capacity shared by all protocols driving the
//! generic engine.
//!
//! ## Key Concepts
//!
//! - **Validity window**: a pulse is only meaningful inside
//!   `[OSV3_PULSE_MIN_US, OSV3_PULSE_MAX_US)`; anything outside is an
//!   inter-frame gap, not data.
//! - **Long/short split**: within the window, a single threshold divides
//!   pulses into the two Manchester half-bit classes.
//! - **Preamble**: a run of long pulses transmitted before real data; the
//!   receiver counts them before committing to bit recovery.
//! - **Frame lengths**: V3 telegrams come in a full 104-bit form and a
//!   shorter form accepted when a gap arrives mid-frame.
//!
//! These values are fixed protocol constants for the V3 variant. A
//! different OOK protocol brings its own numbers in its own
//! [`OokProtocol`](crate::decoder::OokProtocol) implementation.

/// Minimum meaningful pulse width in microseconds (inclusive).
///
/// Pulses shorter than this are treated as an inter-frame gap or noise and
/// routed to the gap rule rather than classified as data.
pub const OSV3_PULSE_MIN_US: u32 = 200;

/// Maximum meaningful pulse width in microseconds (exclusive).
///
/// Pulses at or above this bound are treated as an inter-frame gap.
pub const OSV3_PULSE_MAX_US: u32 = 1200;

/// Threshold (in microseconds) separating "long" from "short" pulses.
///
/// A pulse inside the validity window is long when `width >= 700`, short
/// otherwise.
pub const OSV3_LONG_PULSE_US: u32 = 700;

/// Number of consecutive long pulses required before the preamble is
/// considered found and bit recovery begins.
pub const OSV3_PREAMBLE_LONGS: u8 = 32;

/// Lower bound (inclusive, in bits) of the short-frame acceptance band.
///
/// A gap pulse arriving with at least this many accumulated bits completes
/// the frame instead of resetting it.
pub const OSV3_SHORT_FRAME_MIN_BITS: u16 = 40;

/// Upper bound (inclusive, in bits) of the short-frame acceptance band.
pub const OSV3_SHORT_FRAME_MAX_BITS: u16 = 103;

/// Total bit count of a full-length V3 frame. Reaching exactly this count
/// completes the frame regardless of what follows.
pub const OSV3_FRAME_BITS: u16 = 104;

/// Byte length of a completed full V3 frame (`OSV3_FRAME_BITS / 8`).
pub const OSV3_FRAME_LEN: usize = 13;

/// Capacity (in bytes) of the decoder's frame buffer.
///
/// Generous for V3 (a full frame is [`OSV3_FRAME_LEN`] bytes) so other
/// protocol variants can reuse the same engine.
pub const OOK_MAX_FRAME_LEN: usize = 31;
