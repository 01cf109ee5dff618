//! Generic OOK pulse classifier and Manchester symbol decoder.
//!
//! This module provides the [`OokDecoder`] struct, the protocol-agnostic
//! half of the receive pipeline. It consumes one pulse-width measurement
//! per signal transition, delegates classification to an [`OokProtocol`]
//! strategy, and packs the recovered Manchester bits into a bounded frame
//! buffer.
//!
//! ## Split of responsibilities
//!
//! *How a bit gets stored* is generic and lives here: the flip flag, the
//! bit/byte cursors, the completion padding, and the reset-on-violation
//! rule are shared by every Manchester-coded OOK protocol. *How pulse
//! widths map to bits* is protocol-specific and lives behind
//! [`OokProtocol`]; see [`crate::oregon::OregonV3`] for the Oregon V3
//! rules. Adding another protocol variant means implementing the trait,
//! not touching this engine.
//!
//! ## Example
//!
//! ```rust
//! use ook433::decoder::OokDecoder;
//! use ook433::oregon::OregonV3;
//!
//! let mut decoder = OokDecoder::new(OregonV3);
//! for width_us in [900u32, 900, 300] {
//!     let _ = decoder.feed_pulse(width_us);
//! }
//! assert!(!decoder.is_complete());
//! ```
//!
//! ## Concurrency
//!
//! The decoder has no interior synchronization.
//! [`feed_pulse`](OokDecoder::feed_pulse) is the sole writer path and must
//! not be reentered; readers must not race a reset. For the shared
//! interrupt/poll arrangement use the [`crate::handoff`] helpers, which
//! wrap every access in a critical section.

use core::convert::Infallible;

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use crate::buffer::BitBuffer;
#[cfg(not(feature = "std"))]
use crate::consts::OOK_MAX_FRAME_LEN;

/// A completed frame, snapshotted out of the decoder.
#[cfg(not(feature = "std"))]
pub type Frame = Vec<u8, OOK_MAX_FRAME_LEN>;

/// A completed frame, snapshotted out of the decoder.
#[cfg(feature = "std")]
pub type Frame = Vec<u8>;

/// Decode state machine positions.
///
/// `Unknown` is the fresh-attempt/searching state; `T0` through `T3` are
/// mid-symbol positions a protocol moves through while waiting for the
/// rest of a multi-pulse symbol (V3 only uses `T0`); `Ok` is the
/// between-symbols resting state; `Done` is terminal until an explicit
/// [`reset`](OokDecoder::reset).
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub enum DecoderState {
    /// Fresh attempt: searching for a preamble, nothing committed yet.
    #[default]
    Unknown,
    /// First half of a multi-pulse symbol seen, waiting for the second.
    T0,
    /// Mid-symbol position for protocols with longer symbol patterns.
    T1,
    /// Mid-symbol position for protocols with longer symbol patterns.
    T2,
    /// Mid-symbol position for protocols with longer symbol patterns.
    T3,
    /// Synchronized and between symbols; the next pulse starts a new one.
    Ok,
    /// A frame is complete and readable. Terminal until reset.
    Done,
}

/// What the protocol concluded from one classified pulse.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PulseStep {
    /// Timing or ordering violation: discard the attempt and start over.
    Invalid,
    /// The frame is complete; finalize and expose it.
    Complete,
    /// An ordinary symbol step (possibly recording no bit yet); keep going.
    Pending,
}

/// Protocol strategy consumed by the engine.
///
/// One implementation per OOK protocol variant supplies the pulse-width
/// windows, the preamble rule, and the completion thresholds, and drives
/// the per-pulse state transitions by mutating the [`DecoderCore`] it is
/// handed.
pub trait OokProtocol {
    /// Classifies one pulse and advances the decode state machine.
    ///
    /// Implementations read and update the core's state and flip flag and
    /// record recovered bits through
    /// [`record_bit`](DecoderCore::record_bit) /
    /// [`record_manchester_bit`](DecoderCore::record_manchester_bit).
    /// The returned [`PulseStep`] tells the engine whether to reset,
    /// finalize, or continue.
    fn decode(&self, core: &mut DecoderCore, width_us: u32) -> PulseStep;
}

/// Mutable decode state shared between the engine and the protocol.
///
/// Owns the state machine position, the Manchester flip byte, and the
/// frame buffer. Protocols receive `&mut DecoderCore` during
/// [`OokProtocol::decode`]; everything else goes through [`OokDecoder`].
#[derive(Debug, Default)]
pub struct DecoderCore {
    /// Current state machine position.
    state: DecoderState,

    /// Manchester phase flag, XOR-toggled on each recorded transition.
    ///
    /// Protocols may repurpose it as a small counter while searching for a
    /// preamble (it is reset to a phase value at sync), which is why it is
    /// a byte rather than a bool.
    flip: u8,

    /// Bounded frame buffer the recovered bits are packed into.
    buf: BitBuffer,
}

impl DecoderCore {
    /// Current state machine position.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Moves the state machine; used by protocols mid-symbol.
    pub fn set_state(&mut self, state: DecoderState) {
        self.state = state;
    }

    /// Current flip byte (phase flag or preamble counter).
    pub fn flip(&self) -> u8 {
        self.flip
    }

    /// Overwrites the flip byte.
    pub fn set_flip(&mut self, flip: u8) {
        self.flip = flip;
    }

    /// Total bits accumulated in the current frame attempt.
    pub fn total_bits(&self) -> u16 {
        self.buf.total_bits()
    }

    /// Number of complete frame bytes accumulated so far.
    pub fn frame_len(&self) -> usize {
        self.buf.len()
    }

    /// Appends one bit to the frame buffer and rests the state machine at
    /// [`DecoderState::Ok`].
    ///
    /// A buffer overflow is treated like any other violation: the whole
    /// attempt is discarded and the bit is dropped.
    pub fn record_bit(&mut self, value: bool) {
        if self.buf.push_bit(value).is_err() {
            self.reset();
            return;
        }
        self.state = DecoderState::Ok;
    }

    /// XORs `value` into the flip flag, then records the updated flag.
    ///
    /// This is the Manchester recovery step: a long pulse is a transition
    /// (toggle then store), two shorts are a repeat (store unchanged), so
    /// relative pulse length becomes one logical data bit.
    pub fn record_manchester_bit(&mut self, value: bool) {
        self.flip ^= value as u8;
        self.record_bit(self.flip & 1 != 0);
    }

    /// Forces the state machine back to [`DecoderState::Unknown`] and
    /// zeroes every counter. Idempotent, callable at any time.
    pub fn reset(&mut self) {
        self.state = DecoderState::Unknown;
        self.flip = 0;
        self.buf.clear();
    }

    /// Pads the partial byte to alignment with zero bits, then marks the
    /// frame complete.
    fn finish(&mut self) {
        while self.buf.partial_bits() != 0 {
            if self.buf.push_bit(false).is_err() {
                self.reset();
                return;
            }
        }
        self.state = DecoderState::Done;
    }
}

/// Protocol-agnostic OOK frame decoder.
///
/// One instance persists for the life of the receiving sensor. A frame
/// attempt begins implicitly at [`DecoderState::Unknown`], advances one
/// pulse at a time through [`feed_pulse`](OokDecoder::feed_pulse), and
/// ends either complete (frame readable until the next reset) or
/// discarded (silent reset, next pulse starts over).
///
/// ## Type Parameters
///
/// - `P`: the [`OokProtocol`] strategy supplying classification and
///   completion rules.
#[derive(Debug)]
pub struct OokDecoder<P> {
    protocol: P,
    core: DecoderCore,
}

impl<P: OokProtocol> OokDecoder<P> {
    /// Creates a decoder resting at [`DecoderState::Unknown`] with empty
    /// counters.
    pub fn new(protocol: P) -> Self {
        Self {
            protocol,
            core: DecoderCore::default(),
        }
    }

    /// Accepts one pulse-width measurement (microseconds between two
    /// consecutive signal edges) and returns whether a frame is now
    /// complete.
    ///
    /// Once complete, further calls are no-ops returning `true` until
    /// [`reset`](OokDecoder::reset) (or a snapshot via
    /// [`take_frame`](OokDecoder::take_frame)).
    ///
    /// This is the sole writer path. Call it from exactly one context —
    /// typically the edge-capture interrupt — with no reentrancy.
    pub fn feed_pulse(&mut self, width_us: u32) -> bool {
        if self.core.state != DecoderState::Done {
            match self.protocol.decode(&mut self.core, width_us) {
                PulseStep::Invalid => self.core.reset(),
                PulseStep::Complete => self.core.finish(),
                PulseStep::Pending => {}
            }
        }
        self.core.state == DecoderState::Done
    }

    /// True iff a complete frame is buffered and readable.
    pub fn is_complete(&self) -> bool {
        self.core.state == DecoderState::Done
    }

    /// Borrows the completed frame bytes, or `None` while incomplete.
    ///
    /// The slice stays valid until the next reset or pulse delivery; if
    /// pulses keep arriving from an interrupt, prefer
    /// [`take_frame`](OokDecoder::take_frame) under the [`crate::handoff`]
    /// helpers.
    pub fn frame(&self) -> Option<&[u8]> {
        if self.core.state == DecoderState::Done {
            Some(self.core.buf.as_bytes())
        } else {
            None
        }
    }

    /// Snapshots the completed frame and resets the decoder in one step.
    ///
    /// Returns `None` while incomplete. Performing the copy and the reset
    /// together is what makes the consumer side race-free: run inside a
    /// critical section, no pulse can land between the read and the clear.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.core.state != DecoderState::Done {
            return None;
        }
        #[cfg(not(feature = "std"))]
        let frame = Vec::from_slice(self.core.buf.as_bytes()).unwrap();
        #[cfg(feature = "std")]
        let frame = Vec::from(self.core.buf.as_bytes());
        self.core.reset();
        Some(frame)
    }

    /// Non-blocking read: the completed frame, or
    /// [`nb::Error::WouldBlock`] while one is still being assembled.
    ///
    /// Equivalent to [`take_frame`](OokDecoder::take_frame) behind the
    /// `nb` convention, so callers can `nb::block!` on it in polling
    /// firmware.
    pub fn poll_frame(&mut self) -> nb::Result<Frame, Infallible> {
        match self.take_frame() {
            Some(frame) => Ok(frame),
            None => Err(nb::Error::WouldBlock),
        }
    }

    /// Forces the decoder back to a fresh attempt. Idempotent.
    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Read access to the decode state, for inspection and tests.
    pub fn core(&self) -> &DecoderCore {
        &self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal strategy for exercising the engine: width 0 is invalid,
    /// width 1 completes, anything else records its low bit.
    #[derive(Debug)]
    struct LowBit;

    impl OokProtocol for LowBit {
        fn decode(&self, core: &mut DecoderCore, width_us: u32) -> PulseStep {
            match width_us {
                0 => PulseStep::Invalid,
                1 => PulseStep::Complete,
                w => {
                    core.record_bit(w & 1 != 0);
                    PulseStep::Pending
                }
            }
        }
    }

    #[test]
    fn test_new_decoder_is_fresh() {
        let decoder = OokDecoder::new(LowBit);
        assert_eq!(decoder.core().state(), DecoderState::Unknown);
        assert_eq!(decoder.core().total_bits(), 0);
        assert!(!decoder.is_complete());
        assert!(decoder.frame().is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut decoder = OokDecoder::new(LowBit);
        assert!(!decoder.feed_pulse(3));
        decoder.reset();
        decoder.reset();
        assert_eq!(decoder.core().state(), DecoderState::Unknown);
        assert_eq!(decoder.core().total_bits(), 0);
        assert_eq!(decoder.core().flip(), 0);
    }

    #[test]
    fn test_invalid_pulse_discards_attempt() {
        let mut decoder = OokDecoder::new(LowBit);
        for _ in 0..5 {
            assert!(!decoder.feed_pulse(3));
        }
        assert_eq!(decoder.core().total_bits(), 5);
        assert!(!decoder.feed_pulse(0));
        assert_eq!(decoder.core().state(), DecoderState::Unknown);
        assert_eq!(decoder.core().total_bits(), 0);
    }

    #[test]
    fn test_completion_pads_to_byte_alignment() {
        let mut decoder = OokDecoder::new(LowBit);
        // Three 1-bits, then complete: 0b00000111 after zero padding.
        for _ in 0..3 {
            assert!(!decoder.feed_pulse(3));
        }
        assert!(decoder.feed_pulse(1));
        assert_eq!(decoder.frame(), Some(&[0x07][..]));
        assert_eq!(decoder.core().total_bits(), 8);
    }

    #[test]
    fn test_feed_after_done_is_a_no_op() {
        let mut decoder = OokDecoder::new(LowBit);
        let _ = decoder.feed_pulse(3);
        assert!(decoder.feed_pulse(1));
        // Neither a data pulse nor an invalid one disturbs a done frame.
        assert!(decoder.feed_pulse(2));
        assert!(decoder.feed_pulse(0));
        assert_eq!(decoder.frame(), Some(&[0x01][..]));
    }

    #[test]
    fn test_take_frame_snapshots_and_resets() {
        let mut decoder = OokDecoder::new(LowBit);
        assert!(decoder.take_frame().is_none());
        let _ = decoder.feed_pulse(3);
        let _ = decoder.feed_pulse(1);
        let frame = decoder.take_frame().unwrap();
        assert_eq!(&frame[..], &[0x01]);
        // The snapshot consumed the frame and reset the decoder.
        assert!(!decoder.is_complete());
        assert!(decoder.take_frame().is_none());
        assert_eq!(decoder.core().state(), DecoderState::Unknown);
    }

    #[test]
    fn test_poll_frame_follows_nb_convention() {
        let mut decoder = OokDecoder::new(LowBit);
        assert_eq!(decoder.poll_frame(), Err(nb::Error::WouldBlock));
        let _ = decoder.feed_pulse(3);
        let _ = decoder.feed_pulse(1);
        let frame = decoder.poll_frame().unwrap();
        assert_eq!(&frame[..], &[0x01]);
        assert_eq!(decoder.poll_frame(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn test_manchester_flip_recovery() {
        let mut core = DecoderCore::default();
        // A transition toggles the phase before storing.
        core.record_manchester_bit(true);
        assert_eq!(core.flip(), 1);
        // A repeat stores the current phase unchanged.
        core.record_manchester_bit(false);
        assert_eq!(core.flip(), 1);
        core.record_manchester_bit(true);
        assert_eq!(core.flip(), 0);
        assert_eq!(core.total_bits(), 3);
        assert_eq!(core.state(), DecoderState::Ok);
    }
}
