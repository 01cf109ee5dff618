//! Oregon Scientific V3 framing rules.
//!
//! The V3 variant (used by OWL CM180-class energy monitors) transmits a
//! preamble of long pulses followed by Manchester-coded data in which a
//! long pulse is a full transition and two short pulses pair up into one
//! symbol. This module supplies those rules to the generic engine as an
//! [`OokProtocol`] strategy; every numeric window it applies lives in
//! [`crate::consts`].
//!
//! Classification per pulse:
//! - Outside the `[200, 1200)` µs validity window the pulse is a gap, not
//!   data: with `40..=103` bits accumulated the frame completes (the short
//!   V3 telegram form), otherwise the attempt resets.
//! - Inside the window, `>= 700` µs is long, else short.
//! - Searching ([`DecoderState::Unknown`]): longs run up the preamble
//!   counter; a short after at least 32 of them is the sync point (one
//!   recovered `1` bit, phase committed), a short any earlier is garbage
//!   and resets.
//! - Synced ([`DecoderState::Ok`]): a long records a transition bit; a
//!   short arms [`DecoderState::T0`].
//! - [`DecoderState::T0`]: a second short completes the pair (repeat bit);
//!   a long here violates the pairing and resets.
//! - Independently of all that, hitting exactly 104 total bits completes
//!   the full-length telegram.

use crate::consts::{
    OSV3_FRAME_BITS, OSV3_LONG_PULSE_US, OSV3_PREAMBLE_LONGS, OSV3_PULSE_MAX_US,
    OSV3_PULSE_MIN_US, OSV3_SHORT_FRAME_MAX_BITS, OSV3_SHORT_FRAME_MIN_BITS,
};
use crate::decoder::{DecoderCore, DecoderState, OokProtocol, PulseStep};

/// The Oregon V3 protocol strategy.
///
/// Stateless: all per-frame state lives in the [`DecoderCore`], including
/// the preamble run count (carried in the core's flip byte while
/// searching). Protocol variants with different windows implement their
/// own [`OokProtocol`] rather than parameterizing this one; the V3
/// constants are fixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OregonV3;

impl OokProtocol for OregonV3 {
    fn decode(&self, core: &mut DecoderCore, width_us: u32) -> PulseStep {
        if (OSV3_PULSE_MIN_US..OSV3_PULSE_MAX_US).contains(&width_us) {
            let long = width_us >= OSV3_LONG_PULSE_US;
            match core.state() {
                DecoderState::Unknown => {
                    if long {
                        // Preamble run: the flip byte counts longs here.
                        core.set_flip(core.flip().saturating_add(1));
                    } else if core.flip() >= OSV3_PREAMBLE_LONGS {
                        // Sync: commit the phase and record the leading 1.
                        core.set_flip(0);
                        core.record_manchester_bit(true);
                    } else {
                        // Garbage before a valid preamble.
                        return PulseStep::Invalid;
                    }
                }
                DecoderState::Ok => {
                    if long {
                        core.record_manchester_bit(true);
                    } else {
                        core.set_state(DecoderState::T0);
                    }
                }
                DecoderState::T0 => {
                    if long {
                        // A long where the pair's second short was due.
                        return PulseStep::Invalid;
                    }
                    core.record_manchester_bit(false);
                }
                _ => return PulseStep::Invalid,
            }
            if core.total_bits() == OSV3_FRAME_BITS {
                return PulseStep::Complete;
            }
            PulseStep::Pending
        } else if (OSV3_SHORT_FRAME_MIN_BITS..=OSV3_SHORT_FRAME_MAX_BITS)
            .contains(&core.total_bits())
        {
            // Inter-frame gap with a plausible bit count: accept the
            // short telegram form.
            PulseStep::Complete
        } else {
            PulseStep::Invalid
        }
    }
}
