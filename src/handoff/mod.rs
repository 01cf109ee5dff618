//! Interrupt-safe sharing of one decoder between a producer and a consumer.
//!
//! The decoder is written from the edge-capture interrupt and read from a
//! periodic polling context, so the one shared instance lives behind a
//! `critical_section` mutex. The writer side is
//! [`global_decoder_feed`]; the reader side is [`global_decoder_take`],
//! which snapshots the frame and resets the decoder inside a single
//! critical section — no pulse can land between the read and the clear,
//! and the consumer never observes a partially reset attempt.
//!
//! Contains helpers for the static-singleton pattern:
//! - `global_decoder_init`: const initializer for the global cell
//! - `global_decoder_setup`: installs the decoder at startup
//! - `global_decoder_feed`: one call per edge, from the ISR
//! - `global_decoder_take`: frame snapshot-and-reset, from the poll loop
//!
//! plus the [`init_ook_decoder!`](crate::init_ook_decoder),
//! [`setup_ook_decoder!`](crate::setup_ook_decoder),
//! [`feed_ook_pulse!`](crate::feed_ook_pulse) and
//! [`take_ook_frame!`](crate::take_ook_frame) macro wrappers.

use core::cell::RefCell;
use critical_section::Mutex;

use crate::decoder::{Frame, OokDecoder, OokProtocol};

mod macros;

/// Initializes the global static decoder cell.
///
/// # Example
/// ```rust
/// use core::cell::RefCell;
/// use critical_section::Mutex;
/// use ook433::decoder::OokDecoder;
/// use ook433::handoff::global_decoder_init;
/// use ook433::oregon::OregonV3;
///
/// static OOK_DECODER: Mutex<RefCell<Option<OokDecoder<OregonV3>>>> =
///     global_decoder_init::<OregonV3>();
/// ```
pub const fn global_decoder_init<P: OokProtocol>() -> Mutex<RefCell<Option<OokDecoder<P>>>> {
    Mutex::new(RefCell::new(None))
}

/// Installs a fresh decoder into the global cell.
///
/// Call once at startup, before enabling the capture interrupt.
pub fn global_decoder_setup<P: OokProtocol>(
    global_decoder: &'static Mutex<RefCell<Option<OokDecoder<P>>>>,
    protocol: P,
) {
    critical_section::with(|cs| {
        let _ = global_decoder
            .borrow(cs)
            .replace(Some(OokDecoder::new(protocol)));
    });
}

/// Feeds one pulse width to the shared decoder; the ISR-side entry point.
///
/// Returns whether a frame is now complete, and `false` when the decoder
/// has not been set up yet.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn GPIO() {
///     let width = /* microseconds since the previous edge */;
///     let _ = global_decoder_feed(&OOK_DECODER, width);
/// }
/// ```
pub fn global_decoder_feed<P: OokProtocol>(
    global_decoder: &'static Mutex<RefCell<Option<OokDecoder<P>>>>,
    width_us: u32,
) -> bool {
    critical_section::with(|cs| {
        match global_decoder.borrow(cs).borrow_mut().as_mut() {
            Some(decoder) => decoder.feed_pulse(width_us),
            None => false,
        }
    })
}

/// Takes the completed frame out of the shared decoder, if there is one.
///
/// Snapshot and reset happen inside one critical section, so the producer
/// side cannot interleave between them. Returns `None` while no frame is
/// complete (or before setup).
pub fn global_decoder_take<P: OokProtocol>(
    global_decoder: &'static Mutex<RefCell<Option<OokDecoder<P>>>>,
) -> Option<Frame> {
    let frame = critical_section::with(|cs| {
        global_decoder
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .and_then(|decoder| decoder.take_frame())
    });
    if let Some(ref frame) = frame {
        trace!("handoff: took frame of {} bytes", frame.len());
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oregon::OregonV3;

    #[test]
    fn test_feed_before_setup_is_safe() {
        static UNSET: Mutex<RefCell<Option<OokDecoder<OregonV3>>>> = global_decoder_init();
        assert!(!global_decoder_feed(&UNSET, 900));
        assert!(global_decoder_take(&UNSET).is_none());
    }

    #[test]
    fn test_global_round_trip() {
        static DECODER: Mutex<RefCell<Option<OokDecoder<OregonV3>>>> = global_decoder_init();
        global_decoder_setup(&DECODER, OregonV3);
        assert!(global_decoder_take(&DECODER).is_none());

        for _ in 0..33 {
            assert!(!global_decoder_feed(&DECODER, 900));
        }
        assert!(!global_decoder_feed(&DECODER, 300));
        for _ in 0..39 {
            assert!(!global_decoder_feed(&DECODER, 300));
            assert!(!global_decoder_feed(&DECODER, 300));
        }
        assert!(global_decoder_feed(&DECODER, 1500));

        let frame = global_decoder_take(&DECODER).unwrap();
        assert_eq!(frame.len(), 5);
        // The take reset the decoder; the next attempt starts fresh.
        assert!(global_decoder_take(&DECODER).is_none());
        assert!(!global_decoder_feed(&DECODER, 900));
    }
}
