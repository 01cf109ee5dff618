//! Edge-timing glue between the radio hardware and the decoder.
//!
//! The decoder consumes pulse widths, not signal levels, so something has
//! to measure the time between consecutive transitions of the receiver
//! output. Two arrangements are supported:
//!
//! - **Edge interrupt** ([`PulseTimer`]): the GPIO interrupt fires on every
//!   transition, reads a monotonic microsecond clock, and the timer turns
//!   consecutive timestamps into widths. This is the intended production
//!   path for OOK receiver modules.
//! - **Polling** ([`LevelSampler`], and [`run_capture_loop`] behind the
//!   `delay-loop` feature): sample the receiver pin at a fixed interval
//!   and emit a width whenever the level changes. Width resolution is the
//!   sampling interval, so sample several times per shortest pulse.

use embedded_hal::digital::InputPin;

/// Turns monotonic edge timestamps into pulse widths.
///
/// Feed it the microsecond clock value captured at every signal
/// transition; it returns the elapsed width since the previous edge.
/// The first edge after creation (or [`reset`](PulseTimer::reset)) only
/// primes the timer. Subtraction wraps, so widths stay correct across
/// the 32-bit microsecond rollover (~71 minutes).
#[derive(Debug, Default)]
pub struct PulseTimer {
    last_us: u32,
    primed: bool,
}

impl PulseTimer {
    /// Creates an unprimed timer.
    pub const fn new() -> Self {
        Self {
            last_us: 0,
            primed: false,
        }
    }

    /// Records one edge timestamp and returns the width of the pulse that
    /// just ended, or `None` for the priming edge.
    pub fn edge(&mut self, now_us: u32) -> Option<u32> {
        if !self.primed {
            self.primed = true;
            self.last_us = now_us;
            return None;
        }
        let width = now_us.wrapping_sub(self.last_us);
        self.last_us = now_us;
        Some(width)
    }

    /// Forgets the previous edge; the next one primes again.
    pub fn reset(&mut self) {
        self.primed = false;
        self.last_us = 0;
    }
}

/// Fixed-interval pin sampler that emits a pulse width per transition.
///
/// An alternative to edge interrupts for platforms without free capture
/// hardware: call [`sample`](LevelSampler::sample) every `dt_us`
/// microseconds and feed any returned width to the decoder. The level at
/// construction is assumed low, so a line idling high produces one
/// sub-window width at startup that the protocol discards.
#[derive(Debug)]
pub struct LevelSampler<RX> {
    /// RX pin
    pub rx: RX,
    last_level: bool,
    elapsed_us: u32,
    inverted: bool,
}

impl<RX: InputPin> LevelSampler<RX> {
    /// Creates a sampler over the receiver pin.
    ///
    /// # Arguments
    /// - `rx`: the input pin carrying the demodulated OOK signal.
    /// - `inverted`: whether the receiver output is active-low
    ///   (HIGH => no carrier). Defaults to `false`.
    pub fn new(rx: RX, inverted: Option<bool>) -> Self {
        Self {
            rx,
            last_level: false,
            elapsed_us: 0,
            inverted: inverted.unwrap_or(false),
        }
    }

    /// Takes one sample, `dt_us` microseconds after the previous one.
    ///
    /// Returns the width of the pulse that just ended when the level
    /// changed since the last sample, `None` otherwise.
    pub fn sample(&mut self, dt_us: u32) -> Option<u32> {
        let level = if self.inverted {
            !self.rx.is_high().unwrap_or(false)
        } else {
            self.rx.is_high().unwrap_or(false)
        };
        self.elapsed_us = self.elapsed_us.wrapping_add(dt_us);
        if level != self.last_level {
            self.last_level = level;
            let width = self.elapsed_us;
            self.elapsed_us = 0;
            return Some(width);
        }
        None
    }
}

/// Runs a blocking sample-and-decode loop until a frame completes.
///
/// Drives the sampler from a delay provider at `interval_us` microsecond
/// spacing, feeds every measured width to the decoder, and returns the
/// first completed frame. Intended for single-purpose polling firmware;
/// interrupt-driven capture through [`crate::handoff`] is preferred when
/// anything else needs the CPU.
///
/// # Example
/// ```rust,ignore
/// let mut sampler = LevelSampler::new(rx_pin, None);
/// let mut decoder = OokDecoder::new(OregonV3);
/// let frame = run_capture_loop(&mut sampler, &mut decoder, &mut delay, 100);
/// ```
#[cfg(feature = "delay-loop")]
pub fn run_capture_loop<D, RX, P>(
    sampler: &mut LevelSampler<RX>,
    decoder: &mut crate::decoder::OokDecoder<P>,
    delay: &mut D,
    interval_us: u32,
) -> crate::decoder::Frame
where
    D: embedded_hal::delay::DelayNs,
    RX: InputPin,
    P: crate::decoder::OokProtocol,
{
    loop {
        if let Some(width) = sampler.sample(interval_us) {
            if decoder.feed_pulse(width) {
                if let Some(frame) = decoder.take_frame() {
                    return frame;
                }
            }
        }
        delay.delay_us(interval_us);
    }
}
