//! Sensor polling surface for decoder consumers.
//!
//! Models the host firmware's sensor contract: a sensor identifies
//! itself, describes itself for humans, exposes one magnitude per slot,
//! and is ticked periodically from the main loop. [`Cm180Sensor`] is the
//! OWL CM180 energy monitor behind that contract — it owns the Oregon V3
//! decoder plus the edge timing, and on each tick drains any completed
//! frame into an accumulated energy reading.
//!
//! Turning a raw telegram into watt-hours is deliberately *not* built in:
//! the field layout of the CM180 energy counter is receiver-firmware
//! territory, so the conversion is delegated to an [`EnergyDecode`]
//! implementation supplied by the integrator. Until one returns a value,
//! the reading simply does not advance.
//!
//! ## Concurrency
//!
//! [`Cm180Sensor::on_edge`] is the sole writer path and belongs to the
//! capture interrupt; [`Sensor::tick`] and the read accessors belong to
//! the polling context. When both contexts are live, wrap the instance in
//! the same critical-section arrangement as [`crate::handoff`] — the
//! sensor itself adds no locking.

use core::fmt::Write;

#[cfg(not(feature = "std"))]
use heapless::String;

use crate::capture::PulseTimer;
use crate::decoder::OokDecoder;
use crate::oregon::OregonV3;

/// A sensor's human-readable description.
#[cfg(not(feature = "std"))]
pub type Description = String<32>;

/// A sensor's human-readable description.
#[cfg(feature = "std")]
pub type Description = String;

/// Physical quantity kinds a sensor slot can report.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Magnitude {
    /// Accumulated energy, reported in kWh.
    Energy,
}

/// The polling contract a sensor exposes to the host firmware.
///
/// The host calls [`tick`](Sensor::tick) once per loop iteration and
/// reads slots whenever it publishes values; everything here is cheap and
/// non-blocking.
pub trait Sensor {
    /// Hardware address of the sensor (the GPIO carrying its signal).
    fn address(&self) -> u8;

    /// Human-readable description, e.g. `"OWL CM180 @ GPIO12"`.
    fn description(&self) -> Description;

    /// Number of value slots this sensor exposes.
    fn count(&self) -> u8;

    /// The magnitude kind of a slot, or `None` for an out-of-range slot.
    fn magnitude(&self, slot: u8) -> Option<Magnitude>;

    /// Current value of a slot, or `None` for an out-of-range slot.
    fn value(&self, slot: u8) -> Option<f64>;

    /// Periodic poll from the host loop.
    fn tick(&mut self);
}

/// Frame-to-energy conversion, left to the integrator.
///
/// Implementations inspect one completed Oregon V3 telegram and return
/// the energy increment it carries, or `None` to discard it (failed
/// checksum, unknown sensor ID, wrong channel).
pub trait EnergyDecode {
    /// The watt-hour increment carried by `frame`, if it is acceptable.
    fn energy_wh(&self, frame: &[u8]) -> Option<f64>;
}

/// The OWL CM180 energy monitor as a pollable sensor.
///
/// Owns the decode pipeline for one receiver GPIO: an edge
/// [`PulseTimer`] and an [`OokDecoder`] running the
/// [`OregonV3`] rules, plus the kWh accumulator fed by the
/// supplied [`EnergyDecode`] conversion.
#[derive(Debug)]
pub struct Cm180Sensor<C> {
    decoder: OokDecoder<OregonV3>,
    timer: PulseTimer,
    convert: C,
    gpio: u8,
    kwh: f64,
}

impl<C: EnergyDecode> Cm180Sensor<C> {
    /// Creates a sensor for the receiver wired to `gpio`.
    pub fn new(gpio: u8, convert: C) -> Self {
        Self {
            decoder: OokDecoder::new(OregonV3),
            timer: PulseTimer::new(),
            convert,
            gpio,
            kwh: 0.0,
        }
    }

    /// Reports one signal edge, timestamped with a monotonic microsecond
    /// clock. This is the capture-interrupt entry point and the sole
    /// writer path into the decoder.
    pub fn on_edge(&mut self, now_us: u32) {
        if let Some(width) = self.timer.edge(now_us) {
            let _ = self.decoder.feed_pulse(width);
        }
    }

    /// Read access to the decode pipeline, for inspection and tests.
    pub fn decoder(&self) -> &OokDecoder<OregonV3> {
        &self.decoder
    }
}

impl<C: EnergyDecode> Sensor for Cm180Sensor<C> {
    fn address(&self) -> u8 {
        self.gpio
    }

    fn description(&self) -> Description {
        let mut description = Description::new();
        let _ = write!(description, "OWL CM180 @ GPIO{}", self.gpio);
        description
    }

    fn count(&self) -> u8 {
        1
    }

    fn magnitude(&self, slot: u8) -> Option<Magnitude> {
        (slot == 0).then_some(Magnitude::Energy)
    }

    fn value(&self, slot: u8) -> Option<f64> {
        (slot == 0).then_some(self.kwh)
    }

    fn tick(&mut self) {
        if let Some(frame) = self.decoder.take_frame() {
            debug!("cm180: frame of {} bytes", frame.len());
            if let Some(wh) = self.convert.energy_wh(&frame) {
                self.kwh += wh / 1000.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts every full-length frame as a fixed increment.
    #[derive(Debug)]
    struct FixedWh(f64);

    impl EnergyDecode for FixedWh {
        fn energy_wh(&self, frame: &[u8]) -> Option<f64> {
            (frame.len() == 13).then_some(self.0)
        }
    }

    /// Discards everything, like an integrator without a conversion yet.
    #[derive(Debug)]
    struct Unconverted;

    impl EnergyDecode for Unconverted {
        fn energy_wh(&self, _frame: &[u8]) -> Option<f64> {
            None
        }
    }

    /// Delivers a full 104-bit all-ones frame as edge timestamps.
    fn deliver_frame<C: EnergyDecode>(sensor: &mut Cm180Sensor<C>) {
        let mut pulses = vec![900u32; 33];
        pulses.push(300);
        for _ in 0..103 {
            pulses.push(300);
            pulses.push(300);
        }
        let mut now = 0u32;
        sensor.on_edge(now);
        for w in pulses {
            now += w;
            sensor.on_edge(now);
        }
    }

    #[test]
    fn test_identity_and_slots() {
        let sensor = Cm180Sensor::new(12, Unconverted);
        assert_eq!(sensor.address(), 12);
        assert_eq!(&sensor.description()[..], "OWL CM180 @ GPIO12");
        assert_eq!(sensor.count(), 1);
        assert_eq!(sensor.magnitude(0), Some(Magnitude::Energy));
        assert_eq!(sensor.magnitude(1), None);
        assert_eq!(sensor.value(0), Some(0.0));
        assert_eq!(sensor.value(1), None);
    }

    #[test]
    fn test_tick_accumulates_converted_energy() {
        let mut sensor = Cm180Sensor::new(12, FixedWh(250.0));
        deliver_frame(&mut sensor);
        assert!(sensor.decoder().is_complete());
        sensor.tick();
        assert_eq!(sensor.value(0), Some(0.25));
        // The tick consumed the frame; an idle tick changes nothing.
        sensor.tick();
        assert_eq!(sensor.value(0), Some(0.25));

        deliver_frame(&mut sensor);
        sensor.tick();
        assert_eq!(sensor.value(0), Some(0.5));
    }

    #[test]
    fn test_unconverted_frames_leave_reading_unchanged() {
        let mut sensor = Cm180Sensor::new(4, Unconverted);
        deliver_frame(&mut sensor);
        sensor.tick();
        assert_eq!(sensor.value(0), Some(0.0));
        // The frame was still consumed and the decoder reset.
        assert!(!sensor.decoder().is_complete());
    }
}
