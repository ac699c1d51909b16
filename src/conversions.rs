//! Display-unit conversions applied at snapshot build time
//!
//! Every function here is pure over raw decoded values. Nothing is cached:
//! the aggregator recomputes derived fields on each read.

use crate::types::{CELL_SLOTS, Power};

/// m/s to the display speed unit.
pub const SPEED_FACTOR: f64 = 2.2376;
/// Metres to feet.
pub const FEET_PER_METER: f64 = 3.281;
/// degE7 to degrees.
pub const DEGE7_SCALE: f64 = 10_000_000.0;
/// Raw cell reading to fraction of full charge.
pub const CELL_SCALE: f64 = 12_500.0;
/// Fractions above this mark an unpopulated cell slot.
pub const CELL_POPULATED_LIMIT: f64 = 1.1;
/// Raw millivolts to volts.
pub const MILLIVOLTS_PER_VOLT: f64 = 1000.0;
/// Raw current units per amp.
pub const CURRENT_SCALE: f64 = 10.0;

/// Convert a native speed to the display unit.
pub fn speed(native: f32) -> f64 {
    native as f64 * SPEED_FACTOR
}

/// Convert millimetres to feet.
pub fn altitude_feet(millimeters: i32) -> f64 {
    millimeters as f64 / 1000.0 * FEET_PER_METER
}

/// Convert a degE7 coordinate to degrees.
pub fn coordinate(dege7: i32) -> f64 {
    dege7 as f64 / DEGE7_SCALE
}

/// Convert radians to degrees.
pub fn degrees(radians: f32) -> f64 {
    (radians as f64).to_degrees()
}

/// Convert one raw cell reading, zeroing slots that are not populated.
pub fn cell_fraction(raw: u16) -> f64 {
    let fraction = raw as f64 / CELL_SCALE;
    if fraction > CELL_POPULATED_LIMIT { 0.0 } else { fraction }
}

/// Convert every cell slot.
pub fn cell_fractions(voltages: &[u16; CELL_SLOTS]) -> [f64; CELL_SLOTS] {
    (*voltages).map(cell_fraction)
}

/// Pack voltage in volts.
///
/// Only the first cell slot contributes. Autopilots that report the whole
/// pack in slot 0 are read correctly; per-cell reporters are not summed.
pub fn pack_voltage(voltages: &[u16; CELL_SLOTS]) -> f64 {
    let first = &voltages[..1];
    first.iter().map(|&raw| raw as f64).sum::<f64>() / MILLIVOLTS_PER_VOLT / first.len() as f64
}

/// Battery current in amps.
pub fn current(raw: i16) -> f64 {
    raw as f64 / CURRENT_SCALE
}

/// Electrical power, pack voltage times current.
pub fn power(battery: &Power) -> f64 {
    current(battery.current_battery) * pack_voltage(&battery.voltages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn populated_cell_is_kept() {
        assert!(approx_eq(cell_fraction(11_000), 0.88));
    }

    #[test]
    fn over_range_cell_is_zeroed() {
        assert_eq!(cell_fraction(14_000), 0.0);
        // Unpopulated slots report u16::MAX.
        assert_eq!(cell_fraction(u16::MAX), 0.0);
    }

    #[test]
    fn cell_at_limit_is_kept() {
        assert!(approx_eq(cell_fraction(13_750), 1.1));
    }

    #[test]
    fn pack_voltage_reads_first_cell_only() {
        let mut voltages = [u16::MAX; CELL_SLOTS];
        voltages[0] = 12_600;
        assert!(approx_eq(pack_voltage(&voltages), 12.6));

        voltages[1] = 4_000;
        assert!(approx_eq(pack_voltage(&voltages), 12.6));
    }

    #[test]
    fn power_is_current_times_pack_voltage() {
        let mut battery = Power { current_battery: 155, ..Default::default() };
        battery.voltages[0] = 12_000;
        assert!(approx_eq(current(battery.current_battery), 15.5));
        assert!(approx_eq(power(&battery), 15.5 * 12.0));
    }

    #[test]
    fn unit_conversions() {
        assert!(approx_eq(speed(10.0), 22.376));
        assert!(approx_eq(altitude_feet(100_000), 328.1));
        assert!(approx_eq(coordinate(473_977_418), 47.3977418));
        assert!(approx_eq(coordinate(-1_223_010_000), -122.301));
        assert!((degrees(std::f32::consts::FRAC_PI_2) - 90.0).abs() < 1e-5);
    }
}
