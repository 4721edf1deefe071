// Tilt & Defuse - Tilt Estimator
//
// Exponential smoothing of the raw accelerometer vector followed by atan2
// angle extraction.  The filter state persists for the lifetime of the board:
// the sensor is physically continuous, so there is nothing to reset between
// levels.

use crate::events::SensorData;

/// Below this an axis is treated as zero for angle purposes.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// How the two reported angles are derived from the filtered vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisConvention {
    /// `a = atan2(x, z)`, `b = atan2(y, z)`.  Each axis judged on its own
    /// against gravity.
    Dual,
    /// `a = atan2(x, |yz|)` (pitch), `b = atan2(y, |xz|)` (roll).
    Pitch,
}

/// Two tilt angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltAngles {
    pub a: f32,
    pub b: f32,
}

#[derive(Debug, Clone)]
pub struct TiltEstimator {
    fx: f32,
    fy: f32,
    fz: f32,
    alpha: f32,
    convention: AxisConvention,
}

impl TiltEstimator {
    pub fn new(alpha: f32, convention: AxisConvention) -> Self {
        debug_assert!(alpha > 0.0 && alpha < 1.0, "alpha out of (0, 1): {}", alpha);
        // Seeded with gravity straight down.
        Self {
            fx: 0.0,
            fy: 0.0,
            fz: 1.0,
            alpha,
            convention,
        }
    }

    /// Fold in one raw sample and return the smoothed angles.
    pub fn update(&mut self, raw: SensorData) -> TiltAngles {
        let a = self.alpha;
        self.fx = a * raw.ax + (1.0 - a) * self.fx;
        self.fy = a * raw.ay + (1.0 - a) * self.fy;
        self.fz = a * raw.az + (1.0 - a) * self.fz;
        self.angles()
    }

    /// Angles of the current filter state.
    pub fn angles(&self) -> TiltAngles {
        let (x, y, z) = (self.fx, self.fy, self.fz);
        match self.convention {
            AxisConvention::Dual => TiltAngles {
                a: safe_atan2_deg(x, z),
                b: safe_atan2_deg(y, z),
            },
            AxisConvention::Pitch => TiltAngles {
                a: safe_atan2_deg(x, (y * y + z * z).sqrt()),
                b: safe_atan2_deg(y, (x * x + z * z).sqrt()),
            },
        }
    }
}

/// `atan2` in degrees that falls back to 0 on a degenerate or non-finite
/// vector instead of returning whatever the libm happens to produce.
fn safe_atan2_deg(num: f32, den: f32) -> f32 {
    if !num.is_finite() || !den.is_finite() {
        return 0.0;
    }
    if num.abs() < DEGENERATE_EPSILON && den.abs() < DEGENERATE_EPSILON {
        return 0.0;
    }
    num.atan2(den).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f32 = 9.8;

    fn tilted(deg_x: f32, deg_y: f32) -> SensorData {
        let z = 9.5;
        SensorData::new(deg_x.to_radians().tan() * z, deg_y.to_radians().tan() * z, z)
    }

    #[test]
    fn flat_reading_converges_to_level() {
        let mut est = TiltEstimator::new(0.2, AxisConvention::Dual);
        // start from a hard tilt so there is something to converge from
        for _ in 0..50 {
            est.update(SensorData::new(6.0, -6.0, 6.0));
        }
        let mut iterations = 0;
        loop {
            let angles = est.update(SensorData::new(0.0, 0.0, G));
            iterations += 1;
            if angles.a.abs() < 0.5 && angles.b.abs() < 0.5 {
                break;
            }
            assert!(iterations < 40, "no convergence after {} samples", iterations);
        }
        // 0.8^n decay: a couple dozen samples at most
        assert!(iterations > 1);
    }

    #[test]
    fn dual_convention_recovers_axis_angles() {
        let mut est = TiltEstimator::new(0.2, AxisConvention::Dual);
        let mut angles = TiltAngles::default();
        for _ in 0..200 {
            angles = est.update(tilted(9.0, 11.0));
        }
        assert!((angles.a - 9.0).abs() < 0.01, "a = {}", angles.a);
        assert!((angles.b - 11.0).abs() < 0.01, "b = {}", angles.b);
    }

    #[test]
    fn pitch_convention_uses_combined_magnitude() {
        let mut est = TiltEstimator::new(0.2, AxisConvention::Pitch);
        let mut angles = TiltAngles::default();
        let raw = SensorData::new(G * 0.5, 0.0, G * 0.75f32.sqrt());
        for _ in 0..200 {
            angles = est.update(raw);
        }
        assert!((angles.a - 30.0).abs() < 0.01, "pitch = {}", angles.a);
        assert!(angles.b.abs() < 0.01);
    }

    #[test]
    fn single_sample_moves_by_alpha() {
        let mut est = TiltEstimator::new(0.2, AxisConvention::Dual);
        est.update(SensorData::new(10.0, 0.0, 1.0));
        // fx = 2.0, fz = 0.2 * 1 + 0.8 * 1 = 1.0
        let expected = 2.0f32.atan2(1.0).to_degrees();
        assert!((est.angles().a - expected).abs() < 1e-4);
    }

    #[test]
    fn zeroed_sensor_degrades_to_zero() {
        let mut est = TiltEstimator::new(0.5, AxisConvention::Dual);
        let mut angles = TiltAngles { a: 1.0, b: 1.0 };
        for _ in 0..200 {
            angles = est.update(SensorData::new(0.0, 0.0, 0.0));
        }
        assert_eq!(angles.a, 0.0);
        assert_eq!(angles.b, 0.0);

        let mut pitch = TiltEstimator::new(0.5, AxisConvention::Pitch);
        for _ in 0..200 {
            angles = pitch.update(SensorData::new(0.0, 0.0, 0.0));
        }
        assert_eq!(angles, TiltAngles::default());
    }

    #[test]
    fn non_finite_input_is_clamped() {
        assert_eq!(safe_atan2_deg(f32::NAN, 1.0), 0.0);
        assert_eq!(safe_atan2_deg(1.0, f32::INFINITY), 0.0);
        assert!((safe_atan2_deg(1.0, 0.0) - 90.0).abs() < 1e-4);
    }
}
