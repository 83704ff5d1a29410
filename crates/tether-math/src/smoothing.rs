//! Critically-damped approach-to-target smoothing.
//!
//! Closed-form critically damped spring (Game Programming Gems 4, ch. 1.10)
//! with a polynomial approximation of `exp(-x)`. `smooth_time` is roughly the
//! time needed to cover most of the distance; `0` snaps.

use glam::{Vec2, Vec3};

use crate::angle::{delta_degrees, wrap_degrees};

/// Lower bound applied to non-zero smoothing times to keep `omega` finite.
const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Move `current` toward `target` and return the new value.
///
/// `velocity` is the caller-owned rate accumulator. A `smooth_time` of zero
/// returns `target` and zeroes `velocity`; a non-positive `dt` leaves both
/// untouched. The result never overshoots `target`.
pub fn damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if smooth_time <= 0.0 {
        *velocity = 0.0;
        return target;
    }
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Overshoot guard: land exactly on the target.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// [`damp`] for angles in degrees along the shorter arc. Output is wrapped
/// into `[-180, 180)`.
pub fn damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let current = wrap_degrees(current);
    if smooth_time <= 0.0 {
        *velocity = 0.0;
        return wrap_degrees(target);
    }
    let unwrapped_target = current + delta_degrees(current, target);
    wrap_degrees(damp(current, unwrapped_target, velocity, smooth_time, dt))
}

/// Per-axis [`damp`] for positions.
pub fn damp_vec3(current: Vec3, target: Vec3, velocity: &mut Vec3, smooth_time: f32, dt: f32) -> Vec3 {
    Vec3::new(
        damp(current.x, target.x, &mut velocity.x, smooth_time, dt),
        damp(current.y, target.y, &mut velocity.y, smooth_time, dt),
        damp(current.z, target.z, &mut velocity.z, smooth_time, dt),
    )
}

/// Per-axis [`damp_angle`] for `(pitch, yaw)` pairs.
pub fn damp_euler(current: Vec2, target: Vec2, velocity: &mut Vec2, smooth_time: f32, dt: f32) -> Vec2 {
    Vec2::new(
        damp_angle(current.x, target.x, &mut velocity.x, smooth_time, dt),
        damp_angle(current.y, target.y, &mut velocity.y, smooth_time, dt),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_zero_smooth_time_snaps() {
        let mut v = 3.0;
        let out = damp(1.0, 5.0, &mut v, 0.0, FRAME);
        assert_eq!(out, 5.0);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_zero_dt_holds_value() {
        let mut v = 0.0;
        assert_eq!(damp(1.0, 5.0, &mut v, 0.3, 0.0), 1.0);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut x = 0.0;
        let mut v = 0.0;
        for _ in 0..600 {
            x = damp(x, 10.0, &mut v, 0.3, FRAME);
            assert!(x <= 10.0);
        }
        assert!((x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_stable_with_large_dt() {
        let mut x = -4.0;
        let mut v = 0.0;
        for _ in 0..50 {
            x = damp(x, 4.0, &mut v, 0.03, 0.1);
            assert!(x.is_finite());
            assert!(x <= 4.0 + 1e-4);
        }
        assert!((x - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_tiny_smooth_time_reaches_target() {
        let mut v = 0.0;
        let out = damp(0.0, 1.0, &mut v, 1e-6, FRAME);
        assert!((out - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_angle_takes_short_arc() {
        // 170 -> -170 must travel through 180, never through 0.
        let mut a = 170.0;
        let mut v = 0.0;
        let mut travelled = 0.0;
        for _ in 0..240 {
            let next = damp_angle(a, -170.0, &mut v, 0.1, FRAME);
            travelled += delta_degrees(a, next).abs();
            a = next;
            assert!(!(-160.0..160.0).contains(&a), "went the long way: {a}");
        }
        assert!(delta_degrees(a, -170.0).abs() < 1e-2);
        assert!(travelled <= 20.0 + 1e-2, "path length {travelled}");
    }

    #[test]
    fn test_angle_path_never_exceeds_half_turn() {
        let pairs = [(0.0, 179.0), (-90.0, 90.0), (135.0, -135.0), (-179.0, 179.0)];
        for (from, to) in pairs {
            let mut a = from;
            let mut v = 0.0;
            let mut travelled = 0.0;
            for _ in 0..300 {
                let next = damp_angle(a, to, &mut v, 0.05, FRAME);
                travelled += delta_degrees(a, next).abs();
                a = next;
            }
            assert!(travelled <= 180.0 + 1e-2, "{from} -> {to} travelled {travelled}");
        }
    }

    #[test]
    fn test_angle_snap_wraps_target() {
        let mut v = 1.0;
        assert_eq!(damp_angle(10.0, 200.0, &mut v, 0.0, FRAME), -160.0);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_vec3_axes_are_independent() {
        let mut v = Vec3::ZERO;
        let out = damp_vec3(Vec3::ZERO, Vec3::new(1.0, 0.0, -1.0), &mut v, 0.2, FRAME);
        assert!(out.x > 0.0);
        assert_eq!(out.y, 0.0);
        assert!(out.z < 0.0);
        assert!((out.x + out.z).abs() < 1e-6);
    }
}
