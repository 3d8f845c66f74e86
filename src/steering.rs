use bevy::math::Vec3;

/// Length of `v` that neither overflows for huge components nor underflows
/// for subnormal ones.
pub fn magnitude(v: Vec3) -> f32 {
    if v.is_nan() {
        return f32::NAN;
    }
    let scale = v.abs().max_element();
    if scale == 0.0 || scale.is_infinite() {
        return scale;
    }
    scale * (v / scale).length()
}

/// Unit vector along `v`, or zero when `v` has no usable direction.
pub fn safe_normalize(v: Vec3) -> Vec3 {
    if v.is_nan() {
        return Vec3::ZERO;
    }
    let scale = v.abs().max_element();
    if scale == 0.0 {
        return Vec3::ZERO;
    }
    // infinite components dominate everything finite
    let v = if scale.is_infinite() {
        Vec3::select(v.abs().cmpeq(Vec3::INFINITY), v.signum(), Vec3::ZERO)
    } else {
        v / scale
    };
    v.normalize_or_zero()
}

/// Rescales `v` to exactly `max` when it is longer, keeping its direction.
pub fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    let len = magnitude(v);
    if len > max {
        if len.is_finite() {
            v * (max / len)
        } else {
            safe_normalize(v) * max
        }
    } else {
        v
    }
}
