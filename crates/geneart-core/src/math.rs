use glam::Vec2;

/// Rescale `v` so its length does not exceed `max`. Direction is kept.
#[inline]
pub fn clamp_speed(v: Vec2, max: f32) -> Vec2 {
    let speed = v.length();
    if speed > max {
        v / speed * max
    } else {
        v
    }
}

/// Inward push for one axis inside the soft margin band.
///
/// Zero in the interior, grows linearly with penetration depth into the band
/// `[0, margin)` or `(extent - margin, extent]` and beyond.
#[inline]
pub fn margin_push(coord: f32, extent: f32, margin: f32, stiffness: f32) -> f32 {
    let mut push = 0.0;
    if coord < margin {
        push += (margin - coord) * stiffness;
    }
    if coord > extent - margin {
        push -= (coord - (extent - margin)) * stiffness;
    }
    push
}

/// Toroidal wrap for one axis: leaving past `-margin` re-enters at
/// `extent + margin` and vice versa. Inside the bounds the value is kept.
#[inline]
pub fn wrap_coordinate(coord: f32, extent: f32, margin: f32) -> f32 {
    if coord < -margin {
        extent + margin
    } else if coord > extent + margin {
        -margin
    } else {
        coord
    }
}

/// Angle of `(dx, dy)`; the undefined center direction maps to 0.
#[inline]
pub fn radial_angle(dx: f32, dy: f32) -> f32 {
    if dx == 0.0 && dy == 0.0 {
        0.0
    } else {
        dy.atan2(dx)
    }
}
