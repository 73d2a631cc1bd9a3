//! Geometric helpers over normalized landmarks

use kelp_core::Landmark;

/// Angle in degrees at `b` between the vectors b→a and b→c.
///
/// Returns 0 when either vector has zero length.
pub fn angle_between(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    let (ax, ay) = (a.x - b.x, a.y - b.y);
    let (cx, cy) = (c.x - b.x, c.y - b.y);

    let mag_a = ax.hypot(ay);
    let mag_c = cx.hypot(cy);
    if mag_a * mag_c == 0.0 {
        return 0.0;
    }

    let cos = ((ax * cx + ay * cy) / (mag_a * mag_c)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// `point` sits higher in the image than `reference` by more than `margin`
pub fn is_above(point: &Landmark, reference: &Landmark, margin: f32) -> bool {
    point.y < reference.y - margin
}

/// A finger is folded when its tip is lower in the image than its knuckle
pub fn is_folded(tip: &Landmark, knuckle: &Landmark) -> bool {
    tip.y > knuckle.y
}
