use nalgebra::{Point3, Vector3};

/// Angle between two vectors in degrees. A zero-length vector has no direction, so the
/// angle is NaN and compares false against any cutoff.
pub fn angle_degrees(v: &Vector3<f64>, w: &Vector3<f64>) -> f64 {
    if v.norm_squared() == 0.0 || w.norm_squared() == 0.0 {
        return f64::NAN;
    }
    v.angle(w).to_degrees()
}

/// Midpoints of the six edges of a closed hexagon. Edge `i` joins vertex `i` and vertex
/// `(i + 1) mod 6`.
pub fn hexagon_edge_midpoints(vertices: &[Point3<f64>; 6]) -> [Point3<f64>; 6] {
    std::array::from_fn(|i| {
        let next = &vertices[(i + 1) % 6];
        Point3::from((vertices[i].coords + next.coords) * 0.5)
    })
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
