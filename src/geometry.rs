use crate::math::{Point3, Vec3};

/// Denominators smaller than this are treated as a ray parallel to the
/// plane rather than divided through.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Smallest strictly positive root of the ray/sphere quadratic, if any.
pub fn sphere_intersect(origin: Point3, direction: Vec3, center: Point3, radius: f64) -> Option<f64> {
    let oc = origin - center;
    let a = direction * direction;
    let b = 2.0 * (direction * oc);
    let c = oc * oc - radius * radius;

    let det = b * b - 4.0 * a * c;
    if det < 0.0 {
        return None;
    }
    let det = det.sqrt();

    let t0 = (-b - det) / (2.0 * a);
    if t0 > 0.0 {
        return Some(t0);
    }
    let t1 = (-b + det) / (2.0 * a);
    if t1 > 0.0 {
        return Some(t1);
    }
    None
}

/// Ray/plane hit parameter. The plane passes through `point` with the
/// given (not necessarily unit) normal.
pub fn plane_intersect(origin: Point3, direction: Vec3, point: Point3, normal: Vec3) -> Option<f64> {
    let denom = normal * direction;
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (normal * (point - origin)) / denom;
    if t > 0.0 {
        Some(t)
    } else {
        None
    }
}
