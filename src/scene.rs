use crate::geometry::{plane_intersect, sphere_intersect};
use crate::math::{Point3, RGBColor, Ray, Vec3};

/// Ceiling on the number of surfaces and, separately, lights a scene
/// may define.
pub const MAX_OBJECTS: usize = 128;

#[derive(Copy, Clone, Debug)]
pub struct Camera {
    pub center: Point3,
    /// Viewport extent in scene units, not pixels.
    pub width: f64,
    pub height: f64,
}

#[derive(Copy, Clone, Debug)]
pub enum Surface {
    Plane {
        center: Point3,
        normal: Vec3,
        color: RGBColor,
        diffuse: RGBColor,
        specular: RGBColor,
    },
    Sphere {
        center: Point3,
        radius: f64,
        color: RGBColor,
        diffuse: RGBColor,
        specular: RGBColor,
    },
}

impl Surface {
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        match *self {
            Surface::Plane { center, normal, .. } => {
                plane_intersect(ray.origin, ray.direction, center, normal)
            }
            Surface::Sphere { center, radius, .. } => {
                sphere_intersect(ray.origin, ray.direction, center, radius)
            }
        }
    }

    /// Surface normal at a hit point. Planes report their stored normal
    /// exactly as the scene supplied it.
    pub fn normal_at(&self, hit: Point3) -> Vec3 {
        match *self {
            Surface::Plane { normal, .. } => normal,
            Surface::Sphere { center, .. } => (hit - center).normalized(),
        }
    }

    pub fn base_color(&self) -> RGBColor {
        match *self {
            Surface::Plane { color, .. } | Surface::Sphere { color, .. } => color,
        }
    }

    pub fn diffuse_color(&self) -> RGBColor {
        match *self {
            Surface::Plane { diffuse, .. } | Surface::Sphere { diffuse, .. } => diffuse,
        }
    }

    pub fn specular_color(&self) -> RGBColor {
        match *self {
            Surface::Plane { specular, .. } | Surface::Sphere { specular, .. } => specular,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Light {
    pub position: Point3,
    pub color: RGBColor,
    /// Radial attenuation coefficients a0, a1, a2.
    pub radial: [f64; 3],
    /// Accepted by the grammar; the falloff exponent is fixed, so
    /// shading never reads it.
    #[allow(dead_code)]
    pub angular_a0: f64,
    pub direction: Vec3,
    /// Spot cutoff in radians. Zero makes this a point light.
    pub theta: f64,
}

pub struct Scene {
    pub camera: Camera,
    pub surfaces: Vec<Surface>,
    pub lights: Vec<Light>,
}
