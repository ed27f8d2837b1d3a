//! Local illumination: no recursion, hard shadows, per-light diffuse
//! and specular terms scaled by radial and spot-cone attenuation.

use crate::math::{Point3, RGBColor, Ray, Vec3};
use crate::scene::{Light, Scene, Surface};

const SPECULAR_EXPONENT: f64 = 20.0;
const SPOT_FALLOFF_EXPONENT: f64 = 20.0;

/// Shades the hit at parameter `t` along `ray` on the surface at
/// `hit_index`, summing every light's contribution.
pub fn shade(scene: &Scene, hit_index: usize, t: f64, ray: &Ray) -> RGBColor {
    let surface = &scene.surfaces[hit_index];
    let hit = ray.point_at_parameter(t);
    let normal = surface.normal_at(hit);
    let view = -ray.direction;

    let mut color = RGBColor::ZERO;
    for light in &scene.lights {
        color += contribution(scene, surface, hit_index, hit, normal, view, light);
    }

    // a point no light reaches shows the surface's own color
    if color == RGBColor::ZERO {
        return surface.base_color();
    }
    color
}

fn contribution(
    scene: &Scene,
    surface: &Surface,
    hit_index: usize,
    hit: Point3,
    normal: Vec3,
    view: Vec3,
    light: &Light,
) -> RGBColor {
    let to_light = light.position - hit;
    let distance = to_light.norm();
    let l = to_light / distance;

    if occluded(scene, hit_index, hit, l, distance) {
        return RGBColor::ZERO;
    }

    let n_dot_l = normal * l;
    let diffuse = if n_dot_l > 0.0 {
        n_dot_l * surface.diffuse_color() * light.color
    } else {
        RGBColor::ZERO
    };

    // no diffuse term, no highlight
    let specular = if diffuse == RGBColor::ZERO {
        RGBColor::ZERO
    } else {
        let reflected = 2.0 * n_dot_l * normal - l;
        let r_dot_v = reflected * view;
        if r_dot_v > 0.0 {
            r_dot_v.powf(SPECULAR_EXPONENT) * surface.specular_color() * light.color
        } else {
            RGBColor::ZERO
        }
    };

    (radial_attenuation(light, distance) * angular_attenuation(light, hit)) * (diffuse + specular)
}

/// True when any surface other than the one being shaded lies strictly
/// between the hit point and the light.
fn occluded(scene: &Scene, hit_index: usize, hit: Point3, l: Vec3, distance: f64) -> bool {
    let shadow_ray = Ray::new(hit, l);
    scene
        .surfaces
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != hit_index)
        .filter_map(|(_, surface)| surface.intersect(&shadow_ray))
        .any(|t| t < distance)
}

fn radial_attenuation(light: &Light, distance: f64) -> f64 {
    let [a0, a1, a2] = light.radial;
    1.0 / (a2 * distance * distance + a1 * distance + a0)
}

fn angular_attenuation(light: &Light, hit: Point3) -> f64 {
    // theta of zero marks an omnidirectional point light
    if light.theta == 0.0 {
        return 1.0;
    }
    let cos_alpha = light.direction.normalized() * (hit - light.position).normalized();
    if cos_alpha < light.theta.cos() {
        0.0
    } else {
        cos_alpha.powf(SPOT_FALLOFF_EXPONENT)
    }
}
