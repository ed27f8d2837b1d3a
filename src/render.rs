//! Per-pixel driver: maps pixel coordinates to camera-space rays, finds
//! the nearest surface, and shades it. Rows render in parallel; every
//! pixel is a pure function of the scene and its coordinates.

use std::io;
use std::sync::Mutex;

use ordered_float::OrderedFloat;
use pbr::ProgressBar;
use rayon::prelude::*;

use crate::film::Film;
use crate::math::{RGBColor, Ray, Vec3};
use crate::scene::Scene;
use crate::shade;

/// Color for rays that miss every surface.
pub const BACKGROUND: RGBColor = RGBColor::BLACK;

pub fn render(scene: &Scene, width: u32, height: u32) -> Film<[u8; 3]> {
    let width = width as usize;
    let height = height as usize;
    let mut film = Film::new(width, height, [0u8; 3]);

    let pixel_width = scene.camera.width / width as f64;
    let pixel_height = scene.camera.height / height as f64;

    let progress = Mutex::new(ProgressBar::on(io::stderr(), height as u64));
    film.buffer
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = render_pixel(scene, x, y, pixel_width, pixel_height).to_rgb8();
            }
            progress.lock().unwrap().inc();
        });
    progress.lock().unwrap().finish();

    film
}

fn render_pixel(scene: &Scene, x: usize, y: usize, pixel_width: f64, pixel_height: f64) -> RGBColor {
    let ray = primary_ray(scene, x, y, pixel_width, pixel_height);
    match nearest_hit(scene, &ray) {
        Some((index, t)) => shade::shade(scene, index, t, &ray),
        None => BACKGROUND,
    }
}

/// One scene unit forward, offset to the center of pixel (x, y) on the
/// viewport.
fn primary_ray(scene: &Scene, x: usize, y: usize, pixel_width: f64, pixel_height: f64) -> Ray {
    let camera = &scene.camera;
    let direction = Vec3::new(
        camera.center.x - camera.width / 2.0 + pixel_width * (x as f64 + 0.5),
        camera.center.y - camera.height / 2.0 + pixel_height * (y as f64 + 0.5),
        1.0,
    );
    Ray::new(camera.center, direction.normalized())
}

/// Minimum positive hit parameter over all surfaces, first surface in
/// parse order winning ties.
fn nearest_hit(scene: &Scene, ray: &Ray) -> Option<(usize, f64)> {
    scene
        .surfaces
        .iter()
        .enumerate()
        .filter_map(|(index, surface)| surface.intersect(ray).map(|t| (index, t)))
        .min_by_key(|&(_, t)| OrderedFloat(t))
}
