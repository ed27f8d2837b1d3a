use std::path::PathBuf;
use std::process;
use std::time::Instant;

use log::info;
use structopt::StructOpt;

pub mod error;
pub mod film;
pub mod geometry;
pub mod math;
pub mod output;
pub mod parser;
pub mod render;
pub mod scene;
pub mod shade;

use error::{Error, Result};

#[derive(Debug, StructOpt)]
#[structopt(name = "raycast", about = "Renders a scene description to a binary pixel map.")]
struct Opt {
    /// Output image width in pixels
    width: u32,

    /// Output image height in pixels
    height: u32,

    /// Scene description file
    scene: PathBuf,

    /// Destination pixel-map file
    output: PathBuf,

    /// Also write a PNG preview of the frame
    #[structopt(long, value_name = "path")]
    png: Option<PathBuf>,
}

fn run(opt: &Opt) -> Result<()> {
    if opt.width == 0 || opt.height == 0 {
        return Err(Error::Config(
            "image width and height must be positive".into(),
        ));
    }

    let scene = parser::load_scene(&opt.scene)?;
    info!(
        "loaded {}: {} surfaces, {} lights",
        opt.scene.display(),
        scene.surfaces.len(),
        scene.lights.len()
    );

    let start = Instant::now();
    let film = render::render(&scene, opt.width, opt.height);
    info!(
        "rendered {}x{} pixels in {:.2?}",
        opt.width,
        opt.height,
        start.elapsed()
    );

    output::write_p6(&film, &opt.output)?;
    if let Some(png) = &opt.png {
        output::write_png(&film, png)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()
        .unwrap();

    let opt = Opt::from_args();
    if let Err(err) = run(&opt) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
