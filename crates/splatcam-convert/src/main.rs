use argh::FromArgs;
use std::path::PathBuf;

use splatcam::{
    io::{
        dataset::{load_dataset, DatasetKind, LoaderConfig},
        scene::{write_scene_json, SceneDocument},
    },
    k3d::projection::ClipRange,
};

#[derive(FromArgs)]
/// Convert a COLMAP or Blender dataset into a JSON scene document
struct Args {
    /// path to the dataset folder
    #[argh(positional)]
    input_folder: PathBuf,

    /// dataset type: colmap or blender
    #[argh(positional)]
    dataset_type: String,

    /// path to the output JSON file
    #[argh(positional)]
    output_json: PathBuf,

    /// do not hold out test cameras
    #[argh(switch)]
    no_eval: bool,

    /// hold out every n-th COLMAP camera for evaluation
    #[argh(option, default = "8")]
    llffhold: usize,

    /// folder with the COLMAP images, relative to the dataset folder
    #[argh(option, default = "String::from(\"images\")")]
    images: String,

    /// integer factor to downscale the images by
    #[argh(option, default = "1")]
    resolution: u32,

    /// near clipping plane
    #[argh(option, default = "0.01")]
    znear: f64,

    /// far clipping plane
    #[argh(option, default = "100.0")]
    zfar: f64,

    /// re-center the cameras into the unit sphere
    #[argh(switch)]
    recenter: bool,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let kind = args.dataset_type.parse::<DatasetKind>()?;

    let config = LoaderConfig {
        eval: !args.no_eval,
        llffhold: args.llffhold,
        images_dir: args.images,
        resolution_scale: args.resolution,
        clip: ClipRange::new(args.znear, args.zfar),
        recenter: args.recenter,
        ..Default::default()
    };
    log::debug!("loader config: {config:?}");

    let dataset = load_dataset(&args.input_folder, kind, &config)?;
    let scene = SceneDocument::from_dataset(&dataset);
    write_scene_json(&args.output_json, &scene)?;

    Ok(())
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();

    if let Err(e) = run(args) {
        log::error!("conversion failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
