use argh::FromArgs;
use std::path::PathBuf;

use pairviz::k3d;
use pairviz::render::{command::CommandScene, render_single, PointColor, RenderOptions, Scene};

#[derive(FromArgs)]
/// Render a single .pts point cloud
struct Args {
    /// path to the .pts point cloud
    #[argh(option)]
    input: PathBuf,

    /// path of the rendered image
    #[argh(option)]
    output: PathBuf,

    /// external renderer program
    #[argh(option)]
    renderer: PathBuf,

    /// argument passed to the renderer before the manifest and output paths
    #[argh(option)]
    renderer_arg: Vec<String>,

    /// point color: gray, blue or orange
    #[argh(option, default = "PointColor::Gray")]
    color: PointColor,

    /// radius of the sphere drawn for each point
    #[argh(option, default = "0.02")]
    sphere_radius: f64,

    /// length of the z-axis gizmo
    #[argh(option, default = "0.9")]
    z_axis_length: f64,

    /// directory holding the scene files
    #[argh(option, default = "PathBuf::from(\"scene\")")]
    work_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let points = k3d::io::pts::read_pts(&args.input)?;
    println!("Read {} points from {}", points.len(), args.input.display());

    let label = args
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "points".to_string());

    let mut scene = CommandScene::new(args.renderer, args.work_dir).with_args(args.renderer_arg);
    scene.preset(args.z_axis_length)?;

    let output = render_single(
        &mut scene,
        points,
        &label,
        args.color,
        &args.output,
        &RenderOptions {
            sphere_radius: args.sphere_radius,
        },
    )?;
    scene.clear_database()?;

    log::info!("rendered {label}");
    println!("Wrote {}", output.path.display());

    Ok(())
}
