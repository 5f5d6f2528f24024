use argh::FromArgs;
use std::path::PathBuf;

use pairviz::render::{command::CommandScene, Pipeline, PipelineConfig};

#[derive(FromArgs)]
/// Render the comparison figure of a registration sample
struct Args {
    /// path to a JSON pipeline configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// path to the pair dataset
    #[argh(option)]
    dataset: Option<PathBuf>,

    /// directory of the comparison figure
    #[argh(option)]
    output_dir: Option<PathBuf>,

    /// external renderer program
    #[argh(option)]
    renderer: PathBuf,

    /// argument passed to the renderer before the manifest and output paths
    #[argh(option)]
    renderer_arg: Vec<String>,

    /// normalized mesh shown with the inputs in the canonical frame
    #[argh(option)]
    mesh: Option<PathBuf>,

    /// directory holding the scene files
    #[argh(option, default = "PathBuf::from(\"scene\")")]
    work_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dataset) = args.dataset {
        config.dataset_path = dataset;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(mesh) = args.mesh {
        config.mesh_path = Some(mesh);
    }

    log::info!(
        "rendering {} with {}",
        config.dataset_path.display(),
        args.renderer.display()
    );
    let scene = CommandScene::new(args.renderer, args.work_dir).with_args(args.renderer_arg);
    let mut pipeline = Pipeline::new(config, scene)?;
    let report = pipeline.run()?;

    println!(
        "Wrote {} ({}) for sample {} in {:.2?}",
        report.composite_path.display(),
        report.composite_size,
        report.sample,
        report.elapsed
    );

    Ok(())
}
