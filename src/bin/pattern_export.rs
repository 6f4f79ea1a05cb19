use std::process;

use radiation_lib::{
    cli::{ExportArgs, USAGE},
    config::SettingsFile,
    export::{default_file_name, export_png},
    scene::PatternScene,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = ExportArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => SettingsFile::load(path)?,
        None => SettingsFile::default(),
    };
    let config = args.apply(settings.pattern);
    let scene = PatternScene::compute(&config);

    println!("{}", config.antenna);
    println!("  Gain:           {} dBi", scene.metrics.gain_text());
    println!("  Beamwidth:      {}", scene.metrics.beamwidth_text());
    println!("  Front-to-back:  {}", scene.metrics.front_to_back_text());

    let path = args.output.clone().unwrap_or_else(|| default_file_name(&scene));
    if let Err(err) = export_png(&scene, &settings.render, &path) {
        error!(%err, "could not write image");
        eprintln!("{}", err.user_notice());
        process::exit(1);
    }
    println!("Wrote {}", path.display());
    Ok(())
}
