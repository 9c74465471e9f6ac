use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use experiment_files::{DirectoryMirror, ExtensionFilter};

#[derive(Debug, Parser)]
#[command(
    name = "deploy_inputs",
    disable_help_subcommand = true,
    about = "Mirror an authored inputs tree into an experiment build",
    long_about = "Copy every file under the source tree into the destination, overwriting \
what is already there and skipping excluded extensions (editor sidecars by default)."
)]
struct DeployInputsCli {
    #[arg(value_name = "SOURCE", help = "Authored inputs folder to deploy from")]
    source: PathBuf,
    #[arg(value_name = "DEST", help = "Inputs folder of the experiment build")]
    dest: PathBuf,
    #[arg(
        long,
        value_name = "EXT",
        default_values_t = vec!["meta".to_string()],
        help = "Extension to skip (leading dot optional), repeat as needed"
    )]
    exclude: Vec<String>,
    #[arg(long, help = "Copy top-level files only")]
    flat: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = DeployInputsCli::parse();

    let filter: ExtensionFilter = cli.exclude.iter().map(String::as_str).collect();
    let report = DirectoryMirror::new(&cli.source, &cli.dest)
        .with_recursive(!cli.flat)
        .with_filter(filter)
        .copy()?;

    println!(
        "deployed {} -> {}",
        cli.source.display(),
        cli.dest.display()
    );
    println!("  copied:  {}", report.copied);
    println!("  skipped: {}", report.skipped);
    Ok(())
}
