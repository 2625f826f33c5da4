use clap::{Parser, Subcommand};
use simple_favicon::{Pipeline, RustBackend, config, ico, output};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simple-favicon")]
#[command(about = "Turn one PNG into a favicon bundle")]
#[command(long_about = "\
Turn one PNG into a favicon bundle

The bundle is a zip archive with four files:

  favicon.ico     256, 128, 64, 48, 32 and 16 px (sizes larger than the
                  source are left out; the source must be at least 16x16)
  192.png         192x192
  512.png         512x512
  manifest.json   web app manifest (built-in, or from --config)

Non-square sources are stretched to square.

Run 'simple-favicon gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output (otherwise RUST_LOG, default warn)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the favicon bundle from a PNG
    Build {
        /// Source PNG
        input: PathBuf,
        /// Archive to write
        #[arg(long, short, default_value = "favicon-bundle.zip")]
        output: PathBuf,
    },
    /// List the images inside an .ico file
    Inspect {
        icon: PathBuf,
        /// Print the directory as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { input, output } => {
            let bundle_config = match &cli.config {
                Some(path) => config::load_config(path)?,
                None => config::BundleConfig::default(),
            };
            init_thread_pool(&bundle_config.processing);
            build(&bundle_config, &input, &output)?;
        }
        Command::Inspect { icon, json } => {
            let bytes = std::fs::read(&icon)?;
            let dir = ico::IconDir::parse(&bytes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dir)?);
            } else {
                let name = icon
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_else(|| icon.display().to_string());
                for line in output::format_icon_dir(&name, &dir) {
                    println!("{}", line);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn build(
    bundle_config: &config::BundleConfig,
    input: &Path,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let png = std::fs::read(input)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_pipeline_event(&event) {
                println!("{}", line);
            }
        }
    });

    let pipeline = Pipeline::new(RustBackend::new())
        .with_descriptor(bundle_config.descriptor_source())
        .with_params(bundle_config.encode_params())
        .with_events(tx);
    let result = pipeline.run(&png);
    drop(pipeline);
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;

    match result {
        Ok(bundle) => {
            std::fs::write(output_path, &bundle.archive)?;
            println!("==> Wrote {}", output_path.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("error [{}]: {}", err.category(), err);
            Err(err.into())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
