use clap::{Parser, Subcommand};
use prodshot::imaging::RustBackend;
use prodshot::{batch, config, intake, logging, naming, output};
use std::path::{Path, PathBuf};

/// Shared arguments for commands that read images.
#[derive(clap::Args, Clone)]
struct InputArgs {
    /// Image files or directories (directories are walked recursively)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Batch settings as JSON (camelCase keys accepted); replaces the settings from --config
    #[arg(long)]
    settings_json: Option<PathBuf>,
}

fn version_string() -> &'static str {
    let on_tag = env!("PRODSHOT_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PRODSHOT_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup; called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "prodshot")]
#[command(about = "Batch background removal, resizing and re-encoding for product photos")]
#[command(long_about = "\
Batch background removal, resizing and re-encoding for product photos

Each image is processed on its own:

  1. Background  pixels brighter than mean luma 240 become transparent,
                 or are filled with a solid color (optional)
  2. Resize      preset (square, fourFive, threeFour, landscape) or custom
                 width/height; fit pads the canvas, exact crops to fill
  3. Encode      jpg, png, webp or avif at low/medium/high quality
  4. Name        optional lowercase, spaces → dashes, and a suffix

Images that fail are skipped. One result is written as-is; two or more
(or none) are written as processed_images.zip.

Run 'prodshot gen-config' to generate a documented settings file.")]
#[command(version = version_string())]
struct Cli {
    /// Settings file (TOML); missing keys fall back to defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process images and write the result
    Process {
        #[command(flatten)]
        input: InputArgs,

        /// Directory the result is written to
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
    },
    /// Validate settings and inputs without encoding anything
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print a stock settings file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Process { input, output: out_dir } => {
            let config = load_settings(cli.config.as_deref(), input.settings_json.as_deref())?;
            init_thread_pool(&config.processing);
            let images = intake::load_inputs(&input.inputs, &config.limits)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                let mut skipped = 0;
                for event in rx {
                    if matches!(event, batch::BatchEvent::ItemSkipped { .. }) {
                        skipped += 1;
                    }
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
                skipped
            });
            let result = batch::run_with_events(images, &config.settings(), tx);
            let skipped = printer
                .join()
                .map_err(|_| "progress printer panicked")?;

            std::fs::create_dir_all(&out_dir)?;
            let path = out_dir.join(naming::ascii_safe_filename(result.filename()));
            std::fs::write(&path, result.bytes())?;
            output::print_batch_summary(&result, skipped, &path);
        }
        Command::Check { input } => {
            let config = load_settings(cli.config.as_deref(), input.settings_json.as_deref())?;
            let images = intake::load_inputs(&input.inputs, &config.limits)?;
            let settings = config.settings();
            let previews = batch::preview(&RustBackend::new(), &images, &settings);
            output::print_check_output(&settings, &previews);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the TOML config, then let a JSON settings payload replace its batch settings.
fn load_settings(
    config_path: Option<&Path>,
    settings_json: Option<&Path>,
) -> Result<config::Config, Box<dyn std::error::Error>> {
    let config = config::load_config(config_path)?;
    let Some(json_path) = settings_json else {
        return Ok(config);
    };
    let settings = config::load_settings_json(&std::fs::read_to_string(json_path)?)?;
    Ok(config.with_settings(settings))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
