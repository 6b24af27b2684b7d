use clap::{Args, Parser, Subcommand};
use photo_filters::config::{self, Config};
use photo_filters::engine::Engine;
use photo_filters::imaging::{ImageBackend, ParameterSet, RustBackend};
use photo_filters::pipeline::{BuildMode, build_chain};
use photo_filters::{output, scan};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "photo-filters")]
#[command(about = "Apply a chain of photo filters to a folder of images")]
#[command(long_about = "\
Apply a chain of photo filters to a folder of images

Every .jpg, .jpeg and .png directly inside the input folder is run through
the same filters and written to the output folder under its original name.
The output folder is emptied first.

Filters always run in this order:

  tone      sepia duotone blended over the original   0-1    (off: 0)
  resize    scale percent, center cropped to fit       10-200 (off: 100)
  blur      Gaussian blur radius                       0-2    (off: 0)
  sharpen   unsharp mask strength                      0-2    (off: 0)
  edge      edge enhancement                           0-2    (off: 0)

Filter values come from config.toml and can be overridden per run with
flags. Run 'photo-filters gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file [default: config.toml in the working directory]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Input folder (overrides input_dir)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Output folder (overrides output_dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clear the output folder and filter every input image
    Run(RunArgs),
    /// Render the first input image with the current filters
    Preview(PreviewArgs),
    /// List the images a run would process
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Filter overrides shared by `run` and `preview`.
#[derive(Args)]
struct FilterArgs {
    /// Sepia tone intensity
    #[arg(long, value_parser = parse_tone)]
    tone: Option<f32>,

    /// Scale percent
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=200))]
    resize: Option<u32>,

    /// Blur radius
    #[arg(long, value_parser = parse_blur)]
    blur: Option<f32>,

    /// Sharpen factor
    #[arg(long, value_parser = parse_sharpen)]
    sharpen: Option<f32>,

    /// Edge enhance factor
    #[arg(long, value_parser = parse_edge)]
    edge: Option<f32>,
}

impl FilterArgs {
    /// Overlay the flags that were given onto `base`.
    fn apply(&self, base: ParameterSet) -> ParameterSet {
        ParameterSet {
            tone: self.tone.unwrap_or(base.tone),
            resize: self.resize.unwrap_or(base.resize),
            blur: self.blur.unwrap_or(base.blur),
            sharpen: self.sharpen.unwrap_or(base.sharpen),
            edge: self.edge.unwrap_or(base.edge),
        }
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Also render the preview from the same filter values and save it here
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Write a JSON report of every image to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct PreviewArgs {
    #[command(flatten)]
    filters: FilterArgs,

    /// Where to save the preview; the extension picks the format
    #[arg(long)]
    out: PathBuf,
}

fn parse_in_range(s: &str, range: RangeInclusive<f32>) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "{value} is not in {}..={}",
            range.start(),
            range.end()
        ))
    }
}

fn parse_tone(s: &str) -> Result<f32, String> {
    parse_in_range(s, photo_filters::imaging::TONE_RANGE)
}

fn parse_blur(s: &str) -> Result<f32, String> {
    parse_in_range(s, photo_filters::imaging::BLUR_RANGE)
}

fn parse_sharpen(s: &str) -> Result<f32, String> {
    parse_in_range(s, photo_filters::imaging::SHARPEN_RANGE)
}

fn parse_edge(s: &str) -> Result<f32, String> {
    parse_in_range(s, photo_filters::imaging::EDGE_RANGE)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = load_cli_config(cli.config.as_deref())?;
    let input_dir = cli.input.unwrap_or_else(|| config.input_dir.clone());
    let output_dir = cli.output.unwrap_or_else(|| config.output_dir.clone());
    config::check_folders(&input_dir, &output_dir)?;

    match cli.command {
        Command::Run(args) => {
            init_thread_pool(&config.processing);
            let params = args.filters.apply(config.filters);
            let engine = build_engine(&config, &input_dir, &output_dir)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = engine.run_batch_with_events(params, Some(tx));
            printer.join().unwrap();

            if let Some(path) = &args.report {
                let json = serde_json::to_string_pretty(&report.entries())?;
                std::fs::write(path, json)?;
                println!("Report → {}", path.display());
            }
            if let Some(path) = &args.preview {
                save_preview(&engine, params, path)?;
            }
        }
        Command::Preview(args) => {
            let params = args.filters.apply(config.filters);
            let engine = build_engine(&config, &input_dir, &output_dir)?;
            save_preview(&engine, params, &args.out)?;
        }
        Command::Check => {
            let sources = scan::scan_input_folder(&input_dir)?;
            output::print_check_output(&input_dir, &sources);
            println!("Output: {}", output_dir.display());
        }
        Command::GenConfig => unreachable!("handled before config loading"),
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
///
/// Progress goes to stdout, so only warnings are logged by default.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// An explicit `--config` must exist; the default `config.toml` is optional.
fn load_cli_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    match path {
        Some(path) => config::load_required_config(path),
        None => config::load_config(Path::new(config::CONFIG_FILE)),
    }
}

fn build_engine(
    config: &Config,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<Engine, scan::ScanError> {
    let sources = scan::scan_input_folder(input_dir)?;
    let backend = RustBackend::with_quality(config.output.quality());
    Ok(Engine::with_backend(backend, sources, output_dir))
}

fn save_preview(
    engine: &Engine,
    params: ParameterSet,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(source), Some(image)) = (engine.sources().first(), engine.render_preview(params)?)
    else {
        output::print_preview_output(None);
        return Ok(());
    };
    engine.backend().encode(&image, path)?;
    let chain = build_chain(&params, BuildMode::Preview);
    output::print_preview_output(Some(&output::PreviewSummary {
        source: source.as_path(),
        saved_to: path,
        dimensions: (image.width(), image.height()),
        chain: &chain,
    }));
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
