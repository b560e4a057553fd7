//! sigil-points - sample a sigil into a point cloud

mod output;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use sigil_path::{SamplerConfig, generate_points};
use sigil_show::SigilLibrary;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use output::Format;

/// Sample a sigil drawing script into a centered point cloud
#[derive(Debug, Parser)]
#[command(name = "sigil-points", version)]
struct Args {
    /// Drawing script, sigil library (`.json`), or `-` for stdin
    input: PathBuf,

    /// Number of points to emit
    #[arg(short = 'n', long, default_value_t = 1000)]
    count: usize,

    /// Scale factor, overrides the config file
    #[arg(short, long)]
    scale: Option<f32>,

    /// Library index when the input is a sigil library
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    index: i64,

    /// TOML sampler configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SamplerConfig::default(),
    };
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    config.validate()?;

    let points = if is_library(&args.input) {
        let json = std::fs::read_to_string(&args.input)
            .with_context(|| format!("reading {}", args.input.display()))?;
        let library = SigilLibrary::from_json(&json)?;
        if let Some(sigil) = library.get(args.index) {
            tracing::info!("Sampling sigil '{}'", sigil.phrase);
        }
        library.points_for(args.index, args.count, &config)
    } else {
        let code = read_script(&args.input)?;
        generate_points(&code, args.count, &config)
    };

    println!("{}", output::render(&points, args.format)?);
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<SamplerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn is_library(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut code = String::new();
        std::io::stdin().read_to_string(&mut code).context("reading stdin")?;
        return Ok(code);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
