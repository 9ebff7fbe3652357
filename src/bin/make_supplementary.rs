use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use make_supplementary::imaging::{FsImageService, write_overlay_preview};
use make_supplementary::{ConfigError, Document, GenerateOptions, generate};

#[derive(Parser, Debug)]
#[command(
    name = "make_supplementary",
    about = "Generate LaTeX for image comparisons in a supplementary PDF",
    version
)]
struct Cli {
    /// JSON file describing the document and its comparisons
    config: PathBuf,

    /// Where to write the LaTeX source
    #[arg(short = 'o', long = "output", default_value = "supplementary.tex")]
    output: PathBuf,

    /// Regenerate crop images even if they already exist
    #[arg(long = "force-crops")]
    force_crops: bool,

    /// Write a PNG per cropped comparison with the crop rectangles drawn in
    #[arg(long = "previews", value_name = "DIR")]
    previews: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME")))
        }))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn write_text_file(path: &Path, contents: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn write_previews(document: &Document, dir: &Path) {
    for (index, comparison) in document.comparisons.iter().enumerate() {
        if !comparison.has_crops() {
            continue;
        }
        let dest = dir.join(format!("comparison_{index}.png"));
        match write_overlay_preview(&comparison.inputs[0], &comparison.crops, &dest) {
            Ok(()) => info!("Wrote crop preview {}", dest.display()),
            Err(e) => warn!("Failed to write crop preview {}: {e}", dest.display()),
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let document = match Document::from_path(&cli.config) {
        Ok(v) => v,
        Err(e @ ConfigError::Read { .. }) => return Err(e.into()),
        Err(e) => {
            error!("Something is wrong with the json file {}.", cli.config.display());
            error!("Here's a hint: {e}");
            return Err("Terminating.".into());
        }
    };

    let options = GenerateOptions {
        force_crops: cli.force_crops,
    };
    let supplementary = generate(&document, &FsImageService, &options)?;

    write_text_file(&cli.output, &supplementary.tex.render())?;
    info!(
        "Wrote {} ({} comparison(s), {} figure(s), authors {})",
        cli.output.display(),
        supplementary.comparisons,
        supplementary.figures,
        if supplementary.authors_included {
            "included"
        } else {
            "omitted"
        }
    );

    if let Some(dir) = &cli.previews {
        write_previews(&document, dir);
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
