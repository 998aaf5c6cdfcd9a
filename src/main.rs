use clap::{Parser, Subcommand};
use photo_webpage::config::{self, GalleryConfig};
use photo_webpage::imaging::RustBackend;
use photo_webpage::output;
use photo_webpage::pipeline::{self, BuildRequest};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Config-overriding flags for commands that write images.
#[derive(clap::Args, Clone, Default)]
struct SizeArgs {
    /// Maximum width of full-size images
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum height of full-size images
    #[arg(long)]
    max_height: Option<u32>,

    /// Maximum width of thumbnails
    #[arg(long)]
    thumb_max_width: Option<u32>,

    /// Maximum height of thumbnails
    #[arg(long)]
    thumb_max_height: Option<u32>,

    /// Skip thumbnails; the page shows full-size images directly
    #[arg(long)]
    no_thumbnails: bool,

    /// Page title
    #[arg(long)]
    title: Option<String>,
}

impl SizeArgs {
    fn apply(&self, config: &mut GalleryConfig) {
        if let Some(w) = self.max_width {
            config.images.max_width = w;
        }
        if let Some(h) = self.max_height {
            config.images.max_height = h;
        }
        if let Some(w) = self.thumb_max_width {
            config.thumbnails.max_width = w;
        }
        if let Some(h) = self.thumb_max_height {
            config.thumbnails.max_height = h;
        }
        if self.no_thumbnails {
            config.thumbnails.enabled = false;
        }
        if let Some(title) = &self.title {
            config.page.title = title.clone();
        }
    }
}

#[derive(Parser)]
#[command(name = "photo-webpage")]
#[command(about = "Turn directories of photos into a static web gallery page")]
#[command(long_about = "\
Turn directories of photos into a static web gallery page

Images found directly inside the input directories (no recursion) are
grouped by aspect ratio, scaled to the configured caps, and linked
from a single HTML page:

  webpage/
  ├── index.html                 # The gallery page
  ├── img/                       # Full-size images (max 1000x1000)
  │   ├── square.png
  │   └── wide.jpg
  └── thumbnails/                # Thumbnails (max 400x400)
      ├── thumb_square.png
      └── thumb_wide.jpg

Images that already fit inside both caps keep their size. Larger images are
fitted by orientation: landscape to --max-width, portrait and square to
--max-height. With unequal caps the other side can end up over its cap.
Source files are never modified.

Run 'photo-webpage gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Config file (TOML) merged over the stock defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the gallery: resize images, write thumbnails and the page
    Build {
        /// Directories containing images
        #[arg(default_value = ".")]
        dirs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "webpage")]
        output: PathBuf,

        #[command(flatten)]
        sizes: SizeArgs,
    },
    /// List images in gallery order without writing anything
    Check {
        /// Directories containing images
        #[arg(default_value = ".")]
        dirs: Vec<PathBuf>,

        /// Print the ordered list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("photo_webpage={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build {
            dirs,
            output,
            sizes,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            sizes.apply(&mut config);
            config.validate()?;

            let request = BuildRequest {
                inputs: dirs,
                output,
                config,
            };

            println!("==> Building gallery \u{2192} {}", request.output.display());
            let output_root = request.output.clone();
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event, &output_root) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::build(&request, &RustBackend::new(), Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = result?;
            output::print_build_summary(&report);
        }
        Command::Check { dirs, json } => {
            let config = load_config(cli.config.as_deref())?;
            let request = BuildRequest {
                inputs: dirs,
                output: PathBuf::new(),
                config,
            };
            let ordered = pipeline::plan(&request, &RustBackend::new())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ordered)?);
            } else {
                output::print_check_output(&ordered);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GalleryConfig, config::ConfigError> {
    if let Some(p) = path {
        tracing::debug!(path = %p.display(), "loading config");
    }
    config::load_config(path)
}
