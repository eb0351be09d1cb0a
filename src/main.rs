use clap::{Parser, Subcommand};
use iiif_jp2::iiif::{self, Id};
use iiif_jp2::imaging::{self, Decoder, MAX_PROGRESSION_LEVEL};
use iiif_jp2::jp2::{self, Jp2HeaderDecoder, Jp2Info};
use iiif_jp2::{config, output};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    match (env!("ON_RELEASE_TAG"), env!("GIT_HASH")) {
        ("true", _) => env!("CARGO_PKG_VERSION"),
        (_, "") => "dev@unknown",
        (_, hash) => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "iiif-jp2")]
#[command(about = "IIIF Image API request planner for JPEG2000 sources")]
#[command(long_about = "\
IIIF Image API request planner for JPEG2000 sources

Requests follow the IIIF Image API 2.x URL grammar:

  {id}/{region}/{size}/{rotation}/{quality}.{format}
  {id}/info.json

  region    full | square | x,y,w,h | pct:x,y,w,h
  size      full | max | w, | ,h | pct:n | w,h | !w,h
  rotation  [!]degrees
  quality   default | color | gray | bitonal
  format    jpg | tif | png | gif | jp2 | pdf | webp

'plan' resolves a request against a JP2 header (or bare dimensions) into
the source crop, output size and the JPEG2000 resolution level a decoder
should read. Nothing is decoded; only the first few hundred bytes of each
file are read.

Run 'iiif-jp2 gen-config' to generate a documented iiif-jp2.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Server config file (stock defaults if it doesn't exist)
    #[arg(long, default_value = "iiif-jp2.toml", global = true)]
    config: PathBuf,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print dimensions, tiling, levels and colour space of JP2 files
    Jp2info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print every header field as JSON
        #[arg(long)]
        raw: bool,
    },
    /// Resolve a IIIF request into crop, output size and resolution level
    Plan {
        /// Request path, e.g. "page.jp2/full/!512,512/0/default.jpg"
        request: String,
        /// JP2 file to read the source geometry from
        #[arg(long, conflicts_with_all = ["width", "height"])]
        file: Option<PathBuf>,
        /// Source width when no file is given
        #[arg(long, requires = "height", required_unless_present = "file")]
        width: Option<u32>,
        /// Source height when no file is given
        #[arg(long, requires = "width", required_unless_present = "file")]
        height: Option<u32>,
    },
    /// Print the info.json document for a JP2 file
    Info {
        file: PathBuf,
        /// Identifier to publish (defaults to the file name)
        #[arg(long)]
        id: Option<String>,
    },
    /// Print the compliance profile of the configured feature set
    Profile,
    /// Print a stock iiif-jp2.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Jp2info { files, raw } => {
            let server = config::load_config(&cli.config)?;
            init_thread_pool(&server.processing);
            let results: Vec<_> = files.par_iter().map(|f| jp2::scan_file(f)).collect();
            for (file, result) in files.iter().zip(&results) {
                output::print_jp2info(file, result, raw);
            }
        }
        Command::Plan {
            request,
            file,
            width,
            height,
        } => {
            let server = config::load_config(&cli.config)?;
            let mut decoder = match file {
                Some(path) => Jp2HeaderDecoder::open(&path)?,
                None => Jp2HeaderDecoder::new(bare_source(
                    width.unwrap_or_default(),
                    height.unwrap_or_default(),
                )),
            };
            if !plan(&request, &server, &mut decoder) {
                std::process::exit(1);
            }
        }
        Command::Info { file, id } => {
            let server = config::load_config(&cli.config)?;
            let decoder = Jp2HeaderDecoder::open(&file)?;
            let id = match id {
                Some(id) => Id::new(id),
                None => Id::new(file_name(&file)),
            };
            let info = server.feature_set().info(
                &server.image_url(&id),
                &imaging::image_info(&decoder),
                &server.constraint(),
            );
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Profile => {
            let server = config::load_config(&cli.config)?;
            let profile = server.feature_set().profile();
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Parse, negotiate and resolve one request, printing the outcome. Returns
/// whether the request would be served.
fn plan(request: &str, server: &config::ServerConfig, decoder: &mut Jp2HeaderDecoder) -> bool {
    let mut report = output::PlanReport {
        request,
        command: None,
        plan: None,
        decode: None,
    };

    let command = match iiif::Command::parse(request) {
        Ok(command) => command,
        Err(e) => {
            output::print_plan(&report);
            output::print_error(e.status_code(), &e);
            return false;
        }
    };
    report.command = Some(&command);

    let features = server.feature_set();
    let constraint = server.constraint();
    let resolved = imaging::plan_request(
        &command,
        &features,
        &constraint,
        decoder.width(),
        decoder.height(),
    )
    .and_then(|plan| {
        imaging::apply(&command, &features, &constraint, decoder).map(|decode| (plan, decode))
    });

    match resolved {
        Ok((plan, decode)) => {
            report.plan = Some(&plan);
            report.decode = Some(&decode);
            output::print_plan(&report);
            true
        }
        Err(e) => {
            output::print_plan(&report);
            output::print_error(e.status_code(), &e);
            false
        }
    }
}

/// An untiled source of the given size with every progression level.
fn bare_source(width: u32, height: u32) -> Jp2Info {
    Jp2Info {
        width,
        height,
        xsiz: width,
        ysiz: height,
        xtsiz: width,
        ytsiz: height,
        levels: MAX_PROGRESSION_LEVEL as u8,
        ..Jp2Info::default()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// RUST_LOG wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
