use std::{path::PathBuf, process::ExitCode};

use clap::{builder::ArgAction, Parser};
use console::{style, Emoji};
use errors::CitestationErrors;
use station::{
  config::{self, Config},
  output, Station,
};
use tracing::{debug, trace};
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

pub mod errors;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(
  author,
  version,
  about = "Gather PyPI, GitHub and Zenodo metadata into a Software Citation Station entry"
)]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// PyPI package name to analyse
  package: String,

  /// Output Markdown path; the document goes to stdout when omitted
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Base URL of the package index
  #[arg(long, env = "CITESTATION_PYPI_URL", default_value = config::PYPI_URL)]
  pypi_url: String,

  /// Base URL of the GitHub REST API
  #[arg(long, env = "CITESTATION_GITHUB_API_URL", default_value = config::GITHUB_API_URL)]
  github_api_url: String,

  /// Base URL of the DOI resolver
  #[arg(long, env = "CITESTATION_DOI_URL", default_value = config::DOI_URL)]
  doi_url: String,

  /// Base URL of the Zenodo archive
  #[arg(long, env = "CITESTATION_ZENODO_URL", default_value = config::ZENODO_URL)]
  zenodo_url: String,

  /// GitHub token, raising the API rate limit
  #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
  github_token: Option<String>,
}

impl Cli {
  /// The service configuration selected by flags and environment.
  fn config(&self) -> Config {
    Config {
      pypi_url: self.pypi_url.clone(),
      github_api_url: self.github_api_url.clone(),
      doi_url: self.doi_url.clone(),
      zenodo_url: self.zenodo_url.clone(),
      github_token: self.github_token.clone().filter(|token| !token.is_empty()),
      ..Config::default()
    }
  }
}

/// Setup logging with the specified verbosity level
///
/// Logs go to stderr; stdout is reserved for the document.
fn setup_logging(verbosity: u8) -> Result<(), CitestationErrors> {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .finish()
    .try_init()?;
  Ok(())
}

async fn run(cli: Cli) -> Result<(), CitestationErrors> {
  let config = cli.config();
  trace!("Using configuration: {:?}", Config { github_token: None, ..config.clone() });
  let station = Station::new(config)?;

  eprintln!("{} Fetching package: {}", style(LOOKING_GLASS).cyan(), style(&cli.package).yellow());
  let record = station.generate(&cli.package).await?;
  debug!("Citation record: {:?}", record);

  let document = record.render()?;
  output::write_document(&document, cli.output.as_deref())?;

  if let Some(path) = &cli.output {
    eprintln!(
      "{} Wrote citation for {} to: {}",
      style(SAVE).green(),
      style(&cli.package).yellow(),
      style(path.display()).yellow()
    );
  }
  eprintln!(
    "{} Collected {} BibTeX entries; fill in every {} before submitting",
    style(SUCCESS).green(),
    style(record.bibtex_entries.len()).yellow(),
    style(station::citation::PLACEHOLDER).red().bold()
  );
  Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  if let Err(e) = setup_logging(cli.verbose) {
    eprintln!("{} Logging disabled: {e}", style(WARNING).yellow());
  }

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) if e.is_not_found() => {
      eprintln!("{} {e}", style(WARNING).yellow());
      ExitCode::FAILURE
    },
    Err(e) => {
      eprintln!("{} {}", style("✖").red(), style(e).red());
      ExitCode::FAILURE
    },
  }
}
