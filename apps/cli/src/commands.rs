//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use founderlens_core::{FounderModel, OpenRouterModel, RunOptions, RunProgress, write_results};
use founderlens_crawler::ContextFetcher;
use founderlens_shared::{
    AppConfig, CompanyRecord, RunSummary, init_config, load_config, resolve_api_key,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// founderlens: extract company founders with a language model.
#[derive(Parser)]
#[command(
    name = "founderlens",
    version,
    about = "Extract company founders from a list of company websites.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract founders for every company in the input file.
    Run {
        /// Company file, one `Name (https://url)` per line.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Results file (JSON).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip fetching company pages; prompt by name only.
        #[arg(long)]
        no_scrape: bool,

        /// Character budget for the scraped context snippet.
        #[arg(long)]
        max_chars: Option<usize>,

        /// Companies processed at once.
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// OpenRouter model ID.
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Parse the input file and print the companies (no network calls).
    Parse {
        /// Company file, one `Name (https://url)` per line.
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "founderlens=info",
        1 => "founderlens=debug",
        _ => "founderlens=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            input,
            output,
            no_scrape,
            max_chars,
            concurrency,
            model,
        } => {
            let overrides = RunOverrides {
                input,
                output,
                no_scrape,
                max_chars,
                concurrency,
                model,
            };
            cmd_run(overrides).await
        }
        Command::Parse { input } => cmd_parse(input).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// CLI flags layered over the config file.
#[derive(Debug, Default)]
struct RunOverrides {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    no_scrape: bool,
    max_chars: Option<usize>,
    concurrency: Option<usize>,
    model: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
struct RunSettings {
    input: PathBuf,
    output: PathBuf,
    scrape: Option<founderlens_shared::ScrapeConfig>,
    concurrency: usize,
    model_id: String,
}

impl RunSettings {
    /// Merge CLI flags over config values.
    fn resolve(config: &AppConfig, overrides: RunOverrides) -> Self {
        let mut scrape = config.scrape.clone();
        if let Some(max_chars) = overrides.max_chars {
            scrape.max_chars = max_chars;
        }
        let scrape = (scrape.enabled && !overrides.no_scrape).then_some(scrape);

        Self {
            input: overrides
                .input
                .unwrap_or_else(|| PathBuf::from(&config.defaults.input_file)),
            output: overrides
                .output
                .unwrap_or_else(|| PathBuf::from(&config.defaults.output_file)),
            scrape,
            concurrency: overrides
                .concurrency
                .unwrap_or(config.defaults.concurrency as usize)
                .max(1),
            model_id: overrides
                .model
                .unwrap_or_else(|| config.openrouter.default_model.clone()),
        }
    }
}

async fn cmd_run(overrides: RunOverrides) -> Result<()> {
    // Validate API key before doing anything
    let config = load_config()?;
    let api_key = resolve_api_key(&config)?;
    let settings = RunSettings::resolve(&config, overrides);

    let companies = founderlens_input::load_companies(&settings.input)?;
    if companies.is_empty() {
        warn!(input = %settings.input.display(), "no company lines matched");
    }

    let fetcher = settings
        .scrape
        .as_ref()
        .map(ContextFetcher::new)
        .transpose()?;

    let model: Arc<dyn FounderModel> = Arc::new(OpenRouterModel::new(
        api_key,
        settings.model_id.clone(),
        config.openrouter.base_url.clone(),
    ));

    info!(
        input = %settings.input.display(),
        output = %settings.output.display(),
        companies = companies.len(),
        model = %settings.model_id,
        "extracting founders"
    );

    let reporter = CliProgress::new();
    let options = RunOptions {
        concurrency: settings.concurrency,
    };
    let outcome =
        founderlens_core::run(&companies, fetcher.as_ref(), model, &options, &reporter).await;

    write_results(&settings.output, &outcome.results)?;

    // Print summary
    let summary = &outcome.summary;
    println!();
    println!("  Founders extracted!");
    println!("  Companies:       {}", summary.companies);
    println!("  With context:    {}", summary.with_context);
    println!("  Scrape failures: {}", summary.scrape_failures);
    println!("  Model failures:  {}", summary.model_failures);
    println!(
        "  Replies:         {} structured, {} malformed, {} unparseable",
        summary.structured, summary.malformed, summary.unparseable
    );
    println!("  Output:          {}", settings.output.display());
    for (company, error) in &outcome.model_errors {
        println!("  ! {company}: {error}");
    }
    println!();

    Ok(())
}

async fn cmd_parse(input: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let input = input.unwrap_or_else(|| PathBuf::from(&config.defaults.input_file));

    let companies = founderlens_input::load_companies(&input)?;
    let records: Vec<CompanyRecord> = companies
        .iter()
        .map(|(name, url)| CompanyRecord::new(name.clone(), url.clone()))
        .collect();

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl RunProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn company_done(&self, name: &str, founders: usize, current: usize, total: usize) {
        self.spinner.set_message(format!("[{current}/{total}] {name}: {founders} founder(s)"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "founderlens",
            "-v",
            "run",
            "--input",
            "list.txt",
            "--no-scrape",
            "--concurrency",
            "4",
            "--model",
            "openai/gpt-4o-mini",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Run {
                input,
                no_scrape,
                concurrency,
                model,
                output,
                max_chars,
            } => {
                assert_eq!(input, Some(PathBuf::from("list.txt")));
                assert!(no_scrape);
                assert_eq!(concurrency, Some(4));
                assert_eq!(model.as_deref(), Some("openai/gpt-4o-mini"));
                assert!(output.is_none());
                assert!(max_chars.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn settings_fall_back_to_config() {
        let config = AppConfig::default();
        let settings = RunSettings::resolve(&config, RunOverrides::default());

        assert_eq!(settings.input, PathBuf::from("companies.txt"));
        assert_eq!(settings.output, PathBuf::from("founders.json"));
        assert_eq!(settings.concurrency, 1);
        assert_eq!(settings.model_id, "google/gemini-2.5-flash");
        let scrape = settings.scrape.expect("scraping enabled by default");
        assert_eq!(scrape.max_chars, 3000);
        assert_eq!(scrape.timeout_secs, 8);
    }

    #[test]
    fn flags_override_config() {
        let config = AppConfig::default();
        let settings = RunSettings::resolve(
            &config,
            RunOverrides {
                output: Some(PathBuf::from("out/f.json")),
                max_chars: Some(500),
                concurrency: Some(0),
                ..Default::default()
            },
        );

        assert_eq!(settings.output, PathBuf::from("out/f.json"));
        assert_eq!(settings.scrape.map(|s| s.max_chars), Some(500));
        assert_eq!(settings.concurrency, 1);
    }

    #[test]
    fn no_scrape_flag_or_config_disables_fetcher() {
        let config = AppConfig::default();
        let settings = RunSettings::resolve(
            &config,
            RunOverrides {
                no_scrape: true,
                ..Default::default()
            },
        );
        assert!(settings.scrape.is_none());

        let mut config = AppConfig::default();
        config.scrape.enabled = false;
        let settings = RunSettings::resolve(&config, RunOverrides::default());
        assert!(settings.scrape.is_none());
    }
}
