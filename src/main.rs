use ads_metrics::config::file_config::ConfigFile;
use ads_metrics::config::{find_config_file, get_config, load_config, Config, TOKEN_ENV_VARS};
use ads_metrics::metrics::{
    citation_histogram, fetch_all, normalize, parse_bibcodes, parse_records, publication_counts,
    publication_histogram, read_histogram, time_series, Normalized, RawPayload,
};
use ads_metrics::models::{
    FetchPage, IndicatorSet, LabeledStepPath, LibraryContents, MetricsSummary, PivotField, Record,
    YearSeries,
};
use ads_metrics::sources::{
    AdsClient, Resource, LIBRARY_PAGE_SIZE, MAX_METRICS_BIBCODES, MAX_SEARCH_ROWS,
};
use ads_metrics::utils::{self, ProgressReporter};
use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// ADS Metrics - Bibliometric statistics from the NASA Astrophysics Data System
#[derive(Parser, Debug)]
#[command(name = "ads-metrics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Publication, citation and read statistics from NASA ADS", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format for terminal results
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// ADS API token (overrides config file and environment)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// ADS API base URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Directory exports are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

/// File format for saved exports
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    /// `#`-headed CSV tables plus a text summary
    Csv,
    /// JSON documents
    Json,
}

/// Who or what to compute metrics for
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
struct Target {
    /// ORCiD identifier of an author
    #[arg(long)]
    orcid: Option<String>,

    /// Arbitrary ADS search query
    #[arg(long)]
    query: Option<String>,
}

impl Target {
    fn query(&self) -> Option<String> {
        match (&self.orcid, &self.query) {
            (Some(orcid), _) => Some(format!("orcid:{}", orcid.trim())),
            (None, Some(query)) => Some(query.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Metrics for an author, a query or an explicit list of bibcodes
    #[command(alias = "m")]
    Metrics {
        /// ORCiD identifier of an author
        #[arg(long, conflicts_with_all = ["query", "bibcodes"])]
        orcid: Option<String>,

        /// Arbitrary ADS search query
        #[arg(long, conflicts_with = "bibcodes")]
        query: Option<String>,

        /// Comma-separated bibcodes
        #[arg(long, value_delimiter = ',')]
        bibcodes: Vec<String>,

        /// Save exports (format defaults to the `[output] format` setting)
        #[arg(long, value_enum, num_args = 0..=1)]
        save: Option<Option<ExportFormat>>,

        /// Count publications per year from search records instead of the server histogram
        #[arg(long)]
        raw_counts: bool,

        /// Show the full ADS summary statistics
        #[arg(long)]
        summary: bool,
    },

    /// Facet-based counts and indicators for an author or query
    #[command(alias = "f")]
    Facets {
        #[command(flatten)]
        target: Target,

        /// Save exports (format defaults to the `[output] format` setting)
        #[arg(long, value_enum, num_args = 0..=1)]
        save: Option<Option<ExportFormat>>,
    },

    /// List private libraries and their bibcodes
    #[command(alias = "libs")]
    Libraries {
        /// Write `#name,num_documents,bibcodes` CSV to this file
        #[arg(long)]
        save_to_file: Option<PathBuf>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show the environment variables this tool reads
    Env,
}

/// Print all available environment variables
fn print_env_vars() {
    println!("ADS Metrics - Environment Variables");
    println!();
    println!("Credentials:");
    for var in TOKEN_ENV_VARS {
        println!("  {:<28}ADS API token", var);
    }
    println!("  ~/.ads/dev_key              Token file used when no variable is set");
    println!();
    println!("Configuration overrides (ADS_METRICS__<SECTION>__<KEY>):");
    println!("  ADS_METRICS__API__ENDPOINT      API base URL");
    println!("  ADS_METRICS__API__TIMEOUT_SECS  Request timeout in seconds (default: 30)");
    println!("  ADS_METRICS__API__PAGE_SIZE     Search rows per page (default: 2000)");
    println!("  ADS_METRICS__OUTPUT__DIRECTORY  Export directory (default: .)");
    println!("  ADS_METRICS__OUTPUT__FORMAT     Default export format (csv or json)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
}

/// Load the config file (explicit or discovered) and apply CLI overrides
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else if let Some(path) = find_config_file() {
        load_config(&path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        get_config()
    };

    if let Some(token) = &cli.token {
        config.api.token = Some(token.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    Ok(config)
}

fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ads_metrics={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Cancel `token` on Ctrl-C
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling remaining requests");
            token.cancel();
        }
    });
}

fn progress(cli: &Cli, name: &str, total: usize) -> ProgressReporter {
    if cli.quiet {
        ProgressReporter::quiet(name, total)
    } else {
        ProgressReporter::new(name, total)
    }
}

fn use_json(format: OutputFormat) -> bool {
    match format {
        OutputFormat::Json => true,
        OutputFormat::Table => false,
        OutputFormat::Auto => !std::io::stdout().is_terminal(),
    }
}

/// Export format requested on the command line, falling back to the config file
fn export_format(requested: Option<Option<ExportFormat>>, config: &Config) -> Option<ExportFormat> {
    requested.map(|format| {
        format.unwrap_or_else(|| {
            ExportFormat::from_str(&config.output.format, true).unwrap_or_else(|_| {
                tracing::warn!(
                    "Unknown export format '{}', using csv",
                    config.output.format
                );
                ExportFormat::Csv
            })
        })
    })
}

/// Pages `fetch_all` will request, after clamping to the server maximum
fn page_count(total: usize, page_size: usize) -> usize {
    FetchPage::page_count(total, page_size.clamp(1, MAX_SEARCH_ROWS))
}

/// One unit-width step path per channel
fn step_paths(series: &YearSeries, center: bool) -> Result<Vec<LabeledStepPath>> {
    let mut paths = Vec::new();
    for name in series.channel_names() {
        if let Some(path) = series.step(name, 1.0, center) {
            paths.push(LabeledStepPath {
                label: name.to_string(),
                path: path?,
            });
        }
    }
    Ok(paths)
}

/// Fetch every per-article record matching `query`
async fn fetch_records(
    cli: &Cli,
    client: &AdsClient,
    config: &Config,
    query: &str,
    cancel: &CancellationToken,
) -> Result<Vec<Record>> {
    let total = client.count(query).await?;
    tracing::info!("{} documents match {}", total, query);

    let reporter = progress(cli, "Fetching records", page_count(total, config.api.page_size));
    let docs = fetch_all(
        client,
        &Resource::records(query),
        total,
        config.api.page_size,
        &reporter,
        cancel,
    )
    .await?;
    Ok(parse_records(&docs)?)
}

#[allow(clippy::too_many_arguments)]
async fn run_metrics(
    cli: &Cli,
    config: &Config,
    orcid: Option<String>,
    query: Option<String>,
    bibcodes: Vec<String>,
    save: Option<ExportFormat>,
    raw_counts: bool,
    show_summary: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = AdsClient::new(&config.api)?;
    let query = orcid.map(|o| format!("orcid:{}", o.trim())).or(query);

    let (records, mut bibcodes) = match &query {
        Some(query) => {
            let records = fetch_records(cli, &client, config, query, cancel).await?;
            let bibcodes = records.iter().map(|r| r.bibcode.clone()).collect();
            (records, bibcodes)
        }
        None if !bibcodes.is_empty() => (Vec::new(), bibcodes),
        None => bail!("one of --orcid, --query or --bibcodes is required"),
    };

    if raw_counts && query.is_none() {
        bail!("--raw-counts needs --orcid or --query");
    }
    if bibcodes.len() > MAX_METRICS_BIBCODES {
        tracing::warn!(
            "{} bibcodes exceed the metrics limit; using the first {}",
            bibcodes.len(),
            MAX_METRICS_BIBCODES
        );
        bibcodes.truncate(MAX_METRICS_BIBCODES);
    }

    let (raw, summary, server) = if bibcodes.is_empty() {
        tracing::warn!("No documents found; reporting empty metrics");
        (serde_json::json!({}), MetricsSummary::default(), None)
    } else {
        let raw = tokio::select! {
            _ = cancel.cancelled() => bail!(ads_metrics::MetricsError::Cancelled),
            result = client.metrics(&bibcodes) => result?,
        };
        let summary: MetricsSummary =
            serde_json::from_value(raw.clone()).context("Unexpected metrics summary")?;
        let histograms = (
            publication_histogram(&raw)?,
            citation_histogram(&raw)?,
            read_histogram(&raw)?,
            time_series(&raw)?,
        );
        (raw, summary, Some(histograms))
    };
    let (server_publications, citations, reads, indices) = server.unwrap_or_default();

    let publications = if raw_counts {
        let mut series: YearSeries = publication_counts(&records).into();
        series.push_difference("total", "refereed", "unrefereed");
        series
    } else {
        server_publications
    };

    let current_year = chrono::Local::now().year();
    let local = query.is_some().then(|| {
        (
            IndicatorSet::from_records(&records, current_year),
            IndicatorSet::refereed_from_records(&records, current_year),
        )
    });

    if !cli.quiet {
        if use_json(cli.output) {
            let report = serde_json::json!({
                "summary": summary,
                "indicators": local.as_ref().map(|(all, _)| all),
                "indicators_refereed": local.as_ref().map(|(_, refereed)| refereed),
                "publications": publications,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            if show_summary || local.is_none() {
                println!("{}", utils::summary_table(&summary));
            }
            if let Some((all, refereed)) = &local {
                println!("{}", utils::indicator_table(all, Some(refereed)));
            }
            println!("{}", utils::series_table(&publications));
        }
    }

    if let Some(format) = save {
        let dir = &config.output.directory;
        match format {
            ExportFormat::Csv => {
                utils::save_series(&dir.join("publications.csv"), &publications)?;
                utils::save_series(&dir.join("citations.csv"), &citations)?;
                utils::save_series(&dir.join("reads.csv"), &reads)?;
                utils::save_series(&dir.join("indices.csv"), &indices)?;
                utils::save_summary(&dir.join("metrics.txt"), &summary)?;
                if !records.is_empty() {
                    utils::save_records(&dir.join("records.csv"), &records)?;
                }
            }
            ExportFormat::Json => {
                utils::save_json(&dir.join("metrics.json"), &raw)?;
                utils::save_step_paths(
                    &dir.join("publications_steps.json"),
                    &step_paths(&publications, false)?,
                )?;
                if !records.is_empty() {
                    utils::save_json(&dir.join("records.json"), &records)?;
                }
            }
        }
        tracing::info!("Saved exports to {}", dir.display());
    }

    Ok(())
}

async fn run_facets(
    cli: &Cli,
    config: &Config,
    target: &Target,
    save: Option<ExportFormat>,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = AdsClient::new(&config.api)?;
    let query = target
        .query()
        .context("one of --orcid or --query is required")?;

    let mut pivots = Vec::new();
    for field in [PivotField::Year, PivotField::CitationCount, PivotField::ReadCount] {
        let entries = tokio::select! {
            _ = cancel.cancelled() => bail!(ads_metrics::MetricsError::Cancelled),
            result = client.facet_pivot(&query, field) => result?,
        };
        tracing::debug!("{} facet: {} categories", field, entries.len());
        pivots.push(normalize(RawPayload::FacetPivot { field, entries })?);
    }

    let (number, citations, reads) = match pivots.as_slice() {
        [Normalized::Series(n), Normalized::Distribution(c), Normalized::Distribution(r)] => {
            (n, c, r)
        }
        _ => bail!("unexpected facet shapes"),
    };
    let indicators = IndicatorSet::from_counts(citations, reads);

    if !cli.quiet {
        if use_json(cli.output) {
            let report = serde_json::json!({
                "query": query,
                "indicators": indicators,
                "publications": number,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", utils::indicator_table(&indicators, None));
            println!("{}", utils::series_table(number));
        }
    }

    if let Some(format) = save {
        let dir = &config.output.directory;
        match format {
            ExportFormat::Csv => {
                utils::save_series(&dir.join("number.csv"), number)?;
                utils::save_distribution(
                    &dir.join("citation_count.csv"),
                    "citation_count",
                    citations,
                )?;
                utils::save_distribution(&dir.join("read_count.csv"), "read_count", reads)?;
            }
            ExportFormat::Json => {
                utils::save_json(
                    &dir.join("facets.json"),
                    &serde_json::json!({
                        "indicators": indicators,
                        "publications": number,
                        "citation_count": citations,
                        "read_count": reads,
                    }),
                )?;
                utils::save_step_paths(&dir.join("number_steps.json"), &step_paths(number, true)?)?;
            }
        }
        tracing::info!("Saved exports to {}", dir.display());
    }

    Ok(())
}

async fn run_libraries(
    cli: &Cli,
    config: &Config,
    save_to_file: Option<&Path>,
    cancel: &CancellationToken,
) -> Result<()> {
    let client = AdsClient::new(&config.api)?;
    let libraries = client.libraries().await?;
    tracing::info!("Found {} libraries", libraries.len());

    if !cli.quiet {
        if use_json(cli.output) {
            println!("{}", serde_json::to_string_pretty(&libraries)?);
        } else {
            println!("{}", utils::library_table(&libraries));
        }
    }

    let Some(path) = save_to_file else {
        return Ok(());
    };

    let mut contents = Vec::with_capacity(libraries.len());
    for library in libraries {
        let total = library.num_documents;
        let reporter = progress(cli, &library.name, page_count(total, LIBRARY_PAGE_SIZE));
        let docs = fetch_all(
            &client,
            &Resource::Library(library.id.clone()),
            total,
            LIBRARY_PAGE_SIZE,
            &reporter,
            cancel,
        )
        .await
        .with_context(|| format!("Failed to fetch library '{}'", library.name))?;

        contents.push(LibraryContents {
            bibcodes: parse_bibcodes(&docs)?,
            library,
        });
    }

    let path = if path.is_relative() {
        config.output.directory.join(path)
    } else {
        path.to_path_buf()
    };
    utils::save_libraries(&path, &contents)?;
    tracing::info!("Saved {} libraries to {}", contents.len(), path.display());
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => dirs::config_dir()
            .map(|dir| dir.join("ads-metrics").join("config.toml"))
            .context("Could not determine the user config directory")?,
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ConfigFile::default().save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "ads-metrics", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Env) => {
            print_env_vars();
            return Ok(());
        }
        Some(Commands::InitConfig { path, force }) => {
            return init_config(path.clone(), *force);
        }
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
        _ => {}
    }

    let mut config = resolve_config(&cli)?;
    init_tracing(&cli, &config);
    config.api = config.api.resolve_token();

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let result = match &cli.command {
        Some(Commands::Metrics {
            orcid,
            query,
            bibcodes,
            save,
            raw_counts,
            summary,
        }) => {
            run_metrics(
                &cli,
                &config,
                orcid.clone(),
                query.clone(),
                bibcodes.clone(),
                export_format(*save, &config),
                *raw_counts,
                *summary,
                &cancel,
            )
            .await
        }
        Some(Commands::Facets { target, save }) => {
            run_facets(&cli, &config, target, export_format(*save, &config), &cancel).await
        }
        Some(Commands::Libraries { save_to_file }) => {
            run_libraries(&cli, &config, save_to_file.as_deref(), &cancel).await
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["ads-metrics"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.timeout.is_none());
        assert!(cli.token.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["ads-metrics", "-v"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["ads-metrics", "-vv"]);
        assert_eq!(cli.verbose, 2);

        let cli = Cli::parse_from(["ads-metrics", "env", "--verbose"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_flag() {
        let cli = Cli::parse_from(["ads-metrics", "-q"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\ntoken = \"from-file\"\ntimeout_secs = 5\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let cli = Cli::parse_from([
            "ads-metrics",
            "libraries",
            "--config",
            path_arg.as_str(),
            "--timeout",
            "60",
            "--endpoint",
            "https://example.org/v1",
            "--output-dir",
            "/tmp/out",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.api.token.as_deref(), Some("from-file"));
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.api.endpoint, "https://example.org/v1");
        assert_eq!(config.output.directory, PathBuf::from("/tmp/out"));
        assert_eq!(export_format(Some(None), &config), Some(ExportFormat::Json));
        assert_eq!(
            export_format(Some(Some(ExportFormat::Csv)), &config),
            Some(ExportFormat::Csv)
        );
        assert_eq!(export_format(None, &config), None);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["ads-metrics", "--config", "/nonexistent/ads-metrics.toml"]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_cli_metrics_command() {
        let cli = Cli::parse_from([
            "ads-metrics",
            "metrics",
            "--orcid",
            "0000-0002-4110-3511",
            "--save",
            "csv",
            "--raw-counts",
        ]);
        match &cli.command {
            Some(Commands::Metrics {
                orcid,
                save,
                raw_counts,
                summary,
                ..
            }) => {
                assert_eq!(orcid.as_deref(), Some("0000-0002-4110-3511"));
                assert_eq!(*save, Some(Some(ExportFormat::Csv)));
                assert!(*raw_counts);
                assert!(!*summary);
            }
            _ => panic!("Expected Metrics command"),
        }
    }

    #[test]
    fn test_cli_metrics_bibcodes() {
        let cli = Cli::parse_from(["ads-metrics", "metrics", "--bibcodes", "2020A,2021B"]);
        match &cli.command {
            Some(Commands::Metrics { bibcodes, .. }) => {
                assert_eq!(bibcodes, &vec!["2020A".to_string(), "2021B".to_string()]);
            }
            _ => panic!("Expected Metrics command"),
        }

        assert!(Cli::try_parse_from([
            "ads-metrics",
            "metrics",
            "--orcid",
            "x",
            "--bibcodes",
            "2020A"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_facets_requires_target() {
        assert!(Cli::try_parse_from(["ads-metrics", "facets"]).is_err());
        assert!(
            Cli::try_parse_from(["ads-metrics", "facets", "--orcid", "a", "--query", "b"]).is_err()
        );

        let cli = Cli::parse_from(["ads-metrics", "facets", "--query", "author:\"Doe, J\""]);
        match &cli.command {
            Some(Commands::Facets { target, save }) => {
                assert_eq!(target.query().as_deref(), Some("author:\"Doe, J\""));
                assert!(save.is_none());
            }
            _ => panic!("Expected Facets command"),
        }

        let cli = Cli::parse_from(["ads-metrics", "facets", "--orcid", "0000-0001", "--save"]);
        match &cli.command {
            Some(Commands::Facets { save, .. }) => assert_eq!(*save, Some(None)),
            _ => panic!("Expected Facets command"),
        }
    }

    #[test]
    fn test_target_orcid_query() {
        let target = Target {
            orcid: Some(" 0000-0001 ".to_string()),
            query: None,
        };
        assert_eq!(target.query().as_deref(), Some("orcid:0000-0001"));
    }

    #[test]
    fn test_cli_libraries_command() {
        let cli = Cli::parse_from(["ads-metrics", "libraries", "--save-to-file", "libs.csv"]);
        match &cli.command {
            Some(Commands::Libraries { save_to_file }) => {
                assert_eq!(save_to_file, &Some(PathBuf::from("libs.csv")));
            }
            _ => panic!("Expected Libraries command"),
        }
    }

    #[test]
    fn test_cli_completions_command() {
        let cli = Cli::parse_from(["ads-metrics", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn test_step_paths_labels() {
        let series: YearSeries = ads_metrics::metrics::align([(
            "refereed",
            std::collections::BTreeMap::from([(2020, 2.0)]),
        )]);
        let paths = step_paths(&series, true).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].label, "refereed");
        assert_eq!(paths[0].path.x[0], 2019.5);
    }

    #[test]
    fn test_page_count_uses_clamped_page_size() {
        assert_eq!(page_count(4500, 2000), 3);
        assert_eq!(page_count(4500, 5000), 3);
        assert_eq!(page_count(30, LIBRARY_PAGE_SIZE), 2);
        assert_eq!(page_count(0, 2000), 0);
    }

    fn config_for(server: &mockito::ServerGuard) -> Config {
        let mut config = Config::default();
        config.api.endpoint = server.url();
        config.api.token = Some("test-token".to_string());
        config
    }

    #[tokio::test]
    async fn test_metrics_with_no_matches_reports_empty() {
        let mut server = mockito::Server::new_async().await;
        let search = server
            .mock("GET", "/search/query")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response": {"numFound": 0, "docs": []}}"#)
            .create_async()
            .await;
        let metrics = server.mock("POST", "/metrics").expect(0).create_async().await;

        let cli = Cli::parse_from([
            "ads-metrics", "-q", "metrics", "--query", "nobody", "--raw-counts",
        ]);
        let config = config_for(&server);
        let result = run_metrics(
            &cli,
            &config,
            None,
            Some("author:nobody".to_string()),
            Vec::new(),
            None,
            true,
            false,
            &CancellationToken::new(),
        )
        .await;

        assert!(result.is_ok(), "{:?}", result);
        search.assert_async().await;
        metrics.assert_async().await;
    }

    #[tokio::test]
    async fn test_raw_counts_needs_a_query() {
        let server = mockito::Server::new_async().await;
        let cli = Cli::parse_from(["ads-metrics", "-q", "metrics", "--bibcodes", "2020A"]);
        let err = run_metrics(
            &cli,
            &config_for(&server),
            None,
            None,
            vec!["2020A".to_string()],
            None,
            true,
            false,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("--raw-counts"));
    }
}
