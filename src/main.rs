//! api-evolution: API evolution diff and lifecycle tool
//!
//! Tracks how a package's public API changes across its release history.

#![allow(
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::needless_pass_by_value
)]

use anyhow::{Context, Result};
use api_evolution::{
    cli,
    config::{
        AnalyzeConfig, AppConfig, CompareConfig, ConfigPreset, LifecycleConfig, LifecycleSource,
        SummaryConfig, VersionsConfig, CONFIG_FILE_NAMES,
    },
    diff::ChangeType,
    model::ApiKind,
    pipeline::exit_codes,
    reports::ReportFormat,
    selection::SelectionConfig,
};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nChange Types:",
        "\n  added, removed, modified, deprecated",
        "\n\nOutput Formats:",
        "\n  summary, json, markdown, csv",
        "\n\nData Layout:",
        "\n  <data-dir>/<package>/catalog.json",
        "\n  <data-dir>/<package>/snapshots/<version>.json"
    )
}

#[derive(Parser)]
#[command(name = "api-evolution")]
#[command(version, long_version = build_long_version())]
#[command(about = "API evolution diff and lifecycle tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Breaking changes found (--fail-on-breaking) / lifecycle query unresolved
    3  Error occurred

EXAMPLES:
    # Every release of a package
    api-evolution analyze requests

    # CI gate between two releases
    api-evolution compare requests 2.30.0 2.31.0 -o summary --fail-on-breaking

    # Export JSON, then query it later
    api-evolution analyze requests --max-versions 20 -o json -O requests.json
    api-evolution lifecycle get --input requests.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Directory holding package catalogs and snapshots
    #[arg(long, global = true, env = "API_EVOLUTION_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start from a named preset (default, strict, exhaustive)
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs (extracted for readability)
// ============================================================================

/// Output options shared by the reporting subcommands
#[derive(Parser)]
struct OutputArgs {
    /// Output format (auto: summary on a terminal, JSON otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Change filter options
#[derive(Parser)]
struct FilterArgs {
    /// Only report these change types (comma-separated)
    #[arg(long, value_delimiter = ',')]
    change_types: Vec<ChangeType>,

    /// Only report changes to these element kinds (comma-separated)
    #[arg(long, value_delimiter = ',')]
    kinds: Vec<ApiKind>,

    /// Only report APIs whose `module.name` matches this regex
    #[arg(long)]
    name_pattern: Option<String>,

    /// Only report changes that break backwards compatibility
    #[arg(long)]
    breaking_only: bool,

    /// Hide changes to private (underscore-prefixed) elements
    #[arg(long)]
    public_only: bool,

    /// Cap the number of change rows per report
    #[arg(long)]
    max_items: Option<usize>,
}

/// Version selection options
#[derive(Parser)]
struct SelectionArgs {
    /// Analyze exactly these versions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    versions: Option<Vec<String>>,

    /// First version of an inclusive range
    #[arg(long)]
    from_version: Option<String>,

    /// Last version of an inclusive range
    #[arg(long)]
    to_version: Option<String>,

    /// Evenly sample at most this many versions (first and latest always kept)
    #[arg(long)]
    max_versions: Option<usize>,

    /// Earliest release date, YYYY-MM-DD (inclusive)
    #[arg(long)]
    from_date: Option<NaiveDate>,

    /// Latest release date, YYYY-MM-DD (inclusive)
    #[arg(long)]
    to_date: Option<NaiveDate>,

    /// Keep versions the registry marked as yanked
    #[arg(long)]
    include_yanked: bool,
}

impl SelectionArgs {
    fn into_selection(self) -> SelectionConfig {
        SelectionConfig {
            versions: self.versions,
            from_version: self.from_version,
            to_version: self.to_version,
            max_versions: self.max_versions,
            from_date: self.from_date,
            to_date: self.to_date,
            include_yanked: self.include_yanked,
        }
    }
}

/// Arguments for the `analyze` subcommand
#[derive(Parser)]
struct AnalyzeArgs {
    /// Package name
    package: String,

    #[command(flatten)]
    selection: SelectionArgs,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Only build snapshots; skip the change list
    #[arg(long)]
    no_changes: bool,

    /// Exit with code 1 if a breaking change is reported
    #[arg(long)]
    fail_on_breaking: bool,
}

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    /// Package name
    package: String,

    /// Older version
    from_version: String,

    /// Newer version
    to_version: String,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Exit with code 1 if a breaking change is reported
    #[arg(long)]
    fail_on_breaking: bool,
}

/// Arguments for the `lifecycle` subcommand
#[derive(Parser)]
struct LifecycleArgs {
    /// `<PACKAGE> <API>`, or just `<API>` together with --input
    #[arg(num_args = 1..=2, value_names = ["PACKAGE", "API"], required = true)]
    targets: Vec<String>,

    /// Read history from a saved analysis result instead of the data directory
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[command(flatten)]
    selection: SelectionArgs,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `versions` subcommand
#[derive(Parser)]
struct VersionsArgs {
    /// Package name
    package: String,

    /// Show only the newest N versions
    #[arg(long)]
    limit: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

/// Arguments for the `summary` subcommand
#[derive(Parser)]
struct SummaryArgs {
    /// Analysis result written by `analyze -o json`
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Exit with code 1 if a breaking change is reported
    #[arg(long)]
    fail_on_breaking: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff the API across a package's release history
    Analyze(AnalyzeArgs),

    /// Diff the API between two versions of a package
    Compare(CompareArgs),

    /// Show when an API was introduced, modified, deprecated and removed
    Lifecycle(LifecycleArgs),

    /// List a package's known versions
    Versions(VersionsArgs),

    /// Re-render a saved analysis result
    Summary(SummaryArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .api-evolution.yaml in the current directory
    Init,
}

// ============================================================================
// Configuration layering: preset < config file < command line
// ============================================================================

/// Flags that apply to every subcommand.
struct Globals {
    quiet: bool,
    no_color: bool,
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    preset: Option<String>,
}

impl Globals {
    fn base(&self) -> Result<AppConfig> {
        let mut config = match &self.preset {
            Some(name) => {
                let preset = ConfigPreset::from_name(name).with_context(|| {
                    let known: Vec<&str> =
                        ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                    format!("Unknown preset '{name}'. Valid options: {}", known.join(", "))
                })?;
                AppConfig::from_preset(preset)
            }
            None => AppConfig::default(),
        };
        let (file_config, loaded_from) =
            api_evolution::config::load_or_default(self.config.as_deref());
        if let Some(path) = loaded_from {
            tracing::debug!("Using config file {}", path.display());
        }
        config.merge(&file_config);
        Ok(config)
    }

    /// Effective configuration for one subcommand invocation.
    fn app_config(
        &self,
        output: OutputArgs,
        filter: Option<FilterArgs>,
        fail_on_breaking: bool,
        no_changes: bool,
    ) -> Result<AppConfig> {
        let mut builder = AppConfig::builder()
            .output_format(output.output)
            .output_file(output.output_file)
            .no_color(self.no_color)
            .quiet(self.quiet)
            .fail_on_breaking(fail_on_breaking)
            .calculate_changes(!no_changes)
            .data_dir(self.data_dir.clone());
        let mut max_items = None;
        if let Some(filter) = filter {
            max_items = filter.max_items;
            builder = builder
                .change_types(filter.change_types)
                .kinds(filter.kinds)
                .name_pattern(filter.name_pattern)
                .breaking_only(filter.breaking_only)
                .include_private(!filter.public_only);
        }
        let mut overrides = builder.build();
        overrides.output.max_items = max_items;

        let mut config = self.base()?;
        config.merge(&overrides);
        Ok(config)
    }
}

fn lifecycle_source(
    targets: Vec<String>,
    input: Option<PathBuf>,
    selection: SelectionConfig,
) -> Result<(String, LifecycleSource)> {
    let mut targets = targets.into_iter();
    match (input, targets.next(), targets.next()) {
        (Some(path), Some(api), None) => Ok((api, LifecycleSource::Input(path))),
        (Some(_), Some(_), Some(_)) => {
            anyhow::bail!("With --input, pass only the API name; the package comes from the file")
        }
        (None, Some(package), Some(api)) => {
            Ok((api, LifecycleSource::Package { package, selection }))
        }
        _ => anyhow::bail!("Expected <PACKAGE> <API>, or <API> with --input"),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let log_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let globals = Globals {
        quiet: cli.quiet,
        no_color: cli.no_color,
        data_dir: cli.data_dir,
        config: cli.config,
        preset: cli.preset,
    };

    match run(cli.command, &globals) {
        Ok(code) if code != exit_codes::SUCCESS => std::process::exit(code),
        Ok(_) => {}
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Dispatch to command handlers, returning the exit code.
fn run(command: Commands, globals: &Globals) -> Result<i32> {
    match command {
        Commands::Analyze(args) => {
            let app = globals.app_config(
                args.output,
                Some(args.filter),
                args.fail_on_breaking,
                args.no_changes,
            )?;
            cli::run_analyze(AnalyzeConfig {
                package: args.package,
                selection: args.selection.into_selection(),
                app,
            })
        }

        Commands::Compare(args) => {
            let app =
                globals.app_config(args.output, Some(args.filter), args.fail_on_breaking, false)?;
            cli::run_compare(CompareConfig {
                package: args.package,
                from_version: args.from_version,
                to_version: args.to_version,
                app,
            })
        }

        Commands::Lifecycle(args) => {
            let (api, source) = lifecycle_source(
                args.targets,
                args.input,
                args.selection.into_selection(),
            )?;
            let app = globals.app_config(args.output, None, false, false)?;
            cli::run_lifecycle(LifecycleConfig { api, source, app })
        }

        Commands::Versions(args) => {
            let app = globals.app_config(args.output, None, false, false)?;
            cli::run_versions(VersionsConfig {
                package: args.package,
                limit: args.limit,
                app,
            })
        }

        Commands::Summary(args) => {
            let app =
                globals.app_config(args.output, Some(args.filter), args.fail_on_breaking, false)?;
            cli::run_summary(SummaryConfig {
                input: args.input,
                app,
            })
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "api-evolution", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = api_evolution::config::generate_json_schema()
                .context("failed to generate config schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => run_config(action, globals),
    }
}

fn run_config(action: ConfigAction, globals: &Globals) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            let (_, loaded_from) = api_evolution::config::load_or_default(globals.config.as_deref());
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let config = globals.base()?;
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                api_evolution::config::user_config_dir().map(|p| p.display().to_string()),
                ::dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match api_evolution::config::discover_config_file(globals.config.as_deref()) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(CONFIG_FILE_NAMES[0]);
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            let content = api_evolution::config::generate_example_config();
            std::fs::write(&target, content)
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(exit_codes::SUCCESS)
}
