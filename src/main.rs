// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use relingo::app_config::{self, Config, PageErrorPolicy, TranslationProvider};
use relingo::file_utils::FileManager;
use relingo::language_utils::{self, COMMON_LANGUAGES};
use relingo::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for PageErrorPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliPageErrorPolicy {
    Abort,
    Skip,
}

impl From<CliPageErrorPolicy> for PageErrorPolicy {
    fn from(cli_policy: CliPageErrorPolicy) -> Self {
        match cli_policy {
            CliPageErrorPolicy::Abort => PageErrorPolicy::Abort,
            CliPageErrorPolicy::Skip => PageErrorPolicy::Skip,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a layout document or a folder of them (default command)
    Translate(TranslateArgs),

    /// List the common target languages
    Languages,

    /// Generate shell completions for relingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input layout document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file, or output directory in folder mode
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Target language code (e.g., 'fr', 'de', 'zh-CN')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translate without detecting the source language first
    #[arg(long)]
    no_auto_detect: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Font used to draw translated text
    #[arg(long)]
    font: Option<String>,

    /// What to do when a page fails
    #[arg(long, value_enum)]
    on_page_error: Option<CliPageErrorPolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// relingo - layout-preserving document translation
///
/// Erases the text of every page of a layout document and draws its
/// translation back into the same place, shrinking the font to fit.
#[derive(Parser, Debug)]
#[command(name = "relingo")]
#[command(version)]
#[command(about = "Layout-preserving document translation")]
#[command(long_about = "relingo translates the text of paged layout documents while keeping their layout.

EXAMPLES:
    relingo report.layout.json                  # Translate using default config
    relingo -t de report.layout.json            # Translate into German
    relingo -f report.layout.json               # Force overwrite existing output
    relingo -p mock report.layout.json          # Dry run with the offline mock provider
    relingo --on-page-error skip docs/          # Translate a folder, skipping broken pages
    relingo languages                           # List common target languages
    relingo completions bash > relingo.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The Google API key may also be supplied through
    the GOOGLE_TRANSLATE_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input layout document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file, or output directory in folder mode
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Target language code (e.g., 'fr', 'de', 'zh-CN')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translate without detecting the source language first
    #[arg(long)]
    no_auto_detect: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Font used to draw translated text
    #[arg(long)]
    font: Option<String>,

    /// What to do when a page fails
    #[arg(long, value_enum)]
    on_page_error: Option<CliPageErrorPolicy>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here; the effective level is set with log::set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "relingo", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Languages) => {
            for (name, tag) in COMMON_LANGUAGES {
                println!("{:<8} {}", tag, name);
            }
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - top-level args translate directly
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let args = TranslateArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                target_language: cli.target_language,
                no_auto_detect: cli.no_auto_detect,
                provider: cli.provider,
                font: cli.font,
                on_page_error: cli.on_page_error,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(args).await
        }
    }
}

/// Load the config file, creating it with defaults when missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let content = FileManager::read_to_string(config_path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(config_path, &config_json)?;
        Ok(config)
    }
}

/// Apply command line overrides on top of the file config
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if options.no_auto_detect {
        config.auto_detect = false;
    }
    if let Some(font) = &options.font {
        config.layout.default_font = font.clone();
    }
    if let Some(policy) = &options.on_page_error {
        config.on_page_error = policy.clone().into();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_config(&options.config_path)?;
    apply_overrides(&mut config, &options);
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(level_filter(&config.log_level));

    info!(
        "Target language: {} ({})",
        config.target_language,
        language_utils::get_language_name(&config.target_language)
            .unwrap_or_else(|_| "unknown".to_string())
    );

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller
            .run(options.input_path.clone(), options.output.clone(), options.force_overwrite)
            .await?;
    } else if options.input_path.is_dir() {
        let summary = controller
            .run_folder(options.input_path.clone(), options.output.clone(), options.force_overwrite)
            .await?;
        if !summary.errors.is_empty() {
            return Err(anyhow!("{} documents failed", summary.errors.len()));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
