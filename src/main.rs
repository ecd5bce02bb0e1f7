// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use layerlingo::app_config::{self, Config, FilterStrategy};
use layerlingo::credentials::{CredentialStore, FileCredentialStore};
use layerlingo::errors::AppError;
use layerlingo::language_utils;
use layerlingo::providers::Credentials;
use layerlingo::providers::deepl::DeepL;
use layerlingo::scene::MemoryScene;
use layerlingo::translation::{TranslateRequest, TranslationOrchestrator, TranslationOutcome};

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

/// CLI Wrapper for FilterStrategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliFilterStrategy {
    /// Skip text the provider detects as the target language
    Provider,
    /// Skip text the local script heuristic places in the target language
    Local,
}

impl From<CliFilterStrategy> for FilterStrategy {
    fn from(cli_strategy: CliFilterStrategy) -> Self {
        match cli_strategy {
            CliFilterStrategy::Provider => FilterStrategy::ProviderDetected,
            CliFilterStrategy::Local => FilterStrategy::LocalHeuristic,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the selected text layers of a scene file
    Translate(TranslateArgs),

    /// Print the language detected for a text
    Detect {
        /// Text to classify
        text: String,
    },

    /// Store the DeepL API key for later runs
    SetKey {
        /// API key to store
        key: String,
    },

    /// Generate shell completions for layerlingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Scene file (JSON) whose selection is translated
    #[arg(value_name = "SCENE")]
    scene_path: PathBuf,

    /// Target language code (e.g., 'EN', 'FR', 'ZH')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Place translations in annotation frames instead of replacing text
    #[arg(short, long)]
    annotate: bool,

    /// How text already in the target language is skipped
    #[arg(short, long, value_enum)]
    strategy: Option<CliFilterStrategy>,

    /// Where to write the updated scene (defaults to the input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// DeepL API key, overriding the stored one
    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// LayerLingo - text layer translation for design scenes
///
/// Translates the text layers of a scene with DeepL while keeping their
/// fonts, sizes, colours and other styling.
#[derive(Parser, Debug)]
#[command(name = "layerlingo")]
#[command(author = "LayerLingo Team")]
#[command(version = "1.0.0")]
#[command(about = "Translate design text layers while keeping their style")]
#[command(long_about = "LayerLingo translates the selected text layers of a scene file with DeepL.

EXAMPLES:
    layerlingo set-key <KEY>                      # Store the DeepL API key
    layerlingo translate scene.json -t FR         # Translate the selection to French in place
    layerlingo translate scene.json -t DE -a      # Add German annotation frames instead
    layerlingo translate scene.json -s local      # Skip text by local language detection
    layerlingo translate scene.json -o out.json   # Keep the input file untouched
    layerlingo detect \"こんにちは\"                 # Show the detected language
    layerlingo completions bash > layerlingo.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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

    // @returns: ANSI colour code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
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
    // Accept everything here; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Translate(args) => run_translate(args).await,
        Commands::Detect { text } => {
            run_detect(&text);
            Ok(())
        }
        Commands::SetKey { key } => run_set_key(&key).await,
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "layerlingo", &mut std::io::stdout());
            Ok(())
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // Load or create configuration
    let config_path = Path::new(&options.config_path);
    if !config_path.exists() {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path.display()
        );
    }
    let mut config = Config::load_or_create(config_path)?;

    // Override config with CLI options if provided
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if options.annotate {
        config.replace_in_place = false;
    }
    if let Some(strategy) = &options.strategy {
        config.filter_strategy = strategy.clone().into();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let credentials = resolve_credentials(&config).await?;
    if credentials.is_empty() {
        warn!("No API key configured. Store one with `layerlingo set-key <KEY>`.");
    }

    let mut scene = MemoryScene::load(&options.scene_path)?;
    let roots = scene.selection.clone();

    let client = DeepL::from_config(&config.translation);
    let orchestrator = TranslationOrchestrator::from_config(client, &config);
    let request = TranslateRequest {
        target_language: config.target_language.clone(),
        replace_in_place: config.replace_in_place,
        credentials,
    };

    let spinner = ProgressBar::new_spinner();
    let template_result = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(template_result);
    spinner.set_message(format!(
        "Translating to {}",
        language_utils::display_language_name(&config.target_language)
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = orchestrator.run(&mut scene, &roots, &request).await;
    spinner.finish_and_clear();

    match outcome {
        TranslationOutcome::Completed { updated, failures } => {
            let output = options.output.unwrap_or(options.scene_path);
            scene.save(&output)?;
            info!(
                "Success: {} ({} updated, {} failed)",
                output.display(),
                updated,
                failures.len()
            );
            Ok(())
        }
        TranslationOutcome::NoOpAlreadyTarget => Ok(()),
        TranslationOutcome::Failed(reason) => Err(AppError::Translation(reason).into()),
    }
}

/// Credentials from the config, else from the credential store
async fn resolve_credentials(config: &Config) -> Result<Credentials> {
    if !config.translation.api_key.trim().is_empty() {
        return Ok(Credentials::new(config.translation.api_key.trim()));
    }
    let store = FileCredentialStore::default_location()?;
    store.credentials().await
}

fn run_detect(text: &str) {
    let detection = language_utils::detect_script(text);
    let provider_code = language_utils::map_to_provider_code(detection.code);
    println!("script:   {} (score {:.2})", detection.code, detection.score);
    println!(
        "language: {} ({})",
        provider_code,
        language_utils::display_language_name(provider_code)
    );
}

async fn run_set_key(key: &str) -> Result<()> {
    let store = FileCredentialStore::default_location()?;
    store.save(key).await?;
    info!("API key stored in {}", store.path().display());
    Ok(())
}
