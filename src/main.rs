// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use chunktrans::app_config::{self, Config};
use chunktrans::app_controller::Controller;
use chunktrans::translation::{CancellationFlag, ContextStrategyKind};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// CLI Wrapper for ContextStrategyKind to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStrategy {
    Overlap,
    IterativeSummary,
    None,
}

impl From<CliStrategy> for ContextStrategyKind {
    fn from(cli_strategy: CliStrategy) -> Self {
        match cli_strategy {
            CliStrategy::Overlap => ContextStrategyKind::Overlap,
            CliStrategy::IterativeSummary => ContextStrategyKind::IterativeSummary,
            CliStrategy::None => ContextStrategyKind::None,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a text file (default command)
    Translate(TranslateArgs),

    /// Show how a file would be chunked, without translating it
    Chunks {
        /// Input text file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Generate shell completions for chunktrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input text file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for the translated file (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

/// Overrides applied on top of the configuration file
#[derive(clap::Args, Debug, Clone)]
struct SettingsArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "chunktrans.json")]
    config_path: PathBuf,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// API key
    #[arg(long, env = "CHUNKTRANS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Target language (e.g. 'Chinese', 'French')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Nominal maximum characters per chunk
    #[arg(long)]
    max_chars: Option<usize>,

    /// Extra characters tolerated to end a chunk on a line boundary
    #[arg(long)]
    overflow: Option<usize>,

    /// Sentences carried over between chunks
    #[arg(long)]
    overlap_sentences: Option<usize>,

    /// Context strategy
    #[arg(short, long, value_enum)]
    strategy: Option<CliStrategy>,

    /// File holding a custom prompt template
    #[arg(long)]
    prompt_template_file: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// chunktrans - translate large text files chunk by chunk with an LLM
#[derive(Parser, Debug)]
#[command(name = "chunktrans")]
#[command(version)]
#[command(about = "Chunked, context-preserving document translation")]
#[command(long_about = "chunktrans splits large text files into size-bounded chunks and translates
them one after another through an OpenAI-compatible chat API, carrying context
from each translated chunk into the next request.

EXAMPLES:
    chunktrans notes.md                              # Translate using default config
    chunktrans -t French notes.md                    # Translate into French
    chunktrans -s iterative-summary book.txt         # Carry a running summary
    chunktrans -f -o out/ notes.md                   # Overwrite into another directory
    chunktrans chunks --max-chars 1500 book.txt      # Show the chunk plan only
    chunktrans completions bash > chunktrans.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in chunktrans.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default one
    will be created automatically. The API key can also be supplied through
    CHUNKTRANS_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Directory for the translated file (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    #[command(flatten)]
    settings: SettingsArgs,
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
        // The logger lets everything through; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
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

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let level = record.level();
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
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
    // Info until the configuration has been read
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "chunktrans", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Chunks { input_path, settings }) => run_chunks(&input_path, settings),
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_translate(TranslateArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                settings: cli.settings,
            })
            .await
        }
    }
}

/// Load the configuration file and apply command line overrides
fn load_config(settings: &SettingsArgs) -> Result<Config> {
    if let Some(level) = settings.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let mut config = Config::load_or_create(&settings.config_path)?;

    if let Some(base_url) = &settings.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(api_key) = &settings.api_key {
        config.api.api_key = api_key.clone();
    }
    if let Some(model) = &settings.model {
        config.api.model = model.clone();
    }
    if let Some(target_language) = &settings.target_language {
        config.translation.target_language = target_language.clone();
    }
    if let Some(max_chars) = settings.max_chars {
        config.chunking.max_chars = max_chars;
    }
    if let Some(overflow) = settings.overflow {
        config.chunking.overflow_chars = overflow;
    }
    if let Some(overlap) = settings.overlap_sentences {
        config.chunking.overlap_sentences = overlap;
    }
    if let Some(strategy) = settings.strategy {
        config.translation.strategy = strategy.into();
    }
    if let Some(template_path) = &settings.prompt_template_file {
        config.translation.prompt_template = std::fs::read_to_string(template_path)
            .with_context(|| format!("Failed to read prompt template: {:?}", template_path))?;
    }
    if let Some(level) = settings.log_level {
        config.log_level = level.into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn run_chunks(input_path: &Path, settings: SettingsArgs) -> Result<()> {
    // No API call is made, so endpoint settings are not validated
    let config = load_config(&settings)?;
    let controller = Controller::with_config(config)?;
    let chunks = controller.chunk_plan(input_path)?;

    let mut stdout = std::io::stdout();
    for (idx, chunk) in chunks.iter().enumerate() {
        writeln!(
            stdout,
            "{:>4}  {:>6} chars  {:>4} sentences",
            idx + 1,
            chunk.char_len(),
            chunk.sentences.len()
        )?;
    }
    Ok(())
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let config = load_config(&options.settings)?;
    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    let output_dir = match options.output_dir {
        Some(dir) => dir,
        None => options
            .input_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };

    let cancel = CancellationFlag::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current chunk...");
            trigger.cancel();
        }
    });

    controller
        .run(options.input_path, output_dir, options.force_overwrite, &cancel)
        .await?;

    Ok(())
}
