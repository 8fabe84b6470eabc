// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use fcpsub::app_config::{self, Config};
use fcpsub::language_utils;
use fcpsub::{Controller, FrameRate, SubtitleFormat};

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSubtitleFormat {
    Fcpxml,
    Srt,
}

impl From<CliSubtitleFormat> for SubtitleFormat {
    fn from(cli_format: CliSubtitleFormat) -> Self {
        match cli_format {
            CliSubtitleFormat::Fcpxml => SubtitleFormat::Fcpxml,
            CliSubtitleFormat::Srt => SubtitleFormat::Srt,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate subtitles for a media file, transcript or directory (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate shell completions for fcpsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input audio/video file, Whisper JSON transcript, or directory
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output subtitle file (default: input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from --output extension, then config)
    #[arg(short = 'F', long, value_enum)]
    format: Option<CliSubtitleFormat>,

    /// Whisper model size (tiny, base, small, medium, large)
    #[arg(short, long)]
    model: Option<String>,

    /// Language code for transcription (e.g., 'en', 'es', 'ko'); auto-detect if omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Project frame rate as NUM/DEN or an integer (default: 30000/1001)
    #[arg(long)]
    fps: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// fcpsub - Whisper transcripts to Final Cut Pro subtitles
///
/// Transcribes audio and video with Whisper and writes frame-accurate
/// subtitle tracks for nonlinear editors.
#[derive(Parser, Debug)]
#[command(name = "fcpsub")]
#[command(version)]
#[command(about = "Generate Final Cut Pro compatible subtitles with Whisper")]
#[command(long_about = "fcpsub transcribes audio and video files with Whisper and writes frame-accurate subtitles.

EXAMPLES:
    fcpsub talk.mp4                          # Writes talk.fcpxml
    fcpsub -F srt talk.mp3                   # Writes talk.srt
    fcpsub -m small -l ko interview.m4a      # Korean transcription with the small model
    fcpsub -o captions.srt talk.json         # Convert an existing Whisper JSON transcript
    fcpsub --fps 25 talk.mp4                 # Snap captions to a 25 fps project
    fcpsub -f /footage/                      # Process a whole directory, overwriting outputs
    fcpsub completions bash > fcpsub.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

REQUIREMENTS:
    whisper - openai-whisper command-line tool (not needed for .json transcripts)
    ffmpeg  - audio extraction from video files")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input audio/video file, Whisper JSON transcript, or directory
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output subtitle file (default: input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from --output extension, then config)
    #[arg(short = 'F', long, value_enum)]
    format: Option<CliSubtitleFormat>,

    /// Whisper model size (tiny, base, small, medium, large)
    #[arg(short, long)]
    model: Option<String>,

    /// Language code for transcription (e.g., 'en', 'es', 'ko'); auto-detect if omitted
    #[arg(short, long)]
    language: Option<String>,

    /// Project frame rate as NUM/DEN or an integer (default: 30000/1001)
    #[arg(long)]
    fps: Option<String>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or command line says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "fcpsub", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            // Default behavior - top-level args without the subcommand
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let args = GenerateArgs {
                input_path,
                output: cli.output,
                format: cli.format,
                model: cli.model,
                language: cli.language,
                fps: cli.fps,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_generate(args).await
        }
    }
}

fn load_config(options: &GenerateArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    // Command line options win over the file
    if let Some(model) = &options.model {
        config.transcription.model = model.clone();
    }
    if let Some(language) = &options.language {
        config.transcription.language = Some(language.clone());
    }
    if let Some(fps) = &options.fps {
        config.frame_rate = fps.parse::<FrameRate>().context("Invalid --fps value")?;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

// Explicit flag, then the output file extension, then the config default
fn resolve_format(options: &GenerateArgs, config: &Config) -> Result<SubtitleFormat> {
    if let Some(format) = options.format {
        return Ok(format.into());
    }
    if let Some(ext) = options.output.as_ref().and_then(|output| output.extension()) {
        return Ok(ext.to_string_lossy().parse::<SubtitleFormat>()?);
    }
    Ok(config.format)
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let format = resolve_format(&options, &config)?;
    let controller = Controller::with_config(config)?;

    info!("Model: {}", controller.config().transcription.model);
    match &controller.config().transcription.language {
        Some(language) => match language_utils::get_language_name(language) {
            Ok(name) => info!("Language: {} ({})", name, language),
            Err(_) => info!("Language: {}", language),
        },
        None => info!("Language: Auto-detect"),
    }

    if options.input_path.is_file() {
        controller
            .run(&options.input_path, options.output.clone(), format, options.force_overwrite)
            .await?;
    } else if options.input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output cannot be used with a directory input"));
        }
        let summary = controller
            .run_folder(&options.input_path, format, options.force_overwrite)
            .await?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) failed to convert", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    info!("Done!");
    Ok(())
}
