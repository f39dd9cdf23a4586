use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reframe::{
    ConversionOptions, FfmpegLogLevel, FrameImageFormat, ProgressCallback, ProgressInfo,
    VideoReader,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  reframe extract input.mp4 frames\n  reframe assemble frames output.mp4\n  reframe extract input.mp4 frames --ext jpg --no-progress\n  reframe info input.mp4 --json\n  reframe completions zsh > _reframe";

#[derive(Debug, Parser)]
#[command(
    name = "reframe",
    version,
    about = "Split videos into numbered frames and reassemble them",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional diagnostic output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Hide the progress bar.
    #[arg(long, global = true)]
    no_progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract every frame of a video into a directory.
    #[command(
        about = "Extract video frames and metadata.txt",
        after_help = "Examples:\n  reframe extract input.mp4 frames\n  reframe extract input.mp4 frames --ext jpg"
    )]
    Extract {
        /// Input video path.
        input: PathBuf,
        /// Output directory (created if missing).
        output_dir: PathBuf,
        /// Frame image extension (png, jpg, jpeg, bmp, tif, tiff).
        #[arg(long, default_value = "png")]
        ext: String,
    },

    /// Encode a frame directory back into a video.
    #[command(
        about = "Assemble frames into a video",
        after_help = "Examples:\n  reframe assemble frames output.mp4\n  reframe assemble frames output.avi --ext jpg"
    )]
    Assemble {
        /// Directory holding metadata.txt and frame_*.<ext> files.
        frames_dir: PathBuf,
        /// Output video path; the container follows the extension.
        output: PathBuf,
        /// Frame image extension (png, jpg, jpeg, bmp, tif, tiff).
        #[arg(long, default_value = "png")]
        ext: String,
    },

    /// Print the properties extraction would record.
    #[command(about = "Print video properties", visible_alias = "probe")]
    Info {
        /// Input video path.
        input: PathBuf,

        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Forwards progress reports onto a terminal progress bar.
struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(message: &'static str) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::no_length();
        let style = ProgressStyle::with_template(
            "{msg} {spinner:.green} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
        )?;
        bar.set_style(style.progress_chars("##-"));
        bar.set_message(message);
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn conversion_options(
    global: &GlobalOptions,
    ext: &str,
    message: &'static str,
) -> Result<(ConversionOptions, Option<Arc<TerminalProgress>>), Box<dyn std::error::Error>> {
    let format: FrameImageFormat = ext.parse()?;
    let mut options = ConversionOptions::new().with_image_format(format);

    let progress = if global.no_progress {
        None
    } else {
        let progress = Arc::new(TerminalProgress::new(message)?);
        options = options.with_progress(progress.clone());
        Some(progress)
    };

    Ok((options, progress))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level: FfmpegLogLevel = cli.global.log_level.parse()?;
    reframe::set_ffmpeg_log_level(level);

    match cli.command {
        Commands::Extract {
            input,
            output_dir,
            ext,
        } => {
            let (options, progress) =
                conversion_options(&cli.global, &ext, "Extracting frames from video")?;
            let summary = reframe::video_to_frames_with_options(&input, &output_dir, &options)?;
            if let Some(progress) = progress {
                progress.bar.finish_with_message("done");
            }

            if cli.global.verbose {
                eprintln!(
                    "source reported {} frame(s) at {:?} fps",
                    summary.metadata.total_frames.unwrap_or_default(),
                    summary.metadata.frames_per_second,
                );
            }
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Extracted {} frame(s) to {}",
                    summary.frames_written,
                    output_dir.display()
                )
                .green()
            );
        }
        Commands::Assemble {
            frames_dir,
            output,
            ext,
        } => {
            let (options, progress) =
                conversion_options(&cli.global, &ext, "Converting frames to video")?;
            let summary = reframe::frames_to_video_with_options(&frames_dir, &output, &options)?;
            if let Some(progress) = progress {
                progress.bar.finish_with_message("done");
            }

            if cli.global.verbose {
                eprintln!(
                    "encoded {}x{} at {:?} fps",
                    summary.width, summary.height, summary.frames_per_second,
                );
            }
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Wrote {} frame(s) to {}",
                    summary.frames_written,
                    output.display()
                )
                .green()
            );
        }
        Commands::Info { input, json } => {
            let reader = VideoReader::open(&input)?;
            let properties = reader.properties();
            if json {
                let payload = json!({
                    "path": input.display().to_string(),
                    "width": properties.width,
                    "height": properties.height,
                    "fps": properties.frames_per_second,
                    "frame_count": properties.frame_count,
                    "duration_seconds": properties.duration.as_secs_f64(),
                    "codec": properties.codec,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "Video: {}x{} @ {:.3} fps [{}]",
                    properties.width,
                    properties.height,
                    properties.frames_per_second,
                    properties.codec,
                );
                println!("Frames: {}", properties.frame_count);
                println!("Duration: {:?}", properties.duration);
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "reframe", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
