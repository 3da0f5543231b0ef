use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use ytcaption_core::{
    CancellationToken, Caption, Downloader, Options, OutputFormat, VideoId, save_caption,
};

/// CLI wrapper for OutputFormat (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliFormat {
    #[default]
    Srt,
    Vtt,
    Txt,
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Srt => OutputFormat::Srt,
            CliFormat::Vtt => OutputFormat::Vtt,
            CliFormat::Txt => OutputFormat::Text,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "ytcaption")]
#[command(about = "Download YouTube captions as SRT, WebVTT, plain text or JSON")]
struct Cli {
    /// Video id or URL
    video: String,

    /// Caption language (e.g., "en", "de", "ja")
    #[arg(short, long, default_value = "en")]
    lang: String,

    /// Caption kind: "asr" for auto-generated, anything else for authored tracks
    #[arg(short, long, default_value = "asr")]
    kind: String,

    /// Output format
    #[arg(short, long, default_value = "srt")]
    format: CliFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List available caption tracks and exit
    #[arg(long)]
    list: bool,

    /// Overall deadline in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Retry budget; each unit allows ten seconds of backoff
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Override the User-Agent header
    #[arg(long)]
    user_agent: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn format_duration(d: Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    // RUST_LOG wins when set
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "ytcaption=debug,ytcaption_core=debug".to_string()
        } else {
            "ytcaption=warn,ytcaption_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();
}

fn options_from(cli: &Cli) -> Options {
    let mut options = Options::default()
        .with_language(&cli.lang)
        .with_kind(&cli.kind)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_max_retries(cli.max_retries);
    if let Some(ua) = &cli.user_agent {
        options = options.with_user_agent(ua);
    }
    options
}

fn spawn_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

async fn list_tracks(downloader: &Downloader, video_id: &VideoId) -> Result<()> {
    let spinner = create_spinner("Fetching caption tracks...");
    let tracks = downloader.tracks(video_id.as_str()).await;
    spinner.finish_and_clear();

    let tracks = tracks?;
    println!(
        "{} {} caption track(s) for {}",
        style("✓").green().bold(),
        tracks.len(),
        style(video_id).cyan()
    );
    for (i, track) in tracks.iter().enumerate() {
        println!("{:>3}. {}", i + 1, track);
    }
    Ok(())
}

async fn fetch(downloader: &Downloader, video_id: &VideoId) -> Result<Caption> {
    let step_start = Instant::now();
    let spinner = create_spinner("Downloading captions...");
    let caption = downloader.download(video_id.as_str()).await;

    match &caption {
        Ok(c) => spinner.finish_with_message(format!(
            "{} Downloaded {} caption events {}",
            style("✓").green().bold(),
            c.events.len(),
            style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
        )),
        Err(_) => spinner.finish_and_clear(),
    }

    Ok(caption?)
}

async fn run(cli: Cli) -> Result<()> {
    let video_id = VideoId::from_input(&cli.video)?;
    debug!(input = %cli.video, video_id = %video_id, "resolved video id");
    let cancel = CancellationToken::new();
    spawn_ctrl_c(cancel.clone());

    let downloader = Downloader::new(options_from(&cli)).with_cancellation(cancel);

    if cli.list {
        return list_tracks(&downloader, &video_id).await;
    }

    let caption = fetch(&downloader, &video_id).await?;
    let format: OutputFormat = cli.format.into();

    match &cli.output {
        Some(path) => {
            save_caption(&caption, path, format).await?;
            eprintln!(
                "{} {}",
                style("Saved:").dim(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", format.render(&caption)?),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
