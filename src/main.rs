use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use lyricline::config::{self, Config};
use lyricline::lyrics::{
    self, LyricLine, ParsedLyrics, TrackInfo, find_active_index, project, timestamp,
};
use lyricline::playback::{self, LyricFollower, PlaybackClock};
use tokio::sync::watch;
use tokio::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "lyricline", version, about = "Synchronized LRC lyrics in the terminal")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a lyric file and print the timeline.
    Parse {
        file: PathBuf,
        /// Print the timeline as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show which line is active at a given time.
    Active {
        file: PathBuf,
        /// Playback position: seconds (83.5) or m:ss(.fff).
        #[arg(long, value_parser = parse_time_arg)]
        at: f64,
    },
    /// Follow a simulated playback clock and print lines as they become active.
    Follow {
        file: PathBuf,
        /// Start position: seconds or m:ss(.fff).
        #[arg(long, value_parser = parse_time_arg, default_value = "0")]
        from: f64,
        /// Playback rate.
        #[arg(long, default_value_t = 1.0)]
        rate: f64,
    },
    /// Configuration file management.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the config file location.
    Path,
    /// Print the effective configuration.
    Show,
}

fn parse_time_arg(s: &str) -> Result<f64, String> {
    timestamp::parse_clock(s)
        .or_else(|| s.trim().parse::<f64>().ok().filter(|t| t.is_finite() && *t >= 0.0))
        .ok_or_else(|| format!("invalid time `{}` (expected seconds or m:ss)", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Parse { file, json } => {
            let parsed = load_lyrics(&file, &cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed.lines[..])?);
            } else {
                print_header(&TrackInfo::from_tags(&parsed.tags, &file), &parsed);
                print_lines(&parsed.lines);
            }
        }
        Command::Active { file, at } => {
            let parsed = load_lyrics(&file, &cfg)?;
            let lookahead = cfg.resolver.lookahead();
            match find_active_index(&parsed.lines, at, &lookahead) {
                Some(i) => print_context(&parsed.lines, i),
                None if !parsed.synced => println!("Lyrics are not synchronized."),
                None => println!("No active line at {}.", timestamp::format_clock(at)),
            }
        }
        Command::Follow { file, from, rate } => {
            let parsed = load_lyrics(&file, &cfg)?;
            print_header(&TrackInfo::from_tags(&parsed.tags, &file), &parsed);
            if !parsed.synced {
                tracing::warn!("lyrics are not synchronized, nothing to follow");
                print_lines(&parsed.lines);
                return Ok(());
            }

            let follower = LyricFollower::new(
                parsed.lines.clone(),
                cfg.resolver.lookahead(),
                cfg.resolver.scroll_anticipation_secs,
            );
            // One file per run: the sender is dropped and the timeline never changes.
            let (_, timeline_rx) = watch::channel(parsed.lines.clone());
            let tick = Duration::from_millis(cfg.playback.tick_ms.max(1));

            tokio::select! {
                _ = playback::run_follow(
                    follower,
                    PlaybackClock::start_at(from, rate),
                    tick,
                    timeline_rx,
                    |lines, change| {
                        if let Some(i) = change.current {
                            print_line(&lines[i], true);
                        }
                    },
                ) => {}
                res = tokio::signal::ctrl_c() => {
                    res.context("listen for ctrl-c")?;
                    println!();
                }
            }
        }
        Command::Config { cmd } => match cmd {
            ConfigCommand::Path => {
                let path = config::resolve_path(cli.config.as_deref())?;
                println!("{}", path.display());
            }
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn load_lyrics(path: &Path, cfg: &Config) -> anyhow::Result<ParsedLyrics> {
    let raw = lyrics::read_lyrics_file(path)?;
    let parsed = ParsedLyrics::parse(&raw, &cfg.lyrics);
    tracing::debug!(
        path = %path.display(),
        lines = parsed.lines.len(),
        synced = parsed.synced,
        "loaded lyrics"
    );
    Ok(parsed)
}

fn print_header(info: &TrackInfo, parsed: &ParsedLyrics) {
    println!("{} - {} ({})", info.title, info.artist, info.album);
    if parsed.lines.is_empty() {
        println!("No lyrics available");
    }
}

fn print_lines(lines: &[LyricLine]) {
    for line in lines {
        print_line(line, false);
    }
}

fn print_line(line: &LyricLine, active: bool) {
    let marker = if active { "♪ " } else { "  " };
    let time = if line.is_timed() {
        format!("{:>6} ", timestamp::format_clock(line.time))
    } else {
        String::new()
    };
    println!("{}{}{}", marker, time, line.raw_content);
    if line.has_translation() {
        let pad = if line.is_timed() { 7 } else { 0 };
        println!("  {:pad$}{}", "", line.trans_content, pad = pad);
    }
}

/// Show the active line with one line of context on each side
fn print_context(lines: &[LyricLine], active: usize) {
    let start = active.saturating_sub(1);
    let end = (active + 2).min(lines.len());
    for row in &project(lines, Some(active))[start..end] {
        print_line(row.line, row.is_active);
    }
}
