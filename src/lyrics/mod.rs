//! Lyrics module for parsing and following synchronized lyrics
//!
//! This module provides:
//! - LRC format parser producing an immutable timeline
//! - Active line resolution against a playback clock
//! - Highlight projection and LRC reconstruction

pub mod model;
pub mod parser;
pub mod resolver;
pub mod timestamp;
pub mod view;
pub mod writer;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

pub use model::{LyricLine, ParseOptions};
pub use parser::{LrcTags, parse, read_tags};
pub use resolver::{Lookahead, find_active_index, has_timed_lines, scroll_target};
pub use view::{RenderLine, project, seek_target};
pub use writer::to_lrc;

/// Parsed lyrics with metadata
#[derive(Debug, Clone)]
pub struct ParsedLyrics {
    /// Timeline shared with whoever follows playback
    pub lines: Arc<[LyricLine]>,
    /// Header tags
    pub tags: LrcTags,
    /// Whether the lyrics are synchronized
    pub synced: bool,
}

impl ParsedLyrics {
    pub fn parse(raw: &str, options: &ParseOptions) -> Self {
        let lines: Arc<[LyricLine]> = parse(raw, options).into();
        let synced = has_timed_lines(&lines);
        Self {
            lines,
            tags: read_tags(raw),
            synced,
        }
    }
}

/// Display metadata for a lyric source, filled in best-effort
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl TrackInfo {
    pub fn from_tags(tags: &LrcTags, source: &Path) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown Title".to_string());
        Self {
            title: tags.title.clone().unwrap_or(stem),
            artist: tags
                .artist
                .clone()
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            album: tags
                .album
                .clone()
                .unwrap_or_else(|| "Unknown Album".to_string()),
        }
    }
}

/// Read a lyric file. Invalid UTF-8 is replaced rather than rejected.
pub fn read_lyrics_file(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string())
}
