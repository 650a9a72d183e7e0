//! LRC format parser
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:12.34] Bonjour le monde
//! [00:15.00][00:42.00] Chorus line
//!
//! Lines sharing a timestamp become an original + translation pair. Input
//! with no usable timestamp falls back to untimed plain text.

use super::model::{LyricLine, ParseOptions};
use super::timestamp::{strip_inline_tags, take_leading_tag};

/// One timestamp occurrence before pairing
#[derive(Debug, Clone)]
struct RawEntry {
    time: f64,
    content: String,
}

/// Parse LRC text into a timeline. Never fails; see module docs for the fallback.
pub fn parse(raw: &str, options: &ParseOptions) -> Vec<LyricLine> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let source_lines: Vec<&str> = raw.split(['\r', '\n']).filter(|l| !l.is_empty()).collect();

    let mut entries = collect_entries(&source_lines);
    entries.sort_by(|a, b| a.time.total_cmp(&b.time));

    let lines = normalize(&entries, options);
    if !lines.is_empty() {
        tracing::debug!(
            entries = entries.len(),
            lines = lines.len(),
            "parsed timed lyrics"
        );
        return lines;
    }

    let lines = fallback(&source_lines);
    if !lines.is_empty() {
        tracing::debug!(lines = lines.len(), "no timestamps found, using plain text");
    }
    lines
}

/// Extract one entry per leading timestamp of every line.
fn collect_entries(source_lines: &[&str]) -> Vec<RawEntry> {
    let mut entries = Vec::new();

    for line in source_lines {
        let mut rest = line.trim_start();
        let mut times = Vec::new();
        while let Some((time, after)) = take_leading_tag(rest) {
            times.push(time);
            rest = after;
        }

        if times.is_empty() {
            continue;
        }

        let content = strip_inline_tags(rest).trim().to_string();
        entries.extend(times.into_iter().map(|time| RawEntry {
            time,
            content: content.clone(),
        }));
    }

    entries
}

/// Pair translations and collapse empty runs. `entries` must be sorted by time.
fn normalize(entries: &[RawEntry], options: &ParseOptions) -> Vec<LyricLine> {
    let mut lines = Vec::new();
    let mut i = 0;

    while i < entries.len() {
        let current = &entries[i];

        if current.content.is_empty() {
            let run_end = entries[i..]
                .iter()
                .position(|e| !e.content.is_empty())
                .map_or(entries.len(), |offset| i + offset);

            // A trailing run has no following line and is always kept.
            let too_short = options.ignore_short_empty_lines
                && entries.get(run_end).is_some_and(|next| {
                    next.time - current.time < options.min_empty_line_duration
                });

            if !too_short {
                lines.push(LyricLine::timed(
                    lines.len(),
                    current.time,
                    String::new(),
                    String::new(),
                ));
            }
            i = run_end;
            continue;
        }

        match entries.get(i + 1) {
            Some(next) if next.time == current.time && !next.content.is_empty() => {
                lines.push(LyricLine::timed(
                    lines.len(),
                    current.time,
                    current.content.clone(),
                    next.content.clone(),
                ));
                i += 2;
            }
            _ => {
                lines.push(LyricLine::timed(
                    lines.len(),
                    current.time,
                    current.content.clone(),
                    String::new(),
                ));
                i += 1;
            }
        }
    }

    lines
}

/// Plain-text rendition used when nothing carried a timestamp.
fn fallback(source_lines: &[&str]) -> Vec<LyricLine> {
    let texts: Vec<String> = source_lines
        .iter()
        .map(|line| strip_inline_tags(line.trim()).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    match texts.len() {
        0 => Vec::new(),
        1 => texts
            .into_iter()
            .map(|text| LyricLine::timed(0, 0.0, text, String::new()))
            .collect(),
        _ => texts.into_iter().map(LyricLine::untimed).collect(),
    }
}

/// ID tags found in the LRC header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LrcTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub author: Option<String>,
}

/// Read `[ti:...]`, `[ar:...]`, `[al:...]` and `[by:...]` header tags.
pub fn read_tags(raw: &str) -> LrcTags {
    let mut tags = LrcTags::default();

    for line in raw.lines() {
        let Some((tag, value)) = parse_id_tag(line.trim()) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        let slot = match tag.to_ascii_lowercase().as_str() {
            "ti" => &mut tags.title,
            "ar" => &mut tags.artist,
            "al" => &mut tags.album,
            "by" => &mut tags.author,
            _ => continue,
        };
        slot.get_or_insert_with(|| value.to_string());
    }

    tags
}

/// Parse an ID tag like [ti:Title]
fn parse_id_tag(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let (tag, value) = inner.split_once(':')?;

    // ID tags are 2-3 letters, which never collides with a timestamp
    if (2..=3).contains(&tag.len()) && tag.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some((tag, value.trim()));
    }

    None
}
