use serde::{Deserialize, Serialize};

/// Sentinel used for `index` and `time` of lines without timing information.
pub const UNTIMED: i32 = -1;

/// A single line of the lyric timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    /// Position in the timeline, or `-1` for untimed lines
    pub index: i32,
    /// Seconds from start of track, or `-1.0` for untimed lines
    pub time: f64,
    /// Primary-language text
    pub raw_content: String,
    /// Translation sharing the same timestamp
    pub trans_content: String,
}

impl LyricLine {
    pub fn timed(index: usize, time: f64, raw_content: String, trans_content: String) -> Self {
        Self {
            index: index as i32,
            time,
            raw_content,
            trans_content,
        }
    }

    pub fn untimed(raw_content: String) -> Self {
        Self {
            index: UNTIMED,
            time: UNTIMED as f64,
            raw_content,
            trans_content: String::new(),
        }
    }

    pub fn is_timed(&self) -> bool {
        self.time >= 0.0
    }

    pub fn has_translation(&self) -> bool {
        !self.trans_content.is_empty()
    }
}

/// Knobs for the empty-line handling of the parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Drop runs of empty lines that last less than `min_empty_line_duration`.
    pub ignore_short_empty_lines: bool,
    /// Seconds.
    pub min_empty_line_duration: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            ignore_short_empty_lines: false,
            min_empty_line_duration: 1.0,
        }
    }
}
