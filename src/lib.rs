//! Lyric timeline core: LRC parsing, active line resolution and playback following.

pub mod config;
pub mod lyrics;
pub mod playback;
