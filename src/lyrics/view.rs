use super::model::LyricLine;

/// A lyric line as a view sees it for one active index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderLine<'a> {
    pub line: &'a LyricLine,
    pub is_active: bool,
    pub is_past: bool,
    /// Lines between this one and the active line; positive above it.
    pub distance: Option<isize>,
}

/// Derive per-line highlight state. The timeline itself is never touched.
pub fn project(lines: &[LyricLine], active: Option<usize>) -> Vec<RenderLine<'_>> {
    lines
        .iter()
        .enumerate()
        .map(|(position, line)| RenderLine {
            line,
            is_active: active == Some(position),
            is_past: active.is_some_and(|a| position < a),
            distance: active.map(|a| a as isize - position as isize),
        })
        .collect()
}

/// Where playback should jump when a line is selected
pub fn seek_target(line: &LyricLine) -> Option<f64> {
    line.is_timed().then_some(line.time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<LyricLine> {
        (0..4)
            .map(|i| LyricLine::timed(i, i as f64 * 10.0, format!("Line {}", i), String::new()))
            .collect()
    }

    #[test]
    fn test_project_flags() {
        let lines = lines();
        let view = project(&lines, Some(2));
        assert_eq!(view.len(), 4);
        assert_eq!(
            view.iter().map(|r| r.is_past).collect::<Vec<_>>(),
            vec![true, true, false, false]
        );
        assert_eq!(
            view.iter().map(|r| r.is_active).collect::<Vec<_>>(),
            vec![false, false, true, false]
        );
        assert_eq!(view[0].distance, Some(2));
        assert_eq!(view[3].distance, Some(-1));
        assert!(std::ptr::eq(view[1].line, &lines[1]));
    }

    #[test]
    fn test_project_without_active_line() {
        let lines = lines();
        let view = project(&lines, None);
        assert!(view.iter().all(|r| !r.is_active && !r.is_past && r.distance.is_none()));
    }

    #[test]
    fn test_seek_target() {
        let timed = LyricLine::timed(0, 12.5, "x".to_string(), String::new());
        let untimed = LyricLine::untimed("y".to_string());
        assert_eq!(seek_target(&timed), Some(12.5));
        assert_eq!(seek_target(&untimed), None);
    }
}
