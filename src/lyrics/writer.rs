//! Turn a timeline back into LRC text.

use super::model::LyricLine;
use super::timestamp::format_tag;

/// Render lines as LRC. Translations become a second line with the same tag;
/// untimed lines are written as plain text.
pub fn to_lrc(lines: &[LyricLine]) -> String {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        if !line.is_timed() {
            out.push(line.raw_content.clone());
            continue;
        }

        let tag = format_tag(line.time);
        out.push(format!("{}{}", tag, line.raw_content));
        if line.has_translation() {
            out.push(format!("{}{}", tag, line.trans_content));
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::model::ParseOptions;
    use crate::lyrics::parser::parse;

    #[test]
    fn test_to_lrc() {
        let lines = vec![
            LyricLine::timed(0, 12.34, "First".to_string(), "Premier".to_string()),
            LyricLine::timed(1, 25.0, String::new(), String::new()),
            LyricLine::timed(2, 83.678, "Second".to_string(), String::new()),
        ];
        assert_eq!(
            to_lrc(&lines),
            "[00:12.34]First\n[00:12.34]Premier\n[00:25.00]\n[01:23.678]Second"
        );
    }

    #[test]
    fn test_untimed_as_plain_text() {
        let lines = vec![
            LyricLine::untimed("a".to_string()),
            LyricLine::untimed("b".to_string()),
        ];
        assert_eq!(to_lrc(&lines), "a\nb");
    }

    #[test]
    fn test_reparse_is_stable() {
        let options = ParseOptions::default();
        let source = "[00:25.67]Second <00:26.00>line\n[00:12.34][00:40.5]First\n\
                      [00:12.34]Translation\n[00:30.00]\n[00:31.00]\n[01:02.005]Late";
        let first = parse(source, &options);
        let second = parse(&to_lrc(&first), &options);
        assert_eq!(first, second);
    }
}
