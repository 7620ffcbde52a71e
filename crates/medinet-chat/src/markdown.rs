//! Inline markdown for AI message lines.
//!
//! A single lexical pass, not a parser: `**bold**`, `*italic*` and runs of
//! star-rating glyphs are recognized, and `•` splits a line into bullets.
//! Anything unmatched, including nested or unclosed markers, stays literal.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Bullet glyph that splits a line into list items.
pub const BULLET: char = '•';

// Alternation order is the match priority.
static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|([★☆⭐]+)").expect("Invalid inline markdown regex")
});

/// One styled run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Bold(String),
    Italic(String),
    Stars(String),
    /// Rendered bullet marker preceding a list item.
    Bullet,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Text(s) | Fragment::Bold(s) | Fragment::Italic(s) | Fragment::Stars(s) => {
                f.write_str(s)
            }
            Fragment::Bullet => write!(f, "{} ", BULLET),
        }
    }
}

/// Render one line into fragments, preserving text order and whitespace.
pub fn render_line(line: &str) -> Vec<Fragment> {
    if !line.contains(BULLET) {
        return render_inline(line);
    }

    let mut segments = line.split(BULLET);
    let mut fragments = segments.next().map(render_inline).unwrap_or_default();
    for segment in segments {
        fragments.push(Fragment::Bullet);
        fragments.extend(render_inline(segment));
    }
    fragments
}

/// Render a whole message, one fragment list per line.
pub fn render_message(text: &str) -> Vec<Vec<Fragment>> {
    text.lines().map(render_line).collect()
}

/// Fragments flattened back to plain text, markers removed.
pub fn plain_text(fragments: &[Fragment]) -> String {
    fragments.iter().map(ToString::to_string).collect()
}

fn render_inline(text: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            fragments.push(Fragment::Text(text[last..whole.start()].to_string()));
        }
        let fragment = if let Some(m) = caps.get(1) {
            Fragment::Bold(m.as_str().to_string())
        } else if let Some(m) = caps.get(2) {
            Fragment::Italic(m.as_str().to_string())
        } else {
            Fragment::Stars(whole.as_str().to_string())
        };
        fragments.push(fragment);
        last = whole.end();
    }

    if last < text.len() {
        fragments.push(Fragment::Text(text[last..].to_string()));
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Fragment {
        Fragment::Text(s.to_string())
    }

    #[test]
    fn test_plain_line() {
        assert_eq!(render_line("just words"), vec![text("just words")]);
        assert!(render_line("").is_empty());
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            render_line("Visit **Gleneagles** for *cardiology* care"),
            vec![
                text("Visit "),
                Fragment::Bold("Gleneagles".to_string()),
                text(" for "),
                Fragment::Italic("cardiology".to_string()),
                text(" care"),
            ]
        );
    }

    #[test]
    fn test_bold_takes_priority_over_italic() {
        assert_eq!(
            render_line("**x**"),
            vec![Fragment::Bold("x".to_string())]
        );
    }

    #[test]
    fn test_star_rating_run() {
        assert_eq!(
            render_line("Rating: ★★★★☆ (4.2)"),
            vec![
                text("Rating: "),
                Fragment::Stars("★★★★☆".to_string()),
                text(" (4.2)"),
            ]
        );
        assert_eq!(
            render_line("⭐ 4.8"),
            vec![Fragment::Stars("⭐".to_string()), text(" 4.8")]
        );
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        assert_eq!(render_line("**unclosed"), vec![text("**unclosed")]);
        assert_eq!(render_line("a * b"), vec![text("a * b")]);
        assert_eq!(render_line("**"), vec![text("**")]);
    }

    #[test]
    fn test_bullets_split_line() {
        assert_eq!(
            render_line("Options: • **A** • B"),
            vec![
                text("Options: "),
                Fragment::Bullet,
                text(" "),
                Fragment::Bold("A".to_string()),
                text(" "),
                Fragment::Bullet,
                text(" B"),
            ]
        );
    }

    #[test]
    fn test_leading_bullet() {
        assert_eq!(
            render_line("• first"),
            vec![Fragment::Bullet, text(" first")]
        );
    }

    #[test]
    fn test_render_message_lines() {
        let lines = render_message("Line **one**\nLine two");
        assert_eq!(lines.len(), 2);
        assert_eq!(plain_text(&lines[0]), "Line one");
        assert_eq!(plain_text(&lines[1]), "Line two");
    }

    #[test]
    fn test_plain_text_preserves_order() {
        let line = "A *b* ★★ c";
        assert_eq!(plain_text(&render_line(line)), line.replace('*', ""));
    }
}
