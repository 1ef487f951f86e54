//! Interactive tag selection, as pure functions over the tag list and the
//! raw line the user typed. Reading and printing stay with the caller.

use super::Tag;

const COLUMNS: usize = 3;
const CELL_WIDTH: usize = 25;

/// Outcome of one line of selection input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the displayed list.
    Selected(usize),
    Cancelled,
    Invalid,
}

/// The tags offered for selection.
///
/// Works on a copy: sorted ascending when requested, then truncated to the
/// last `limit` (ascending) or first `limit` (descending) entries. A negative
/// `limit` shows every tag.
pub fn display_tags(tags: &[Tag], sort_ascending: bool, limit: i64) -> Vec<Tag> {
    let mut display = tags.to_vec();
    if sort_ascending {
        display.sort();
    }

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    if limit < display.len() {
        if sort_ascending {
            display.drain(..display.len() - limit);
        } else {
            display.truncate(limit);
        }
    }
    display
}

/// Renders the numbered menu, three entries per row, flagging cached tags.
pub fn format_tag_menu<F>(tags: &[Tag], is_cached: F) -> String
where
    F: Fn(&Tag) -> bool,
{
    let mut out = String::new();
    for (i, tag) in tags.iter().enumerate() {
        let flag = if is_cached(tag) { "[cached]" } else { "" };
        let cell = format!("{:3}) {} {}", i + 1, tag, flag);
        out.push_str(&format!("{:<width$}", cell, width = CELL_WIDTH));
        if (i + 1) % COLUMNS == 0 || i == tags.len() - 1 {
            out.push('\n');
        }
    }
    out
}

/// Interprets one line of input against a menu of `count` entries.
pub fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();
    if input.is_empty() {
        return Selection::Cancelled;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Selection::Selected(n - 1),
        _ => Selection::Invalid,
    }
}

/// Prompt shown after invalid input.
pub fn retry_prompt(count: usize) -> String {
    format!(
        "Please enter a number between 1 and {}, or press Enter to cancel: ",
        count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::tag::tags;

    fn names(list: &[Tag]) -> Vec<&str> {
        list.iter().map(Tag::as_str).collect()
    }

    #[test]
    fn test_display_descending_takes_first() {
        let list = tags(&["v0.4.0", "v0.3.0", "v0.2.0", "v0.1.0"]);
        assert_eq!(
            names(&display_tags(&list, false, 2)),
            vec!["v0.4.0", "v0.3.0"]
        );
    }

    #[test]
    fn test_display_ascending_takes_last() {
        let list = tags(&["v0.4.0", "v0.3.0", "v0.2.0", "v0.1.0"]);
        assert_eq!(
            names(&display_tags(&list, true, 2)),
            vec!["v0.3.0", "v0.4.0"]
        );
        // Input is untouched
        assert_eq!(list[0].as_str(), "v0.4.0");
    }

    #[test]
    fn test_display_negative_or_large_limit_shows_all() {
        let list = tags(&["v0.2.0", "v0.1.0"]);
        assert_eq!(display_tags(&list, false, -1).len(), 2);
        assert_eq!(display_tags(&list, true, 100).len(), 2);
    }

    #[test]
    fn test_format_menu_columns_and_flags() {
        let list = tags(&["v0.4.0", "v0.3.0", "v0.2.0", "v0.1.0"]);
        let menu = format_tag_menu(&list, |t| t.as_str() == "v0.3.0");
        let lines: Vec<&str> = menu.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!(
                "{:<25}{:<25}{:<25}",
                "  1) v0.4.0 ", "  2) v0.3.0 [cached]", "  3) v0.2.0 "
            )
        );
        assert_eq!(lines[1], format!("{:<25}", "  4) v0.1.0 "));
        assert!(menu.ends_with('\n'));
    }

    #[test]
    fn test_format_menu_empty() {
        assert_eq!(format_tag_menu(&[], |_| false), "");
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("", 3), Selection::Cancelled);
        assert_eq!(parse_selection("  ", 3), Selection::Cancelled);
        assert_eq!(parse_selection("1", 3), Selection::Selected(0));
        assert_eq!(parse_selection(" 3 ", 3), Selection::Selected(2));
        assert_eq!(parse_selection("0", 3), Selection::Invalid);
        assert_eq!(parse_selection("4", 3), Selection::Invalid);
        assert_eq!(parse_selection("abc", 3), Selection::Invalid);
        assert_eq!(parse_selection("-1", 3), Selection::Invalid);
    }

    #[test]
    fn test_retry_prompt() {
        assert_eq!(
            retry_prompt(30),
            "Please enter a number between 1 and 30, or press Enter to cancel: "
        );
    }
}
