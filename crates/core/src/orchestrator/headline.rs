//! Headline, cover title and report text.

use std::fmt::Write;

use chrono::NaiveDate;
use tracing::warn;

use crate::content::ScrapedContent;

use super::types::RunStats;

/// The first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Format `date` with a chrono format string, falling back to ISO 8601
/// when the format is invalid.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        warn!(date_format = format, "Invalid date format, using %Y-%m-%d");
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Titles of `items` joined with `separator`, in list order.
pub fn join_titles(items: &[ScrapedContent], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

/// `"{date} {label} {generated}"`, cut to `max_chars`.
pub fn compose_headline(date: &str, label: &str, generated: &str, max_chars: usize) -> String {
    let full = format!("{} {} {}", date, label, generated.trim());
    truncate_chars(&full, max_chars)
}

/// Cover title: the second `separator` segment of the headline.
///
/// A headline without the separator falls back to the generated title.
pub fn short_title(headline: &str, separator: &str, generated: &str, max_chars: usize) -> String {
    match headline.split(separator).nth(1) {
        Some(segment) => truncate_chars(segment.trim(), max_chars),
        None => {
            warn!(
                separator,
                "Headline has no separator, using generated title for cover"
            );
            truncate_chars(generated.trim(), max_chars)
        }
    }
}

pub fn cover_subtitle(date: &str, label: &str) -> String {
    format!("{} {}", date, label)
}

pub fn cover_prompt(keywords: &str, short_title: &str) -> String {
    format!("{}, {}", keywords, short_title)
}

/// Operator-facing run summary.
pub fn format_report(stats: &RunStats, publish_status: &str) -> String {
    format!(
        "Sources: {}\nSucceeded: {}\nFailed: {}\nContents: {}\nPublish status: {}",
        stats.sources(),
        stats.success,
        stats.failed,
        stats.contents,
        publish_status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date, "%Y-%m-%d"), "2026-03-07");
        assert_eq!(format_date(date, "%d.%m.%Y"), "07.03.2026");
        assert_eq!(format_date(date, "%Q"), "2026-03-07");
    }

    #[test]
    fn test_join_titles() {
        let mut items = fixtures::items("x", 2);
        items[0].title = "Rust 2.0".to_string();
        items[1].title = "Tokio 2".to_string();
        assert_eq!(join_titles(&items, " | "), "Rust 2.0 | Tokio 2");
        assert_eq!(join_titles(&[], " | "), "");
    }

    #[test]
    fn test_headline_is_capped() {
        let generated = "A very long generated title that keeps going | and going well past the limit";
        let headline = compose_headline("2026-10-17", "Daily Digest", generated, 64);
        assert_eq!(headline.chars().count(), 64);
        assert!(headline.starts_with("2026-10-17 Daily Digest A very long"));
    }

    #[test]
    fn test_headline_counts_code_points() {
        let generated = "新闻".repeat(50);
        let headline = compose_headline("2026-10-17", "日报", &generated, 64);
        assert_eq!(headline.chars().count(), 64);
        assert!(headline.len() > 64);
    }

    #[test]
    fn test_short_headline_is_untouched() {
        let headline = compose_headline("2026-10-17", "Weekly", "  Quiet week ", 64);
        assert_eq!(headline, "2026-10-17 Weekly Quiet week");
    }

    #[test]
    fn test_short_title_takes_second_segment() {
        let headline = "2026-10-17 Daily Digest First story | Second story here | Third";
        assert_eq!(
            short_title(headline, " | ", "unused", 30),
            "Second story here"
        );
    }

    #[test]
    fn test_short_title_is_capped() {
        let headline = "d | This second segment is definitely longer than thirty";
        let title = short_title(headline, " | ", "unused", 30);
        assert_eq!(title.chars().count(), 30);
        assert_eq!(title, "This second segment is definit");
    }

    #[test]
    fn test_short_title_without_separator_uses_generated() {
        let headline = "2026-10-17 Daily Digest One big story";
        assert_eq!(
            short_title(headline, " | ", "  One big story ", 30),
            "One big story"
        );
    }

    #[test]
    fn test_cover_strings() {
        assert_eq!(cover_subtitle("2026-10-17", "Daily Digest"), "2026-10-17 Daily Digest");
        assert_eq!(cover_prompt("minimalist, bold", "Big news"), "minimalist, bold, Big news");
    }

    #[test]
    fn test_format_report() {
        let stats = RunStats {
            success: 4,
            failed: 1,
            contents: 37,
        };
        assert_eq!(
            format_report(&stats, "published"),
            "Sources: 5\nSucceeded: 4\nFailed: 1\nContents: 37\nPublish status: published"
        );
    }
}
