// src/score.rs
use regex::Regex;
use serde::Serialize;
use std::num::IntErrorKind;
use std::sync::LazyLock;

pub const MAX_SCORE: u8 = 100;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// Extracts a score from whatever text the model sent back.
///
/// Every non-digit character is dropped before parsing, so surrounding prose
/// and punctuation are tolerated. The minus sign goes with them: `"-5"` reads
/// as `5`. Nothing left to parse gives `0`; a digit run too long for `i64`
/// saturates.
pub fn parse_score(text: &str) -> i64 {
    let digits = NON_DIGITS.replace_all(text, "");
    match digits.parse::<i64>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        Err(_) => 0,
    }
}

/// Clamps any integer into `0..=100`.
pub fn clamp_score(value: i64) -> u8 {
    value.clamp(0, MAX_SCORE as i64) as u8
}

/// Visual properties of the score bar. Derived from the score on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarStyle {
    pub width_percent: u8,
    pub background: String,
    pub min_width_px: u8,
    pub show_label: bool,
}

impl BarStyle {
    pub fn for_score(score: u8) -> Self {
        let score = score.min(MAX_SCORE);
        // red to orange below the midpoint, orange to green above it
        let background = if score < 50 {
            format!("linear-gradient(90deg, #ef4444 0%, #f97316 {}%)", u32::from(score) * 2)
        } else {
            format!("linear-gradient(90deg, #f97316 0%, #10b981 {}%)", u32::from(score - 50) * 2)
        };

        Self {
            width_percent: score,
            background,
            min_width_px: 20,
            show_label: score > 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_stays_in_range() {
        for n in [i64::MIN, -1000, -1, 0, 1, 50, 99, 100, 101, 5000, i64::MAX] {
            let clamped = clamp_score(n);
            assert!(clamped <= 100, "{} clamped to {}", n, clamped);
        }
        assert_eq!(clamp_score(-1), 0);
        assert_eq!(clamp_score(101), 100);
    }

    #[test]
    fn test_clamp_is_identity_in_range() {
        for n in 0..=100i64 {
            assert_eq!(clamp_score(n) as i64, n);
        }
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("87%"), 87);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score("-5"), 5);
        assert_eq!(parse_score("73"), 73);
        assert_eq!(parse_score("Score: 42.\n"), 42);
        assert_eq!(parse_score("  **100**  "), 100);
    }

    #[test]
    fn test_parse_joins_digit_groups() {
        // digits from separate numbers are concatenated, not summed
        assert_eq!(parse_score("8 out of 10"), 810);
        assert_eq!(clamp_score(parse_score("8 out of 10")), 100);
    }

    #[test]
    fn test_parse_ignores_non_ascii_digits() {
        assert_eq!(parse_score("٣٤"), 0);
    }

    #[test]
    fn test_parse_saturates_on_overflow() {
        let huge = "9".repeat(40);
        assert_eq!(parse_score(&huge), i64::MAX);
        assert_eq!(clamp_score(parse_score(&huge)), 100);
    }

    #[test]
    fn test_bar_style_low_score() {
        let style = BarStyle::for_score(25);
        assert_eq!(style.width_percent, 25);
        assert_eq!(style.background, "linear-gradient(90deg, #ef4444 0%, #f97316 50%)");
        assert_eq!(style.min_width_px, 20);
        assert!(style.show_label);
    }

    #[test]
    fn test_bar_style_high_score() {
        let style = BarStyle::for_score(75);
        assert_eq!(style.background, "linear-gradient(90deg, #f97316 0%, #10b981 50%)");

        let full = BarStyle::for_score(100);
        assert_eq!(full.background, "linear-gradient(90deg, #f97316 0%, #10b981 100%)");

        let mid = BarStyle::for_score(50);
        assert_eq!(mid.background, "linear-gradient(90deg, #f97316 0%, #10b981 0%)");
    }

    #[test]
    fn test_bar_label_hidden_for_small_scores() {
        assert!(!BarStyle::for_score(0).show_label);
        assert!(!BarStyle::for_score(10).show_label);
        assert!(BarStyle::for_score(11).show_label);
    }
}
