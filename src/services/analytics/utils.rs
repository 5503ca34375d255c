use once_cell::sync::Lazy;
use regex::Regex;
use crate::models::CellValue;

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("valid year pattern"));

/// Shared numeric parse used by every pass. Null, blank and non-numeric text all yield `None`;
/// so do non-finite values.
pub fn try_parse_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Null => None,
        CellValue::Number(n) => n.is_finite().then_some(*n),
        CellValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
    }
}

/// Numeric cells are taken as-is (whole numbers only); text yields its first four-digit run.
pub fn extract_year(value: &CellValue) -> Option<i64> {
    match value {
        CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
        CellValue::Number(_) | CellValue::Null => None,
        CellValue::Text(s) => YEAR_PATTERN
            .find(s)
            .and_then(|m| m.as_str().parse::<i64>().ok()),
    }
}

/// Case-insensitive substring match of `name` against any keyword.
pub fn matches_any_keyword(name: &str, keywords: &[&str]) -> bool {
    let lowered = name.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

/// Cell rendered as text; `None` for null or empty text.
pub fn text_value(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Null => None,
        CellValue::Text(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}
