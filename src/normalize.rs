//! Text normalization for scraped listing fields
//!
//! Everything in this module is a pure, total function: malformed or short
//! input never errors, it just yields the sentinel value or fewer populated
//! fields.

/// Sentinel price for values that could not be normalized.
pub const UNKNOWN_PRICE: &str = "Unknown";

/// Characters that terminate the numeric part of a raw price string.
const PRICE_TERMINATORS: &[char] = &[',', '€', '$', '£'];

/// Administrative subdivision derived from a listing's raw location string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdministrativeArea {
    pub district: Option<String>,
    pub county: Option<String>,
    pub parish: Option<String>,
}

/// Normalizes a raw price string to its leading numeric segment.
///
/// The source formats prices like `"350.000€"` or `"1,200,000 $"`; the
/// normalized value is everything strictly before the first currency symbol
/// or comma. A string without any terminator, an empty string, or a prefix
/// that carries no digit all normalize to [`UNKNOWN_PRICE`].
///
/// # Examples
///
/// ```
/// use casafeed::normalize::normalize_price;
///
/// assert_eq!(normalize_price("350.000€"), "350.000");
/// assert_eq!(normalize_price(""), "Unknown");
/// ```
pub fn normalize_price(raw: &str) -> String {
    let prefix = match raw.find(PRICE_TERMINATORS) {
        Some(idx) => &raw[..idx],
        None => return UNKNOWN_PRICE.to_string(),
    };

    if prefix.chars().any(|c| c.is_ascii_digit()) {
        prefix.to_string()
    } else {
        UNKNOWN_PRICE.to_string()
    }
}

/// Splits a raw concatenated location string into district, county and
/// parish.
///
/// The source concatenates administrative levels into one comma-separated
/// string, each segment optionally annotated with a parenthesized level
/// marker, e.g. `"Rua X, Lisboa (distrito), Sintra (concelho), Agualva"`.
/// The first segment is the street-level text and is skipped; segments two
/// through four map to district, county and parish. Each value is the
/// segment with leading whitespace removed, cut before the first `(`.
///
/// A string with fewer than 2 comma segments yields no district, fewer than
/// 3 no county, fewer than 4 no parish.
pub fn split_administrative(raw: &str) -> AdministrativeArea {
    let segments: Vec<&str> = raw.split(',').collect();

    AdministrativeArea {
        district: segments.get(1).map(|s| before_parenthesis(s)),
        county: segments.get(2).map(|s| before_parenthesis(s)),
        parish: segments.get(3).map(|s| before_parenthesis(s)),
    }
}

fn before_parenthesis(segment: &str) -> String {
    let trimmed = segment.trim_start();
    match trimmed.find('(') {
        Some(idx) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}
