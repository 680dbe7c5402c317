//! Phone number normalization for the messaging gateway.
//!
//! The gateway only accepts canonical addresses: bare digits starting with
//! the country prefix. Free-text input arrives with separators, a leading
//! `+`, or the domestic trunk `0`.

/// Domestic country prefix the gateway expects.
pub const COUNTRY_PREFIX: &str = "62";

/// Normalize free-text phone input into a canonical gateway address.
///
/// Returns the canonical digit string, or an empty string when the input
/// cannot be normalized (callers must not send in that case). Idempotent:
/// an already-canonical address passes through unchanged.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if let Some(rest) = cleaned.strip_prefix('+') {
        if rest.starts_with(COUNTRY_PREFIX) {
            rest.to_string()
        } else {
            format!("{}{}", COUNTRY_PREFIX, rest)
        }
    } else if let Some(rest) = cleaned.strip_prefix('0') {
        format!("{}{}", COUNTRY_PREFIX, rest)
    } else if cleaned.starts_with(COUNTRY_PREFIX) {
        cleaned
    } else {
        String::new()
    }
}
