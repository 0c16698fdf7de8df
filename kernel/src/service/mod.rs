pub mod catalog;
pub mod guard;
pub mod identity;
pub mod profile;
pub mod reservation;

/// Trimmed value, or `None` when nothing but whitespace was sent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
