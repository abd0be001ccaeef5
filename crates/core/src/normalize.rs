//! Input normalization
//!
//! Every categorical field goes through [`normalize`] before table lookup,
//! and free text goes through it before pattern matching. CRM dropdowns and
//! chatbot payloads arrive with inconsistent casing and stray whitespace, so
//! matching is only defined over the normalized form.

/// Normalize a raw input value: trim, lowercase, collapse internal
/// whitespace to single spaces. `None` is treated as the empty string and
/// never panics.
///
/// Idempotent: `normalize(Some(&normalize(x))) == normalize(x)`.
pub fn normalize(raw: Option<&str>) -> String {
    match raw {
        Some(s) => s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
        None => String::new(),
    }
}
