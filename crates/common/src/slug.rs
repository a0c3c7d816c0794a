//! URL slug helpers

use regex_lite::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;
use validator::ValidationError;

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static pattern"))
}

/// Derive a slug from free text: lowercase ASCII, runs of anything else become `-`.
pub fn slugify(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_ascii_lowercase();
    non_alphanumeric()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Slugs that would shadow a static route segment (`/categories/id/{id}`)
pub const RESERVED_SLUGS: &[&str] = &["id"];

/// `true` when `slug` is lowercase ASCII words joined by single dashes and not reserved
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !RESERVED_SLUGS.contains(&slug)
        && slug
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
}

/// `validator` hook for slug fields
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some(if RESERVED_SLUGS.contains(&slug) {
            "is reserved".into()
        } else {
            "must be lowercase letters and digits separated by single dashes".into()
        });
        Err(err)
    }
}

/// Longest slug accepted
pub const MAX_SLUG_LEN: usize = 200;

/// Use the supplied slug when present, otherwise derive one from `source`
/// (cut to `MAX_SLUG_LEN`). `None` when nothing usable or only a reserved slug results.
pub fn resolve_slug(explicit: Option<&str>, source: &str) -> Option<String> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => {
            let mut derived = slugify(source);
            derived.truncate(MAX_SLUG_LEN);
            derived.trim_end_matches('-').to_string()
        }
    };
    if slug.is_empty() || RESERVED_SLUGS.contains(&slug.as_str()) {
        None
    } else {
        Some(slug)
    }
}
