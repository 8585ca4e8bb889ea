//! URL slug derivation.

/// Derive a URL slug from a display name.
///
/// Lowercases, maps runs of non-alphanumeric characters to single hyphens,
/// and trims leading/trailing hyphens.
///
/// ```
/// use dandeline_core::slugify;
///
/// assert_eq!(slugify("Spring Bouquet"), "spring-bouquet");
/// assert_eq!(slugify("  Mother's Day -- Special!  "), "mother-s-day-special");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true; // suppress a leading hyphen

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Append an incrementing numeric suffix to a base slug.
///
/// Used to disambiguate slug collisions: `spring-bouquet` becomes
/// `spring-bouquet-2`, `spring-bouquet-3`, and so on.
#[must_use]
pub fn with_suffix(base: &str, n: u32) -> String {
    format!("{base}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Spring Bouquet"), "spring-bouquet");
        assert_eq!(slugify("Imported from Stripe"), "imported-from-stripe");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Roses & Lilies"), "roses-lilies");
        assert_eq!(slugify("What's  New?"), "what-s-new");
    }

    #[test]
    fn test_slugify_trims_hyphens() {
        assert_eq!(slugify("  -- Hello --  "), "hello");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("spring-bouquet", 2), "spring-bouquet-2");
    }
}
