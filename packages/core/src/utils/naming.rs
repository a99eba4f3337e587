//! Registry key normalization
//!
//! Component and field names arrive lower-snake or kebab cased from the CMS
//! (`hero_section`, `call-to-action`). Registry keys are stored in StudlyCase
//! so `hero_section`, `hero-section` and `HeroSection` all address the same
//! binding.

/// Convert a component or field name to StudlyCase.
///
/// Underscores, hyphens, dots and whitespace are word separators. The first
/// letter of each word is upper-cased, the rest of the word is kept as-is so
/// an already studly name round-trips unchanged.
///
/// # Examples
///
/// ```
/// use blokspace_core::utils::studly_case;
///
/// assert_eq!(studly_case("hero_section"), "HeroSection");
/// assert_eq!(studly_case("call-to-action"), "CallToAction");
/// assert_eq!(studly_case("HeroSection"), "HeroSection");
/// ```
pub fn studly_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Build the compound `"{component}_{field}"` lookup name used by the
/// classifier's second rule.
pub fn compound_field_name(component: &str, field: &str) -> String {
    format!("{}_{}", component, field)
}
