use crate::license::spdx::classify_id;
use crate::models::{LicenseRisk, UNCLASSIFIED_LICENSE, UNKNOWN_LICENSE};

/// Risk family of a resolved license label.
///
/// Handles:
/// - the resolution sentinels and `Custom` → Unknown
/// - `Modified <id>` → the family of `<id>`
/// - `OR` expressions (and `/`) → most permissive component
/// - `AND` expressions → most restrictive component
/// - SPDX identifiers and registry classifier names via [`classify_id`]
pub fn classify(license_type: &str) -> LicenseRisk {
    let trimmed = license_type.trim();
    if trimmed.is_empty()
        || trimmed == UNKNOWN_LICENSE
        || trimmed == UNCLASSIFIED_LICENSE
        || trimmed.eq_ignore_ascii_case("unknown")
        || trimmed.eq_ignore_ascii_case("custom")
    {
        return LicenseRisk::Unknown;
    }

    let base = trimmed.strip_prefix("Modified ").unwrap_or(trimmed);
    let normalized = base.replace(['(', ')'], " ").replace('/', " OR ");

    if normalized.contains(" OR ") {
        return most_permissive(normalized.split(" OR ").map(classify_expression_part));
    }
    if normalized.contains(" AND ") {
        return most_restrictive(normalized.split(" AND ").map(classify_expression_part));
    }
    classify_id(&normalized)
}

fn classify_expression_part(part: &str) -> LicenseRisk {
    if part.contains(" AND ") {
        most_restrictive(part.split(" AND ").map(classify_id))
    } else {
        classify_id(part)
    }
}

/// Lower is more permissive.
fn rank(risk: LicenseRisk) -> u8 {
    match risk {
        LicenseRisk::Permissive => 0,
        LicenseRisk::WeakCopyleft => 1,
        LicenseRisk::StrongCopyleft => 2,
        LicenseRisk::Proprietary => 3,
        LicenseRisk::Unknown => 4,
    }
}

fn most_permissive(risks: impl Iterator<Item = LicenseRisk>) -> LicenseRisk {
    risks.min_by_key(|r| rank(*r)).unwrap_or(LicenseRisk::Unknown)
}

/// An unknown component makes the whole conjunction unknown.
fn most_restrictive(risks: impl Iterator<Item = LicenseRisk>) -> LicenseRisk {
    risks.max_by_key(|r| rank(*r)).unwrap_or(LicenseRisk::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_unknown() {
        assert_eq!(classify(UNKNOWN_LICENSE), LicenseRisk::Unknown);
        assert_eq!(classify(UNCLASSIFIED_LICENSE), LicenseRisk::Unknown);
        assert_eq!(classify("Custom"), LicenseRisk::Unknown);
        assert_eq!(classify(""), LicenseRisk::Unknown);
    }

    #[test]
    fn test_modified_keeps_base_family() {
        assert_eq!(classify("Modified MIT"), LicenseRisk::Permissive);
        assert_eq!(classify("Modified GPL-3.0"), LicenseRisk::StrongCopyleft);
    }

    #[test]
    fn test_or_takes_most_permissive() {
        assert_eq!(classify("MIT OR Apache-2.0"), LicenseRisk::Permissive);
        assert_eq!(classify("GPL-3.0 OR MIT"), LicenseRisk::Permissive);
        assert_eq!(classify("MIT/Apache-2.0"), LicenseRisk::Permissive);
        assert_eq!(classify("(LGPL-2.1 OR GPL-3.0)"), LicenseRisk::WeakCopyleft);
    }

    #[test]
    fn test_and_takes_most_restrictive() {
        assert_eq!(classify("MIT AND GPL-3.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify("Apache-2.0 AND Custom"), LicenseRisk::Unknown);
        assert_eq!(
            classify("(MIT AND BSD-3-Clause) OR GPL-2.0"),
            LicenseRisk::Permissive
        );
    }

    #[test]
    fn test_plain_labels() {
        assert_eq!(classify("MIT"), LicenseRisk::Permissive);
        assert_eq!(classify("MIT License"), LicenseRisk::Permissive);
        assert_eq!(classify("MPL-2.0"), LicenseRisk::WeakCopyleft);
        assert_eq!(classify("Proprietary"), LicenseRisk::Proprietary);
    }
}
