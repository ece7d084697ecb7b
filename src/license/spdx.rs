use crate::models::LicenseRisk;

/// SPDX identifier prefixes per family, lowercase. Checked in order, so the
/// more specific `cc-by-sa`/`cc-by-nc` come before `cc-by`.
const ID_FAMILIES: &[(&str, LicenseRisk)] = &[
    ("agpl", LicenseRisk::StrongCopyleft),
    ("gpl", LicenseRisk::StrongCopyleft),
    ("sspl", LicenseRisk::StrongCopyleft),
    ("osl-", LicenseRisk::StrongCopyleft),
    ("cc-by-sa", LicenseRisk::StrongCopyleft),
    ("lgpl", LicenseRisk::WeakCopyleft),
    ("mpl", LicenseRisk::WeakCopyleft),
    ("epl", LicenseRisk::WeakCopyleft),
    ("eupl", LicenseRisk::WeakCopyleft),
    ("cddl", LicenseRisk::WeakCopyleft),
    ("cecill", LicenseRisk::WeakCopyleft),
    ("ms-rl", LicenseRisk::WeakCopyleft),
    ("cc-by-nc", LicenseRisk::Proprietary),
    ("busl", LicenseRisk::Proprietary),
    ("elastic-", LicenseRisk::Proprietary),
    ("mit", LicenseRisk::Permissive),
    ("apache", LicenseRisk::Permissive),
    ("bsd", LicenseRisk::Permissive),
    ("0bsd", LicenseRisk::Permissive),
    ("isc", LicenseRisk::Permissive),
    ("zlib", LicenseRisk::Permissive),
    ("unlicense", LicenseRisk::Permissive),
    ("cc0", LicenseRisk::Permissive),
    ("cc-by", LicenseRisk::Permissive),
    ("wtfpl", LicenseRisk::Permissive),
    ("psf", LicenseRisk::Permissive),
    ("python-", LicenseRisk::Permissive),
    ("artistic-2", LicenseRisk::Permissive),
    ("bsl-1.0", LicenseRisk::Permissive),
    ("blueoak", LicenseRisk::Permissive),
    ("upl-", LicenseRisk::Permissive),
    ("ms-pl", LicenseRisk::Permissive),
    ("ncsa", LicenseRisk::Permissive),
    ("postgresql", LicenseRisk::Permissive),
    ("x11", LicenseRisk::Permissive),
];

/// Keywords found in registry classifier names and license file headings.
const NAME_FAMILIES: &[(&str, LicenseRisk)] = &[
    ("lesser general public", LicenseRisk::WeakCopyleft),
    ("library general public", LicenseRisk::WeakCopyleft),
    ("affero", LicenseRisk::StrongCopyleft),
    ("general public license", LicenseRisk::StrongCopyleft),
    ("mozilla public", LicenseRisk::WeakCopyleft),
    ("eclipse public", LicenseRisk::WeakCopyleft),
    ("european union public", LicenseRisk::WeakCopyleft),
    ("common development and distribution", LicenseRisk::WeakCopyleft),
    ("apache", LicenseRisk::Permissive),
    ("mit license", LicenseRisk::Permissive),
    ("bsd license", LicenseRisk::Permissive),
    ("isc license", LicenseRisk::Permissive),
    ("python software foundation", LicenseRisk::Permissive),
    ("public domain", LicenseRisk::Permissive),
    ("boost software", LicenseRisk::Permissive),
    ("zlib", LicenseRisk::Permissive),
    ("proprietary", LicenseRisk::Proprietary),
    ("commercial", LicenseRisk::Proprietary),
    ("all rights reserved", LicenseRisk::Proprietary),
];

/// Family of a single license identifier (no `OR`/`AND`).
pub fn classify_id(id: &str) -> LicenseRisk {
    let base = id.split(" WITH ").next().unwrap_or(id).trim();
    let lower = base.to_lowercase();
    if lower.is_empty() {
        return LicenseRisk::Unknown;
    }

    if !lower.contains(' ') {
        if let Some((_, risk)) = ID_FAMILIES.iter().find(|(prefix, _)| lower.starts_with(prefix)) {
            return *risk;
        }
    }

    NAME_FAMILIES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, risk)| *risk)
        .unwrap_or(LicenseRisk::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spdx_families() {
        assert_eq!(classify_id("MIT"), LicenseRisk::Permissive);
        assert_eq!(classify_id("Apache-2.0"), LicenseRisk::Permissive);
        assert_eq!(classify_id("BSD-3-Clause"), LicenseRisk::Permissive);
        assert_eq!(classify_id("LGPL-2.1-or-later"), LicenseRisk::WeakCopyleft);
        assert_eq!(classify_id("MPL-2.0"), LicenseRisk::WeakCopyleft);
        assert_eq!(classify_id("GPL-3.0-only"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify_id("AGPL-3.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify_id("CC-BY-SA-4.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify_id("CC-BY-4.0"), LicenseRisk::Permissive);
        assert_eq!(classify_id("BUSL-1.1"), LicenseRisk::Proprietary);
    }

    #[test]
    fn test_with_exception_is_stripped() {
        assert_eq!(
            classify_id("GPL-2.0 WITH Classpath-exception-2.0"),
            LicenseRisk::StrongCopyleft
        );
    }

    #[test]
    fn test_registry_classifier_names() {
        assert_eq!(classify_id("MIT License"), LicenseRisk::Permissive);
        assert_eq!(classify_id("Apache Software License"), LicenseRisk::Permissive);
        assert_eq!(
            classify_id("GNU Lesser General Public License v3 (LGPLv3)"),
            LicenseRisk::WeakCopyleft
        );
        assert_eq!(
            classify_id("GNU General Public License v2 (GPLv2)"),
            LicenseRisk::StrongCopyleft
        );
        assert_eq!(
            classify_id("Mozilla Public License 2.0 (MPL 2.0)"),
            LicenseRisk::WeakCopyleft
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify_id("Custom"), LicenseRisk::Unknown);
        assert_eq!(classify_id("   "), LicenseRisk::Unknown);
        assert_eq!(classify_id("see LICENSE file"), LicenseRisk::Unknown);
    }
}
