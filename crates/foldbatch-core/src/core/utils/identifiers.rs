pub const SEPARATOR: char = '_';

/// Maps every character outside `[A-Za-z0-9]` to [`SEPARATOR`] and trims separators
/// from both ends.
///
/// Each offending character becomes exactly one separator, so `"a  b"` maps to `"a__b"`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { SEPARATOR })
        .collect();
    mapped.trim_matches(SEPARATOR).to_string()
}

/// Derives the filesystem-safe name of a job from its variant and optional ligand.
///
/// Parts that sanitize to nothing are dropped so the result never starts or ends with a
/// separator. The result is empty only if every part is.
pub fn job_identity(variant_id: &str, ligand_id: Option<&str>) -> String {
    std::iter::once(variant_id)
        .chain(ligand_id)
        .map(sanitize_identifier)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sanitized(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_alphanumeric() || c == SEPARATOR)
            && !s.starts_with(SEPARATOR)
            && !s.ends_with(SEPARATOR)
    }

    #[test]
    fn sanitize_identifier_keeps_alphanumerics() {
        assert_eq!(sanitize_identifier("WT"), "WT");
        assert_eq!(sanitize_identifier("WT_A2G"), "WT_A2G");
    }

    #[test]
    fn sanitize_identifier_replaces_each_special_character() {
        assert_eq!(sanitize_identifier("sp|P12345|KIN 1"), "sp_P12345_KIN_1");
        assert_eq!(sanitize_identifier("a  b"), "a__b");
    }

    #[test]
    fn sanitize_identifier_trims_leading_and_trailing_separators() {
        assert_eq!(sanitize_identifier("__x-y__"), "x_y");
        assert_eq!(sanitize_identifier("(var 2)"), "var_2");
    }

    #[test]
    fn sanitize_identifier_maps_non_ascii_characters() {
        assert_eq!(sanitize_identifier("αβ-1"), "1");
        assert_eq!(sanitize_identifier("Zn²⁺"), "Zn");
    }

    #[test]
    fn sanitize_identifier_is_total() {
        for raw in ["", "___", "!!!", "a", "x y z", "ü", "-A-", "1.2.3"] {
            let sanitized = sanitize_identifier(raw);
            assert!(is_sanitized(&sanitized), "{raw:?} -> {sanitized:?}");
            assert_eq!(sanitized, sanitize_identifier(raw));
        }
    }

    #[test]
    fn job_identity_combines_variant_and_ligand() {
        assert_eq!(job_identity("WT", None), "WT");
        assert_eq!(job_identity("WT", Some("LIG1")), "WT_LIG1");
        assert_eq!(job_identity("WT_A2G", Some("LIG 2")), "WT_A2G_LIG_2");
    }

    #[test]
    fn job_identity_drops_parts_that_sanitize_to_nothing() {
        assert_eq!(job_identity("***", Some("LIG1")), "LIG1");
        assert_eq!(job_identity("WT", Some("()")), "WT");
        assert_eq!(job_identity("--", None), "");
    }
}
