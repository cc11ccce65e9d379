/// Shared building-name normalization for `verify_building_names_match`
/// policies (§4.4): strips whitespace and the center-dot separator so
/// `"パーク コート"` and `"パーク・コート"` compare equal.
pub fn normalize_name(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace() && *c != '・').collect()
}

/// Exact-match policy after normalization.
pub fn exact_match(detail_name: &str, list_name: &str) -> bool {
    normalize_name(detail_name) == normalize_name(list_name)
}

/// Abbreviation policy (SUUMO-style): when the list name was truncated
/// with an ellipsis, accept a prefix match against the detail name.
pub fn ellipsis_prefix_match(detail_name: &str, list_name: &str) -> bool {
    let list_norm = normalize_name(list_name);
    let detail_norm = normalize_name(detail_name);
    let prefix = list_norm.strip_suffix('…').or_else(|| list_norm.strip_suffix("..."));
    match prefix {
        Some(prefix) => detail_norm.starts_with(prefix),
        None => detail_norm == list_norm,
    }
}

/// Partial-match policy: accept if either normalized name contains the
/// other, tolerating a site that drops or adds a trailing wing/phase
/// marker (e.g. "ザ・タワー").
pub fn containment_match(detail_name: &str, list_name: &str) -> bool {
    let list_norm = normalize_name(list_name);
    let detail_norm = normalize_name(detail_name);
    if list_norm.is_empty() || detail_norm.is_empty() {
        return false;
    }
    detail_norm.contains(&list_norm) || list_norm.contains(&detail_norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipsis_prefix_matches_truncated_list_name() {
        assert!(ellipsis_prefix_match(
            "パークコート麻布十番ザ・タワー",
            "パークコート麻布十…"
        ));
    }

    #[test]
    fn ellipsis_prefix_rejects_non_prefix() {
        assert!(!ellipsis_prefix_match("白金ハウス", "パークコート麻布十…"));
    }

    #[test]
    fn containment_matches_either_direction() {
        assert!(containment_match("麻布ハウス別館", "麻布ハウス"));
        assert!(containment_match("麻布ハウス", "麻布ハウス別館"));
    }

    #[test]
    fn exact_match_ignores_whitespace_and_center_dot() {
        assert!(exact_match("パーク・コート", "パーク コート"));
    }
}
