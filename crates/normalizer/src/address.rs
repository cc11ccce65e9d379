use once_cell::sync::Lazy;
use regex::Regex;

/// Bracketed or parenthesized advertising copy commonly appended to an
/// address field, e.g. `"東京都港区麻布1-1-1（駅近・角部屋）"`.
static AD_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[（(【\[].*$|\s*[/／].*$").unwrap());

/// Clean advertising copy out of an address string, preserving the
/// `"東京都<区>…"`-shaped prefix.
///
/// This does not validate that the result looks like a real address —
/// that is the job of the required-fields contract, which checks for
/// prefecture/ward substrings separately.
pub fn clean_address(text: &str) -> String {
    let stripped = AD_SUFFIX_RE.replace(text, "");
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_parenthesized_ad_copy() {
        assert_eq!(
            clean_address("東京都港区麻布1-1-1（駅近・角部屋）"),
            "東京都港区麻布1-1-1"
        );
    }

    #[test]
    fn strips_slash_separated_ad_copy() {
        assert_eq!(
            clean_address("東京都港区麻布1-1-1 / 人気エリア"),
            "東京都港区麻布1-1-1"
        );
    }

    #[test]
    fn plain_address_is_unchanged() {
        assert_eq!(
            clean_address("東京都港区南麻布2-3-4"),
            "東京都港区南麻布2-3-4"
        );
    }
}
