use crate::{fold_fullwidth_ascii, strip_whitespace};
use once_cell::sync::Lazy;
use regex::Regex;

static LAYOUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)(S?)((?:[LDK]){1,4})$").unwrap());

/// Normalize a room layout string to a canonical `"1R"`/`"1K"`/`"1DK"`/
/// `"…LDK"`/`"…SLDK"` token.
///
/// Folds full-width characters to ASCII, drops all whitespace, maps
/// "ワンルーム"/"STUDIO" to `"1R"`, folds a trailing `+S`/`+納戸` suffix
/// into the `S` variant, and drops `+WIC`/`+SIC` suffixes entirely (they
/// describe a walk-in/shoe-in closet, not the layout itself).
pub fn normalize_layout(text: &str) -> Option<String> {
    let folded = fold_fullwidth_ascii(text);
    let no_ws = strip_whitespace(&folded);
    let upper = no_ws.to_uppercase();

    if upper.contains("ワンルーム") || upper.contains("STUDIO") {
        return Some("1R".to_string());
    }

    let mut working = upper;
    let has_storage_suffix = working.contains("+S") || working.contains("+納戸");
    working = working.replace("+WIC", "");
    working = working.replace("+SIC", "");
    working = working.replace("+納戸", "");
    working = working.replace("+S", "");

    let caps = LAYOUT_RE.captures(&working)?;
    let count = &caps[1];
    let already_has_s = &caps[2] == "S";
    let rooms = &caps[3];

    let s_marker = if already_has_s || has_storage_suffix {
        "S"
    } else {
        ""
    };

    Some(format!("{count}{s_marker}{rooms}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn studio_variants_map_to_1r() {
        assert_eq!(normalize_layout("ワンルーム"), Some("1R".to_string()));
        assert_eq!(normalize_layout("studio"), Some("1R".to_string()));
    }

    #[test]
    fn plain_layout_passes_through_uppercased() {
        assert_eq!(normalize_layout("2ldk"), Some("2LDK".to_string()));
    }

    #[test]
    fn storage_suffix_folds_into_s_variant() {
        assert_eq!(normalize_layout("2LDK+S"), Some("2SLDK".to_string()));
        assert_eq!(normalize_layout("2LDK+納戸"), Some("2SLDK".to_string()));
    }

    #[test]
    fn closet_suffixes_are_dropped() {
        assert_eq!(normalize_layout("2LDK+WIC"), Some("2LDK".to_string()));
        assert_eq!(normalize_layout("3LDK+SIC"), Some("3LDK".to_string()));
    }

    #[test]
    fn whitespace_is_stripped() {
        assert_eq!(normalize_layout("2 LDK"), Some("2LDK".to_string()));
    }

    #[test]
    fn unrecognized_text_returns_none() {
        assert_eq!(normalize_layout("未定"), None);
    }
}
