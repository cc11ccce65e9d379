//! Property hashing and building-name canonicalization (§4.2).
//!
//! The hash string is built as a list of `"key:value"` parts, sorted
//! lexicographically, then joined with `|` and SHA256-hashed — this exact
//! construction is inherited from the original system
//! (`original_source/backend/app/utils/property_hasher.py`) and is the
//! behavior to preserve, not an implementation detail to re-derive.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use uuid::Uuid;

fn hash_parts(
    building_id: Uuid,
    floor: Option<i32>,
    area: Option<f64>,
    layout: Option<&str>,
    direction: Option<&str>,
    include_direction: bool,
) -> Vec<String> {
    let mut parts = vec![format!("building:{building_id}")];
    if let Some(f) = floor {
        parts.push(format!("floor:{f}"));
    }
    if let Some(a) = area {
        parts.push(format!("area:{a:.2}"));
    }
    if let Some(l) = layout {
        parts.push(format!("layout:{}", l.to_uppercase().replace(char::is_whitespace, "")));
    }
    if include_direction {
        if let Some(d) = direction {
            parts.push(format!("direction:{}", d.replace(char::is_whitespace, "")));
        }
    }
    parts
}

fn hash_joined_parts(mut parts: Vec<String>) -> String {
    parts.sort();
    let joined = parts.join("|");
    let digest = Sha256::digest(joined.as_bytes());
    hex::encode(digest)
}

/// Full hash, including direction. Room number is deliberately excluded —
/// sites disagree on whether to publish it, so including it would
/// fragment the same physical unit across listings.
pub fn property_hash(
    building_id: Uuid,
    floor: Option<i32>,
    area: Option<f64>,
    layout: Option<&str>,
    direction: Option<&str>,
) -> String {
    hash_joined_parts(hash_parts(building_id, floor, area, layout, direction, true))
}

/// Direction-less variant, used for duplicate-candidate comparisons where
/// direction data is missing or unreliable.
pub fn property_hash_without_direction(
    building_id: Uuid,
    floor: Option<i32>,
    area: Option<f64>,
    layout: Option<&str>,
) -> String {
    hash_joined_parts(hash_parts(building_id, floor, area, layout, None, false))
}

fn fold_fullwidth(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let code = c as u32;
            if (0xFF01..=0xFF5E).contains(&code) {
                char::from_u32(code - 0xFEE0).unwrap_or(c)
            } else if c == '\u{3000}' {
                ' '
            } else {
                c
            }
        })
        .collect()
}

static TRAILING_ORIENTATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(EAST|WEST|NORTH|SOUTH|東|西|南|北)棟?$").unwrap());

/// Folds a building name into the search key used to look up existing
/// buildings (§4.6 step 4). The display `normalized_name` is left
/// untouched; only this key is folded.
pub fn canonicalize_building_name(name: &str) -> String {
    let folded = fold_fullwidth(name);
    let stripped: String = folded
        .chars()
        .filter(|c| !c.is_whitespace() && !"・-‐–—~〜".contains(*c))
        .collect();
    let upper = stripped.to_uppercase();
    TRAILING_ORIENTATION_RE.replace(&upper, "").into_owned()
}

static ROOM_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[\s\u{3000}]+(\d{2,5})|(\d{2,5})号室)$").unwrap());

/// Extracts a trailing room number from a building name, returning the
/// name with it stripped. Room numbers are never stored on `Building`
/// rows (§4.6 step 2).
pub fn extract_room_number(name: &str) -> (String, Option<String>) {
    match ROOM_SUFFIX_RE.captures(name) {
        Some(cap) => {
            let room = cap.get(1).or_else(|| cap.get(2)).unwrap().as_str().to_string();
            let whole = cap.get(0).unwrap();
            let stem = name[..whole.start()].trim_end().to_string();
            (stem, Some(room))
        }
        None => (name.to_string(), None),
    }
}

static AD_COPY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"徒歩\d+分|の中古マンション|\d+LDK|\d+階建|築\d+年").unwrap());

/// Whether a candidate building name looks like advertising copy rather
/// than a real building name (§4.6 step 3).
pub fn looks_like_ad_copy(name: &str) -> bool {
    name.chars().count() < 3 || AD_COPY_RE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_order_independent_of_caller() {
        let id = Uuid::nil();
        let h1 = property_hash(id, Some(5), Some(60.12), Some("2LDK"), Some("南"));
        let h2 = property_hash(id, Some(5), Some(60.12), Some("2LDK"), Some("南"));
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn hash_excludes_room_number_by_construction() {
        // room number never enters the hash input at all; two records with
        // the same physical attributes always hash identically regardless
        // of which listing's room number a caller happened to see.
        let id = Uuid::nil();
        let h1 = property_hash(id, Some(5), Some(60.0), Some("2LDK"), Some("南"));
        let h2 = property_hash(id, Some(5), Some(60.0), Some("2LDK"), Some("南"));
        assert_eq!(h1, h2);
    }

    #[test]
    fn without_direction_variant_differs_from_full_hash() {
        let id = Uuid::nil();
        let full = property_hash(id, Some(5), Some(60.0), Some("2LDK"), Some("南"));
        let no_dir = property_hash_without_direction(id, Some(5), Some(60.0), Some("2LDK"));
        assert_ne!(full, no_dir);
    }

    #[test]
    fn without_direction_variant_is_stable_regardless_of_direction_value() {
        let id = Uuid::nil();
        let a = property_hash_without_direction(id, Some(5), Some(60.0), Some("2LDK"));
        let b = property_hash_without_direction(id, Some(5), Some(60.0), Some("2LDK"));
        assert_eq!(a, b);
    }

    #[test]
    fn canonicalize_folds_fullwidth_and_strips_separators() {
        assert_eq!(canonicalize_building_name("ｐａｒｋ－ｈｏｕｓｅ"), "PARKHOUSE");
        assert_eq!(canonicalize_building_name("パーク・コート"), "パークコート");
    }

    #[test]
    fn canonicalize_strips_trailing_orientation_suffix() {
        assert_eq!(canonicalize_building_name("白金ハウス東棟"), "白金ハウス");
        assert_eq!(canonicalize_building_name("White House EAST"), "WHITEHOUSE");
    }

    #[test]
    fn extracts_trailing_room_number() {
        let (stem, room) = extract_room_number("麻布ハウス 503");
        assert_eq!(stem, "麻布ハウス");
        assert_eq!(room.as_deref(), Some("503"));
    }

    #[test]
    fn extracts_room_number_with_marker() {
        let (stem, room) = extract_room_number("麻布ハウス503号室");
        assert_eq!(stem, "麻布ハウス");
        assert_eq!(room.as_deref(), Some("503"));
    }

    #[test]
    fn leaves_name_without_room_number_untouched() {
        let (stem, room) = extract_room_number("麻布ハウス");
        assert_eq!(stem, "麻布ハウス");
        assert_eq!(room, None);
    }

    #[test]
    fn detects_ad_copy_building_names() {
        assert!(looks_like_ad_copy("港区・徒歩5分・3LDKの中古マンション"));
        assert!(looks_like_ad_copy("ａｂ"));
        assert!(!looks_like_ad_copy("麻布ハウス"));
    }
}
