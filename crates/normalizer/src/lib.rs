//! Pure, stateless extraction and normalization functions over Japanese
//! real-estate listing free text.
//!
//! Every function here fails by returning `None` rather than by raising —
//! callers decide whether an absent value is fatal for their purposes. None
//! of these functions touch the network or a database.

mod address;
mod area;
mod built_year;
mod direction;
mod floor;
mod layout;
mod price;
mod station;
mod validate;

pub use address::clean_address;
pub use area::extract_area;
pub use built_year::extract_built_year;
pub use direction::normalize_direction;
pub use floor::{extract_floor_number, extract_total_floors};
pub use layout::normalize_layout;
pub use price::extract_price;
pub use station::format_station_info;
pub use validate::{validate_area, validate_floor_number, validate_price};

/// Fold full-width ASCII digits and punctuation to their half-width
/// equivalents, leaving katakana and other wide characters untouched.
///
/// Shared by every extractor that needs to tolerate full-width numerals
/// (e.g. `１２３` vs `123`) before running a numeric regex over the text.
pub(crate) fn fold_fullwidth_ascii(input: &str) -> String {
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

/// Strip ascii and full-width whitespace.
pub(crate) fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}
