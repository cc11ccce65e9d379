//! Real site markup is explicitly out of scope (§4.4); the five site
//! parsers instead read a minimal, documented intermediate shape:
//!
//! ```html
//! <div class="listing" data-url="..." data-site-property-id="..."
//!      data-price="5000" data-building-name="..." data-address="...">
//! </div>
//! ...
//! <div class="pagination" data-last-page="true"></div>
//! ```
//!
//! and, on a detail page:
//!
//! ```html
//! <div data-field="price">5,000万円</div>
//! <div data-field="building_name">麻布ハウス</div>
//! ```
//!
//! This module owns the shared extraction helpers; each site struct
//! combines them with its own field list and validation rules.

use crate::types::ListRow;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static LISTING_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div class="listing"([^>]*)>"#).unwrap());
static ATTR_RE_CACHE: Lazy<regex::Regex> = Lazy::new(|| Regex::new(r#"(\w[\w-]*)="([^"]*)"#).unwrap());
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div data-field="([a-z_]+)">([^<]*)</div>"#).unwrap());
static LAST_PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div class="pagination"[^>]*data-last-page="true""#).unwrap());

fn parse_attrs(tag_attrs: &str) -> HashMap<String, String> {
    ATTR_RE_CACHE
        .captures_iter(tag_attrs)
        .map(|c| (c[1].replace("data-", "").replace('-', "_"), c[2].to_string()))
        .collect()
}

/// Parses every `<div class="listing" ...>` tag in the page into a
/// [`ListRow`]. Rows missing `url`, `site-property-id`, or `price` are
/// dropped, matching the list-record validity rule in §4.7; the second
/// return value is how many rows were dropped that way
/// (`html_structure_errors`).
pub fn parse_list_rows(html: &str) -> (Vec<ListRow>, u32) {
    let mut dropped = 0u32;
    let rows = LISTING_TAG_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let attrs = parse_attrs(&cap[1]);
            let row = (|| {
                let url = attrs.get("url")?.clone();
                let site_property_id = attrs.get("site_property_id")?.clone();
                let price = attrs.get("price")?.parse::<i64>().ok()?;
                Some(ListRow {
                    url,
                    site_property_id,
                    price: Some(price),
                    building_name_from_list: attrs.get("building_name").cloned(),
                    list_page_address: attrs.get("address").cloned(),
                })
            })();
            if row.is_none() {
                dropped += 1;
            }
            row
        })
        .collect();
    (rows, dropped)
}

/// Extracts every `data-field="name"` marker on a detail page into a flat
/// `field -> raw text` map; site parsers normalize these through the
/// `normalizer` crate before building a `DetailRecord`.
pub fn parse_detail_fields(html: &str) -> HashMap<String, String> {
    FIELD_RE
        .captures_iter(html)
        .map(|c| (c[1].to_string(), c[2].trim().to_string()))
        .collect()
}

pub fn is_last_page(html: &str) -> bool {
    LAST_PAGE_RE.is_match(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing_rows() {
        let html = r#"
            <div class="listing" data-url="https://suumo.jp/detail/A1" data-site-property-id="A1" data-price="5000" data-building-name="麻布ハウス" data-address="東京都港区麻布1-1-1"></div>
            <div class="listing" data-url="https://suumo.jp/detail/A2" data-site-property-id="A2" data-price="4200"></div>
        "#;
        let (rows, dropped) = parse_list_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(dropped, 0);
        assert_eq!(rows[0].site_property_id, "A1");
        assert_eq!(rows[0].price, Some(5000));
        assert_eq!(rows[0].building_name_from_list.as_deref(), Some("麻布ハウス"));
        assert_eq!(rows[1].building_name_from_list, None);
    }

    #[test]
    fn drops_rows_missing_required_list_fields() {
        let html = r#"<div class="listing" data-url="https://suumo.jp/detail/A3"></div>"#;
        let (rows, dropped) = parse_list_rows(html);
        assert!(rows.is_empty());
        assert_eq!(dropped, 1);
    }

    #[test]
    fn extracts_detail_fields() {
        let html = r#"
            <div data-field="building_name">麻布ハウス</div>
            <div data-field="price">5,000万円</div>
        "#;
        let fields = parse_detail_fields(html);
        assert_eq!(fields.get("building_name").map(String::as_str), Some("麻布ハウス"));
        assert_eq!(fields.get("price").map(String::as_str), Some("5,000万円"));
    }

    #[test]
    fn detects_last_page_marker() {
        let last = r#"<div class="pagination" data-last-page="true"></div>"#;
        let more = r#"<div class="pagination" data-last-page="false"></div>"#;
        assert!(is_last_page(last));
        assert!(!is_last_page(more));
    }
}
