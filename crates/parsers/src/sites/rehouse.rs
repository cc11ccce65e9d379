use crate::contract::PortalParser;
use crate::detail_builder::build_detail_record;
use crate::html_shape;
use crate::name_match::exact_match;
use crate::types::{DetailRecord, ListRow};
use common::SourceSite;

const REQUIRED_FIELDS: &[&str] = &["site_property_id", "price", "building_name", "address", "area"];
const PARTIAL_REQUIRED_FIELDS: &[&str] = &["layout"];

/// 三井のリハウス (https://www.rehouse.co.jp). `site_property_id` is an
/// opaque alphanumeric token.
#[derive(Debug, Default, Clone, Copy)]
pub struct RehouseParser;

impl PortalParser for RehouseParser {
    fn source_site(&self) -> SourceSite {
        SourceSite::Rehouse
    }

    fn build_list_url(&self, area: &str, page: u32) -> String {
        format!("{}/mansion/{}/?page={}", SourceSite::Rehouse.base_url(), area, page)
    }

    fn parse_list(&self, html: &str) -> (Vec<ListRow>, u32) {
        html_shape::parse_list_rows(html)
    }

    fn parse_detail(&self, html: &str, list_hints: &ListRow) -> Option<DetailRecord> {
        let fields = html_shape::parse_detail_fields(html);
        if fields.is_empty() {
            return None;
        }
        Some(build_detail_record(&list_hints.site_property_id, &fields))
    }

    fn is_last_page(&self, html: &str) -> bool {
        html_shape::is_last_page(html)
    }

    fn validate_site_property_id(&self, id: &str, _url: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
    }

    fn verify_building_names_match(&self, detail_name: &str, list_name: &str) -> (bool, String) {
        (exact_match(detail_name, list_name), detail_name.to_string())
    }

    fn get_required_fields(&self) -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    fn get_partial_required_fields(&self) -> &'static [&'static str] {
        PARTIAL_REQUIRED_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_alphanumeric_id() {
        let parser = RehouseParser;
        assert!(parser.validate_site_property_id("RH900x", "https://www.rehouse.co.jp/detail/RH900x"));
    }

    #[test]
    fn rejects_non_alphanumeric_id() {
        let parser = RehouseParser;
        assert!(!parser.validate_site_property_id("RH-900", "https://www.rehouse.co.jp/detail/RH-900"));
    }
}
