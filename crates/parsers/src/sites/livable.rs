use crate::contract::PortalParser;
use crate::detail_builder::build_detail_record;
use crate::html_shape;
use crate::name_match::exact_match;
use crate::types::{DetailRecord, ListRow};
use common::SourceSite;

const REQUIRED_FIELDS: &[&str] = &["site_property_id", "price", "building_name", "address", "area"];
const PARTIAL_REQUIRED_FIELDS: &[&str] = &["layout"];

/// 東急リバブル (https://www.livable.co.jp). `site_property_id` is an
/// opaque alphanumeric token.
#[derive(Debug, Default, Clone, Copy)]
pub struct LivableParser;

impl PortalParser for LivableParser {
    fn source_site(&self) -> SourceSite {
        SourceSite::Livable
    }

    fn build_list_url(&self, area: &str, page: u32) -> String {
        format!("{}/kounyu/mansion/{}/?page={}", SourceSite::Livable.base_url(), area, page)
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
        let parser = LivableParser;
        assert!(parser.validate_site_property_id("LV42z", "https://www.livable.co.jp/detail/LV42z"));
    }

    #[test]
    fn rejects_empty_id() {
        let parser = LivableParser;
        assert!(!parser.validate_site_property_id("", "https://www.livable.co.jp/detail/"));
    }
}
