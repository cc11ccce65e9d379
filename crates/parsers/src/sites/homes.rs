use crate::contract::PortalParser;
use crate::detail_builder::build_detail_record;
use crate::html_shape;
use crate::name_match::containment_match;
use crate::types::{DetailRecord, ListRow};
use common::SourceSite;

const REQUIRED_FIELDS: &[&str] = &["site_property_id", "price", "building_name", "address", "area"];
const PARTIAL_REQUIRED_FIELDS: &[&str] = &["layout"];

/// LIFULL HOME'S (https://www.homes.co.jp). `site_property_id` is either
/// plain digits or a `b-` prefix followed by alphanumerics. Declares the
/// partial-match policy for `verify_building_names_match`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HomesParser;

impl PortalParser for HomesParser {
    fn source_site(&self) -> SourceSite {
        SourceSite::Homes
    }

    fn build_list_url(&self, area: &str, page: u32) -> String {
        format!("{}/chuko/mansion/{}/list/?page={}", SourceSite::Homes.base_url(), area, page)
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
        if id.is_empty() {
            return false;
        }
        if let Some(rest) = id.strip_prefix("b-") {
            return !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric());
        }
        id.chars().all(|c| c.is_ascii_digit())
    }

    fn verify_building_names_match(&self, detail_name: &str, list_name: &str) -> (bool, String) {
        (containment_match(detail_name, list_name), detail_name.to_string())
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
    fn accepts_digit_id() {
        let parser = HomesParser;
        assert!(parser.validate_site_property_id("123456", "https://www.homes.co.jp/detail/123456"));
    }

    #[test]
    fn accepts_b_prefixed_id() {
        let parser = HomesParser;
        assert!(parser.validate_site_property_id("b-abc123", "https://www.homes.co.jp/detail/b-abc123"));
    }

    #[test]
    fn rejects_empty_b_prefix() {
        let parser = HomesParser;
        assert!(!parser.validate_site_property_id("b-", "https://www.homes.co.jp/detail/b-"));
    }
}
