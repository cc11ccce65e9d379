use crate::contract::PortalParser;
use crate::detail_builder::build_detail_record;
use crate::html_shape;
use crate::name_match::ellipsis_prefix_match;
use crate::types::{DetailRecord, ListRow};
use common::SourceSite;

const REQUIRED_FIELDS: &[&str] = &["site_property_id", "price", "building_name", "address", "area"];
const PARTIAL_REQUIRED_FIELDS: &[&str] = &["layout"];

/// SUUMO (https://suumo.jp). `site_property_id` is numeric; the original
/// only warns outside the typical 6-10 digit window rather than rejecting.
/// SUUMO is the site that declares the abbreviation policy for
/// `verify_building_names_match` (§4.4, S5).
#[derive(Debug, Default, Clone, Copy)]
pub struct SuumoParser;

impl PortalParser for SuumoParser {
    fn source_site(&self) -> SourceSite {
        SourceSite::Suumo
    }

    fn build_list_url(&self, area: &str, page: u32) -> String {
        format!("{}/ms/chuko/tokyo/sc_{}/?page={}", SourceSite::Suumo.base_url(), area, page)
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

    fn validate_site_property_id(&self, id: &str, url: &str) -> bool {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        if !(6..=10).contains(&id.len()) {
            tracing::warn!(id, url, "suumo site_property_id outside typical 6-10 digit window");
        }
        true
    }

    fn verify_building_names_match(&self, detail_name: &str, list_name: &str) -> (bool, String) {
        (ellipsis_prefix_match(detail_name, list_name), detail_name.to_string())
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
    fn rejects_non_numeric_id() {
        let parser = SuumoParser;
        assert!(!parser.validate_site_property_id("A1", "https://suumo.jp/detail/A1"));
    }

    #[test]
    fn accepts_numeric_id_outside_window_with_warning_only() {
        let parser = SuumoParser;
        assert!(parser.validate_site_property_id("12", "https://suumo.jp/detail/12"));
    }

    #[test]
    fn abbreviation_policy_accepts_truncated_list_name() {
        let parser = SuumoParser;
        let (matched, resolved) = parser.verify_building_names_match(
            "パークコート麻布十番ザ・タワー",
            "パークコート麻布十…",
        );
        assert!(matched);
        assert_eq!(resolved, "パークコート麻布十番ザ・タワー");
    }
}
