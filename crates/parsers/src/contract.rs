use crate::types::{DetailRecord, ListRow};
use common::SourceSite;

/// Per-site parsing capability set (§4.4, §9's "deep polymorphism"
/// redesign flag). The orchestrator treats every implementor as opaque:
/// it never branches on which site it is talking to, only on what this
/// trait returns.
pub trait PortalParser: Send + Sync {
    fn source_site(&self) -> SourceSite;

    fn build_list_url(&self, area: &str, page: u32) -> String;

    /// Returns `(rows, html_structure_errors)` — the second value counts
    /// listing tags dropped for missing `url`/`site_property_id`/`price`
    /// (§4.7).
    fn parse_list(&self, html: &str) -> (Vec<ListRow>, u32);

    fn parse_detail(&self, html: &str, list_hints: &ListRow) -> Option<DetailRecord>;

    fn is_last_page(&self, html: &str) -> bool;

    fn validate_site_property_id(&self, id: &str, url: &str) -> bool;

    /// Returns `(matched, resolved_name)`. `resolved_name` is the name the
    /// caller should keep (usually the detail name on a match, the list
    /// name when the site declares an abbreviation policy and the prefix
    /// matched).
    fn verify_building_names_match(&self, detail_name: &str, list_name: &str) -> (bool, String);

    fn get_required_fields(&self) -> &'static [&'static str];

    fn get_partial_required_fields(&self) -> &'static [&'static str];
}
