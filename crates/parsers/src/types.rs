use serde::{Deserialize, Serialize};

/// One row from a list page (§4.4). Only the fields a list page can
/// plausibly carry are present; everything else waits for the detail
/// fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRow {
    pub url: String,
    pub site_property_id: String,
    pub price: Option<i64>,
    pub building_name_from_list: Option<String>,
    pub list_page_address: Option<String>,
}

/// A fully parsed detail page, before cross-checking against `ListRow` and
/// before resolution. Field names mirror the required-fields contract
/// (§4.7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailRecord {
    pub site_property_id: String,
    pub price: Option<i64>,
    pub building_name: Option<String>,
    pub address: Option<String>,
    pub area: Option<f64>,
    pub layout: Option<String>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub basement_floors: Option<i32>,
    pub direction: Option<String>,
    pub built_year: Option<i32>,
    pub balcony_area: Option<f64>,
    pub management_fee: Option<i64>,
    pub repair_fund: Option<i64>,
    pub agency_name: Option<String>,
    pub agency_tel: Option<String>,
    pub title: Option<String>,
    pub remarks: Option<String>,
    pub station_info: Option<String>,
}

impl DetailRecord {
    /// Whether the named field (one of the strings a `get_required_fields`
    /// / `get_partial_required_fields` list returns) is present on this
    /// record (§4.7). Unknown names are treated as present so a typo in a
    /// site's field list fails open rather than hard-rejecting every page.
    pub fn has_field(&self, field: &str) -> bool {
        match field {
            "site_property_id" => !self.site_property_id.is_empty(),
            "price" => self.price.is_some(),
            "building_name" => self.building_name.as_deref().is_some_and(|s| !s.is_empty()),
            "address" => self.address.as_deref().is_some_and(|s| !s.is_empty()),
            "area" => self.area.is_some(),
            "layout" => self.layout.is_some(),
            "floor" => self.floor.is_some(),
            "direction" => self.direction.is_some(),
            "built_year" => self.built_year.is_some(),
            _ => true,
        }
    }
}
