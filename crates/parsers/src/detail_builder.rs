use crate::types::DetailRecord;
use std::collections::HashMap;

/// Shared detail-field normalization used by all five site parsers: runs
/// every raw `data-field` value through the `normalizer` crate. Sites
/// differ only in which fields they expose and in `site_property_id`
/// validation / building-name matching, not in how a given field's raw
/// text becomes a typed value.
pub fn build_detail_record(site_property_id: &str, fields: &HashMap<String, String>) -> DetailRecord {
    let price = fields.get("price").and_then(|raw| normalizer::extract_price(raw));
    let area = fields.get("area").and_then(|raw| normalizer::extract_area(raw));
    let balcony_area = fields
        .get("balcony_area")
        .and_then(|raw| normalizer::extract_area(raw));
    let floor = fields
        .get("floor")
        .and_then(|raw| normalizer::extract_floor_number(raw));
    let (total_floors, basement_floors) = fields
        .get("total_floors")
        .and_then(|raw| normalizer::extract_total_floors(raw))
        .map(|(t, b)| (Some(t), Some(b)))
        .unwrap_or((None, None));
    let layout = fields.get("layout").and_then(|raw| normalizer::normalize_layout(raw));
    let direction = fields
        .get("direction")
        .and_then(|raw| normalizer::normalize_direction(raw));
    let built_year = fields
        .get("built_year")
        .and_then(|raw| normalizer::extract_built_year(raw));
    let address = fields.get("address").map(|raw| normalizer::clean_address(raw));
    let station_info = fields
        .get("station_info")
        .map(|raw| normalizer::format_station_info(raw));
    let management_fee = fields.get("management_fee").and_then(|raw| raw.parse::<i64>().ok());
    let repair_fund = fields.get("repair_fund").and_then(|raw| raw.parse::<i64>().ok());

    DetailRecord {
        site_property_id: site_property_id.to_string(),
        price,
        building_name: fields.get("building_name").cloned(),
        address,
        area,
        layout,
        floor,
        total_floors,
        basement_floors,
        direction,
        built_year,
        balcony_area,
        management_fee,
        repair_fund,
        agency_name: fields.get("agency_name").cloned(),
        agency_tel: fields.get("agency_tel").cloned(),
        title: fields.get("title").cloned(),
        remarks: fields.get("remarks").cloned(),
        station_info,
    }
}
