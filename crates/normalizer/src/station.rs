/// Format a raw station-info blob into a canonical multi-line string.
///
/// Source pages typically separate multiple station entries with `/` or
/// full-width equivalents; this splits on those separators, trims each
/// entry, drops empties, and rejoins with `\n` so downstream consumers
/// (and diffing logic in the reconciler) see a stable representation
/// regardless of the site's original separator choice.
pub fn format_station_info(text: &str) -> String {
    text.split(['/', '／', '、'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_slash_separated_entries() {
        assert_eq!(
            format_station_info("JR山手線 渋谷 徒歩5分/東急東横線 代官山 徒歩8分"),
            "JR山手線 渋谷 徒歩5分\n東急東横線 代官山 徒歩8分"
        );
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(format_station_info("渋谷 徒歩5分//"), "渋谷 徒歩5分");
    }

    #[test]
    fn single_entry_passes_through() {
        assert_eq!(format_station_info("渋谷 徒歩5分"), "渋谷 徒歩5分");
    }
}
