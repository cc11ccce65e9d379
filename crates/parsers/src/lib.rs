pub mod contract;
pub mod detail_builder;
pub mod html_shape;
pub mod name_match;
pub mod sites;
pub mod types;

pub use contract::PortalParser;
pub use types::{DetailRecord, ListRow};

use common::SourceSite;

/// Returns the parser for a given site. The orchestrator and the CLI use
/// this instead of matching on `SourceSite` themselves, keeping all
/// site-specific branching inside this crate (§9).
pub fn parser_for(source_site: SourceSite) -> Box<dyn PortalParser> {
    match source_site {
        SourceSite::Suumo => Box::new(sites::SuumoParser),
        SourceSite::Homes => Box::new(sites::HomesParser),
        SourceSite::Nomu => Box::new(sites::NomuParser),
        SourceSite::Rehouse => Box::new(sites::RehouseParser),
        SourceSite::Livable => Box::new(sites::LivableParser),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_for_every_site_reports_matching_source_site() {
        for site in SourceSite::ALL {
            assert_eq!(parser_for(site).source_site(), site);
        }
    }
}
