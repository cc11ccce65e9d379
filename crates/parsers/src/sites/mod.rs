pub mod homes;
pub mod livable;
pub mod nomu;
pub mod rehouse;
pub mod suumo;

pub use homes::HomesParser;
pub use livable::LivableParser;
pub use nomu::NomuParser;
pub use rehouse::RehouseParser;
pub use suumo::SuumoParser;
