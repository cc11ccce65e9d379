pub mod building;
pub mod duplicates;
pub mod error;
pub mod hasher;
pub mod listing;
pub mod property;
pub mod reconciler;

pub use building::{BuildingResolution, BuildingResolutionInput, BuildingResolver};
pub use duplicates::{DuplicateCandidate, DuplicateFinder};
pub use error::ResolverError;
pub use listing::{ListingResolver, ListingUpsertInput};
pub use property::{PropertyResolutionInput, PropertyResolver};
pub use reconciler::Reconciler;
