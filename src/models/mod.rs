pub mod catalog;
pub mod location;
pub mod observation;

pub use catalog::{CollectionRef, GasCollectionCatalog, GasEntry};
pub use location::Location;
pub use observation::{Gas, ObservationRecord};
