mod coordinator;
mod report;

pub use coordinator::{CatalogLoaded, LoadCoordinator};
pub use report::{FileFailure, PassReport, RunReport};
