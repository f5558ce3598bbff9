pub mod changeset;
pub mod container;
pub mod image;
pub mod offer;
pub mod query;

pub use crate::domain::model::{ChangeRequest, ChangeSetRequest, EntityRef, CATALOG};
pub use crate::domain::ports::CatalogClient;
pub use crate::utils::error::Result;
