//! Target resolution for the crossplat cross-compilation orchestrator.
//!
//! The pieces compose left to right:
//! - **Catalog:** the toolchain's list of known OS/architecture pairs
//! - **Platform sets:** ordered, duplicate-free collections of pairs with
//!   filter, union and difference operations
//! - **Alias table:** named platform sets derived from the catalog
//! - **Resolver:** folds a user's alias tokens into one final platform set

pub mod alias;
pub mod catalog;
pub mod error;
pub mod pair;
pub mod resolve;
pub mod set;

pub use alias::{AliasPolicy, AliasTable};
pub use catalog::{parse_catalog_json, CatalogSource, GoDistCatalog, JsonFileCatalog};
pub use error::{CoreError, Result};
pub use pair::PlatformPair;
pub use resolve::{resolve, AliasToken, ResolutionRequest, DEFAULT_ALIAS};
pub use set::PlatformSet;
