//! In-memory product catalog backing the example endpoints.
//!
//! # Data Flow
//! ```text
//! handler (routes/products.rs)
//!     → validated NewProduct
//!     → store.rs (Catalog: RwLock<BTreeMap<id, Product>>)
//!     → CatalogError → ApiError (404 / 409 / 500)
//! ```
//!
//! # Design Decisions
//! - The catalog is owned by `AppState`, never a global
//! - Ids are assigned sequentially from 1 and never reused
//! - Product names are unique, compared case-insensitively

pub mod store;
pub mod types;

pub use store::{Catalog, CatalogError};
pub use types::{NewProduct, Product};
