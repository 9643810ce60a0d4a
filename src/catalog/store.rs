//! Product storage.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::catalog::types::{NewProduct, Product};
use crate::http::error::{detail, ApiError};

/// Errors raised by catalog operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product {0} does not exist")]
    NotFound(u64),

    #[error("a product named '{0}' already exists")]
    DuplicateName(String),

    /// A writer panicked while holding the lock.
    #[error("catalog lock poisoned")]
    Poisoned,
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => ApiError::not_found("Product", id),
            CatalogError::DuplicateName(name) => {
                ApiError::Conflict(format!("Product named '{name}' already exists"))
            }
            CatalogError::Poisoned => {
                tracing::error!("Catalog lock poisoned");
                ApiError::Database(detail::DATABASE.to_string())
            }
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<u64, Product>,
    next_id: u64,
}

impl Inner {
    fn name_taken(&self, name: &str, except: Option<u64>) -> bool {
        self.products
            .values()
            .any(|p| Some(p.id) != except && p.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Thread-safe in-memory product catalog.
#[derive(Debug)]
pub struct Catalog {
    inner: RwLock<Inner>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                products: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Create a catalog pre-filled with `products`, in order.
    pub fn with_products(products: impl IntoIterator<Item = NewProduct>) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for product in products {
            catalog.create(product)?;
        }
        Ok(catalog)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, CatalogError> {
        self.inner.read().map_err(|_| CatalogError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, CatalogError> {
        self.inner.write().map_err(|_| CatalogError::Poisoned)
    }

    /// Return up to `limit` products starting at `offset`, plus the total count.
    pub fn list(&self, offset: u64, limit: u64) -> Result<(Vec<Product>, u64), CatalogError> {
        let inner = self.read()?;
        let total = inner.products.len() as u64;
        let page = inner
            .products
            .values()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((page, total))
    }

    pub fn get(&self, id: u64) -> Result<Product, CatalogError> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    /// Insert a product and assign it the next id.
    pub fn create(&self, new: NewProduct) -> Result<Product, CatalogError> {
        let mut inner = self.write()?;
        if inner.name_taken(&new.name, None) {
            return Err(CatalogError::DuplicateName(new.name.trim().to_string()));
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let product = Product::from_new(id, new);
        inner.products.insert(id, product.clone());

        tracing::debug!(product_id = id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replace every field of an existing product.
    pub fn replace(&self, id: u64, new: NewProduct) -> Result<Product, CatalogError> {
        let mut inner = self.write()?;
        if !inner.products.contains_key(&id) {
            return Err(CatalogError::NotFound(id));
        }
        if inner.name_taken(&new.name, Some(id)) {
            return Err(CatalogError::DuplicateName(new.name.trim().to_string()));
        }

        let product = Product::from_new(id, new);
        inner.products.insert(id, product.clone());
        Ok(product)
    }

    pub fn delete(&self, id: u64) -> Result<Product, CatalogError> {
        self.write()?
            .products
            .remove(&id)
            .ok_or(CatalogError::NotFound(id))
    }

    /// Number of stored products.
    pub fn len(&self) -> Result<usize, CatalogError> {
        Ok(self.read()?.products.len())
    }

    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.into(),
            price,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let catalog = Catalog::new();
        assert_eq!(catalog.create(product("A", 1.0)).unwrap().id, 1);
        assert_eq!(catalog.create(product("B", 1.0)).unwrap().id, 2);
        assert_eq!(catalog.len().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_name_is_case_insensitive() {
        let catalog = Catalog::new();
        catalog.create(product("Desk Lamp", 10.0)).unwrap();
        let err = catalog.create(product("desk lamp ", 12.0)).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateName("desk lamp".into()));
    }

    #[test]
    fn test_list_pages() {
        let catalog = Catalog::with_products((1..=25).map(|i| product(&format!("P{i}"), 1.0))).unwrap();

        let (page, total) = catalog.list(10, 10).unwrap();
        assert_eq!(total, 25);
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].id, 11);

        let (page, _) = catalog.list(20, 10).unwrap();
        assert_eq!(page.len(), 5);

        let (page, _) = catalog.list(100, 10).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_replace_and_delete() {
        let catalog = Catalog::new();
        let created = catalog.create(product("Chair", 40.0)).unwrap();

        let replaced = catalog.replace(created.id, product("Armchair", 80.0)).unwrap();
        assert_eq!(replaced.name, "Armchair");
        assert_eq!(catalog.get(created.id).unwrap().price, 80.0);

        catalog.delete(created.id).unwrap();
        assert_eq!(catalog.get(created.id), Err(CatalogError::NotFound(created.id)));
        assert_eq!(catalog.delete(created.id), Err(CatalogError::NotFound(created.id)));
    }

    #[test]
    fn test_replace_keeping_own_name_is_allowed() {
        let catalog = Catalog::new();
        let created = catalog.create(product("Stool", 5.0)).unwrap();
        assert!(catalog.replace(created.id, product("STOOL", 6.0)).is_ok());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let catalog = Catalog::new();
        let first = catalog.create(product("One", 1.0)).unwrap();
        catalog.delete(first.id).unwrap();
        assert_eq!(catalog.create(product("Two", 1.0)).unwrap().id, 2);
    }

    #[test]
    fn test_error_mapping() {
        let not_found = ApiError::from(CatalogError::NotFound(42)).to_envelope();
        assert_eq!(not_found.message(), "Product with id '42' not found");
        assert_eq!(not_found.status_code().as_u16(), 404);

        let conflict = ApiError::from(CatalogError::DuplicateName("Lamp".into()));
        assert_eq!(conflict.status().as_u16(), 409);

        let poisoned = ApiError::from(CatalogError::Poisoned).to_envelope();
        assert_eq!(poisoned.message(), "Database operation failed");
    }
}
