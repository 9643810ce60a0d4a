//! Product types and their input validation.

use serde::{Deserialize, Serialize};

use crate::http::validation::{FieldError, FieldErrors, Validate, REQUIRED};

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 120;

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub stock: u32,
}

/// Request body for creating or replacing a product.
///
/// `name` and `price` default when absent so that both can be reported in a
/// single validation response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
}

impl Validate for NewProduct {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::body("name", REQUIRED));
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::body(
                "name",
                format!("must be at most {MAX_NAME_LEN} characters"),
            ));
        }

        if !self.price.is_finite() || self.price <= 0.0 {
            errors.push(FieldError::body("price", "must be positive"));
        }

        errors.into_result()
    }
}

impl Product {
    pub(crate) fn from_new(id: u64, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name.trim().to_string(),
            description: new.description,
            price: new.price,
            stock: new.stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_product() {
        let new = NewProduct {
            name: "Lamp".into(),
            price: 19.5,
            ..Default::default()
        };
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_reports_every_invalid_field() {
        let new = NewProduct {
            name: "   ".into(),
            price: -1.0,
            ..Default::default()
        };
        let map = new.validate().unwrap_err().to_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map["name"], "required");
        assert_eq!(map["price"], "must be positive");
    }

    #[test]
    fn test_name_length_limit() {
        let new = NewProduct {
            name: "x".repeat(MAX_NAME_LEN + 1),
            price: 1.0,
            ..Default::default()
        };
        let map = new.validate().unwrap_err().to_map();
        assert!(map["name"].contains("at most"));
    }

    #[test]
    fn test_missing_fields_default_before_validation() {
        let new: NewProduct = serde_json::from_str("{}").unwrap();
        let map = new.validate().unwrap_err().to_map();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["name", "price"]);
    }
}
