use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Everything the cart keeps about a product except the quantity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    /// Image reference (URL)
    #[serde(rename = "images", default)]
    pub image: String,
    pub price: f64,
    /// Minimum order quantity; informational only.
    #[serde(default = "default_moq")]
    pub moq: u32,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<String>,
}

fn default_moq() -> u32 { 1 }

impl ProductDescriptor {
    /// Minimal descriptor; the remaining fields can be filled with struct update syntax.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            brand: String::new(),
            image: String::new(),
            price,
            moq: 1,
            stock,
            selected_variant: None,
        }
    }

    /// Price usable in arithmetic: negative or non-finite prices count as zero.
    pub fn unit_price(&self) -> f64 {
        if self.price.is_finite() && self.price > 0.0 { self.price } else { 0.0 }
    }
}

/// A catalog product as served by `GET /api/v1/products`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub images: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_moq")]
    pub moq: u32,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Product {
    /// The backend flag alone is not trusted; an empty stock is never orderable.
    pub fn is_available(&self) -> bool { self.in_stock && self.stock > 0 }

    /// Build the cart descriptor, checking the variant against the offered list.
    pub fn to_descriptor(&self, variant: Option<&str>) -> Result<ProductDescriptor, ModelError> {
        let selected_variant = match variant {
            None => None,
            Some(v) if self.variants.iter().any(|offered| offered == v) => Some(v.to_string()),
            Some(v) => {
                return Err(ModelError::Validation(format!("variant {v} is not offered for {}", self.name)));
            }
        };
        Ok(ProductDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            image: self.images.clone(),
            price: self.price,
            moq: self.moq,
            stock: self.stock,
            selected_variant,
        })
    }
}

/// Admin form for a new catalog product.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub images: String,
    pub variants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub stock: u32,
    pub moq: u32,
}

/// Categories the admin form offers.
pub const PRODUCT_CATEGORIES: [&str; 2] = ["grocery", "beauty"];

impl NewProduct {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().chars().count() < 3 {
            return Err(ModelError::Validation("name must be at least 3 characters".into()));
        }
        for (field, value) in [("description", &self.description), ("brand", &self.brand)] {
            if value.trim().is_empty() {
                return Err(ModelError::required(field));
            }
        }
        if !PRODUCT_CATEGORIES.contains(&self.category.as_str()) {
            return Err(ModelError::Validation(format!("unknown category: {}", self.category)));
        }
        let image = self.images.trim();
        if !(image.starts_with("http://") || image.starts_with("https://")) || image.len() <= "https://".len() {
            return Err(ModelError::Validation("images must be a valid URL".into()));
        }
        if self.variants.iter().all(|v| v.trim().is_empty()) {
            return Err(ModelError::Validation("at least one variant is required".into()));
        }
        if let Some(price) = self.price {
            if !(price.is_finite() && price >= 0.0) {
                return Err(ModelError::Validation("price cannot be negative".into()));
            }
        }
        if self.moq < 1 {
            return Err(ModelError::Validation("moq must be at least 1".into()));
        }
        Ok(())
    }

    /// Validate and stamp the creating admin; `inStock` follows the stock count.
    pub fn into_request(self, created_by: impl Into<String>) -> Result<CreateProductRequest, ModelError> {
        let created_by = created_by.into();
        if created_by.trim().is_empty() {
            return Err(ModelError::required("createdBy"));
        }
        self.validate()?;
        let in_stock = self.stock > 0;
        Ok(CreateProductRequest { product: self, in_stock, created_by })
    }
}

/// Body of `POST /api/v1/products`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(flatten)]
    pub product: NewProduct,
    pub in_stock: bool,
    pub created_by: String,
}
