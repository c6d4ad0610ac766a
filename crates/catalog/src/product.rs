use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, ProductId};

/// Descriptive-attribute defaults applied at creation.
pub const DEFAULT_STOCK: u32 = 100;
pub const DEFAULT_RATING: f32 = 4.5;
pub const DEFAULT_REVIEW_COUNT: u32 = 0;
pub const DEFAULT_BRAND: &str = "Modern Store";
pub const DEFAULT_WEIGHT: &str = "N/A";
pub const DEFAULT_DIMENSIONS: &str = "N/A";

fn default_colors() -> Vec<String> {
    vec!["Black".to_string(), "White".to_string()]
}

/// Full product record as held by the catalog store.
///
/// The wire format is camelCase JSON; the same layout is used for API
/// responses and for the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Main image locator. Non-empty once the product is fully created.
    pub image: String,
    /// Additional image locators, in submission order.
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub is_featured: bool,
    pub stock: u32,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub rating: f32,
    pub review_count: u32,
    pub brand: String,
    pub weight: String,
    pub dimensions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a record from resolved creation fields.
    ///
    /// Timestamps and the identifier are assigned by the store; descriptive
    /// attributes not present in the creation input take their documented
    /// defaults.
    pub fn create(id: ProductId, new: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            image: new.image,
            images: new.images,
            category: new.category,
            is_featured: false,
            stock: DEFAULT_STOCK,
            colors: default_colors(),
            sizes: Vec::new(),
            rating: DEFAULT_RATING,
            review_count: DEFAULT_REVIEW_COUNT,
            brand: DEFAULT_BRAND.to_string(),
            weight: DEFAULT_WEIGHT.to_string(),
            dimensions: DEFAULT_DIMENSIONS.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply field-level changes in place; only set fields are touched.
    ///
    /// `images` carries full-replacement semantics: `Some(empty)` clears the
    /// list, `None` leaves it unchanged.
    pub fn apply_update(&mut self, update: ProductUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(is_featured) = update.is_featured {
            self.is_featured = is_featured;
        }
        self.updated_at = now;
    }

    /// Reduced-field view used by the snapshot cache and recommendations.
    pub fn lean(&self) -> LeanProduct {
        LeanProduct {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            price: self.price,
        }
    }
}

/// Lean projection: id, name, description, main image, price.
///
/// Additional images and descriptive attributes are deliberately excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeanProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
}

/// Creation input as submitted by callers.
///
/// `image` and `images` carry raw payloads to upload (e.g. data URLs), not
/// hosted locators; the image lifecycle resolves them before the store write.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
}

impl ProductDraft {
    pub fn validate(&self) -> DomainResult<()> {
        require_non_blank("name", &self.name)?;
        require_non_blank("description", &self.description)?;
        require_non_blank("category", &self.category)?;
        require_valid_price(self.price)
    }
}

/// Update input as submitted by callers. Any subset of fields may be set.
///
/// Image fields carry payloads, as in [`ProductDraft`]. A submitted `images`
/// list fully replaces the stored one; an absent field leaves it unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_featured: Option<bool>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        if let Some(description) = &self.description {
            require_non_blank("description", description)?;
        }
        if let Some(category) = &self.category {
            require_non_blank("category", category)?;
        }
        if let Some(price) = self.price {
            require_valid_price(price)?;
        }
        Ok(())
    }
}

/// Resolved creation fields handed to the catalog store: locators, not
/// payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub images: Vec<String>,
}

/// Resolved field-level changes handed to the catalog store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_featured: Option<bool>,
}

fn require_non_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_valid_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("price must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draft() -> ProductDraft {
        ProductDraft {
            name: "Canvas Tote".to_string(),
            description: "Everyday carry bag".to_string(),
            price: 39.99,
            category: "bags".to_string(),
            image: Some("data:image/png;base64,AAAA".to_string()),
            images: None,
        }
    }

    fn test_product() -> Product {
        Product::create(
            ProductId::new(),
            NewProduct {
                name: "Canvas Tote".to_string(),
                description: "Everyday carry bag".to_string(),
                price: 39.99,
                category: "bags".to_string(),
                image: "https://img.example/products/tote.png".to_string(),
                images: vec![
                    "https://img.example/products/tote-side.png".to_string(),
                    "https://img.example/products/tote-back.png".to_string(),
                ],
            },
            Utc::now(),
        )
    }

    #[test]
    fn create_applies_documented_defaults() {
        let product = test_product();

        assert!(!product.is_featured);
        assert_eq!(product.stock, DEFAULT_STOCK);
        assert_eq!(product.colors, vec!["Black", "White"]);
        assert!(product.sizes.is_empty());
        assert_eq!(product.rating, DEFAULT_RATING);
        assert_eq!(product.review_count, 0);
        assert_eq!(product.brand, DEFAULT_BRAND);
        assert_eq!(product.weight, DEFAULT_WEIGHT);
        assert_eq!(product.dimensions, DEFAULT_DIMENSIONS);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn draft_validation_rejects_blank_required_fields() {
        for field in ["name", "description", "category"] {
            let mut draft = test_draft();
            match field {
                "name" => draft.name = "   ".to_string(),
                "description" => draft.description = String::new(),
                _ => draft.category = "\t".to_string(),
            }
            let err = draft.validate().unwrap_err();
            match err {
                DomainError::Validation(msg) => assert!(msg.contains(field)),
                other => panic!("expected Validation, got {other:?}"),
            }
        }
    }

    #[test]
    fn draft_validation_rejects_bad_prices() {
        for price in [-0.01, f64::NAN, f64::INFINITY] {
            let draft = ProductDraft {
                price,
                ..test_draft()
            };
            assert!(matches!(
                draft.validate(),
                Err(DomainError::Validation(_))
            ));
        }
    }

    #[test]
    fn patch_validation_only_checks_set_fields() {
        let patch = ProductPatch::default();
        assert!(patch.validate().is_ok());

        let patch = ProductPatch {
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn apply_update_touches_only_set_fields() {
        let mut product = test_product();
        let before = product.clone();
        let later = before.updated_at + chrono::Duration::seconds(5);

        product.apply_update(
            ProductUpdate {
                price: Some(24.5),
                is_featured: Some(true),
                ..Default::default()
            },
            later,
        );

        assert_eq!(product.price, 24.5);
        assert!(product.is_featured);
        assert_eq!(product.name, before.name);
        assert_eq!(product.image, before.image);
        assert_eq!(product.images, before.images);
        assert_eq!(product.created_at, before.created_at);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn explicit_empty_images_clears_while_absent_leaves_unchanged() {
        let mut product = test_product();
        let now = Utc::now();

        product.apply_update(ProductUpdate::default(), now);
        assert_eq!(product.images.len(), 2);

        product.apply_update(
            ProductUpdate {
                images: Some(Vec::new()),
                ..Default::default()
            },
            now,
        );
        assert!(product.images.is_empty());
    }

    #[test]
    fn lean_projection_excludes_heavy_fields() {
        let product = test_product();
        let lean = product.lean();

        assert_eq!(lean.id, product.id);
        assert_eq!(lean.name, product.name);
        assert_eq!(lean.description, product.description);
        assert_eq!(lean.image, product.image);
        assert_eq!(lean.price, product.price);

        let value = serde_json::to_value(&lean).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        assert!(!obj.contains_key("images"));
        assert!(!obj.contains_key("isFeatured"));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let value = serde_json::to_value(test_product()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("isFeatured"));
        assert!(obj.contains_key("reviewCount"));
        assert!(obj.contains_key("createdAt"));
        assert!(!obj.contains_key("is_featured"));
    }

    #[test]
    fn patch_distinguishes_absent_from_empty_list() {
        let absent: ProductPatch = serde_json::from_str(r#"{"name":"Tote"}"#).unwrap();
        assert!(absent.images.is_none());

        let cleared: ProductPatch = serde_json::from_str(r#"{"images":[]}"#).unwrap();
        assert_eq!(cleared.images, Some(Vec::new()));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: any draft with non-blank text fields and a finite
            /// non-negative price validates.
            #[test]
            fn well_formed_drafts_validate(
                name in "[A-Za-z][A-Za-z0-9 ]{0,49}",
                description in "[A-Za-z][A-Za-z0-9 ]{0,99}",
                category in "[a-z]{1,20}",
                price in 0.0f64..100_000.0
            ) {
                let draft = ProductDraft {
                    name,
                    description,
                    price,
                    category,
                    image: None,
                    images: None,
                };
                prop_assert!(draft.validate().is_ok());
            }

            /// Property: a negative price always fails validation, whatever
            /// the rest of the draft looks like.
            #[test]
            fn negative_prices_never_validate(
                name in "[A-Za-z][A-Za-z0-9 ]{0,49}",
                price in -100_000.0f64..-0.000_001
            ) {
                let draft = ProductDraft {
                    name: name.clone(),
                    description: name.clone(),
                    price,
                    category: name,
                    image: None,
                    images: None,
                };
                prop_assert!(matches!(
                    draft.validate(),
                    Err(DomainError::Validation(_))
                ));
            }

            /// Property: the lean projection is a faithful field subset.
            #[test]
            fn lean_is_a_field_subset(
                name in "[A-Za-z][A-Za-z0-9 ]{0,49}",
                description in "[A-Za-z][A-Za-z0-9 ]{0,99}",
                price in 0.0f64..100_000.0
            ) {
                let product = Product::create(
                    ProductId::new(),
                    NewProduct {
                        name: name.clone(),
                        description: description.clone(),
                        price,
                        category: "misc".to_string(),
                        image: "https://img.example/products/x.png".to_string(),
                        images: Vec::new(),
                    },
                    Utc::now(),
                );
                let lean = product.lean();
                prop_assert_eq!(lean.name, name);
                prop_assert_eq!(lean.description, description);
                prop_assert_eq!(lean.price, price);
            }
        }
    }
}
