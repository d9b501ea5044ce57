//! Sample listings for empty catalogs.
//!
//! The samples go through the same form validation and repository path as
//! listings added by hand, so they read back exactly like real ones.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use market_stall_core::{NewProduct, ProductForm, ProductId, UserId};

use crate::identity::Session;
use crate::products::ProductRepository;
use crate::store::StoreError;

/// Owner recorded on every sample listing.
pub const SAMPLE_OWNER: &str = "sample";

/// name, store, address, description, quantity, price, tags
const SAMPLES: &[[&str; 7]] = &[
    [
        "Gaming Laptop",
        "TechStore Plus",
        "123 High Street, London",
        "High-performance gaming laptop with RTX graphics",
        "5",
        "999.99",
        "electronics, gaming, laptop, computer",
    ],
    [
        "Organic Coffee",
        "Bean There Cafe",
        "456 Coffee Lane, Manchester",
        "Fresh roasted organic coffee beans",
        "20",
        "12.99",
        "food, coffee, organic, beans",
    ],
    [
        "Programming Book",
        "BookWorld",
        "789 Knowledge Ave, Birmingham",
        "Complete guide to Java programming",
        "15",
        "29.99",
        "books, education, programming, java",
    ],
    [
        "Wireless Headphones",
        "Sound Solutions",
        "321 Music Street, Liverpool",
        "Noise-cancelling wireless headphones",
        "8",
        "199.99",
        "electronics, audio, headphones, wireless",
    ],
    [
        "Indoor Plant",
        "Green Thumb Garden",
        "654 Garden Road, Edinburgh",
        "Beautiful indoor plant perfect for offices",
        "12",
        "24.99",
        "plants, home, decor, indoor",
    ],
    [
        "Smartphone",
        "Mobile Mania",
        "987 Phone Plaza, Cardiff",
        "Latest model with advanced camera features",
        "3",
        "799.99",
        "electronics, mobile, smartphone, camera",
    ],
    [
        "Office Chair",
        "Furniture First",
        "147 Comfort Close, Bristol",
        "Ergonomic office chair for all-day comfort",
        "6",
        "149.99",
        "furniture, office, chair, ergonomic",
    ],
    [
        "Water Bottle",
        "Fitness Gear",
        "258 Health Highway, Leeds",
        "Stainless steel insulated water bottle",
        "25",
        "19.99",
        "sports, fitness, water, bottle",
    ],
];

/// The sample listings as filled-in add-item forms.
#[must_use]
pub fn sample_forms() -> Vec<ProductForm> {
    SAMPLES
        .iter()
        .map(
            |[name, store_name, store_address, description, quantity, price, tags]| ProductForm {
                name: (*name).to_owned(),
                store_name: (*store_name).to_owned(),
                store_address: (*store_address).to_owned(),
                description: (*description).to_owned(),
                quantity: (*quantity).to_owned(),
                tags: (*tags).to_owned(),
                price: (*price).to_owned(),
            },
        )
        .collect()
}

/// The sample listings, owned by [`SAMPLE_OWNER`] and dated `now`.
#[must_use]
pub fn sample_products(now: DateTime<Utc>) -> Vec<NewProduct> {
    let owner = UserId::new(SAMPLE_OWNER);
    sample_forms()
        .iter()
        .filter_map(|form| match form.to_new_product(&owner, now) {
            Ok(product) => Some(product),
            Err(errors) => {
                warn!(name = %form.name, %errors, "Invalid sample listing");
                None
            }
        })
        .collect()
}

/// Outcome of [`seed_catalog`].
#[derive(Debug, Default)]
pub struct SeedReport {
    pub inserted: Vec<ProductId>,
    /// Listing name and the error that stopped it.
    pub failed: Vec<(String, StoreError)>,
}

/// Append every sample listing to the catalog.
///
/// A failed write is recorded and the remaining samples are still attempted.
pub async fn seed_catalog(
    repo: &ProductRepository<'_>,
    session: &Session,
    now: DateTime<Utc>,
) -> SeedReport {
    let mut report = SeedReport::default();

    for product in sample_products(now) {
        match repo.create(session, &product).await {
            Ok(id) => {
                info!(%id, name = %product.name, "Sample product added");
                report.inserted.push(id);
            }
            Err(e) => {
                warn!(name = %product.name, error = %e, "Error adding sample product");
                report.failed.push((product.name, e));
            }
        }
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use market_stall_core::Category;
    use secrecy::SecretString;

    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_every_sample_is_valid() {
        for form in sample_forms() {
            assert!(form.validate().is_empty(), "{} is invalid", form.name);
        }
        assert_eq!(sample_products(Utc::now()).len(), SAMPLES.len());
    }

    #[test]
    fn test_sample_categories() {
        let categories: Vec<Category> = sample_products(Utc::now())
            .into_iter()
            .map(|p| p.category)
            .collect();
        assert_eq!(
            categories,
            [
                Category::Electronics,
                Category::FoodAndDrink,
                Category::Education,
                Category::Electronics,
                Category::Home,
                Category::Electronics,
                Category::Home,
                Category::Sports,
            ]
        );
    }

    #[test]
    fn test_samples_are_owned_by_sample_user() {
        assert!(
            sample_products(Utc::now())
                .iter()
                .all(|p| p.business_user_id.as_str() == SAMPLE_OWNER)
        );
    }

    #[tokio::test]
    async fn test_seed_catalog_inserts_all() {
        let store = InMemoryStore::new();
        let repo = ProductRepository::new(&store, "products");
        let session = Session::new(UserId::new("admin"), "a@b.co", SecretString::from("t"));

        let report = seed_catalog(&repo, &session, Utc::now()).await;
        assert_eq!(report.inserted.len(), SAMPLES.len());
        assert!(report.failed.is_empty());

        let products = repo.list_all(&session).await.unwrap();
        assert_eq!(products[0].name, "Gaming Laptop");
        assert_eq!(products[0].price.to_string(), "999.99");
    }

    #[tokio::test]
    async fn test_seed_catalog_reports_failures() {
        let store = InMemoryStore::new();
        store.set_fail_writes(true);
        let repo = ProductRepository::new(&store, "products");
        let session = Session::new(UserId::new("admin"), "a@b.co", SecretString::from("t"));

        let report = seed_catalog(&repo, &session, Utc::now()).await;
        assert!(report.inserted.is_empty());
        assert_eq!(report.failed.len(), SAMPLES.len());
    }
}
