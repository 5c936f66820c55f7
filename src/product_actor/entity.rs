use chrono::Utc;

use crate::actor_framework::{Entity, OwnerKey};
use crate::domain::{
    Product, ProductCreate, ProductMedia, ProductMediaCreate, ProductMediaPatch, ProductPatch,
};
use crate::lifecycle::{ActiveFlag, SoftDeletable};

impl Product {
    fn check_constraints(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Product title must not be empty".to_string());
        }
        if matches!(self.price, Some(price) if price < 0.0) {
            return Err("Product price must not be negative".to_string());
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = u64;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    const KIND: &'static str = "product";

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a live product stamped with the creation time.
    fn from_create(id: u64, params: ProductCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            title: params.title,
            subtitle: params.subtitle,
            description: params.description,
            price: params.price,
            category_id: params.category_id,
            prod_type_id: params.prod_type_id,
            special_order: params.special_order,
            is_active: ActiveFlag::Active,
            created_at: Some(Utc::now()),
            updated_at: None,
        })
    }

    fn is_active(&self) -> bool {
        self.is_active == ActiveFlag::Active
    }

    fn on_create(&mut self) -> Result<(), String> {
        self.check_constraints()
    }

    /// Rejects rows violating the product constraints and stamps `updated_at`.
    fn on_save(&mut self) -> Result<(), String> {
        self.check_constraints()?;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

impl SoftDeletable for Product {
    fn deactivate(&mut self) {
        self.is_active = ActiveFlag::Inactive;
    }
}

impl Entity for ProductMedia {
    type Id = u64;
    type CreatePayload = ProductMediaCreate;
    type Patch = ProductMediaPatch;
    const KIND: &'static str = "product_media";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn from_create(id: u64, params: ProductMediaCreate) -> Result<Self, String> {
        if params.url.trim().is_empty() {
            return Err("Media url must not be empty".to_string());
        }
        Ok(Self {
            id,
            prod_id: params.prod_id,
            url: params.url,
            created_at: Some(Utc::now()),
        })
    }

    fn owner(&self) -> Option<OwnerKey> {
        Some(self.prod_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, price: Option<f64>) -> ProductCreate {
        ProductCreate {
            title: title.to_string(),
            price,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_product_is_live_and_stamped() {
        let mut product = Product::from_create(4, create("Lamp", Some(3.0))).unwrap();
        assert!(product.on_create().is_ok());
        assert_eq!(product.is_active, ActiveFlag::Active);
        assert!(product.created_at.is_some());
        assert!(product.updated_at.is_none());
    }

    #[test]
    fn test_constraints() {
        let mut untitled = Product::from_create(1, create("  ", None)).unwrap();
        assert_eq!(
            untitled.on_create(),
            Err("Product title must not be empty".to_string())
        );

        let mut negative = Product::from_create(2, create("Lamp", Some(-1.0))).unwrap();
        assert_eq!(
            negative.on_save(),
            Err("Product price must not be negative".to_string())
        );
        assert!(negative.updated_at.is_none());
    }

    #[test]
    fn test_deactivate_hides_row() {
        let mut product = Product::from_create(1, create("Lamp", None)).unwrap();
        product.deactivate();
        assert!(!Entity::is_active(&product));
    }

    #[test]
    fn test_media_is_owned_by_product() {
        let media = ProductMedia::from_create(
            9,
            ProductMediaCreate {
                prod_id: 4,
                url: "/img/4.jpg".to_string(),
            },
        )
        .unwrap();
        assert_eq!(media.owner(), Some(4));
        assert!(ProductMedia::from_create(
            10,
            ProductMediaCreate {
                prod_id: 4,
                url: String::new(),
            }
        )
        .is_err());
    }
}
