use chrono::Utc;

use crate::actor_framework::{Entity, OwnerKey};
use crate::domain::{Cart, CartCreate, CartItem, CartItemCreate, CartItemPatch, CartPatch};
use crate::lifecycle::{ActiveFlag, SoftDeletable};

fn non_negative(label: &str, value: Option<f64>) -> Result<(), String> {
    match value {
        Some(v) if v < 0.0 => Err(format!("{label} must not be negative")),
        _ => Ok(()),
    }
}

impl Cart {
    fn check_constraints(&self) -> Result<(), String> {
        non_negative("Cart price", self.price)?;
        non_negative("Delivery fee", self.delivery_fee)?;
        non_negative("Deposit fee", self.deposit_fee)
    }
}

impl Entity for Cart {
    type Id = u64;
    type CreatePayload = CartCreate;
    type Patch = CartPatch;
    const KIND: &'static str = "cart";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn from_create(id: u64, params: CartCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            price: params.price,
            location: params.location,
            planned_time: params.planned_time,
            is_active: ActiveFlag::Active,
            created_at: Some(Utc::now()),
            updated_at: None,
            contact_id: params.contact_id,
            user_id: params.user_id,
            delivery_fee: params.delivery_fee,
            deposit_fee: params.deposit_fee,
            is_pickup: params.is_pickup,
            region: params.region,
        })
    }

    fn is_active(&self) -> bool {
        self.is_active == ActiveFlag::Active
    }

    fn on_create(&mut self) -> Result<(), String> {
        self.check_constraints()
    }

    fn on_save(&mut self) -> Result<(), String> {
        self.check_constraints()?;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

impl SoftDeletable for Cart {
    fn deactivate(&mut self) {
        self.is_active = ActiveFlag::Inactive;
    }
}

impl CartItem {
    fn check_constraints(&self) -> Result<(), String> {
        if self.quantity == 0 {
            return Err("Cart item quantity must be positive".to_string());
        }
        non_negative("Cart item price", self.price)
    }
}

impl Entity for CartItem {
    type Id = u64;
    type CreatePayload = CartItemCreate;
    type Patch = CartItemPatch;
    const KIND: &'static str = "cart_item";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn from_create(id: u64, params: CartItemCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            cart_id: params.cart_id,
            prod_id: params.prod_id,
            quantity: params.quantity,
            price: params.price,
            is_active: ActiveFlag::Active,
            created_at: Some(Utc::now()),
            updated_at: None,
        })
    }

    fn is_active(&self) -> bool {
        self.is_active == ActiveFlag::Active
    }

    fn owner(&self) -> Option<OwnerKey> {
        Some(self.cart_id)
    }

    fn on_create(&mut self) -> Result<(), String> {
        self.check_constraints()
    }

    fn on_save(&mut self) -> Result<(), String> {
        self.check_constraints()?;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

impl SoftDeletable for CartItem {
    fn deactivate(&mut self) {
        self.is_active = ActiveFlag::Inactive;
    }
}
