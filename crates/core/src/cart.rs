//! Client-side cart model.
//!
//! The cart is ephemeral client state; the storefront re-prices it through
//! the stateless pricing endpoint and at checkout. The model still lives in
//! core so the stock guard and the catalog-clamp behave identically
//! everywhere they run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing;
use crate::product::Product;
use crate::types::{ProductId, SaleType};

/// Cart operation failures, surfaced directly to the customer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("no hay más stock disponible de este producto")]
    OutOfStock,
}

/// One line in the cart: a product snapshot plus purchase parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i32,
    pub sale_type: SaleType,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CartItem {
    /// Authoritative price of one count of this line's sale type.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        pricing::price_for(&self.product, self.sale_type)
    }

    /// Line total at the authoritative price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }
}

/// The customer's cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add `quantity` of a product under a sale type.
    ///
    /// Lines merge when product, sale type and options match. Adding past
    /// the product's tracked stock is rejected and the cart is left
    /// unchanged; products without tracked stock are unlimited.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when the resulting quantity would
    /// exceed the available stock.
    pub fn add(
        &mut self,
        product: Product,
        quantity: i32,
        sale_type: SaleType,
        model: Option<String>,
        color: Option<String>,
    ) -> Result<(), CartError> {
        let existing_qty = self
            .items
            .iter()
            .find(|item| {
                item.product.id == product.id
                    && item.sale_type == sale_type
                    && item.model == model
                    && item.color == color
            })
            .map_or(0, |item| item.quantity);

        if let Some(stock) = product.stock
            && existing_qty + quantity > stock
        {
            return Err(CartError::OutOfStock);
        }

        if let Some(item) = self.items.iter_mut().find(|item| {
            item.product.id == product.id
                && item.sale_type == sale_type
                && item.model == model
                && item.color == color
        }) {
            item.quantity += quantity;
        } else {
            self.items.push(CartItem {
                product,
                quantity,
                sale_type,
                model,
                color,
            });
        }
        Ok(())
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, product_id: ProductId, sale_type: SaleType) {
        self.items
            .retain(|item| !(item.product.id == product_id && item.sale_type == sale_type));
    }

    /// Reconcile the cart against the current catalog.
    ///
    /// Refreshes each line's product snapshot, drops lines whose product
    /// disappeared or went inactive, and clamps quantities to the current
    /// stock (dropping lines clamped to zero). Returns how many lines were
    /// changed or dropped.
    pub fn clamp_to_catalog(&mut self, catalog: &[Product]) -> usize {
        let mut touched = 0;
        self.items.retain_mut(|item| {
            let Some(current) = catalog.iter().find(|p| p.id == item.product.id) else {
                touched += 1;
                return false;
            };
            if !current.active {
                touched += 1;
                return false;
            }
            item.product = current.clone();
            if let Some(stock) = current.stock {
                if stock == 0 {
                    touched += 1;
                    return false;
                }
                if item.quantity > stock {
                    item.quantity = stock;
                    touched += 1;
                }
            }
            true
        });
        touched
    }

    /// Subtotal at authoritative prices.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_fixtures::product;

    #[test]
    fn test_add_merges_matching_lines() {
        let mut cart = Cart::default();
        cart.add(product(1, 1500), 1, SaleType::Unit, None, None)
            .expect("adds");
        cart.add(product(1, 1500), 2, SaleType::Unit, None, None)
            .expect("adds");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items.first().map(|i| i.quantity), Some(3));
    }

    #[test]
    fn test_add_at_stock_limit_rejected() {
        let mut p = product(1, 1500);
        p.stock = Some(2);
        let mut cart = Cart::default();
        cart.add(p.clone(), 2, SaleType::Unit, None, None)
            .expect("within stock");
        // Cart quantity equals stock: one more unit must be rejected.
        let result = cart.add(p, 1, SaleType::Unit, None, None);
        assert_eq!(result, Err(CartError::OutOfStock));
        assert_eq!(cart.items.first().map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_untracked_stock_is_unlimited() {
        let mut cart = Cart::default();
        cart.add(product(1, 1500), 500, SaleType::Unit, None, None)
            .expect("unlimited");
        assert_eq!(cart.items.first().map(|i| i.quantity), Some(500));
    }

    #[test]
    fn test_subtotal_uses_sale_type_price() {
        let mut p = product(1, 1500);
        p.pack_enabled = true;
        p.units_per_pack = Some(6);
        p.pack_discount_pct = Some(rust_decimal::Decimal::from(10));
        let mut cart = Cart::default();
        cart.add(p, 2, SaleType::Pack, None, None).expect("adds");
        // pack = 1500 * 6 * 0.9 = 8100; two packs = 16200
        assert_eq!(cart.subtotal(), Decimal::from(16_200));
    }

    #[test]
    fn test_clamp_to_catalog_reduces_quantity() {
        let mut cart = Cart::default();
        cart.add(product(1, 1500), 5, SaleType::Unit, None, None)
            .expect("adds");

        let mut current = product(1, 1500);
        current.stock = Some(3);
        let touched = cart.clamp_to_catalog(&[current]);
        assert_eq!(touched, 1);
        assert_eq!(cart.items.first().map(|i| i.quantity), Some(3));
    }

    #[test]
    fn test_clamp_to_catalog_drops_missing_products() {
        let mut cart = Cart::default();
        cart.add(product(1, 1500), 1, SaleType::Unit, None, None)
            .expect("adds");
        let touched = cart.clamp_to_catalog(&[]);
        assert_eq!(touched, 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clamp_refreshes_price_snapshot() {
        let mut cart = Cart::default();
        cart.add(product(1, 1500), 1, SaleType::Unit, None, None)
            .expect("adds");
        let current = product(1, 1800);
        cart.clamp_to_catalog(&[current]);
        assert_eq!(cart.subtotal(), Decimal::from(1800));
    }
}
