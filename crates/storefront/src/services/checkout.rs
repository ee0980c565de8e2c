//! The order assembler.
//!
//! Validates the checkout request, re-prices every line from the catalog
//! (client prices are never trusted), quotes shipping, and persists the
//! order together with its outbox intents in one transaction. Stock
//! decrements are conditional updates inside that transaction, so two
//! concurrent checkouts can never oversell a tracked product.

use std::collections::HashMap;

use tracing::{info, instrument};

use crafteo_core::order::{NewOrder, Order, OrderItem};
use crafteo_core::pricing;
use crafteo_core::product::Product;
use crafteo_core::types::ProductId;

use crate::db::{OrderDraft, OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::services::quotes;
use crate::state::AppState;

/// Create an order from a checkout request.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for bad input or unavailable products,
/// [`AppError::OutOfStock`] when a tracked product cannot cover the order,
/// [`AppError::ShippingQuote`] when the method cannot be priced, or
/// [`AppError::Database`] on persistence failures. Side effects (material
/// draws, webhook, email) never influence this result.
#[instrument(skip(state, input), fields(customer = %input.customer.email))]
pub async fn create_order(state: &AppState, input: NewOrder) -> Result<Order, AppError> {
    input.validate()?;

    let mut ids: Vec<ProductId> = input.items.iter().map(|i| i.product_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let products: HashMap<ProductId, Product> = ProductRepository::new(state.pool())
        .get_many(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut items = Vec::with_capacity(input.items.len());
    let mut stock_lines = Vec::new();
    let mut lines = Vec::with_capacity(input.items.len());

    for requested in &input.items {
        let product = products
            .get(&requested.product_id)
            .filter(|p| p.active)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "el producto {} ya no está disponible",
                    requested.product_id
                ))
            })?;

        items.push(OrderItem {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: pricing::price_for(product, requested.sale_type),
            quantity: requested.quantity,
            sale_type: requested.sale_type,
            image_url: product.image_url.clone(),
            model: requested.model.clone(),
            color: requested.color.clone(),
        });
        if product.stock.is_some() {
            stock_lines.push((product.id, requested.quantity));
        }
        lines.push((product.clone(), requested.quantity));
    }

    let subtotal = items.iter().map(OrderItem::line_total).sum();

    let shipping = quotes::quote(
        state,
        input.shipping_method,
        input.customer.postal_code.as_deref(),
        &lines,
        subtotal,
    )
    .await?;

    let draft = OrderDraft {
        customer: input.customer,
        items,
        subtotal,
        shipping_cost: shipping.cost,
        total: subtotal + shipping.cost,
        shipping_method: input.shipping_method,
        notes: input.notes,
        stock_lines,
    };

    let order = OrderRepository::new(state.pool()).create(draft).await?;

    info!(
        order_id = %order.id,
        order_number = order.order_number,
        total = %order.total,
        "order created"
    );

    Ok(order)
}
