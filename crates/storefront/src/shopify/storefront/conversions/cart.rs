//! Cart type conversion functions.

use crate::shopify::types::{Cart, CartCost, CartDiscountCode, CartLine};

use super::super::queries::{CartFields, CartLineFields, CartUserErrorFields};
use super::products::{convert_money, convert_variant};

fn convert_cart_line(line: CartLineFields) -> CartLine {
    CartLine {
        id: line.id,
        quantity: line.quantity,
        total_amount: convert_money(line.cost.total_amount),
        merchandise: convert_variant(line.merchandise),
    }
}

pub fn convert_cart(cart: CartFields) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url.filter(|url| !url.is_empty()),
        total_quantity: cart.total_quantity,
        cost: CartCost {
            subtotal_amount: cart.cost.subtotal_amount.map(convert_money),
            total_amount: cart.cost.total_amount.map(convert_money),
        },
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|code| CartDiscountCode {
                code: code.code,
                applicable: code.applicable,
            })
            .collect(),
        lines: cart.lines.nodes.into_iter().map(convert_cart_line).collect(),
    }
}

/// Join mutation user errors into one message, prefixed by the input field path.
pub fn user_error_message(errors: Vec<CartUserErrorFields>) -> String {
    errors
        .into_iter()
        .map(|e| match e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
            _ => e.message,
        })
        .collect::<Vec<_>>()
        .join("; ")
}
