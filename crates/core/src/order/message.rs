//! Chat message rendering for orders placed over a messaging deep link.
//!
//! The layout is fixed: header, customer, address, items, payment, summary,
//! notes, confirmation prompt. Same payload in, same text out.

use core::fmt::Write as _;

use rust_decimal::Decimal;

use super::{DeliveryAddress, OrderLine, OrderPayload};
use crate::types::CurrencyCode;

/// Render an order as a human-readable chat message.
#[must_use]
pub fn render_message(order: &OrderPayload, currency: CurrencyCode) -> String {
    let money = |amount: Decimal| currency.format(amount);
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "🛍️ *New order - {}*", order.vendor_name);
    let _ = writeln!(out, "Order: {}", order.order_number);

    let _ = writeln!(out, "\n👤 *CUSTOMER*");
    let _ = writeln!(out, "Name: {}", order.customer.name);
    let _ = writeln!(out, "Phone: {}", order.customer.phone);

    let _ = writeln!(out, "\n📍 *DELIVERY ADDRESS*");
    write_address(&mut out, &order.delivery_address);

    let _ = writeln!(out, "\n🛒 *ORDER ITEMS*");
    for (index, line) in order.items.iter().enumerate() {
        write_line(&mut out, index + 1, line, currency);
    }

    let _ = writeln!(out, "\n💳 *PAYMENT*");
    let _ = writeln!(out, "{}", order.payment_method);
    if let Some(change_for) = order.payment_method.change_for() {
        let _ = writeln!(out, "Change for: {change_for}");
    }

    let _ = writeln!(out, "\n💰 *ORDER SUMMARY*");
    let _ = writeln!(out, "Subtotal: {}", money(order.subtotal));
    let _ = writeln!(out, "Delivery: {}", money(order.delivery_fee));
    let _ = writeln!(out, "Service fee: {}", money(order.service_fee));
    if !order.discount.is_zero() {
        match &order.coupon_code {
            Some(code) => {
                let _ = writeln!(out, "Discount ({code}): -{}", money(order.discount));
            }
            None => {
                let _ = writeln!(out, "Discount: -{}", money(order.discount));
            }
        }
    }
    let _ = writeln!(out, "*TOTAL: {}*", money(order.total_amount));

    if !order.customer_notes.is_empty() {
        let _ = writeln!(out, "\n📝 *NOTES*");
        let _ = writeln!(out, "{}", order.customer_notes);
    }

    out.push_str("\n✅ Please confirm the order.");
    out
}

fn write_address(out: &mut String, address: &DeliveryAddress) {
    if address.number.trim().is_empty() {
        let _ = writeln!(out, "{}", address.street);
    } else {
        let _ = writeln!(out, "{}, {}", address.street, address.number);
    }
    if let Some(complement) = non_blank(address.complement.as_deref()) {
        let _ = writeln!(out, "Complement: {complement}");
    }
    let _ = writeln!(out, "Neighborhood: {}", address.neighborhood);
    if address.state.trim().is_empty() {
        let _ = writeln!(out, "City: {}", address.city);
    } else {
        let _ = writeln!(out, "City: {} - {}", address.city, address.state);
    }
    if let Some(zip) = non_blank(Some(&address.zip_code)) {
        let _ = writeln!(out, "Zip code: {zip}");
    }
    if let Some(reference) = non_blank(address.reference.as_deref()) {
        let _ = writeln!(out, "Reference: {reference}");
    }
}

fn write_line(out: &mut String, position: usize, line: &OrderLine, currency: CurrencyCode) {
    let _ = writeln!(out, "{position}. *{}*", line.name);
    let _ = writeln!(out, "   Quantity: {}x", line.quantity);
    let _ = writeln!(out, "   Unit price: {}", currency.format(line.unit_price));
    for customization in &line.customizations {
        let options = customization
            .selected_options
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if customization.surcharge.is_zero() {
            let _ = writeln!(out, "   {}: {options}", customization.name);
        } else {
            let _ = writeln!(
                out,
                "   {}: {options} (+{})",
                customization.name,
                currency.format(customization.surcharge)
            );
        }
    }
    let _ = writeln!(out, "   Subtotal: {}", currency.format(line.line_total));
    if !line.special_instructions.is_empty() {
        let _ = writeln!(out, "   📝 Notes: {}", line.special_instructions);
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Percent-encode a message for use in a URL query parameter.
#[must_use]
pub fn encode_message(message: &str) -> String {
    urlencoding::encode(message).into_owned()
}
