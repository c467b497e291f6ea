//! WhatsApp order relay.
//!
//! Checkout does not charge anything; it records the order and hands the
//! shopper a `wa.me` deep link whose message is pre-filled from the store's
//! order template. Templating is plain placeholder substitution.

use rust_decimal::Decimal;

use storelane_core::Money;

use crate::db::orders::OrderLine;
use crate::db::stores::Store;

/// Used when a store has no template configured.
pub const DEFAULT_TEMPLATE: &str = "Hello! I'd like to place an order.\n\n\
     Order #{order_id}\n{items}\nTotal: {total} {currency}\n\n\
     Name: {customer_name}\nAddress: {customer_address}";

/// Render a store's order template.
///
/// Recognized placeholders: `{order_id}`, `{items}`, `{total}`, `{currency}`,
/// `{customer_name}`, `{customer_phone}`, `{customer_address}`. Unknown
/// placeholders pass through untouched.
#[must_use]
pub fn render_order_message(
    template: &str,
    order_id: i32,
    lines: &[OrderLine],
    total: Decimal,
    currency: &str,
    customer_name: &str,
    customer_phone: &str,
    customer_address: &str,
) -> String {
    let items = lines
        .iter()
        .map(|line| {
            format!("- {} x{} ({})", line.name, line.quantity, Money::new(line.total(), currency))
        })
        .collect::<Vec<_>>()
        .join("\n");

    template
        .replace("{order_id}", &order_id.to_string())
        .replace("{items}", &items)
        .replace("{total}", &format!("{total:.2}"))
        .replace("{currency}", currency)
        .replace("{customer_name}", customer_name)
        .replace("{customer_phone}", customer_phone)
        .replace("{customer_address}", customer_address)
}

/// Build the `wa.me` deep link for a rendered message.
///
/// The store's WhatsApp number is stripped to digits (wa.me rejects `+`
/// and separators); the message is urlencoded into the `text` query param.
#[must_use]
pub fn deep_link(store: &Store, message: &str) -> String {
    let number: String = store
        .whatsapp_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    format!("https://wa.me/{number}?text={}", urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<OrderLine> {
        vec![
            OrderLine {
                product_id: storelane_core::ProductId::new(1),
                name: "Espresso Beans".to_string(),
                price: Decimal::new(1250, 2),
                quantity: 2,
            },
            OrderLine {
                product_id: storelane_core::ProductId::new(2),
                name: "Mug".to_string(),
                price: Decimal::new(800, 2),
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let message = render_order_message(
            "Order #{order_id} for {customer_name}: {total} {currency}",
            42,
            &lines(),
            Decimal::new(3300, 2),
            "USD",
            "Dana",
            "15551234567",
            "12 Main St",
        );
        assert_eq!(message, "Order #42 for Dana: 33.00 USD");
    }

    #[test]
    fn test_render_items_block() {
        let message = render_order_message(
            "{items}",
            1,
            &lines(),
            Decimal::new(3300, 2),
            "USD",
            "",
            "",
            "",
        );
        assert_eq!(
            message,
            "- Espresso Beans x2 (25.00 USD)\n- Mug x1 (8.00 USD)"
        );
    }

    #[test]
    fn test_amounts_always_carry_two_decimals() {
        let line = OrderLine {
            product_id: storelane_core::ProductId::new(3),
            name: "Tote".to_string(),
            price: Decimal::new(5, 0),
            quantity: 1,
        };
        let message = render_order_message(
            "{items}\nTotal: {total}",
            1,
            &[line],
            Decimal::new(5, 0),
            "EUR",
            "",
            "",
            "",
        );
        assert_eq!(message, "- Tote x1 (5.00 EUR)\nTotal: 5.00");
    }

    #[test]
    fn test_unknown_placeholder_passes_through() {
        let message = render_order_message(
            "{order_id} {mystery}",
            7,
            &[],
            Decimal::ZERO,
            "USD",
            "",
            "",
            "",
        );
        assert_eq!(message, "7 {mystery}");
    }

    #[test]
    fn test_deep_link_encodes_message() {
        let store = crate::db::stores::test_store_fixture("+1 (555) 123-4567");
        let url = deep_link(&store, "Order #42: 2 items");
        assert_eq!(url, "https://wa.me/15551234567?text=Order%20%2342%3A%202%20items");
    }
}
