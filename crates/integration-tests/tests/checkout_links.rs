//! Tests for WhatsApp order messages and deep links.

use chrono::Utc;
use rust_decimal::Decimal;

use storelane_core::{MerchantId, ProductId, Slug, StoreId};
use storelane_platform::db::orders::OrderLine;
use storelane_platform::db::stores::Store;
use storelane_platform::whatsapp::{DEFAULT_TEMPLATE, deep_link, render_order_message};

fn store_with_number(number: &str) -> Store {
    Store {
        id: StoreId::new(1),
        merchant_id: MerchantId::new(uuid::Uuid::nil()),
        name: "Corner Coffee".to_string(),
        slug: Slug::parse("corner-coffee").expect("valid slug"),
        theme_primary_color: "#1a1a1a".to_string(),
        theme_accent_color: "#e0a458".to_string(),
        theme_font: "Inter".to_string(),
        currency: "USD".to_string(),
        delivery_enabled: true,
        delivery_fee: Decimal::new(500, 2),
        whatsapp_number: number.to_string(),
        order_template: String::new(),
        active: true,
        custom_domain: None,
        domain_verified: false,
        domain_status: None,
        domain_checked_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_lines() -> Vec<OrderLine> {
    vec![OrderLine {
        product_id: ProductId::new(10),
        name: "Flat White".to_string(),
        price: Decimal::new(450, 2),
        quantity: 2,
    }]
}

#[test]
fn test_default_template_renders_complete_message() {
    let message = render_order_message(
        DEFAULT_TEMPLATE,
        17,
        &sample_lines(),
        Decimal::new(1400, 2),
        "USD",
        "Dana",
        "15551234567",
        "12 Main St",
    );

    assert!(message.contains("Order #17"));
    assert!(message.contains("- Flat White x2 (9.00 USD)"));
    assert!(message.contains("Total: 14.00 USD"));
    assert!(message.contains("Name: Dana"));
    assert!(!message.contains('{'), "no unfilled placeholders: {message}");
}

#[test]
fn test_merchant_template_overrides_default() {
    let message = render_order_message(
        "New order {order_id}!",
        3,
        &sample_lines(),
        Decimal::new(900, 2),
        "USD",
        "",
        "",
        "",
    );
    assert_eq!(message, "New order 3!");
}

#[test]
fn test_deep_link_strips_number_formatting() {
    let store = store_with_number("+1 (555) 123-4567");
    let url = deep_link(&store, "hi");
    assert!(url.starts_with("https://wa.me/15551234567?text="));
}

#[test]
fn test_deep_link_urlencodes_message() {
    let store = store_with_number("15551234567");
    let url = deep_link(&store, "Order #9: café & más");

    assert!(!url.contains(' '));
    assert!(!url.contains('#'));
    assert!(url.contains("text=Order%20%239%3A%20caf%C3%A9%20%26%20m%C3%A1s"));
}
