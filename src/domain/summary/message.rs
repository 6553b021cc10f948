//! Shareable list messages

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use chrono::NaiveDate;

use super::format::{format_amount, format_date, format_line_amount};
use crate::domain::categorization::{normalize_name, CategorizedItem, FALLBACK_CATEGORY};
use crate::domain::product::Product;

/// Products sharing a resolved category, with their subtotal
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: String,
    pub products: Vec<&'a Product>,
    pub subtotal: f64,
}

/// Group `products` by the category the model assigned them
///
/// Names are matched trimmed and case-insensitively; on duplicate names
/// the last item wins. Unmatched products land in [`FALLBACK_CATEGORY`].
/// Groups come back sorted by category label, members in stored order.
pub fn group_by_category<'a>(
    products: &'a [Product],
    items: &[CategorizedItem],
) -> Vec<CategoryGroup<'a>> {
    let lookup: HashMap<String, &str> = items
        .iter()
        .map(|item| (normalize_name(&item.name), item.category.as_str()))
        .collect();

    let mut grouped: BTreeMap<&str, Vec<&'a Product>> = BTreeMap::new();
    for product in products {
        let category = lookup
            .get(&normalize_name(product.name()))
            .copied()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(FALLBACK_CATEGORY);
        grouped.entry(category).or_default().push(product);
    }

    grouped
        .into_iter()
        .map(|(category, products)| CategoryGroup {
            category: category.to_string(),
            subtotal: products.iter().map(|p| p.line_total()).sum(),
            products,
        })
        .collect()
}

fn grand_total(products: &[Product]) -> f64 {
    products.iter().map(Product::line_total).sum()
}

fn header(date: NaiveDate) -> String {
    format!("Lista de productos - {}\n\n", format_date(date))
}

/// Grouped message with per-category subtotals and a grand total
pub fn format_categorized_message(
    products: &[Product],
    items: &[CategorizedItem],
    date: NaiveDate,
) -> String {
    let mut message = header(date);

    for group in group_by_category(products, items) {
        let _ = writeln!(
            message,
            "📁 {} - ${}",
            group.category,
            format_amount(group.subtotal)
        );
        for product in &group.products {
            let _ = writeln!(
                message,
                "  • {} x {} - ${}",
                product.name(),
                product.quantity(),
                format_line_amount(product.line_total())
            );
        }
        message.push('\n');
    }

    let _ = write!(
        message,
        "💰 Total General: ${}",
        format_amount(grand_total(products))
    );
    message
}

/// Ungrouped message listing products in stored order
pub fn format_plain_message(products: &[Product], date: NaiveDate) -> String {
    let mut message = header(date);

    for product in products {
        let _ = writeln!(
            message,
            "• {} x {} - ${}",
            product.name(),
            product.quantity(),
            format_line_amount(product.line_total())
        );
    }

    let _ = write!(
        message,
        "\n💰 Total General: ${}",
        format_amount(grand_total(products))
    );
    message
}
