use crate::domain::model::{BillSummary, MenuItem};
use std::fmt::Write;

pub fn money(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn render_menu(menu: &[MenuItem]) -> String {
    let mut out = String::new();
    if menu.is_empty() {
        out.push_str("No menu items recognized.\n");
        return out;
    }

    let width = menu
        .iter()
        .map(|item| item.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Item".len());

    let _ = writeln!(out, "{:<6} {:<width$} {:>10}", "#", "Item", "Price", width = width);
    for item in menu {
        let _ = writeln!(
            out,
            "{:<6} {:<width$} {:>10}",
            item.id.to_string(),
            item.name,
            money(item.price),
            width = width
        );
    }
    out
}

pub fn render_summary(summary: &BillSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Tax: {}%  Tip: {}%",
        summary.config.tax_rate_percent, summary.config.tip_rate_percent
    );

    if summary.people.is_empty() {
        out.push_str("Nobody has been added to the bill yet.\n");
        return out;
    }

    let width = summary
        .people
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("TOTAL".len());

    let _ = writeln!(
        out,
        "{:<width$} {:>12} {:>12}",
        "Name",
        "Subtotal",
        "Total Due",
        width = width
    );
    for person in &summary.people {
        let _ = writeln!(
            out,
            "{:<width$} {:>12} {:>12}",
            person.name,
            money(person.subtotal),
            money(person.total_due),
            width = width
        );
        for item in &person.items {
            let _ = writeln!(out, "  - {} {}", item.name, money(item.price));
        }
    }
    let _ = writeln!(
        out,
        "{:<width$} {:>12} {:>12}",
        "TOTAL",
        money(summary.subtotal),
        money(summary.total_due),
        width = width
    );
    out
}
