//! Display formatting: grouped currency amounts with zero minimum fraction
//! digits, and `5 Jan 2026`-shaped dates.

use chrono::{DateTime, Utc};

pub fn format_currency(amount: f64, currency: &str) -> String {
    format!("{currency} {}", group_amount(amount))
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%-d %b %Y").to_string()
}

fn group_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as i64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as i64;

    let mut out = group_thousands(whole);
    if cents != 0 {
        if cents % 10 == 0 {
            out.push_str(&format!(".{}", cents / 10));
        } else {
            out.push_str(&format!(".{cents:02}"));
        }
    }

    if negative {
        format!("-{out}")
    } else {
        out
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
