//! Display formatting for premiums and rates

/// Format a yen amount with thousands separators and no fraction digits,
/// e.g. `¥1,200`. Halves round away from zero.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}

/// Format a rate fraction as a percentage with four decimals, e.g. `0.1200%`
pub fn format_rate(rate: f64) -> String {
    if !rate.is_finite() {
        return "-".to_string();
    }
    format!("{:.4}%", rate * 100.0)
}
