/// Two decimals, no grouping. Never renders "-0.00".
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

/// Signed currency value, e.g. "$60.00" or "-$50.00"
pub fn format_currency(value: f64, symbol: &str) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(abs) => format!("-{symbol}{abs}"),
        None => format!("{symbol}{amount}"),
    }
}

/// "60" for whole numbers, "33.5" otherwise
pub fn format_percentage(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        let text = format!("{:.2}", rounded);
        text.trim_end_matches('0').to_string()
    }
}

/// Cut to at most `max` characters
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
