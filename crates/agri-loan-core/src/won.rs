//! Korean-won display helpers.

/// Unit table for large-amount rendering, largest first. Units step every
/// four orders of magnitude, so the remainder of one unit carries into the
/// next smaller one.
const WON_UNITS: [(u64, &str); 3] = [
    (1_0000_0000_0000, "조"),
    (1_0000_0000, "억"),
    (1_0000, "만"),
];

/// Render an amount in compound won units, e.g. `1조2345억6789만`.
///
/// Any residual below 만 is dropped once a larger unit has fired; amounts
/// under 만 render as the raw figure with a `원` suffix.
pub fn format_won(amount: u64) -> String {
    let mut rem = amount;
    let mut out = String::new();
    for (value, label) in WON_UNITS {
        let count = rem / value;
        if count > 0 {
            out.push_str(&count.to_string());
            out.push_str(label);
            rem %= value;
        }
    }
    if out.is_empty() {
        return format!("{rem}원");
    }
    out
}

/// Group digits with thousands separators: `1234567` becomes `1,234,567`.
pub fn group_digits(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
