//! Money formatting for displaying rupee amounts.
//!
//! Format: sign + rupee symbol + whole rupees with Indian digit grouping
//! (last three digits, then groups of two): `₹1,50,000`, `-₹12,34,567`.

const RUPEE: char = '\u{20b9}';

/// Format a rupee amount with zero decimal places.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{}0", RUPEE);
    }

    let rounded = amount.round() as i64;
    let grouped = format_indian_grouping(rounded.unsigned_abs());

    if rounded < 0 {
        format!("-{}{}", RUPEE, grouped)
    } else {
        format!("{}{}", RUPEE, grouped)
    }
}

/// Format a whole-number percentage, e.g. `62%`.
pub fn format_percent(value: i64) -> String {
    format!("{}%", value)
}

/// Group digits the Indian way: `1234567` -> `12,34,567`.
fn format_indian_grouping(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let head_chars: Vec<char> = head.chars().collect();
    let mut groups: Vec<String> = head_chars
        .rchunks(2)
        .map(|chunk| chunk.iter().collect())
        .collect();
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
