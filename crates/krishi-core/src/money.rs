//! Rupee formatting for dashboard totals.

/// Format an amount as Indian rupees with two decimals and lakh/crore grouping.
///
/// `format_inr(123456.5)` gives `₹1,23,456.50`.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0.00".to_string();
    }

    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = (paise / 100).to_string();
    let fraction = paise % 100;

    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };
    format!("{}₹{}.{:02}", sign, group_indian(&rupees), fraction)
}

/// Last three digits form one group, the rest are grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
