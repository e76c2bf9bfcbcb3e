/// Groups thousands with commas: 1234567 -> "1,234,567"
pub fn format_score(score: u32) -> String {
    let digits = score.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole seconds left, shown with a trailing unit
pub fn format_time_left(secs: u32) -> String {
    format!("{}s", secs)
}
