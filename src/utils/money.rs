//! FCFA amounts. The currency has no minor unit, so amounts are whole `i64`s.

pub type Fcfa = i64;

/// Format an amount the way receipts print it, e.g. `12 500 FCFA`
pub fn format_fcfa(amount: Fcfa) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{} FCFA", sign, grouped)
}

/// `amount * percent / 100`, rounded half-up to the nearest FCFA.
/// Saturates at the bounds of `Fcfa` instead of overflowing.
pub fn percentage_of(amount: Fcfa, percent: u32) -> Fcfa {
    let exact = (i128::from(amount) * i128::from(percent) + 50).div_euclid(100);
    Fcfa::try_from(exact).unwrap_or(if exact < 0 { Fcfa::MIN } else { Fcfa::MAX })
}
