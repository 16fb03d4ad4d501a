//! Number and label formatting shared by the briefing texts and chart labels.

/// `1234567.4` becomes `"1 234 567 BRL"`.
pub fn format_brl(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    let (sign, digits) = match rounded.strip_prefix('-') {
        // "-0" is not worth a sign
        Some(rest) if rest.chars().any(|c| c != '0') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped} BRL")
}

/// A ratio as a percentage with one decimal: `0.1234` becomes `"12.3%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// `health_beauty` becomes `Health Beauty`.
pub fn format_category_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_is_letter = false;
    for c in name.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

/// `a`, `a and b`, `a, b and c`.
pub fn join_with_and(parts: &[String]) -> Option<String> {
    match parts {
        [] => None,
        [only] => Some(only.clone()),
        [init @ .., last] => Some(format!("{} and {}", init.join(", "), last)),
    }
}

/// `12345` becomes `"12,345"`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
