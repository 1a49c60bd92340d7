const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Brazilian real, e.g. `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (integer, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents}")
}

/// `2025-11` becomes `Nov/2025`; anything unparseable is shown as `N/A`.
pub fn format_reference_month(value: Option<&str>) -> String {
    let Some((year, month)) = value.and_then(|raw| raw.split_once('-')) else {
        return "N/A".to_string();
    };
    match month.parse::<usize>() {
        Ok(number) if (1..=12).contains(&number) => {
            format!("{}/{year}", MONTH_ABBREVIATIONS[number - 1])
        }
        _ => "N/A".to_string(),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        return format!("{bytes} B");
    }
    if bytes < MIB {
        return format!("{:.2} KB", bytes as f64 / KIB as f64);
    }
    format!("{:.2} MB", bytes as f64 / MIB as f64)
}

/// Import type labels are shown capitalized, e.g. `Proprietarios`.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
