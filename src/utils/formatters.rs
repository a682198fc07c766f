// Formatting utilities

/// Format a number with thousands separators
pub fn format_number(n: i64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 && chars[i - 1] != '-' {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format a percentage with one decimal (e.g., "80.0%")
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format marks without a trailing ".0" (e.g., "8/10", "7.5/10")
pub fn format_marks(earned: f64, total: f64) -> String {
    format!("{}/{}", trim_float(earned), trim_float(total))
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Truncate string to max characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format relative time (e.g., "2 hours ago")
pub fn format_relative_time(seconds_ago: i64) -> String {
    if seconds_ago < 60 {
        "just now".to_string()
    } else if seconds_ago < 3600 {
        let mins = seconds_ago / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if seconds_ago < 86400 {
        let hours = seconds_ago / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else {
        let days = seconds_ago / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    }
}
