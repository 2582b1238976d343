//! Human-readable formatting for sizes, times, ratios and throughput
//!
//! Degenerate metric values (division by a zero size or zero time) come
//! through as non-finite floats; every formatter here renders a placeholder
//! for them instead of propagating `inf`/`NaN` into the output.

/// Format a byte count with binary unit prefixes
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    if exp == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", value, UNITS[exp])
    }
}

/// Format a duration given in milliseconds
pub fn format_time_ms(ms: f64) -> String {
    if !ms.is_finite() {
        return "N/A".to_string();
    }
    if ms < 0.001 {
        "< 1 \u{3bc}s".to_string()
    } else if ms < 1.0 {
        format!("{:.1} \u{3bc}s", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{:.2} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

/// Format a throughput given in MB/s
pub fn format_throughput(mbps: f64) -> String {
    if !mbps.is_finite() {
        return "N/A".to_string();
    }
    if mbps >= 1024.0 {
        format!("{:.1} GB/s", mbps / 1024.0)
    } else if mbps >= 1.0 {
        format!("{:.1} MB/s", mbps)
    } else {
        format!("{:.1} KB/s", mbps * 1024.0)
    }
}

/// Format a compression ratio
pub fn format_ratio(ratio: f64) -> String {
    if !ratio.is_finite() {
        return "N/A".to_string();
    }
    format!("{:.2}x", ratio)
}

/// Format a percentage
pub fn format_percent(pct: f64) -> String {
    if !pct.is_finite() {
        return "N/A".to_string();
    }
    format!("{:.1}%", pct)
}

/// Format a min-max time span
pub fn format_time_range(min_ms: f64, max_ms: f64) -> String {
    format!("{} - {}", format_time_ms(min_ms), format_time_ms(max_ms))
}

/// File name for a downloadable compressed payload
pub fn output_file_name(original: &str, extension: &str) -> String {
    format!("{}{}", original, extension)
}
