//! Helpers that shape vendor output into the client-facing envelope.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Replace the final extension of `filename` with `target` when it matches one of
/// `sources` (case-insensitive). Any other filename is returned unchanged.
pub fn swap_extension(filename: &str, sources: &[&str], target: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if sources.iter().any(|s| s.eq_ignore_ascii_case(ext)) => format!("{stem}.{target}"),
        _ => filename.to_string(),
    }
}

/// Size reduction as a percentage with one decimal place, clamped at zero: `"20.0%"`
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> String {
    let ratio = if original_size == 0 {
        0.0
    } else {
        (original_size as f64 - compressed_size as f64) / original_size as f64 * 100.0
    };
    format!("{:.1}%", ratio.max(0.0))
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Human readable byte size for limits, e.g. `50MB`. Never rounds: sizes that are not a
/// whole number of megabytes or kilobytes fall back to the smaller unit.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    match bytes {
        0 => "0 bytes".to_string(),
        b if b % MB == 0 => format!("{}MB", b / MB),
        b if b % KB == 0 => format!("{}KB", b / KB),
        b => format!("{b} bytes"),
    }
}
