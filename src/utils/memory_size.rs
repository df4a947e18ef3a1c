//! Memory size parsing utilities.
//!
//! This module parses memory size strings (e.g., "512MiB", "4GB") into
//! byte counts. Decimal-looking units are treated as binary multiples,
//! matching the simulator's convention for memory ranges.

use regex::Regex;
use std::sync::OnceLock;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*([A-Za-z]*)\s*$").expect("memory size pattern is valid")
    })
}

/// Parse memory size string (e.g., "512MiB", "1GB", "4096") to bytes
///
/// Supported units:
/// - Bytes: "4096", "4096B"
/// - Kilobytes: "4kB", "4KB", "4KiB"
/// - Megabytes: "512MB", "512MiB"
/// - Gigabytes: "2GB", "2GiB"
/// - Terabytes: "1TB", "1TiB"
///
/// # Arguments
/// * `size` - The memory size string to parse
///
/// # Returns
/// * `Ok(u64)` - The size in bytes if parsing succeeds
/// * `Err(String)` - An error message if parsing fails
///
/// # Examples
/// ```
/// use nocgen::utils::memory_size::parse_memory_size;
///
/// assert_eq!(parse_memory_size("4096"), Ok(4096));
/// assert_eq!(parse_memory_size("512MiB"), Ok(512 * 1024 * 1024));
/// assert_eq!(parse_memory_size("2GB"), Ok(2 * 1024 * 1024 * 1024));
/// assert!(parse_memory_size("lots").is_err());
/// ```
pub fn parse_memory_size(size: &str) -> Result<u64, String> {
    let captures = size_pattern()
        .captures(size)
        .ok_or_else(|| format!("Invalid memory size format: '{}'", size))?;

    let value: u64 = captures[1]
        .parse()
        .map_err(|_| format!("Memory size value out of range: '{}'", size))?;

    let multiplier: u64 = match &captures[2] {
        "" | "B" => 1,
        "kB" | "KB" | "KiB" => 1 << 10,
        "MB" | "MiB" => 1 << 20,
        "GB" | "GiB" => 1 << 30,
        "TB" | "TiB" => 1 << 40,
        unit => return Err(format!("Unknown memory size unit '{}' in '{}'", unit, size)),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Memory size overflows 64 bits: '{}'", size))
}
