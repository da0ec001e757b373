//! Conversion between Kubernetes resource quantities and canonical integers.
//!
//! CPU is kept in millicores and memory/storage in bytes. The reverse
//! direction renders values for humans in one of the [`UnitMode`]s.

use clap::ValueEnum;
use serde::Serialize;

use crate::lib::error::QuantityError;

/// Unit system used when rendering quantities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    /// Powers of 1024 (Ki, Mi, Gi, ...)
    #[default]
    Binary,
    /// Powers of 1000 (k, M, G, ...)
    Decimal,
    /// Plain millicores and bytes
    Raw,
}

const DECIMAL_SUFFIXES: [&str; 6] = ["k", "M", "G", "T", "P", "E"];
const BINARY_SUFFIXES: [&str; 6] = ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// CPU values at or above this many millicores are shown as cores
const CORES_THRESHOLD: u64 = 10_000;

/// Parse a CPU quantity ("500m", "2", "0.5") into millicores
pub fn cpu_to_millicores(text: &str) -> Result<u64, QuantityError> {
    let (number, suffix) = split_quantity(text)?;
    let multiplier = match suffix {
        "" => 1000,
        "m" => 1,
        _ => return Err(QuantityError::UnknownSuffix(text.to_string())),
    };
    scale(number, multiplier, text)
}

/// Parse a memory or storage quantity ("256Mi", "1G", "1024") into bytes
pub fn memory_to_bytes(text: &str) -> Result<u64, QuantityError> {
    let (number, suffix) = split_quantity(text)?;
    let multiplier = if suffix.is_empty() {
        1
    } else if let Some(pos) = DECIMAL_SUFFIXES.iter().position(|s| *s == suffix) {
        1000u64.pow(pos as u32 + 1)
    } else if let Some(pos) = BINARY_SUFFIXES
        .iter()
        .position(|s| s.eq_ignore_ascii_case(suffix) && suffix.ends_with('i'))
    {
        1024u64.pow(pos as u32 + 1)
    } else {
        return Err(QuantityError::UnknownSuffix(text.to_string()));
    };
    scale(number, multiplier, text)
}

/// Render millicores. Large values are shown as cores with one decimal.
pub fn millicores_to_string(value: u64, mode: UnitMode) -> String {
    match mode {
        UnitMode::Raw => value.to_string(),
        _ if value == 0 => "0".to_string(),
        _ if value >= CORES_THRESHOLD => format!("{:.1}", value as f64 / 1000.0),
        _ => format!("{}m", value),
    }
}

/// Render bytes with the largest suffix keeping the scaled value >= 1
pub fn bytes_to_string(value: u64, mode: UnitMode) -> String {
    let (base, suffixes) = match mode {
        UnitMode::Raw => return value.to_string(),
        UnitMode::Binary => (1024.0, &BINARY_SUFFIXES),
        UnitMode::Decimal => (1000.0, &DECIMAL_SUFFIXES),
    };

    if value == 0 {
        return "0".to_string();
    }

    let mut scaled = value as f64;
    let mut unit = "";
    for suffix in suffixes.iter() {
        if scaled / base < 1.0 {
            break;
        }
        scaled /= base;
        unit = suffix;
    }

    if unit.is_empty() {
        value.to_string()
    } else {
        format!("{:.1}{}", scaled, unit)
    }
}

fn split_quantity(text: &str) -> Result<(&str, &str), QuantityError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(QuantityError::Empty);
    }
    let split = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    Ok(text.split_at(split))
}

fn scale(number: &str, multiplier: u64, original: &str) -> Result<u64, QuantityError> {
    if let Ok(whole) = number.parse::<u64>() {
        return whole
            .checked_mul(multiplier)
            .ok_or_else(|| QuantityError::Overflow(original.to_string()));
    }

    // Fractional mantissa, e.g. "0.5" cores or "1.5Gi"
    if !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(QuantityError::InvalidNumber(original.to_string()));
    }
    let fractional: f64 = number
        .parse()
        .map_err(|_| QuantityError::InvalidNumber(original.to_string()))?;
    let scaled = (fractional * multiplier as f64).round();
    if scaled >= u64::MAX as f64 {
        return Err(QuantityError::Overflow(original.to_string()));
    }
    Ok(scaled as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cpu_to_millicores() {
        assert_eq!(cpu_to_millicores("500m").unwrap(), 500);
        assert_eq!(cpu_to_millicores("2").unwrap(), 2000);
        assert_eq!(cpu_to_millicores("0.5").unwrap(), 500);
        assert_eq!(cpu_to_millicores("0").unwrap(), 0);
    }

    #[test]
    fn test_cpu_to_millicores_rejects_garbage() {
        assert_eq!(cpu_to_millicores(""), Err(QuantityError::Empty));
        assert!(matches!(
            cpu_to_millicores("abc"),
            Err(QuantityError::UnknownSuffix(_))
        ));
        assert!(matches!(
            cpu_to_millicores("1.2.3m"),
            Err(QuantityError::InvalidNumber(_))
        ));
        assert!(matches!(
            cpu_to_millicores("2Gi"),
            Err(QuantityError::UnknownSuffix(_))
        ));
    }

    #[test]
    fn test_memory_to_bytes() {
        assert_eq!(memory_to_bytes("1Gi").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(memory_to_bytes("1G").unwrap(), 1000 * 1000 * 1000);
        assert_eq!(memory_to_bytes("256Mi").unwrap(), 256 * 1024 * 1024);
        assert_eq!(memory_to_bytes("1ki").unwrap(), 1024);
        assert_eq!(memory_to_bytes("1Ki").unwrap(), 1024);
        assert_eq!(memory_to_bytes("3k").unwrap(), 3000);
        assert_eq!(memory_to_bytes("1Ei").unwrap(), 1u64 << 60);
        assert_eq!(memory_to_bytes("4096").unwrap(), 4096);
        assert_eq!(memory_to_bytes("1.5Gi").unwrap(), 1536 * 1024 * 1024);
    }

    #[test]
    fn test_memory_to_bytes_errors() {
        assert!(matches!(
            memory_to_bytes("10Xi"),
            Err(QuantityError::UnknownSuffix(_))
        ));
        assert!(matches!(
            memory_to_bytes("1K"),
            Err(QuantityError::UnknownSuffix(_))
        ));
        assert!(matches!(
            memory_to_bytes("-5Mi"),
            Err(QuantityError::InvalidNumber(_))
        ));
        assert!(matches!(
            memory_to_bytes("100000Ei"),
            Err(QuantityError::Overflow(_))
        ));
    }

    #[test]
    fn test_millicores_to_string() {
        assert_eq!(millicores_to_string(0, UnitMode::Binary), "0");
        assert_eq!(millicores_to_string(500, UnitMode::Binary), "500m");
        assert_eq!(millicores_to_string(9999, UnitMode::Decimal), "9999m");
        assert_eq!(millicores_to_string(12500, UnitMode::Binary), "12.5");
        assert_eq!(millicores_to_string(12500, UnitMode::Raw), "12500");
    }

    #[test]
    fn test_bytes_to_string() {
        assert_eq!(bytes_to_string(0, UnitMode::Binary), "0");
        assert_eq!(bytes_to_string(512, UnitMode::Binary), "512");
        assert_eq!(bytes_to_string(256 * 1024 * 1024, UnitMode::Binary), "256.0Mi");
        assert_eq!(bytes_to_string(1_500_000_000, UnitMode::Decimal), "1.5G");
        assert_eq!(bytes_to_string(1_500_000_000, UnitMode::Raw), "1500000000");
        assert_eq!(bytes_to_string(1024, UnitMode::Binary), "1.0Ki");
        assert_eq!(bytes_to_string(3 << 50, UnitMode::Binary), "3.0Pi");
        assert_eq!(bytes_to_string(1 << 60, UnitMode::Binary), "1.0Ei");
        assert_eq!(bytes_to_string(2_500_000_000_000_000, UnitMode::Decimal), "2.5P");
        assert_eq!(bytes_to_string(12_000_000_000_000_000_000, UnitMode::Decimal), "12.0E");
        assert_eq!(bytes_to_string(u64::MAX, UnitMode::Binary), "16.0Ei");
    }

    /// Exclusive mantissa bound per suffix index keeping values inside `u64`
    const MANTISSA_BOUNDS: [u64; 6] = [100_000, 100_000, 100_000, 100_000, 10_000, 15];

    proptest! {
        #[test]
        fn bytes_round_trip_within_rounding(
            (suffix_index, mantissa) in (0usize..6)
                .prop_flat_map(|i| (Just(i), 1u64..MANTISSA_BOUNDS[i]))
        ) {
            for (suffix, mode) in [
                (BINARY_SUFFIXES[suffix_index], UnitMode::Binary),
                (DECIMAL_SUFFIXES[suffix_index], UnitMode::Decimal),
            ] {
                let original = memory_to_bytes(&format!("{}{}", mantissa, suffix)).unwrap();
                let rendered = bytes_to_string(original, mode);
                let reparsed = memory_to_bytes(&rendered).unwrap();
                let error = (reparsed as f64 - original as f64).abs() / original as f64;
                // One decimal on a scaled value >= 1 is off by at most 5%
                prop_assert!(error <= 0.05, "{} -> {} -> {}", original, rendered, reparsed);
            }
        }
    }
}
