//! Code 128 symbol encoding.
//!
//! Digit-only payloads of two or more characters are packed in code set C,
//! everything else uses code set B. The encoder emits a module sequence where
//! `true` is a bar.

use crate::error::BarcodeError;

const START_B: u8 = 104;
const START_C: u8 = 105;
const CODE_B: u8 = 100;
const SHIFT: u8 = 98;
const STOP: &[u8] = &[2, 3, 3, 1, 1, 1, 2];

/// Bar/space widths for symbol values 0..=105.
const PATTERNS: [[u8; 6]; 106] = [
    [2, 1, 2, 2, 2, 2], [2, 2, 2, 1, 2, 2], [2, 2, 2, 2, 2, 1], [1, 2, 1, 2, 2, 3],
    [1, 2, 1, 3, 2, 2], [1, 3, 1, 2, 2, 2], [1, 2, 2, 2, 1, 3], [1, 2, 2, 3, 1, 2],
    [1, 3, 2, 2, 1, 2], [2, 2, 1, 2, 1, 3], [2, 2, 1, 3, 1, 2], [2, 3, 1, 2, 1, 2],
    [1, 1, 2, 2, 3, 2], [1, 2, 2, 1, 3, 2], [1, 2, 2, 2, 3, 1], [1, 1, 3, 2, 2, 2],
    [1, 2, 3, 1, 2, 2], [1, 2, 3, 2, 2, 1], [2, 2, 3, 2, 1, 1], [2, 2, 1, 1, 3, 2],
    [2, 2, 1, 2, 3, 1], [2, 1, 3, 2, 1, 2], [2, 2, 3, 1, 1, 2], [3, 1, 2, 1, 3, 1],
    [3, 1, 1, 2, 2, 2], [3, 2, 1, 1, 2, 2], [3, 2, 1, 2, 2, 1], [3, 1, 2, 2, 1, 2],
    [3, 2, 2, 1, 1, 2], [3, 2, 2, 2, 1, 1], [2, 1, 2, 1, 2, 3], [2, 1, 2, 3, 2, 1],
    [2, 3, 2, 1, 2, 1], [1, 1, 1, 3, 2, 3], [1, 3, 1, 1, 2, 3], [1, 3, 1, 3, 2, 1],
    [1, 1, 2, 3, 1, 3], [1, 3, 2, 1, 1, 3], [1, 3, 2, 3, 1, 1], [2, 1, 1, 3, 1, 3],
    [2, 3, 1, 1, 1, 3], [2, 3, 1, 3, 1, 1], [1, 1, 2, 1, 3, 3], [1, 1, 2, 3, 3, 1],
    [1, 3, 2, 1, 3, 1], [1, 1, 3, 1, 2, 3], [1, 1, 3, 3, 2, 1], [1, 3, 3, 1, 2, 1],
    [3, 1, 3, 1, 2, 1], [2, 1, 1, 3, 3, 1], [2, 3, 1, 1, 3, 1], [2, 1, 3, 1, 1, 3],
    [2, 1, 3, 3, 1, 1], [2, 1, 3, 1, 3, 1], [3, 1, 1, 1, 2, 3], [3, 1, 1, 3, 2, 1],
    [3, 3, 1, 1, 2, 1], [3, 1, 2, 1, 1, 3], [3, 1, 2, 3, 1, 1], [3, 3, 2, 1, 1, 1],
    [3, 1, 4, 1, 1, 1], [2, 2, 1, 4, 1, 1], [4, 3, 1, 1, 1, 1], [1, 1, 1, 2, 2, 4],
    [1, 1, 1, 4, 2, 2], [1, 2, 1, 1, 2, 4], [1, 2, 1, 4, 2, 1], [1, 4, 1, 1, 2, 2],
    [1, 4, 1, 2, 2, 1], [1, 1, 2, 2, 1, 4], [1, 1, 2, 4, 1, 2], [1, 2, 2, 1, 1, 4],
    [1, 2, 2, 4, 1, 1], [1, 4, 2, 1, 1, 2], [1, 4, 2, 2, 1, 1], [2, 4, 1, 2, 1, 1],
    [2, 2, 1, 1, 1, 4], [4, 1, 3, 1, 1, 1], [2, 4, 1, 1, 1, 2], [1, 3, 4, 1, 1, 1],
    [1, 1, 1, 2, 4, 2], [1, 2, 1, 1, 4, 2], [1, 2, 1, 2, 4, 1], [1, 1, 4, 2, 1, 2],
    [1, 2, 4, 1, 1, 2], [1, 2, 4, 2, 1, 1], [4, 1, 1, 2, 1, 2], [4, 2, 1, 1, 1, 2],
    [4, 2, 1, 2, 1, 1], [2, 1, 2, 1, 4, 1], [2, 1, 4, 1, 2, 1], [4, 1, 2, 1, 2, 1],
    [1, 1, 1, 1, 4, 3], [1, 1, 1, 3, 4, 1], [1, 3, 1, 1, 4, 1], [1, 1, 4, 1, 1, 3],
    [1, 1, 4, 3, 1, 1], [4, 1, 1, 1, 1, 3], [4, 1, 1, 3, 1, 1], [1, 1, 3, 1, 4, 1],
    [1, 1, 4, 1, 3, 1], [3, 1, 1, 1, 4, 1], [4, 1, 1, 1, 3, 1], [2, 1, 1, 4, 1, 2],
    [2, 1, 1, 2, 1, 4], [2, 1, 1, 2, 3, 2],
];

/// Encode `payload` into symbol values: start, data, checksum.
///
/// The stop symbol is not included.
pub fn symbols(payload: &str) -> Result<Vec<u8>, BarcodeError> {
    if payload.is_empty() {
        return Err(BarcodeError::EmptyPayload);
    }
    if let Some((position, character)) = payload.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(BarcodeError::UnsupportedCharacter {
            character,
            position,
        });
    }

    let bytes = payload.as_bytes();
    let mut values = Vec::with_capacity(bytes.len() + 3);

    if bytes.len() >= 2 && bytes.iter().all(u8::is_ascii_digit) {
        values.push(START_C);
        let mut pairs = bytes.chunks_exact(2);
        for pair in pairs.by_ref() {
            values.push((pair[0] - b'0') * 10 + (pair[1] - b'0'));
        }
        if let [last] = pairs.remainder() {
            values.push(CODE_B);
            values.push(last - b' ');
        }
    } else {
        values.push(START_B);
        for &byte in bytes {
            if byte < b' ' {
                // Control characters live in code set A
                values.push(SHIFT);
                values.push(byte + 64);
            } else {
                values.push(byte - b' ');
            }
        }
    }

    values.push(checksum(&values));
    Ok(values)
}

/// Modulo-103 checksum over start and data symbols.
fn checksum(values: &[u8]) -> u8 {
    let sum = values
        .iter()
        .enumerate()
        .map(|(i, &v)| v as u32 * (i as u32).max(1))
        .sum::<u32>();
    (sum % 103) as u8
}

/// Encode `payload` into a module sequence (`true` = bar), stop included.
pub fn encode(payload: &str) -> Result<Vec<bool>, BarcodeError> {
    let values = symbols(payload)?;
    let mut modules = Vec::with_capacity(values.len() * 11 + 13);

    for &value in &values {
        push_widths(&mut modules, &PATTERNS[value as usize]);
    }
    push_widths(&mut modules, STOP);

    Ok(modules)
}

fn push_widths(modules: &mut Vec<bool>, widths: &[u8]) {
    for (i, &width) in widths.iter().enumerate() {
        let bar = i % 2 == 0;
        modules.extend(std::iter::repeat_n(bar, width as usize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_patterns_are_eleven_modules() {
        for (value, pattern) in PATTERNS.iter().enumerate() {
            let total: u32 = pattern.iter().map(|&w| w as u32).sum();
            assert_eq!(total, 11, "value {}", value);
        }
        assert_eq!(STOP.iter().map(|&w| w as u32).sum::<u32>(), 13);
    }

    #[test]
    fn test_numeric_payload_uses_set_c() {
        assert_eq!(symbols("555666").unwrap(), vec![105, 55, 56, 66, 58]);
    }

    #[test]
    fn test_odd_numeric_payload_switches_to_b() {
        let values = symbols("12345").unwrap();
        assert_eq!(&values[..5], &[105, 12, 34, 100, 21]);
    }

    #[test]
    fn test_alphanumeric_payload_uses_set_b() {
        let values = symbols("PJJ123C").unwrap();
        assert_eq!(values, vec![104, 48, 42, 42, 17, 18, 19, 35, 55]);
    }

    #[test]
    fn test_single_digit_uses_set_b() {
        assert_eq!(symbols("7").unwrap()[0], START_B);
    }

    #[test]
    fn test_control_character_shifted() {
        assert_eq!(&symbols("A\tB").unwrap()[..5], &[104, 33, 98, 73, 34]);
    }

    #[test]
    fn test_del_is_in_set_b() {
        assert_eq!(&symbols("A\u{7f}").unwrap()[..3], &[104, 33, 95]);
    }

    #[test]
    fn test_rejects_empty_and_non_ascii() {
        assert!(matches!(symbols(""), Err(BarcodeError::EmptyPayload)));
        assert!(matches!(
            symbols("12é4"),
            Err(BarcodeError::UnsupportedCharacter { character: 'é', position: 2 })
        ));
    }

    #[test]
    fn test_module_count() {
        let modules = encode("555666").unwrap();
        assert_eq!(modules.len(), 11 * 5 + 13);
        // Starts with a bar and ends with the stop pattern's final bar
        assert!(modules[0]);
        assert!(modules[modules.len() - 1]);
        assert!(modules[modules.len() - 2]);
    }
}
