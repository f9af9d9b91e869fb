use std::collections::HashSet;
use thiserror::Error;

/// Seed used when the command line names none.
pub const DEFAULT_SEED: u64 = 1337;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("unrecognized seed token: {0}")]
    Unrecognized(String),
}

/// Resolve CLI seed tokens into unique seeds, in first-seen order.
///
/// Accepts decimal integers (negative values use their magnitude) and
/// `0x`-prefixed hexadecimal.
///
/// # Errors
///
/// Returns an error for any token that is neither form.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>, SeedError> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let seed = parse_seed(token).ok_or_else(|| SeedError::Unrecognized(token.to_string()))?;
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_seed(token: &str) -> Option<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(&hex.replace('_', ""), 16).ok();
    }
    if let Ok(value) = token.parse::<u64>() {
        return Some(value);
    }
    token.parse::<i64>().ok().map(i64::unsigned_abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn resolves_decimal_negative_and_hex() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0xBEEF", "0x00C0_FFEE"])).unwrap();
        assert_eq!(seeds, vec![42, 7, 0xBEEF, 0x00C0_FFEE]);
    }

    #[test]
    fn duplicates_collapse_and_empty_defaults() {
        let seeds = resolve_seed_inputs(&tokens(&["16", "0x10", ""])).unwrap();
        assert_eq!(seeds, vec![16]);
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            resolve_seed_inputs(&tokens(&["12", "lucky"])),
            Err(SeedError::Unrecognized("lucky".to_string()))
        );
        assert!(resolve_seed_inputs(&tokens(&["0xZZ"])).is_err());
    }

    #[test]
    fn large_unsigned_values_parse() {
        let seeds = resolve_seed_inputs(&tokens(&["18446744073709551615"])).unwrap();
        assert_eq!(seeds, vec![u64::MAX]);
    }
}
