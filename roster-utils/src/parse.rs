use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InvalidId {
    #[error("ID is incorrect")]
    Incorrect,
    #[error("ID is not a number")]
    NotANumber,
}

/// Parse a path identifier into a positive record id.
///
/// Empty input, `"0"` and non-positive numbers are `Incorrect`; anything that
/// is not an integer at all, surrounding whitespace included, is `NotANumber`.
pub fn parse_player_id(raw: &str) -> Result<i64, InvalidId> {
    if raw.is_empty() || raw == "0" {
        return Err(InvalidId::Incorrect);
    }

    let id = raw.parse::<i64>().map_err(|_| InvalidId::NotANumber)?;
    if id <= 0 {
        return Err(InvalidId::Incorrect);
    }

    Ok(id)
}

/// Parse an upper-case variant name, tolerating surrounding whitespace and case.
pub fn parse_variant<T: Copy>(raw: &str, variants: &[(&str, T)]) -> Option<T> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    variants
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, variant)| *variant)
}
