use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};

use crate::errors::FixError;

/// Number of random bytes behind the OAuth `state` parameter.
pub const STATE_BYTES: usize = 16;

/// Generates a single-use CSRF token for the authorization handshake.
///
/// Draws `n` bytes from the operating system's secure random source and encodes
/// them as URL-safe base64 without padding, so the token can be placed in a
/// query string as-is.
pub fn generate_state(n: usize) -> Result<String, FixError> {
    let mut bytes = vec![0u8; n];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| FixError::EntropyUnavailable(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Returns a reversed copy of `items`, leaving the input untouched.
pub fn reversed<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().rev().cloned().collect()
}

/// Parses a comma separated list of 1-based playlist numbers.
///
/// Whitespace around each number and empty entries between commas are
/// ignored. The returned 0-based indices keep the order the user typed them in,
/// duplicates included. Any malformed or out-of-range entry rejects the whole
/// input.
pub fn parse_selection(input: &str, total: usize) -> Result<Vec<usize>, FixError> {
    let mut indices = Vec::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let value: i64 = token
            .parse()
            .map_err(|_| FixError::InvalidSelectionToken(token.to_string()))?;

        if value < 1 || value as u64 > total as u64 {
            return Err(FixError::SelectionOutOfRange {
                index: value,
                total,
            });
        }

        indices.push((value - 1) as usize);
    }

    if indices.is_empty() {
        return Err(FixError::EmptySelection);
    }

    Ok(indices)
}

/// Name of the rebuilt copy of a playlist.
pub fn fixed_playlist_name(original: &str) -> String {
    format!("{} Fixed", original)
}

pub fn fixed_playlist_description(original: &str) -> String {
    format!("Fixed copy of {}", original)
}
