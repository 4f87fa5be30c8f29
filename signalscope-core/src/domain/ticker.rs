//! Ticker list normalization.

use crate::error::InputError;

/// Trim and uppercase every ticker, dropping repeats after the first
/// occurrence. An empty list, a blank entry, or an entry containing `/`,
/// `\` or `..` is malformed input.
pub fn normalize_tickers<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, InputError> {
    if raw.is_empty() {
        return Err(InputError::EmptyTickerList);
    }
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (i, t) in raw.iter().enumerate() {
        let ticker = t.as_ref().trim().to_uppercase();
        if ticker.is_empty() {
            return Err(InputError::BlankTicker(i));
        }
        if !is_safe_symbol(&ticker) {
            return Err(InputError::InvalidTicker(ticker));
        }
        if !out.contains(&ticker) {
            out.push(ticker);
        }
    }
    Ok(out)
}

/// Tickers name files in the CSV provider; they must not escape its directory.
pub fn is_safe_symbol(ticker: &str) -> bool {
    !ticker.contains(|c: char| c == '/' || c == '\\') && !ticker.contains("..")
}
