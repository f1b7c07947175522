//! Field normalisation for exchange rows.
//!
//! Exchange CSVs quote numbers (`"1,234,567"`), sometimes Excel-escape codes
//! (`="2330"`), and mix in full-width punctuation. Everything here is lossless
//! about rejection: a field that cannot be read yields `None`, never zero.

/// Shares per board lot.
pub const LOT_SIZE: i64 = 1000;

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '“' | '”')
}

/// Parse a signed share count such as `"-50,000"`, `+1,000`, or `="123"`.
///
/// Only the edges are cleaned: surrounding whitespace and quotes, and an Excel
/// `=` prefix. Inside, an optional sign is followed by digits with `,` (or `，`)
/// allowed only between thousands groups. Anything else yields `None` and the
/// row is dropped.
pub fn parse_net_volume(field: &str) -> Option<i64> {
    let t = field.trim();
    let t = t.strip_prefix('=').unwrap_or(t);
    let t = t.trim_matches(|c: char| is_quote(c) || c.is_whitespace());

    let (sign, body) = match t.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", t.strip_prefix('+').unwrap_or(t)),
    };
    let digits = ungroup_digits(body)?;
    format!("{sign}{digits}").parse::<i64>().ok()
}

/// `"1,234,567"` -> `"1234567"`. The leading group holds 1-3 digits and every
/// later group exactly 3; an ungrouped run of digits is accepted as is.
fn ungroup_digits(body: &str) -> Option<String> {
    let all_digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());

    let groups: Vec<&str> = body.split([',', '，']).collect();
    let (head, rest) = groups.split_first()?;
    if !all_digits(*head) {
        return None;
    }
    let grouped = !rest.is_empty();
    if grouped && (head.len() > 3 || rest.iter().any(|g| g.len() != 3 || !all_digits(*g))) {
        return None;
    }
    Some(groups.concat())
}

/// Strip surrounding whitespace, an Excel `=` prefix, and quotes from a code field.
pub fn normalize_code(raw: &str) -> &str {
    let t = raw.trim();
    let t = t.strip_prefix('=').unwrap_or(t);
    t.trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
}

/// `true` when the normalised code is exactly four ASCII digits.
pub fn is_security_code(raw: &str) -> bool {
    let code = normalize_code(raw);
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Convert shares to board lots, rounding half away from zero
/// (`1_500 -> 2`, `1_499 -> 1`, `-1_500 -> -2`).
pub fn shares_to_lots(shares: i64) -> i64 {
    let lot = LOT_SIZE.unsigned_abs();
    let lots = (shares.unsigned_abs() + lot / 2) / lot;
    // lots <= (2^63 + 500) / 1000, always representable.
    let lots = lots as i64;
    if shares < 0 {
        -lots
    } else {
        lots
    }
}
