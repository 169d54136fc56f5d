//! Hex color parsing for canvas and flatten fills.

use image::Rgb;
use thiserror::Error;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #RGB or #RRGGBB")]
pub struct InvalidColor(pub String);

/// Parse `#RRGGBB` or `#RGB` (the `#` is optional).
pub fn parse_hex(input: &str) -> Result<Rgb<u8>, InvalidColor> {
    let hex = input.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InvalidColor(input.to_string()));
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| InvalidColor(input.to_string()));

    match hex.len() {
        6 => Ok(Rgb([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ])),
        // #RGB expands each nibble: f → ff
        3 => Ok(Rgb([
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        ])),
        _ => Err(InvalidColor(input.to_string())),
    }
}

/// Resolve a user-supplied fill color. Empty means white.
///
/// Settings are validated on load, so an unparseable value here only comes
/// from callers that built settings by hand; those also fall back to white.
pub fn fill_or_white(input: &str) -> Rgb<u8> {
    if input.trim().is_empty() {
        return WHITE;
    }
    parse_hex(input).unwrap_or_else(|e| {
        tracing::warn!("{e}, using #ffffff");
        WHITE
    })
}
