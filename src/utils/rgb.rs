use std::str::FromStr;

use anyhow::{bail, Context};

/// Struct representing an RGB color sample. Each channel is in `0..=255`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Fallback sample used whenever no color can be resolved.
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Parses a computed CSS color. Only `rgb()`/`rgba()` and six digit
    /// `#RRGGBB` are accepted; anything else yields `None`.
    pub fn parse_css(value: &str) -> Option<Rgb> {
        value.parse().ok()
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let (rgb, _) = parse_functional(s)?;
        Ok(rgb)
    }
}

fn parse_hex(hex: &str) -> anyhow::Result<Rgb> {
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("hex color must have exactly six hex digits: #{}", hex);
    }

    let channel = |at: usize| {
        u8::from_str_radix(&hex[at..at + 2], 16).context("invalid hex channel")
    };

    Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Parses `rgb(R, G, B)` or `rgba(R, G, B, A)` and returns the sample
/// together with the alpha channel, if one was given.
fn parse_functional(s: &str) -> anyhow::Result<(Rgb, Option<f64>)> {
    let lower = s.to_ascii_lowercase();
    let body = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
        .context("RGB format is invalid")?;

    let parts = body.split(',').map(str::trim).collect::<Vec<&str>>();
    if parts.len() != 3 && parts.len() != 4 {
        bail!("RGB format is invalid: expected 3 or 4 components, got {}", parts.len());
    }

    let channel = |i: usize| {
        parts[i]
            .parse::<u8>()
            .with_context(|| format!("invalid channel value {:?}", parts[i]))
    };
    let rgb = Rgb(channel(0)?, channel(1)?, channel(2)?);

    let alpha = match parts.get(3) {
        Some(a) => Some(a.parse::<f64>().context("invalid alpha value")?),
        None => None,
    };

    Ok((rgb, alpha))
}

/// Reports whether a computed background value paints nothing: either the
/// literal `transparent` keyword or an `rgba()` with zero alpha.
pub fn is_transparent(value: &str) -> bool {
    let value = value.trim();
    if value.eq_ignore_ascii_case("transparent") {
        return true;
    }

    matches!(parse_functional(value), Ok((_, Some(alpha))) if alpha <= 0.0)
}
