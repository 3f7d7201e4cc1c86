use crate::color::{hex_to_color, hue, parse_palette, Color};
use crate::error::Result;

/// Returns `colors` ordered by ascending hue.
///
/// The sort is stable: greys all have hue 0 and keep their input order, so
/// the position of each color can be persisted as its display rank.
pub fn sort_by_hue(colors: &[Color]) -> Vec<Color> {
    let mut keyed: Vec<(f64, Color)> = colors.iter().map(|&c| (hue(c), c)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Orders `#RRGGBB` strings by hue, returning the original strings.
///
/// The index of each string in the result is its hue rank.
pub fn sort_hex_by_hue<S: AsRef<str>>(hexes: &[S]) -> Result<Vec<String>> {
    let mut keyed = hexes
        .iter()
        .map(|hex| {
            let hex = hex.as_ref();
            Ok((hue(hex_to_color(hex)?), hex.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, hex)| hex).collect())
}

/// Ranks the colors of a palette file by hue, keeping each line's spelling.
///
/// A malformed line fails with [`Error::Palette`](crate::Error::Palette)
/// naming its 1-based line number.
pub fn rank_palette(text: &str) -> Result<Vec<String>> {
    parse_palette(text)?;
    let hexes: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    sort_hex_by_hue(&hexes)
}
