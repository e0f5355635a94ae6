use crate::error::FigureError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed palette of SVG color names used by track figures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvgColor {
    Lightblue,
    Salmon,
    Lightgrey,
    Orange,
    Turquoise,
    Yellowgreen,
    Green,
    Plum,
    Red,
    Darkgrey,
    Steelblue,
    Mediumaquamarine,
    Black,
    Blue,
    Firebrick,
    Slateblue,
    White,
}

impl SvgColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lightblue => "lightblue",
            Self::Salmon => "salmon",
            Self::Lightgrey => "lightgrey",
            Self::Orange => "orange",
            Self::Turquoise => "turquoise",
            Self::Yellowgreen => "yellowgreen",
            Self::Green => "green",
            Self::Plum => "plum",
            Self::Red => "red",
            Self::Darkgrey => "darkgrey",
            Self::Steelblue => "steelblue",
            Self::Mediumaquamarine => "mediumaquamarine",
            Self::Black => "black",
            Self::Blue => "blue",
            Self::Firebrick => "firebrick",
            Self::Slateblue => "slateblue",
            Self::White => "white",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, FigureError> {
        let norm = name.trim().to_ascii_lowercase();
        let ret = match norm.as_str() {
            "lightblue" => Self::Lightblue,
            "salmon" => Self::Salmon,
            "lightgrey" => Self::Lightgrey,
            "orange" => Self::Orange,
            "turquoise" => Self::Turquoise,
            "yellowgreen" => Self::Yellowgreen,
            "green" => Self::Green,
            "plum" => Self::Plum,
            "red" => Self::Red,
            "darkgrey" => Self::Darkgrey,
            "steelblue" => Self::Steelblue,
            "mediumaquamarine" => Self::Mediumaquamarine,
            "black" => Self::Black,
            "blue" => Self::Blue,
            "firebrick" => Self::Firebrick,
            "slateblue" => Self::Slateblue,
            "white" => Self::White,
            _ => return Err(FigureError::UnknownColor(name.to_string())),
        };
        Ok(ret)
    }
}

impl fmt::Display for SvgColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An explicit RGBA color. Always serializes to the normalized
/// `#RRGGBBAA` token, so equal colors produce equal markup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl HexColor {
    /// Parses 6 or 8 hex digits after an optional leading `#`. A
    /// 6-digit value gets an opaque alpha channel.
    pub fn new(value: &str) -> Result<Self, FigureError> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if (digits.len() != 6 && digits.len() != 8)
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(FigureError::InvalidHexColor(value.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| FigureError::InvalidHexColor(value.to_string()))
        };
        let r = parse(0..2)?;
        let g = parse(2..4)?;
        let b = parse(4..6)?;
        let a = if digits.len() == 8 { parse(6..8)? } else { 255 };
        Ok(Self { r, g, b, a })
    }

    #[inline(always)]
    pub fn r(&self) -> u8 {
        self.r
    }

    #[inline(always)]
    pub fn g(&self) -> u8 {
        self.g
    }

    #[inline(always)]
    pub fn b(&self) -> u8 {
        self.b
    }

    #[inline(always)]
    pub fn a(&self) -> u8 {
        self.a
    }

    pub fn set_r(&mut self, value: i32) {
        self.r = Self::clamp_channel(value);
    }

    pub fn set_g(&mut self, value: i32) {
        self.g = Self::clamp_channel(value);
    }

    pub fn set_b(&mut self, value: i32) {
        self.b = Self::clamp_channel(value);
    }

    pub fn set_a(&mut self, value: i32) {
        self.a = Self::clamp_channel(value);
    }

    fn clamp_channel(value: i32) -> u8 {
        value.clamp(0, 255) as u8
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Any value a figure element can carry as its color. Rendering only
/// ever asks for the serialized token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Svg(SvgColor),
    Hex(HexColor),
}

impl Color {
    /// Resolves a user-supplied token: a palette name, or a hex value
    /// when it starts with `#`.
    pub fn from_token(token: &str) -> Result<Self, FigureError> {
        if token.trim_start().starts_with('#') {
            Ok(Self::Hex(HexColor::new(token.trim())?))
        } else {
            Ok(Self::Svg(SvgColor::from_name(token)?))
        }
    }
}

impl From<SvgColor> for Color {
    fn from(color: SvgColor) -> Self {
        Self::Svg(color)
    }
}

impl From<HexColor> for Color {
    fn from(color: HexColor) -> Self {
        Self::Hex(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Svg(color) => color.fmt(f),
            Self::Hex(color) => color.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_lookup() {
        assert_eq!(SvgColor::from_name("Salmon").unwrap(), SvgColor::Salmon);
        assert_eq!(
            SvgColor::from_name("chartreuse").unwrap_err(),
            FigureError::UnknownColor("chartreuse".to_string())
        );
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(HexColor::new("#AB2201").unwrap().to_string(), "#AB2201FF");
        assert_eq!(HexColor::new("ab2201").unwrap().to_string(), "#AB2201FF");
        assert_eq!(HexColor::new("#AB220180").unwrap().to_string(), "#AB220180");
        assert!(HexColor::new("#AB22").is_err());
        assert!(HexColor::new("#AB2201FF00").is_err());
        assert!(HexColor::new("#GG2201").is_err());
    }

    #[test]
    fn test_channel_clamping() {
        let mut c = HexColor::new("AB2201").unwrap();
        c.set_g(10000);
        assert_eq!(c.to_string(), "#ABFF01FF");
        c.set_a(16);
        assert_eq!(c.to_string(), "#ABFF0110");
        c.set_r(-100);
        assert_eq!(c.to_string(), "#00FF0110");
        c.set_b(c.b() as i32 + 2);
        assert_eq!(c.to_string(), "#00FF0310");
    }

    #[test]
    fn test_color_token() {
        assert_eq!(
            Color::from_token("steelblue").unwrap().to_string(),
            "steelblue"
        );
        assert_eq!(
            Color::from_token("#12345678").unwrap().to_string(),
            "#12345678"
        );
        assert!(Color::from_token("not-a-color").is_err());
    }
}
