use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, Snafu};


#[derive(Debug, Snafu)]
pub enum InvalidColor {
    #[snafu(display(r##"invalid color "{repr}": expected "#RRGGBB""##))]
    Format { repr: String },
}

/// RGB color, carried on the wire as the integer `0xRRGGBB`.
///
/// The integer is kept verbatim, no range check is done when decoding.
#[derive(Eq, Hash, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Default)]
pub struct Color(pub u32);

impl Color {
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Color(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    #[inline]
    pub fn as_u32(&self) -> u32 { self.0 }

    pub fn red(&self) -> u8 { (self.0 >> 16) as u8 }
    pub fn green(&self) -> u8 { (self.0 >> 8) as u8 }
    pub fn blue(&self) -> u8 { self.0 as u8 }

    /// Parse a color from its `#RRGGBB` representation.
    ///
    /// ## Example
    /// ```
    /// # use telewire::{Color, InvalidColor};
    /// assert_eq!(Color::new("#6FB9F0")?, Color(0x6FB9F0));
    /// assert_eq!(Color::new("#6FB9F0")?.to_string(), "#6FB9F0");
    /// # Ok::<(), InvalidColor>(())
    /// ```
    pub fn new(repr: &str) -> Result<Self, InvalidColor> {
        let hex = repr.strip_prefix('#').unwrap_or_default();
        ensure!(hex.len() == 6 && hex.bytes().all(|c| c.is_ascii_hexdigit()),
                FormatSnafu { repr });
        let value = u32::from_str_radix(hex, 16).map_err(|_| FormatSnafu { repr }.build())?;
        Ok(Color(value))
    }
}

impl From<u32> for Color {
    fn from(n: u32) -> Color {
        Color(n)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> u32 {
        c.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl FromStr for Color {
    type Err = InvalidColor;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::new(s)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Color(u32::deserialize(deserializer)?))
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================
