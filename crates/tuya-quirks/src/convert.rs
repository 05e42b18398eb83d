//! Value converters applied to raw data point values

/// Pure transform from a raw data point value to an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Keep only the bits in the mask
    Mask(i64),
    /// Multiply by a factor
    Scale(i64),
}

impl Converter {
    /// Apply the transform. `None` on overflow.
    #[must_use]
    pub fn apply(self, raw: i64) -> Option<i64> {
        match self {
            Converter::Mask(mask) => Some(raw & mask),
            Converter::Scale(factor) => raw.checked_mul(factor),
        }
    }
}
