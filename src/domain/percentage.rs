//! Percentage value type with raw-input normalization

use std::fmt;

/// Integer share in the range `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(u8);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);
    pub const FULL: Percentage = Percentage(100);

    /// Build a percentage, clamping anything above 100.
    pub fn new(value: u64) -> Self {
        Self(value.min(100) as u8)
    }

    /// Normalize raw user input.
    ///
    /// Non-digit characters are stripped, empty input becomes 0 and the
    /// result is clamped to `[0, 100]`. Digit strings too long for `u64`
    /// saturate at 100.
    ///
    /// ```
    /// use bananasplits::domain::Percentage;
    /// assert_eq!(Percentage::from_input("4a0%").value(), 40);
    /// assert_eq!(Percentage::from_input("").value(), 0);
    /// assert_eq!(Percentage::from_input("250").value(), 100);
    /// ```
    pub fn from_input(raw: &str) -> Self {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Self::ZERO;
        }
        match digits.parse::<u64>() {
            Ok(value) => Self::new(value),
            Err(_) => Self::FULL,
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<Percentage> for u32 {
    fn from(p: Percentage) -> Self {
        u32::from(p.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
