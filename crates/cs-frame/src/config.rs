//! Frame configuration — the per-line character budget.

use crate::error::{FrameError, Result};

/// Default characters per line.
///
/// Readers tend to prefer either short (~35) or long (~95) lines; 64 sits
/// between the two and is a power of two.
pub const DEFAULT_CHARS_PER_LINE: usize = 64;

/// Spaces inserted for one tab.
pub const TAB_WIDTH: usize = 4;

/// Settings fixed at frame construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameConfig {
    chars_per_line: usize,
}

impl FrameConfig {
    /// A configuration with the given character budget.
    ///
    /// # Errors
    ///
    /// [`FrameError::InvalidBudget`] for a budget of zero.
    pub fn new(chars_per_line: usize) -> Result<Self> {
        if chars_per_line == 0 {
            return Err(FrameError::InvalidBudget(chars_per_line));
        }
        Ok(Self { chars_per_line })
    }

    /// Maximum codepoints per line before wrapping.
    #[inline]
    #[must_use]
    pub const fn chars_per_line(self) -> usize {
        self.chars_per_line
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            chars_per_line: DEFAULT_CHARS_PER_LINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_64() {
        assert_eq!(FrameConfig::default().chars_per_line(), 64);
    }

    #[test]
    fn zero_budget_is_rejected() {
        assert!(matches!(
            FrameConfig::new(0),
            Err(FrameError::InvalidBudget(0))
        ));
    }

    #[test]
    fn budget_of_one_is_allowed() {
        assert_eq!(FrameConfig::new(1).unwrap().chars_per_line(), 1);
    }
}
