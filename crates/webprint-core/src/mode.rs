//! Output mode selection.

use crate::error::GeneratorError;

/// Bit-flag selecting PDF output, image output, or both.
///
/// `BOTH` is the union of `PDF` and `IMAGE`, not a third independent mode:
/// `Mode::PDF | Mode::IMAGE == Mode::BOTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u8);

impl Mode {
    pub const PDF: Mode = Mode(1);
    pub const IMAGE: Mode = Mode(2);
    pub const BOTH: Mode = Mode(3);

    /// Interpret raw mode bits.
    ///
    /// Anything that does not select at least one known output is rejected
    /// before the filesystem is touched or a process is spawned.
    pub fn from_bits(bits: u8) -> Result<Mode, GeneratorError> {
        match bits {
            1..=3 => Ok(Mode(bits)),
            other => Err(GeneratorError::UnknownMode(other)),
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether PDF output is selected.
    pub fn pdf(self) -> bool {
        self.0 & Self::PDF.0 != 0
    }

    /// Whether image output is selected.
    pub fn image(self) -> bool {
        self.0 & Self::IMAGE.0 != 0
    }
}

impl std::ops::BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}
