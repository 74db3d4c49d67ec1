//! Calibration sub-tests and their bitmask encoding.

use serde::Serialize;
use std::fmt::{self, Display};

/// One of the sub-tests a calibration run can include.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subtest {
    BedLeveling,
    Vibration,
    MotorNoise,
}

impl Subtest {
    /// Every sub-test, in bit order.
    pub const ALL: [Subtest; 3] = [Subtest::BedLeveling, Subtest::Vibration, Subtest::MotorNoise];

    /// The bit this sub-test occupies in an [OptionMask]. Bit 0 is reserved.
    pub const fn bit(self) -> u32 {
        match self {
            Subtest::BedLeveling => 1,
            Subtest::Vibration => 2,
            Subtest::MotorNoise => 3,
        }
    }

    /// The mask value with only this sub-test selected.
    pub const fn value(self) -> u32 {
        1 << self.bit()
    }
}

/// The set of sub-tests selected for a calibration run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalibrationOptions {
    pub bed_leveling: bool,
    pub vibration: bool,
    pub motor_noise: bool,
}

impl CalibrationOptions {
    /// Whether `subtest` is selected.
    pub fn contains(&self, subtest: Subtest) -> bool {
        match subtest {
            Subtest::BedLeveling => self.bed_leveling,
            Subtest::Vibration => self.vibration,
            Subtest::MotorNoise => self.motor_noise,
        }
    }

    /// Encodes the selection as the integer the printer expects in a calibration command.
    pub fn encode(&self) -> OptionMask {
        let bits = Subtest::ALL
            .into_iter()
            .filter(|subtest| self.contains(*subtest))
            .fold(0, |mask, subtest| mask | subtest.value());
        OptionMask(bits)
    }
}

/// The calibration `option` field: the OR of [Subtest::value] for every selected sub-test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OptionMask(pub u32);

impl OptionMask {
    /// True if no sub-test is selected.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Display for OptionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
