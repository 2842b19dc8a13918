use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{DashboardError, Result};

/// Calendar month used to label profit records and attendance uploads
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// Parse a full month name, ignoring case and surrounding whitespace
    pub fn parse(input: &str) -> Result<Month> {
        input
            .trim()
            .parse()
            .map_err(|_| DashboardError::InvalidMonth(input.to_string()))
    }

    pub fn all() -> impl Iterator<Item = Month> {
        Month::iter()
    }

    /// 1-based calendar number
    pub fn number(self) -> u32 {
        self as u32 + 1
    }
}
