//! Layout Value Objects
//!
//! Per-field step and responsive width assignment.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValueError;

/// Width share of a field inside the form grid, in 25% increments
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WidthShare {
    Quarter,
    Half,
    ThreeQuarters,
    #[default]
    Full,
}

impl WidthShare {
    pub const ALL: [WidthShare; 4] = [
        WidthShare::Quarter,
        WidthShare::Half,
        WidthShare::ThreeQuarters,
        WidthShare::Full,
    ];

    pub fn percent(&self) -> u8 {
        match self {
            Self::Quarter => 25,
            Self::Half => 50,
            Self::ThreeQuarters => 75,
            Self::Full => 100,
        }
    }
}

impl TryFrom<u8> for WidthShare {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            25 => Ok(Self::Quarter),
            50 => Ok(Self::Half),
            75 => Ok(Self::ThreeQuarters),
            100 => Ok(Self::Full),
            other => Err(ValueError::InvalidWidth(other)),
        }
    }
}

impl From<WidthShare> for u8 {
    fn from(value: WidthShare) -> Self {
        value.percent()
    }
}

impl fmt::Display for WidthShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

fn default_step() -> u32 {
    1
}

/// Step and width assignment for one field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutAssignment {
    #[serde(default = "default_step")]
    pub step: u32,
    #[serde(default)]
    pub width_mobile: WidthShare,
    #[serde(default)]
    pub width_desktop: WidthShare,
}

impl Default for LayoutAssignment {
    fn default() -> Self {
        Self {
            step: 1,
            width_mobile: WidthShare::Full,
            width_desktop: WidthShare::Full,
        }
    }
}

impl LayoutAssignment {
    pub fn on_step(step: u32) -> Self {
        Self { step, ..Self::default() }
    }

    pub fn with_widths(mut self, mobile: WidthShare, desktop: WidthShare) -> Self {
        self.width_mobile = mobile;
        self.width_desktop = desktop;
        self
    }

    /// Step number used for grouping; 0 is treated as the first step
    pub fn effective_step(&self) -> u32 {
        self.step.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_share_from_percent() {
        assert_eq!(WidthShare::try_from(75).unwrap(), WidthShare::ThreeQuarters);
        assert!(matches!(WidthShare::try_from(30), Err(ValueError::InvalidWidth(30))));
    }

    #[test]
    fn test_assignment_defaults_from_partial_json() {
        let a: LayoutAssignment = serde_json::from_str(r#"{"width_desktop":50}"#).unwrap();
        assert_eq!(a.step, 1);
        assert_eq!(a.width_mobile, WidthShare::Full);
        assert_eq!(a.width_desktop, WidthShare::Half);
    }

    #[test]
    fn test_invalid_width_rejected_on_deserialize() {
        let res: Result<LayoutAssignment, _> = serde_json::from_str(r#"{"width_mobile":33}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_zero_step_is_first_step() {
        assert_eq!(LayoutAssignment::on_step(0).effective_step(), 1);
    }
}
