use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Functional form applied to normalized order flow before decay
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactKernel {
    /// Flow over √(ADV) and √(intraday volume): volume as stochastic liquidity
    ReducedForm,
    /// Flow over ADV
    Linear,
    /// Signed square root of flow over ADV
    Sqrt,
}

impl ImpactKernel {
    pub const ALL: [ImpactKernel; 3] = [
        ImpactKernel::ReducedForm,
        ImpactKernel::Linear,
        ImpactKernel::Sqrt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ImpactKernel::ReducedForm => "reduced_form",
            ImpactKernel::Linear => "linear",
            ImpactKernel::Sqrt => "sqrt",
        }
    }

    /// Whether the kernel needs the intraday volume profile
    pub fn uses_intraday_volume(&self) -> bool {
        matches!(self, ImpactKernel::ReducedForm)
    }
}

impl fmt::Display for ImpactKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImpactKernel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reduced_form" => Ok(ImpactKernel::ReducedForm),
            "linear" => Ok(ImpactKernel::Linear),
            "sqrt" => Ok(ImpactKernel::Sqrt),
            other => Err(CoreError::Parse(format!("unknown impact kernel: {other}"))),
        }
    }
}
