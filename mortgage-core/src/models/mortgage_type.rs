use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MortgageType {
    /// Principal and interest are repaid together over the term.
    #[default]
    Repayment,
    /// Only the accrued interest is paid; the principal is due at term end.
    InterestOnly,
}

impl MortgageType {
    pub fn all() -> &'static [MortgageType] {
        &[MortgageType::Repayment, MortgageType::InterestOnly]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repayment => "repayment",
            Self::InterestOnly => "interest-only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "repayment" => Some(Self::Repayment),
            "interest-only" | "interest_only" | "interestonly" => Some(Self::InterestOnly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Repayment => "Repayment",
            Self::InterestOnly => "Interest Only",
        }
    }

    pub fn is_interest_only(&self) -> bool {
        matches!(self, Self::InterestOnly)
    }
}

impl fmt::Display for MortgageType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
