use std::{fmt::Display, str::FromStr};

use crate::domain::errors::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessAction {
    Approve,
    Reject,
}

impl Display for ProcessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            ProcessAction::Approve => "approve",
            ProcessAction::Reject => "reject",
        };
        write!(f, "{}", action)
    }
}

impl FromStr for ProcessAction {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "approve" => Ok(ProcessAction::Approve),
            "reject" => Ok(ProcessAction::Reject),
            other => Err(CatalogError::Validation(format!(
                "invalid action: {other:?} (expected approve or reject)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_trimmed_and_case_insensitive() {
        assert_eq!(" Approve ".parse::<ProcessAction>().unwrap(), ProcessAction::Approve);
        assert_eq!("REJECT".parse::<ProcessAction>().unwrap(), ProcessAction::Reject);
    }

    #[test]
    fn unknown_actions_are_validation_errors() {
        for raw in ["", "approved", "delete"] {
            let err = raw.parse::<ProcessAction>().unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)), "got: {err}");
        }
    }
}
