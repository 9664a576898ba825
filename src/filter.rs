//! Filter conditions handed to group list operations.
//!
//! Legacy user stores only understand single attribute conditions, which are
//! turned into SQL-LIKE search values by [`build_search_value`].

use crate::error::{CompatError, CompatResult};
use crate::schema::{DISPLAY_NAME, GROUP_DISPLAY_NAME_URI, ID, ID_URI};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operators of a single attribute condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperation {
    #[serde(rename = "eq")]
    Eq,
    #[serde(rename = "co")]
    Co,
    #[serde(rename = "sw")]
    Sw,
    #[serde(rename = "ew")]
    Ew,
    #[serde(rename = "ge")]
    Ge,
    #[serde(rename = "le")]
    Le,
}

impl FilterOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperation::Eq => "eq",
            FilterOperation::Co => "co",
            FilterOperation::Sw => "sw",
            FilterOperation::Ew => "ew",
            FilterOperation::Ge => "ge",
            FilterOperation::Le => "le",
        }
    }
}

impl fmt::Display for FilterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eq" => Ok(FilterOperation::Eq),
            "co" => Ok(FilterOperation::Co),
            "sw" => Ok(FilterOperation::Sw),
            "ew" => Ok(FilterOperation::Ew),
            "ge" => Ok(FilterOperation::Ge),
            "le" => Ok(FilterOperation::Le),
            other => Err(format!("Unknown filter operation: {}", other)),
        }
    }
}

/// Boolean operator joining two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

/// `attribute operation value`, e.g. `displayName sw eng`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionCondition {
    pub attribute_name: String,
    pub operation: FilterOperation,
    pub attribute_value: String,
}

impl ExpressionCondition {
    pub fn new(
        attribute_name: impl Into<String>,
        operation: FilterOperation,
        attribute_value: impl Into<String>,
    ) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            operation,
            attribute_value: attribute_value.into(),
        }
    }
}

/// Two conditions joined by a boolean operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalCondition {
    pub operator: LogicalOperator,
    pub left: Box<FilterCondition>,
    pub right: Box<FilterCondition>,
}

/// A filter passed to a group list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterCondition {
    Expression(ExpressionCondition),
    Operational(OperationalCondition),
}

impl FilterCondition {
    /// Shorthand for a single attribute condition.
    pub fn expression(
        attribute_name: impl Into<String>,
        operation: FilterOperation,
        attribute_value: impl Into<String>,
    ) -> Self {
        FilterCondition::Expression(ExpressionCondition::new(
            attribute_name,
            operation,
            attribute_value,
        ))
    }

    pub fn and(left: FilterCondition, right: FilterCondition) -> Self {
        FilterCondition::Operational(OperationalCondition {
            operator: LogicalOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn or(left: FilterCondition, right: FilterCondition) -> Self {
        FilterCondition::Operational(OperationalCondition {
            operator: LogicalOperator::Or,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, FilterCondition::Operational(_))
    }
}

/// Attributes whose values may embed a domain qualifier.
fn is_domain_supported_attribute(attribute_name: &str) -> bool {
    [ID_URI, GROUP_DISPLAY_NAME_URI, ID, DISPLAY_NAME]
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(attribute_name))
}

/// Build the search value for `attribute_name operation attribute_value`.
///
/// For domain-aware attributes whose value is qualified (`LDAP/eng`), the
/// wildcard goes after the qualifier so matches stay inside that domain.
pub fn build_search_value(
    attribute_name: &str,
    operation: FilterOperation,
    attribute_value: &str,
    wildcard: &str,
    separator: char,
) -> CompatResult<String> {
    let split_domain = || {
        if is_domain_supported_attribute(attribute_name) {
            attribute_value
                .split_once(separator)
                .filter(|(domain, _)| !domain.is_empty())
        } else {
            None
        }
    };

    let value = match operation {
        FilterOperation::Eq => attribute_value.to_string(),
        FilterOperation::Sw => format!("{attribute_value}{wildcard}"),
        FilterOperation::Co => match split_domain() {
            Some((domain, value)) => format!("{domain}{separator}{wildcard}{value}{wildcard}"),
            None => format!("{wildcard}{attribute_value}{wildcard}"),
        },
        FilterOperation::Ew => match split_domain() {
            Some((domain, value)) => format!("{domain}{separator}{wildcard}{value}"),
            None => format!("{wildcard}{attribute_value}"),
        },
        FilterOperation::Ge | FilterOperation::Le => {
            return Err(CompatError::UnsupportedFilterOperation {
                operation: operation.to_string(),
                attribute: attribute_name.to_string(),
            });
        }
    };

    Ok(value)
}
