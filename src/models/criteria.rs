//! Search criteria supplied by callers of the search operation.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Optional filters for a recall search.
///
/// Groups are AND-ed together; values inside a group are OR-ed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchCriteria {
    #[serde(default)]
    pub product_names: Vec<String>,

    #[serde(default)]
    pub brands: Vec<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,

    /// Maximum number of results; clamped when the query is built
    #[serde(default)]
    pub limit: Option<i64>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_names<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_names = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn brands<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn keywords<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether at least one group holds a non-blank value.
    pub fn has_criteria(&self) -> bool {
        [
            &self.product_names,
            &self.brands,
            &self.categories,
            &self.keywords,
        ]
        .iter()
        .any(|group| group.iter().any(|v| !v.trim().is_empty()))
    }

    /// Reject criteria with no usable filter.
    ///
    /// The search service itself accepts unconstrained queries; callers that
    /// expose search to end users enforce this before touching the network.
    pub fn require_any(&self) -> Result<()> {
        if self.has_criteria() {
            Ok(())
        } else {
            Err(AppError::NoCriteria)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_criteria() {
        let criteria = SearchCriteria::new().limit(10);
        assert!(!criteria.has_criteria());
        assert!(matches!(criteria.require_any(), Err(AppError::NoCriteria)));
    }

    #[test]
    fn test_blank_values_do_not_count() {
        let criteria = SearchCriteria::new().brands(["", "  "]);
        assert!(!criteria.has_criteria());
    }

    #[test]
    fn test_any_group_counts() {
        assert!(SearchCriteria::new().keywords(["frozen"]).require_any().is_ok());
        assert!(SearchCriteria::new().categories(["alimentation"]).has_criteria());
    }

    #[test]
    fn test_deserialize_partial() {
        let criteria: SearchCriteria =
            serde_json::from_str(r#"{"brands": ["lidl"], "limit": 5}"#).unwrap();
        assert_eq!(criteria.brands, vec!["lidl"]);
        assert!(criteria.product_names.is_empty());
        assert_eq!(criteria.limit, Some(5));
    }
}
