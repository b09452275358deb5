//! Query construction for the records endpoint.
//!
//! Filters use the API's ODSQL dialect: `field like '%value%'` for partial
//! matches and `field='value'` for exact matches. Criteria groups are joined
//! with `AND`, values inside a group with `OR`.

use crate::models::{API_MAX_LIMIT, SearchConfig, SearchCriteria};

/// Ordering requested on every call: newest publications first.
pub const ORDER_BY: &str = "date_publication DESC";

const FIELD_PRODUCT_NAME: &str = "libelle";
const FIELD_BRAND: &str = "marque_produit";
const FIELD_CATEGORY: &str = "categorie_produit";
const FIELD_SUBCATEGORY: &str = "sous_categorie_produit";
const FIELD_RECALL_REASON: &str = "motif_rappel";

/// Fields searched by a free-text keyword.
const KEYWORD_FIELDS: [&str; 4] = [
    FIELD_PRODUCT_NAME,
    FIELD_BRAND,
    FIELD_SUBCATEGORY,
    FIELD_RECALL_REASON,
];

/// Parameters of a single GET against the records endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub limit: u32,
    pub offset: u64,
    pub order_by: String,
    pub where_clause: Option<String>,
}

impl QueryParams {
    /// An unfiltered page ordered by publication date.
    pub fn page(offset: u64, limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, API_MAX_LIMIT),
            offset,
            order_by: ORDER_BY.to_string(),
            where_clause: None,
        }
    }

    /// Smallest possible request, used to check the endpoint answers.
    pub fn probe() -> Self {
        Self::page(0, 1)
    }

    /// Query-string pairs in the order they are sent.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("order_by", self.order_by.clone()),
        ];
        if let Some(clause) = &self.where_clause {
            pairs.push(("where", clause.clone()));
        }
        pairs
    }
}

/// Builds search queries from caller criteria.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    default_limit: u32,
    max_limit: u32,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl QueryBuilder {
    pub fn new(config: &SearchConfig) -> Self {
        let max_limit = config.max_limit.clamp(1, API_MAX_LIMIT);
        Self {
            default_limit: config.default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Build the first-page query for the given criteria.
    pub fn build(&self, criteria: &SearchCriteria) -> QueryParams {
        let mut params = QueryParams::page(0, self.effective_limit(criteria.limit));
        params.where_clause = build_where(criteria);
        params
    }

    /// Caller limit clamped to the ceiling; unset or non-positive means default.
    pub fn effective_limit(&self, requested: Option<i64>) -> u32 {
        match requested {
            Some(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX).min(self.max_limit),
            _ => self.default_limit,
        }
    }
}

/// Combine every non-empty criteria group into one filter expression.
pub fn build_where(criteria: &SearchCriteria) -> Option<String> {
    let keyword_group = any_of(values(&criteria.keywords).map(|kw| {
        let per_field = KEYWORD_FIELDS.iter().map(|field| like(field, kw)).collect();
        group(per_field)
    }));

    let groups: Vec<String> = [
        any_of(values(&criteria.product_names).map(|v| like(FIELD_PRODUCT_NAME, v))),
        any_of(values(&criteria.brands).map(|v| like(FIELD_BRAND, v))),
        any_of(values(&criteria.categories).map(|v| equals(FIELD_CATEGORY, v))),
        keyword_group,
    ]
    .into_iter()
    .flatten()
    .collect();

    if groups.is_empty() {
        None
    } else {
        Some(groups.join(" AND "))
    }
}

fn values(group: &[String]) -> impl Iterator<Item = &str> {
    group.iter().map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn any_of(clauses: impl Iterator<Item = String>) -> Option<String> {
    let clauses: Vec<String> = clauses.collect();
    if clauses.is_empty() {
        None
    } else {
        Some(group(clauses))
    }
}

fn group(clauses: Vec<String>) -> String {
    format!("({})", clauses.join(" OR "))
}

/// Case-insensitive substring match.
fn like(field: &str, value: &str) -> String {
    format!("{field} like '%{}%'", escape_pattern(value))
}

fn equals(field: &str, value: &str) -> String {
    format!("{field}='{}'", escape_literal(value))
}

/// Escape a value for use inside a quoted string literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a value for a `like` pattern; wildcards in user text match literally.
pub fn escape_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_criteria_no_filter() {
        let params = QueryBuilder::default().build(&SearchCriteria::new());
        assert_eq!(params.where_clause, None);
        assert_eq!(params.limit, 100);
        assert_eq!(params.order_by, "date_publication DESC");
        assert!(params.to_pairs().iter().all(|(k, _)| *k != "where"));
    }

    #[test]
    fn test_and_across_groups_or_within() {
        let criteria = SearchCriteria::new()
            .product_names(["a", "b"])
            .brands(["c"]);
        let params = QueryBuilder::default().build(&criteria);
        assert_eq!(
            params.where_clause.as_deref(),
            Some("(libelle like '%a%' OR libelle like '%b%') AND (marque_produit like '%c%')")
        );
    }

    #[test]
    fn test_categories_match_exactly() {
        let criteria = SearchCriteria::new().categories(["alimentation", "cosmetique"]);
        assert_eq!(
            build_where(&criteria).as_deref(),
            Some("(categorie_produit='alimentation' OR categorie_produit='cosmetique')")
        );
    }

    #[test]
    fn test_keyword_spans_fields() {
        let criteria = SearchCriteria::new().keywords(["choc", "frozen"]).brands(["lidl"]);
        let clause = build_where(&criteria).unwrap();
        assert_eq!(
            clause,
            "(marque_produit like '%lidl%') AND \
             ((libelle like '%choc%' OR marque_produit like '%choc%' \
             OR sous_categorie_produit like '%choc%' OR motif_rappel like '%choc%') \
             OR (libelle like '%frozen%' OR marque_produit like '%frozen%' \
             OR sous_categorie_produit like '%frozen%' OR motif_rappel like '%frozen%'))"
        );
    }

    #[test]
    fn test_values_are_escaped() {
        let criteria = SearchCriteria::new()
            .product_names(["l'oréal 100%"])
            .categories(["jeux'"]);
        let clause = build_where(&criteria).unwrap();
        assert_eq!(
            clause,
            r"(libelle like '%l\'oréal 100\%%') AND (categorie_produit='jeux\'')"
        );
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let criteria = SearchCriteria::new().brands(["  "]).product_names([" cookie "]);
        assert_eq!(
            build_where(&criteria).as_deref(),
            Some("(libelle like '%cookie%')")
        );
    }

    #[test]
    fn test_limit_clamping() {
        let builder = QueryBuilder::default();
        assert_eq!(builder.effective_limit(None), 100);
        assert_eq!(builder.effective_limit(Some(0)), 100);
        assert_eq!(builder.effective_limit(Some(-4)), 100);
        assert_eq!(builder.effective_limit(Some(1)), 1);
        assert_eq!(builder.effective_limit(Some(50)), 50);
        assert_eq!(builder.effective_limit(Some(5000)), 1000);
    }

    #[test]
    fn test_page_pairs() {
        let pairs = QueryParams::page(200, 100).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit", "100".to_string()),
                ("offset", "200".to_string()),
                ("order_by", "date_publication DESC".to_string()),
            ]
        );
    }
}
