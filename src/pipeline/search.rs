//! One-shot filtered search over the recall dataset.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{CanonicalRecord, SearchCriteria, SearchConfig, SearchResponse, translate};
use crate::services::{QueryBuilder, RecallSource};

/// Fetches a single filtered page and translates it.
///
/// Does not touch the known-id cache, so it can run alongside a poll cycle.
pub struct SearchService {
    source: Arc<dyn RecallSource>,
    builder: QueryBuilder,
}

impl SearchService {
    pub fn new(source: Arc<dyn RecallSource>, config: &SearchConfig) -> Self {
        Self {
            source,
            builder: QueryBuilder::new(config),
        }
    }

    /// Search with the given criteria; empty criteria fetch unfiltered.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<CanonicalRecord>> {
        let query = self.builder.build(criteria);
        log::debug!(
            "Searching recalls: limit={}, where={:?}",
            query.limit,
            query.where_clause
        );

        let page = self.source.fetch_page(&query).await?;
        let recalls: Vec<CanonicalRecord> = page.results.into_iter().map(translate).collect();

        log::info!(
            "Search returned {} recalls ({} matching in dataset)",
            recalls.len(),
            page.total_count
        );
        Ok(recalls)
    }

    /// Search and wrap the results in a `{recalls, count}` envelope.
    pub async fn search_response(&self, criteria: &SearchCriteria) -> Result<SearchResponse> {
        self.search(criteria).await.map(SearchResponse::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ApiPage, RawRecord};
    use crate::pipeline::testing::{FakeSource, page_of};

    fn service(source: Arc<FakeSource>) -> SearchService {
        SearchService::new(source, &SearchConfig::default())
    }

    #[tokio::test]
    async fn test_search_fetches_one_filtered_page() {
        let source = Arc::new(FakeSource::new(|_| {
            Ok(ApiPage::new(
                1,
                vec![
                    RawRecord::new(824)
                        .with("libelle", "glace cookie dough")
                        .with("marque_produit", "carrefour sensation"),
                ],
            ))
        }));
        let criteria = SearchCriteria::new().product_names(["cookie"]).limit(50);

        let recalls = service(source.clone()).search(&criteria).await.unwrap();

        assert_eq!(recalls.len(), 1);
        assert_eq!(recalls[0].product_name(), Some("glace cookie dough"));
        assert_eq!(recalls[0].brand(), Some("carrefour sensation"));

        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].limit, 50);
        assert_eq!(requests[0].offset, 0);
        assert_eq!(
            requests[0].where_clause.as_deref(),
            Some("(libelle like '%cookie%')")
        );
    }

    #[tokio::test]
    async fn test_multiple_criteria_build_where() {
        let source = Arc::new(FakeSource::new(|_| Ok(page_of(0, []))));
        let criteria = SearchCriteria::new()
            .product_names(["cookie"])
            .brands(["carrefour"])
            .categories(["alimentation"]);

        let response = service(source.clone())
            .search_response(&criteria)
            .await
            .unwrap();

        assert_eq!(response.count, 0);
        assert_eq!(
            source.requests()[0].where_clause.as_deref(),
            Some(
                "(libelle like '%cookie%') AND (marque_produit like '%carrefour%') \
                 AND (categorie_produit='alimentation')"
            )
        );
    }

    #[tokio::test]
    async fn test_unconstrained_search_is_allowed() {
        let source = Arc::new(FakeSource::new(|q| Ok(page_of(10, 0..q.limit as i64))));
        let recalls = service(source.clone())
            .search(&SearchCriteria::new())
            .await
            .unwrap();

        assert_eq!(recalls.len(), 100);
        assert!(source.requests()[0].where_clause.is_none());
    }

    #[tokio::test]
    async fn test_fetch_errors_surface_unchanged() {
        let source = Arc::new(FakeSource::new(|_| Err(AppError::Remote { status: 429 })));
        let criteria = SearchCriteria::new().keywords(["frozen"]);

        let err = service(source).search(&criteria).await.unwrap_err();
        assert!(matches!(err, AppError::Remote { status: 429 }));
    }

    #[tokio::test]
    async fn test_response_uses_english_keys() {
        let source = Arc::new(FakeSource::new(|_| {
            Ok(ApiPage::new(
                1,
                vec![
                    RawRecord::new(1)
                        .with("numero_fiche", "2021-01-0001")
                        .with("rappel_guid", "guid-1")
                        .with("motif_rappel", "reason 1"),
                ],
            ))
        }));
        let response = service(source)
            .search_response(&SearchCriteria::new().keywords(["test"]))
            .await
            .unwrap();

        let recall = &response.recalls[0];
        assert_eq!(recall.text("sheet_number"), Some("2021-01-0001"));
        assert_eq!(recall.text("recall_guid"), Some("guid-1"));
        assert_eq!(recall.text("recall_reason"), Some("reason 1"));
        assert!(recall.get("numero_fiche").is_none());
    }
}
