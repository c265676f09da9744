//! Statement client
//!
//! Fetches account statement pages over HTTP and exposes them through the
//! pagination engine.

use super::types::{StatementPage, StatementQuery, Transaction};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{paged_stream, AsyncPageFetcher, Page, PagedResult};
use async_trait::async_trait;
use futures::Stream;
use std::sync::Arc;
use tracing::debug;

/// Client for the account statement endpoints
#[derive(Debug, Clone)]
pub struct StatementClient {
    http: Arc<HttpClient>,
}

impl StatementClient {
    /// Create a statement client on top of an HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    /// Path of the statement endpoint for an account
    pub fn statements_path(account_number: &str) -> Result<String> {
        let account = account_number.trim();
        if account.is_empty() {
            return Err(Error::invalid_argument("Account number must not be empty"));
        }
        if account.contains('/') {
            return Err(Error::invalid_argument(format!(
                "Invalid account number '{account}'"
            )));
        }
        Ok(format!("/accounts/{account}/statements"))
    }

    /// Fetch one page of transactions
    pub async fn fetch_statements(
        &self,
        query: &StatementQuery,
        page: Page,
    ) -> Result<PagedResult<Transaction>> {
        let path = Self::statements_path(&query.account_number)?;
        let request = RequestConfig::new()
            .queries(query.to_params())
            .queries(page.to_params());

        debug!(
            account = %query.account_number,
            from = page.from(),
            size = page.size(),
            "Fetching statement page"
        );

        let body: StatementPage = self.http.get_json_with_config(&path, request).await?;
        Ok(body.into_paged_result(page))
    }

    /// Bind a query, producing a page fetcher for the pagination engine
    pub fn fetcher(&self, query: StatementQuery) -> StatementFetcher {
        StatementFetcher {
            client: self.clone(),
            query,
        }
    }

    /// Stream every transaction matching `query`, starting at `initial`
    ///
    /// Pages are requested lazily, one at a time, as the stream is polled.
    pub fn statements(
        &self,
        query: StatementQuery,
        initial: Page,
    ) -> impl Stream<Item = Result<Transaction>> + Send {
        paged_stream(self.fetcher(query), initial)
    }
}

/// Statement client bound to one query
#[derive(Debug, Clone)]
pub struct StatementFetcher {
    client: StatementClient,
    query: StatementQuery,
}

impl StatementFetcher {
    /// The query this fetcher serves
    pub fn query(&self) -> &StatementQuery {
        &self.query
    }
}

#[async_trait]
impl AsyncPageFetcher<Transaction> for StatementFetcher {
    type Error = Error;

    async fn fetch(&self, page: Page) -> Result<PagedResult<Transaction>> {
        self.client.fetch_statements(&self.query, page).await
    }
}
