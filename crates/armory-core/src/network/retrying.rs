use crate::catalog::{CatalogSource, Definition, DefinitionHash, Table};
use crate::error::Result;
use crate::retry::RetryStrategy;

/// Catalog source that retries transient failures of an inner source.
pub struct RetryingSource<S, R> {
    inner: S,
    strategy: R,
}

impl<S: CatalogSource, R: RetryStrategy> RetryingSource<S, R> {
    pub fn new(inner: S, strategy: R) -> Self {
        Self { inner, strategy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: CatalogSource, R: RetryStrategy> CatalogSource for RetryingSource<S, R> {
    fn fetch(&self, table: Table, hash: DefinitionHash) -> Result<Option<Definition>> {
        self.strategy.execute(|_| self.inner.fetch(table, hash))
    }

    fn fetch_batch(
        &self,
        table: Table,
        hashes: &[DefinitionHash],
    ) -> Result<Vec<(DefinitionHash, Definition)>> {
        self.strategy
            .execute(|_| self.inner.fetch_batch(table, hashes))
    }
}
