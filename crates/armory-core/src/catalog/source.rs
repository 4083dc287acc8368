use super::definition::Definition;
use super::hash::{DefinitionHash, Table};
use crate::error::Result;

/// Remote tier of the resolver.
///
/// Implementations return only the hashes they could resolve; absent
/// hashes are not errors.
pub trait CatalogSource {
    fn fetch(&self, table: Table, hash: DefinitionHash) -> Result<Option<Definition>>;

    /// Fetch up to one page of hashes in a single request.
    fn fetch_batch(
        &self,
        table: Table,
        hashes: &[DefinitionHash],
    ) -> Result<Vec<(DefinitionHash, Definition)>>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    fn fetch(&self, table: Table, hash: DefinitionHash) -> Result<Option<Definition>> {
        (**self).fetch(table, hash)
    }

    fn fetch_batch(
        &self,
        table: Table,
        hashes: &[DefinitionHash],
    ) -> Result<Vec<(DefinitionHash, Definition)>> {
        (**self).fetch_batch(table, hashes)
    }
}

impl<T: CatalogSource + ?Sized> CatalogSource for Box<T> {
    fn fetch(&self, table: Table, hash: DefinitionHash) -> Result<Option<Definition>> {
        (**self).fetch(table, hash)
    }

    fn fetch_batch(
        &self,
        table: Table,
        hashes: &[DefinitionHash],
    ) -> Result<Vec<(DefinitionHash, Definition)>> {
        (**self).fetch_batch(table, hashes)
    }
}
