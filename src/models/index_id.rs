//! Composite identity of a managed index.

use std::fmt;

use crate::error::{Error, Result};

/// Separator between identity segments. Database, collection and index names
/// cannot contain it, so splitting is unambiguous.
pub const ID_SEPARATOR: char = '\0';

/// Identity of an index as persisted by the orchestrator.
///
/// This is the only durable state needed to re-attach to an existing index, so
/// read, update, delete and import derive database/collection/name from it and
/// never from the desired specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexId {
    pub database: String,
    pub collection: String,
    pub name: String,
}

impl IndexId {
    pub fn new(
        database: impl Into<String>,
        collection: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self { database: database.into(), collection: collection.into(), name: name.into() }
    }

    /// Parse an identity string into its three segments.
    ///
    /// Fails on any segment count other than three and on empty segments.
    pub fn parse(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.split(ID_SEPARATOR).collect();

        match parts.as_slice() {
            [database, collection, name]
                if !database.is_empty() && !collection.is_empty() && !name.is_empty() =>
            {
                Ok(Self::new(*database, *collection, *name))
            }
            [_, _, _] => Err(Error::Validation(format!(
                "malformed index id {:?}: segments must be non-empty",
                id
            ))),
            _ => Err(Error::Validation(format!(
                "malformed index id {:?}: expected 3 segments, found {}",
                id,
                parts.len()
            ))),
        }
    }

    /// Fully qualified namespace, used in log lines.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.database,
            self.collection,
            self.name,
            sep = ID_SEPARATOR
        )
    }
}
