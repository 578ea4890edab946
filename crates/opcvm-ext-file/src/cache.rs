//! Content-addressed cache of parsed workbooks.

use std::sync::Arc;

use dashmap::DashMap;
use opcvm_compliance::{LoadedPortfolio, SheetLayout};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::FileResult;
use crate::workbook::load_portfolio_from_bytes;

/// Hex-encoded SHA-256 of a byte buffer.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug)]
struct CacheEntry {
    layout: SheetLayout,
    portfolio: Arc<LoadedPortfolio>,
}

/// Parsed portfolios keyed on the hash of the workbook bytes.
///
/// Identical bytes read with the same layout are parsed once; a different
/// layout replaces the entry. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct WorkbookCache {
    entries: DashMap<String, CacheEntry>,
}

impl WorkbookCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached portfolio for these bytes, parsing them on a miss.
    pub fn get_or_load(
        &self,
        bytes: Vec<u8>,
        layout: &SheetLayout,
    ) -> FileResult<Arc<LoadedPortfolio>> {
        let key = content_hash(&bytes);

        if let Some(entry) = self.entries.get(&key) {
            if entry.layout == *layout {
                debug!(hash = %key, "Workbook cache hit");
                return Ok(Arc::clone(&entry.portfolio));
            }
        }

        debug!(hash = %key, "Workbook cache miss");
        let portfolio = Arc::new(load_portfolio_from_bytes(bytes, layout)?);
        self.entries.insert(
            key,
            CacheEntry {
                layout: layout.clone(),
                portfolio: Arc::clone(&portfolio),
            },
        );
        Ok(portfolio)
    }

    /// Returns true if these bytes have been parsed.
    #[must_use]
    pub fn contains(&self, bytes: &[u8]) -> bool {
        self.entries.contains_key(&content_hash(bytes))
    }

    /// Number of cached workbooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
