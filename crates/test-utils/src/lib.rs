//! In-memory document resolution for suite tests.
//!
//! Stands in for the external document loader: tests register DID
//! documents and key documents by identifier, then hand
//! [`DocumentStore::resolve`] to the suite as its resolver.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use dashmap::DashMap;
use jws2020::{SUITE_CONTEXT_URL, VerificationMethod};
use serde::Serialize;
use serde_json::{Value, json};

/// A shared in-memory store of resolvable documents.
#[derive(Clone, Debug, Default)]
pub struct DocumentStore {
    documents: Arc<DashMap<String, Value>>,
}

impl DocumentStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under the given identifier.
    ///
    /// # Panics
    /// Panics if the document cannot be serialized to JSON.
    pub fn insert(&self, id: impl Into<String>, document: &impl Serialize) {
        let value = serde_json::to_value(document).expect("document should serialize");
        self.documents.insert(id.into(), value);
    }

    /// Look up a document by identifier.
    ///
    /// # Errors
    /// Returns an error if no document is registered under the identifier.
    pub fn resolve(&self, id: &str) -> Result<Value> {
        self.documents
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| anyhow!("document not found: {id}"))
    }
}

/// A DID document embedding the key as both assertion method and
/// verification method.
#[must_use]
pub fn did_document(method: &VerificationMethod) -> Value {
    json!({
        "@context": [
            "https://www.w3.org/ns/did/v1",
            SUITE_CONTEXT_URL
        ],
        "id": method.controller,
        "assertionMethod": [method.id],
        "verificationMethod": [method]
    })
}
