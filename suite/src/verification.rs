//! # Verification Methods
//!
//! A verification method is a resolvable document describing a public key
//! usable to check a proof. Methods are fetched fresh for each verification
//! through the injected document resolver, unless the suite holds raw key
//! material and can synthesize one locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jwk::PublicKeyJwk;

/// The `@context` property of a JSON-LD document: a single context URL or
/// an ordered set of them.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Context {
    /// A single context URL.
    One(String),

    /// An ordered set of context URLs.
    Many(Vec<String>),
}

impl Context {
    /// Whether the document's contexts include the given URL.
    #[must_use]
    pub fn contains(&self, context_url: &str) -> bool {
        match self {
            Self::One(url) => url == context_url,
            Self::Many(urls) => urls.iter().any(|url| url == context_url),
        }
    }
}

/// A resolved key document.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// JSON-LD contexts the document was published under. Absent on
    /// locally synthesized methods.
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,

    /// Method identifier, typically a fragment-qualified DID URL.
    pub id: String,

    /// Method type. The suite demands `JsonWebKey2020` (or the earlier
    /// `JsonWebKey` alias). May be absent on a minimal embedded reference
    /// that only names the method.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_: String,

    /// The entity claiming the key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub controller: String,

    /// Public key parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,

    /// When set, the key has been revoked and must be rejected regardless
    /// of signature validity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<DateTime<Utc>>,
}

impl VerificationMethod {
    /// Whether the method's `@context` includes the given URL.
    #[must_use]
    pub fn includes_context(&self, context_url: &str) -> bool {
        self.context.as_ref().is_some_and(|context| context.contains(context_url))
    }
}
