//! # Data Integrity Proofs
//!
//! The proof is a structured record attached to a document asserting it was
//! signed: the encoded signature plus signing metadata. The orchestrator
//! populates purpose and metadata fields on a skeleton; the suite attaches
//! the `proofValue`. Thereafter the proof is treated as an immutable
//! record.
//!
//! See [VC-DATA-INTEGRITY] for the general structure.
//!
//! [VC-DATA-INTEGRITY]: https://www.w3.org/TR/vc-data-integrity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SUITE_TYPE;
use crate::verification::VerificationMethod;

/// A reference to the verification method used to create a proof: either a
/// bare identifier or an embedded key document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MethodRef {
    /// A bare method identifier.
    Id(String),

    /// An embedded verification method.
    Method(Box<VerificationMethod>),
}

impl MethodRef {
    /// The referenced method identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Method(method) => &method.id,
        }
    }
}

impl From<&str> for MethodRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

/// A Data Integrity proof.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Proof type. Set to `JsonWebSignature2020` by this suite.
    #[serde(rename = "type")]
    pub type_: String,

    /// When the proof was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    /// The verification method used to create the proof.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<MethodRef>,

    /// The relationship between the proof and the document, for example
    /// `assertionMethod`. Opaque to the suite.
    pub proof_purpose: String,

    /// Multibase-encoded signature, attached by proof creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,

    /// Domain the proof is bound to. Opaque to the suite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Challenge the proof responds to. Opaque to the suite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

impl Proof {
    /// A proof skeleton for the given purpose, typed for this suite and
    /// stamped with the current time. `proofValue` is left for
    /// [`create_proof`](crate::JsonWebSignature2020::create_proof).
    #[must_use]
    pub fn new(proof_purpose: impl Into<String>) -> Self {
        Self {
            type_: SUITE_TYPE.to_string(),
            created: Some(Utc::now()),
            proof_purpose: proof_purpose.into(),
            ..Self::default()
        }
    }
}
