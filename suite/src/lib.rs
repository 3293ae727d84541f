//! # JsonWebSignature2020 Data Integrity Suite
//!
//! A signature suite for W3C Data Integrity proofs using the
//! `JsonWebSignature2020` proof type ([LDS-JWS2020]) with `JsonWebKey2020`
//! verification methods. Two algorithm variants are provided: ECDSA over
//! P-256 (ES256) and RSASSA-PSS with SHA-256 (PS256).
//!
//! The suite orchestrates; it does not canonicalize. An external
//! orchestrator canonicalizes the document into the `verify_data` byte
//! sequence, calls [`JsonWebSignature2020::create_proof`] or
//! [`JsonWebSignature2020::verify_signature`], and persists or checks the
//! resulting [`Proof`]. Verification methods are resolved through an
//! injected document resolver; key material may be held locally or behind
//! [`Signer`]/[`Verifier`] capabilities supplied by a key-management
//! service.
//!
//! [LDS-JWS2020]: https://w3c-ccg.github.io/lds-jws2020/

mod error;
mod jwk;
mod key;
mod proof;
mod signer;
mod suite;
mod verification;

pub use self::error::Error;
pub use self::jwk::{Curve, KeyType, PrivateKeyJwk, PublicKeyJwk};
pub use self::key::KeyEntry;
pub use self::proof::{MethodRef, Proof};
pub use self::signer::{Algorithm, LocalSigner, LocalVerifier, Signer, Verifier};
pub use self::suite::{JsonWebSignature2020, SuiteBuilder};
pub use self::verification::{Context, VerificationMethod};

/// The proof type created and matched by this suite.
pub const SUITE_TYPE: &str = "JsonWebSignature2020";

/// The verification method type this suite demands.
pub const REQUIRED_KEY_TYPE: &str = "JsonWebKey2020";

/// Earlier, less specific key type tolerated for backward compatibility.
pub const KEY_TYPE_ALIAS: &str = "JsonWebKey";

/// The JSON-LD context defining the suite's proof terms.
pub const SUITE_CONTEXT_URL: &str = "https://w3id.org/security/suites/jws-2020/v1";

/// Multibase header for base58-btc, the only encoding this suite permits
/// for `proofValue`.
pub const MULTIBASE_BASE58BTC_HEADER: char = 'z';
