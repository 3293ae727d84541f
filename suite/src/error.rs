//! # Suite Errors
//!
//! Structural and configuration failures raised by the suite. A cryptographic
//! mismatch is not represented here: [`verify_signature`] resolves it to
//! `Ok(false)` so batch verification over many proofs can continue.
//!
//! [`verify_signature`]: crate::JsonWebSignature2020::verify_signature

use thiserror::Error;

/// Errors raised while creating or verifying Data Integrity proofs.
#[derive(Debug, Error)]
pub enum Error {
    /// No signer capability was supplied and none could be derived from key
    /// material. The suite is misconfigured for signing.
    #[error("a signer API has not been specified")]
    MissingSigner,

    /// No verifier capability was supplied and none could be derived from the
    /// verification method. The suite is misconfigured for verification.
    #[error("no verifier available and none can be created from the verification method")]
    MissingVerifier,

    /// The proof has no usable `proofValue` property.
    #[error("the proof does not include a valid \"proofValue\" property")]
    MalformedProof,

    /// The `proofValue` does not carry the base58-btc multibase header. No
    /// other multibase alphabet is supported by this suite.
    #[error("only base58btc multibase encoding is supported")]
    UnsupportedEncoding,

    /// The `proofValue` payload is not valid base58-btc.
    #[error("unable to decode \"proofValue\": {0}")]
    Decode(#[from] multibase::Error),

    /// The verification method's type or key shape does not match the
    /// suite's algorithm.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// The verification method has no `publicKeyJwk` property.
    #[error("the verification method must contain a \"publicKeyJwk\" property")]
    MissingPublicKey,

    /// The verification method carries a `revoked` timestamp.
    #[error("the verification method has been revoked")]
    RevokedKey,

    /// The suite context URL is absent from the verification method's
    /// `@context`. Only raised under strict context checking.
    #[error("the verification method does not include the suite context")]
    MissingContext,

    /// The proof carries no `verificationMethod` reference.
    #[error("no \"verificationMethod\" found in proof")]
    MissingVerificationMethod,

    /// Key material could not be turned into a signer or verifier.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// The injected document resolver failed, or returned a document that is
    /// not a verification method.
    #[error("unable to resolve verification method: {0}")]
    Resolver(#[source] anyhow::Error),

    /// The signer capability failed. For remote signers this wraps the
    /// transport error as-is.
    #[error("signing failed: {0}")]
    Signature(#[source] anyhow::Error),
}
