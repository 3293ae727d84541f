//! # JsonWebSignature2020 Suite
//!
//! The suite state machine: proof creation, proof verification,
//! verification-method resolution and validation, and proof matching.
//!
//! A suite is configured once through [`SuiteBuilder`] and immutable
//! thereafter. It can hold raw key material, externally supplied signer and
//! verifier capabilities, or nothing at all. A key-less suite still
//! verifies: the default verifier is late-bound from the public key carried
//! by the resolved verification method.
//!
//! See: <https://w3c-ccg.github.io/lds-jws2020/>

use anyhow::anyhow;
use multibase::Base;
use serde_json::Value;

use crate::error::Error;
use crate::jwk::{Curve, KeyType};
use crate::key::KeyEntry;
use crate::proof::{MethodRef, Proof};
use crate::signer::{Algorithm, LocalSigner, LocalVerifier, Signer, Verifier};
use crate::verification::VerificationMethod;
use crate::{KEY_TYPE_ALIAS, MULTIBASE_BASE58BTC_HEADER, REQUIRED_KEY_TYPE, SUITE_CONTEXT_URL, SUITE_TYPE};

/// The smallest RSA modulus the suite accepts or generates.
pub(crate) const MIN_RSA_MODULUS_BITS: usize = 2048;

/// The signer a suite operation uses: an external capability, a default
/// derived from key material, or nothing.
#[derive(Clone, Debug)]
enum SignerSlot<S> {
    External(S),
    Local(LocalSigner),
    Unset,
}

#[derive(Clone, Debug)]
enum VerifierSlot<V> {
    External(V),
    Local(LocalVerifier),
    Unset,
}

/// The JsonWebSignature2020 Data Integrity proof suite.
///
/// One concrete type serves both algorithm variants: ES256 and PS256
/// differ only in the primitive chosen and one key-shape validation
/// branch.
#[derive(Clone, Debug)]
pub struct JsonWebSignature2020<S = LocalSigner, V = LocalVerifier> {
    algorithm: Algorithm,
    strict_context: bool,
    key: Option<KeyEntry>,
    signer: SignerSlot<S>,
    verifier: VerifierSlot<V>,
}

/// Builder for a [`JsonWebSignature2020`] suite.
///
/// Legal configurations are key only, signer only, verifier only, signer
/// and verifier, or a key alongside capabilities (the key then feeds
/// verification-method synthesis and proof matching while the capabilities
/// do the cryptography). An empty configuration builds too: such a suite
/// can still verify by late-binding a verifier from the resolved
/// verification method.
#[derive(Clone, Debug)]
pub struct SuiteBuilder<S = LocalSigner, V = LocalVerifier> {
    algorithm: Algorithm,
    strict_context: bool,
    key: Option<KeyEntry>,
    signer: Option<S>,
    verifier: Option<V>,
}

impl SuiteBuilder {
    /// A builder for the ECDSA P-256 variant.
    #[must_use]
    pub const fn es256() -> Self {
        Self::new(Algorithm::Es256)
    }

    /// A builder for the RSA-PSS variant.
    #[must_use]
    pub const fn ps256() -> Self {
        Self::new(Algorithm::Ps256)
    }

    const fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            strict_context: false,
            key: None,
            signer: None,
            verifier: None,
        }
    }
}

impl<S: Signer, V: Verifier> SuiteBuilder<S, V> {
    /// Use raw key material. Private material yields a default signer,
    /// public material a default verifier.
    #[must_use]
    pub fn key(mut self, key: KeyEntry) -> Self {
        self.key = Some(key);
        self
    }

    /// Use an external signing capability, for example from a KMS. Takes
    /// precedence over any key material when signing.
    #[must_use]
    pub fn signer<S2: Signer>(self, signer: S2) -> SuiteBuilder<S2, V> {
        SuiteBuilder {
            algorithm: self.algorithm,
            strict_context: self.strict_context,
            key: self.key,
            signer: Some(signer),
            verifier: self.verifier,
        }
    }

    /// Use an external verification capability. Takes precedence over any
    /// key material when verifying.
    #[must_use]
    pub fn verifier<V2: Verifier>(self, verifier: V2) -> SuiteBuilder<S, V2> {
        SuiteBuilder {
            algorithm: self.algorithm,
            strict_context: self.strict_context,
            key: self.key,
            signer: self.signer,
            verifier: Some(verifier),
        }
    }

    /// Reject verification methods whose `@context` does not include the
    /// suite context. By default the check is advisory only, because
    /// resolvers commonly inject contexts out-of-band.
    #[must_use]
    pub const fn strict_context(mut self) -> Self {
        self.strict_context = true;
        self
    }

    /// Build the suite, eagerly deriving default capabilities from key
    /// material.
    ///
    /// # Errors
    /// Returns [`Error::InvalidKey`] if key material is present but cannot
    /// be imported for the suite's algorithm.
    pub fn build(self) -> Result<JsonWebSignature2020<S, V>, Error> {
        let signer = match self.signer {
            Some(signer) => SignerSlot::External(signer),
            None => {
                if let Some(key) = &self.key
                    && let Some(private_key) = &key.private_key
                {
                    let local = LocalSigner::from_jwk(self.algorithm, private_key)
                        .map_err(|e| Error::InvalidKey(e.to_string()))?;
                    SignerSlot::Local(local)
                } else {
                    SignerSlot::Unset
                }
            }
        };

        let verifier = match self.verifier {
            Some(verifier) => VerifierSlot::External(verifier),
            None => {
                if let Some(jwk) = self.key.as_ref().and_then(KeyEntry::public_jwk) {
                    let local = LocalVerifier::from_jwk(self.algorithm, jwk)
                        .map_err(|e| Error::InvalidKey(e.to_string()))?;
                    VerifierSlot::Local(local)
                } else {
                    VerifierSlot::Unset
                }
            }
        };

        Ok(JsonWebSignature2020 {
            algorithm: self.algorithm,
            strict_context: self.strict_context,
            key: self.key,
            signer,
            verifier,
        })
    }
}

impl<S: Signer, V: Verifier> JsonWebSignature2020<S, V> {
    /// The suite's signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The proof type this suite creates and matches.
    #[must_use]
    pub const fn suite_type(&self) -> &'static str {
        SUITE_TYPE
    }

    /// The verification method type this suite demands.
    #[must_use]
    pub const fn required_key_type(&self) -> &'static str {
        REQUIRED_KEY_TYPE
    }

    /// The JSON-LD context defining the suite's proof terms.
    #[must_use]
    pub const fn context_url(&self) -> &'static str {
        SUITE_CONTEXT_URL
    }

    /// Sign the canonicalized document bytes and attach the `proofValue`
    /// to the proof skeleton.
    ///
    /// The skeleton's purpose and metadata fields pass through unchanged.
    /// When the skeleton's type is empty it is set to the suite type, and
    /// when no verification method is referenced and the suite holds a
    /// key, the key's identifier is filled in.
    ///
    /// # Errors
    /// Returns [`Error::MissingSigner`] if no signer was configured or
    /// derivable, or [`Error::Signature`] if the signer fails.
    pub async fn create_proof(&self, verify_data: &[u8], mut proof: Proof) -> Result<Proof, Error> {
        tracing::debug!("create_proof");

        let signature = match &self.signer {
            SignerSlot::External(signer) => {
                signer.try_sign(verify_data).await.map_err(Error::Signature)?
            }
            SignerSlot::Local(signer) => {
                signer.try_sign(verify_data).await.map_err(Error::Signature)?
            }
            SignerSlot::Unset => return Err(Error::MissingSigner),
        };

        if proof.type_.is_empty() {
            proof.type_ = SUITE_TYPE.to_string();
        }
        if proof.verification_method.is_none()
            && let Some(key) = &self.key
        {
            proof.verification_method = Some(MethodRef::Id(key.id.clone()));
        }
        proof.proof_value = Some(multibase::encode(Base::Base58Btc, &signature));

        Ok(proof)
    }

    /// Verify the proof's signature against the canonicalized document
    /// bytes.
    ///
    /// Cryptographic mismatch, corrupted data and malformed signature
    /// bytes all fold into `Ok(false)`; they are deliberately not
    /// distinguished to the caller.
    ///
    /// # Errors
    /// Returns [`Error::MalformedProof`] on an absent or empty
    /// `proofValue`, [`Error::UnsupportedEncoding`] on a multibase header
    /// other than base58-btc, [`Error::Decode`] on malformed base58, and
    /// [`Error::MissingVerifier`] when no verifier is configured and the
    /// verification method has no public key to derive one from.
    pub async fn verify_signature(
        &self, verify_data: &[u8], proof: &Proof, verification_method: &VerificationMethod,
    ) -> Result<bool, Error> {
        tracing::debug!("verify_signature");

        let Some(proof_value) = &proof.proof_value else {
            return Err(Error::MalformedProof);
        };
        if proof_value.is_empty() {
            return Err(Error::MalformedProof);
        }
        if !proof_value.starts_with(MULTIBASE_BASE58BTC_HEADER) {
            return Err(Error::UnsupportedEncoding);
        }
        let (_, signature) = multibase::decode(proof_value)?;

        match &self.verifier {
            VerifierSlot::External(verifier) => Ok(verifier.verify(verify_data, &signature).await),
            VerifierSlot::Local(verifier) => Ok(verifier.verify(verify_data, &signature).await),
            VerifierSlot::Unset => {
                let Some(jwk) = &verification_method.public_key_jwk else {
                    return Err(Error::MissingVerifier);
                };
                let verifier = LocalVerifier::from_jwk(self.algorithm, jwk)
                    .map_err(|e| Error::InvalidKey(e.to_string()))?;
                Ok(verifier.verify(verify_data, &signature).await)
            }
        }
    }

    /// Validate a verification method before trusting it for verification.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedKeyType`] when the method type or key
    /// shape does not fit the suite's algorithm,
    /// [`Error::MissingPublicKey`] when `publicKeyJwk` is absent,
    /// [`Error::RevokedKey`] when a `revoked` timestamp is present, and
    /// [`Error::MissingContext`] under strict context checking.
    pub fn assert_verification_method(&self, method: &VerificationMethod) -> Result<(), Error> {
        if method.type_ != REQUIRED_KEY_TYPE && method.type_ != KEY_TYPE_ALIAS {
            return Err(Error::UnsupportedKeyType(format!("\"{}\"", method.type_)));
        }

        let Some(jwk) = &method.public_key_jwk else {
            return Err(Error::MissingPublicKey);
        };

        match self.algorithm {
            Algorithm::Es256 => {
                if jwk.kty != KeyType::Ec || jwk.crv != Some(Curve::P256) {
                    return Err(Error::UnsupportedKeyType(
                        "the key must be an EC key with P-256 curve for ES256".to_string(),
                    ));
                }
            }
            Algorithm::Ps256 => {
                if jwk.kty != KeyType::Rsa {
                    return Err(Error::UnsupportedKeyType(
                        "the key must be an RSA key for PS256".to_string(),
                    ));
                }
                let modulus = jwk
                    .modulus()
                    .map_err(|e| Error::InvalidKey(e.to_string()))?
                    .ok_or(Error::MissingPublicKey)?;
                if modulus.len() * 8 < MIN_RSA_MODULUS_BITS {
                    return Err(Error::UnsupportedKeyType(format!(
                        "RSA modulus must be at least {MIN_RSA_MODULUS_BITS} bits"
                    )));
                }
            }
        }

        if !method.includes_context(SUITE_CONTEXT_URL) {
            // Key documents rarely carry their own contexts; the resolver
            // usually injects the suite context out-of-band.
            if self.strict_context {
                return Err(Error::MissingContext);
            }
            tracing::debug!("verification method {} does not include the suite context", method.id);
        }

        if method.revoked.is_some() {
            return Err(Error::RevokedKey);
        }

        Ok(())
    }

    /// Select and validate the key document to verify against.
    ///
    /// A suite holding raw key material synthesizes the method locally,
    /// avoiding a redundant fetch right after signing. Otherwise the
    /// proof's method reference is resolved through the injected resolver,
    /// parsed if textual, and validated.
    ///
    /// # Errors
    /// Returns [`Error::MissingVerificationMethod`] when the proof carries
    /// no reference, [`Error::Resolver`] when resolution or parsing fails,
    /// and any [`assert_verification_method`] error.
    ///
    /// [`assert_verification_method`]: Self::assert_verification_method
    pub async fn get_verification_method<F, Fut>(
        &self, proof: &Proof, resolver: F,
    ) -> Result<VerificationMethod, Error>
    where
        F: Fn(String) -> Fut + Send,
        Fut: Future<Output = anyhow::Result<Value>> + Send,
    {
        tracing::debug!("get_verification_method");

        if let Some(key) = &self.key {
            return key.verification_method().map_err(|e| Error::InvalidKey(e.to_string()));
        }

        let Some(method_ref) = &proof.verification_method else {
            return Err(Error::MissingVerificationMethod);
        };

        let document = resolver(method_ref.id().to_string()).await.map_err(Error::Resolver)?;
        let document = match document {
            Value::String(text) => serde_json::from_str(&text)
                .map_err(|e| Error::Resolver(anyhow!("issue parsing document: {e}")))?,
            parsed => parsed,
        };

        let method: VerificationMethod = serde_json::from_value(document)
            .map_err(|e| Error::Resolver(anyhow!("issue deserializing verification method: {e}")))?;
        self.assert_verification_method(&method)?;

        Ok(method)
    }

    /// Whether this suite instance should attempt verification of the
    /// proof, checked before any cryptographic work.
    ///
    /// The proof type must match the suite type. A suite bound to a
    /// specific key additionally requires the proof's method identifier to
    /// equal the key's identifier exactly (string equality, no URL
    /// normalization).
    #[must_use]
    pub fn match_proof(&self, proof: &Proof) -> bool {
        if proof.type_ != SUITE_TYPE {
            return false;
        }
        let Some(key) = &self.key else {
            // no key bound, so the suite matches and the method can be
            // resolved from the proof
            return true;
        };
        proof.verification_method.as_ref().is_some_and(|method| method.id() == key.id)
    }
}
