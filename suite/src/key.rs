//! # Key Descriptors
//!
//! A [`KeyEntry`] is the raw key material a suite can be constructed with:
//! an identifier, the controller claiming the key, and public and/or
//! private JWKs. Applications managing their own keys hand one of these to
//! the suite builder; applications using a KMS supply capabilities instead
//! and never build an entry with private material.

use anyhow::{Result, anyhow, bail};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use serde::{Deserialize, Serialize};

use crate::REQUIRED_KEY_TYPE;
use crate::jwk::{Curve, KeyType, PrivateKeyJwk, PublicKeyJwk, encode_param};
use crate::signer::Algorithm;
use crate::verification::VerificationMethod;

const RSA_MODULUS_BITS: usize = 2048;

/// Raw key material owned by the application.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEntry {
    /// Key identifier, typically a fragment-qualified DID URL.
    pub id: String,

    /// The entity claiming the key.
    pub controller: String,

    /// Public key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKeyJwk>,

    /// Private key material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<PrivateKeyJwk>,
}

impl KeyEntry {
    /// Generate a fresh key pair for the given algorithm.
    ///
    /// ES256 entries hold a P-256 key pair, PS256 entries an RSA-2048 key
    /// pair.
    ///
    /// # Errors
    /// Returns an error if key generation fails.
    pub fn generate(
        algorithm: Algorithm, id: impl Into<String>, controller: impl Into<String>,
    ) -> Result<Self> {
        let (public_key, private_key) = match algorithm {
            Algorithm::Es256 => generate_p256(),
            Algorithm::Ps256 => generate_rsa()?,
        };

        Ok(Self {
            id: id.into(),
            controller: controller.into(),
            public_key: Some(public_key),
            private_key: Some(private_key),
        })
    }

    /// The entry's public JWK, taken from the public key material or from
    /// the public members of the private key.
    #[must_use]
    pub fn public_jwk(&self) -> Option<&PublicKeyJwk> {
        if let Some(jwk) = &self.public_key {
            return Some(jwk);
        }
        if let Some(jwk) = &self.private_key
            && (jwk.public.x.is_some() || jwk.public.n.is_some())
        {
            return Some(&jwk.public);
        }
        None
    }

    /// Synthesize a verification method from the entry, avoiding an
    /// external fetch for keys the application already holds.
    ///
    /// # Errors
    /// Returns an error if the entry carries no public key material.
    pub fn verification_method(&self) -> Result<VerificationMethod> {
        let Some(jwk) = self.public_jwk() else {
            bail!("key entry has no public key material");
        };

        Ok(VerificationMethod {
            id: self.id.clone(),
            type_: REQUIRED_KEY_TYPE.to_string(),
            controller: self.controller.clone(),
            public_key_jwk: Some(jwk.clone()),
            ..VerificationMethod::default()
        })
    }
}

fn generate_p256() -> (PublicKeyJwk, PrivateKeyJwk) {
    let signing_key = p256::ecdsa::SigningKey::random(&mut OsRng);
    let point = signing_key.verifying_key().to_encoded_point(false);

    let public_key = PublicKeyJwk {
        kty: KeyType::Ec,
        crv: Some(Curve::P256),
        x: point.x().map(|x| encode_param(x)),
        y: point.y().map(|y| encode_param(y)),
        ..PublicKeyJwk::default()
    };
    let private_key = PrivateKeyJwk {
        public: public_key.clone(),
        d: Some(encode_param(&signing_key.to_bytes())),
        p: None,
        q: None,
    };

    (public_key, private_key)
}

fn generate_rsa() -> Result<(PublicKeyJwk, PrivateKeyJwk)> {
    let private = RsaPrivateKey::new(&mut OsRng, RSA_MODULUS_BITS)
        .map_err(|e| anyhow!("issue generating RSA key: {e}"))?;
    let primes = private.primes();
    if primes.len() < 2 {
        bail!("RSA key has too few prime factors");
    }

    let public_key = PublicKeyJwk {
        kty: KeyType::Rsa,
        n: Some(encode_param(&private.n().to_bytes_be())),
        e: Some(encode_param(&private.e().to_bytes_be())),
        ..PublicKeyJwk::default()
    };
    let private_key = PrivateKeyJwk {
        public: public_key.clone(),
        d: Some(encode_param(&private.d().to_bytes_be())),
        p: Some(encode_param(&primes[0].to_bytes_be())),
        q: Some(encode_param(&primes[1].to_bytes_be())),
    };

    Ok((public_key, private_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_p256_entry() {
        let entry = KeyEntry::generate(Algorithm::Es256, "did:web:example.com#keys-1", "did:web:example.com")
            .expect("should generate");

        let jwk = entry.public_jwk().expect("should have public key");
        assert_eq!(jwk.kty, KeyType::Ec);
        assert_eq!(jwk.crv, Some(Curve::P256));
        assert!(jwk.x.is_some() && jwk.y.is_some());

        let private = entry.private_key.as_ref().expect("should have private key");
        assert!(private.d.is_some());
    }

    #[test]
    fn synthesized_verification_method() {
        let entry = KeyEntry::generate(Algorithm::Es256, "did:web:example.com#keys-1", "did:web:example.com")
            .expect("should generate");

        let method = entry.verification_method().expect("should synthesize");
        assert_eq!(method.id, "did:web:example.com#keys-1");
        assert_eq!(method.type_, REQUIRED_KEY_TYPE);
        assert_eq!(method.controller, "did:web:example.com");
        assert!(method.public_key_jwk.is_some());
        assert!(method.revoked.is_none());
    }

    #[test]
    fn public_jwk_falls_back_to_private_members() {
        let mut entry = KeyEntry::generate(Algorithm::Es256, "k", "c").expect("should generate");
        entry.public_key = None;

        let jwk = entry.public_jwk().expect("private members should serve");
        assert!(jwk.x.is_some());
    }
}
