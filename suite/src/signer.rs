//! # Signing and Verification Capabilities
//!
//! The suite never calls cryptographic primitives directly. Signing and
//! verification run through the [`Signer`] and [`Verifier`] capability
//! traits so the same suite works with locally held keys or with callables
//! supplied by an external key-management service.
//!
//! [`LocalSigner`] and [`LocalVerifier`] are the default capabilities,
//! built eagerly from JWK material. Building one can fail (bad key
//! material); calling one cannot raise a verification error, a mismatch is
//! reported as `false`.

use std::fmt::Display;

use anyhow::{Result, anyhow, bail};
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use rand::rngs::OsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::jwk::{Curve, KeyType, PrivateKeyJwk, PublicKeyJwk, decode_param};

/// The signing algorithm used by the suite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// ECDSA using the P-256 curve and SHA-256.
    #[default]
    Es256,

    /// RSASSA-PSS using SHA-256.
    Ps256,
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Es256 => write!(f, "ES256"),
            Self::Ps256 => write!(f, "PS256"),
        }
    }
}

/// Signer is implemented by key material owners to provide signing for
/// proof creation.
///
/// Implementations may suspend on I/O (a remote KMS round trip, for
/// example). The suite imposes no timeout; that is the signer's
/// responsibility.
pub trait Signer: Send + Sync {
    /// Sign the message, returning the raw signature bytes.
    fn try_sign(&self, msg: &[u8]) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Verifier is implemented by public key holders to check proof signatures.
pub trait Verifier: Send + Sync {
    /// Verify the signature over the data.
    ///
    /// A cryptographic mismatch, corrupted data and malformed signature
    /// bytes all report as `false`. The distinction is deliberately not
    /// surfaced to the caller.
    fn verify(&self, data: &[u8], signature: &[u8]) -> impl Future<Output = bool> + Send;
}

/// Default signer derived from a private JWK.
#[derive(Clone, Debug)]
pub enum LocalSigner {
    /// ECDSA P-256 signing key.
    Es256(p256::ecdsa::SigningKey),

    /// RSA-PSS signing key with digest-length salt.
    Ps256(Box<rsa::pss::SigningKey<Sha256>>),
}

impl LocalSigner {
    /// Import a private JWK as a signing key for the given algorithm.
    ///
    /// # Errors
    /// Returns an error if the JWK's type does not match the algorithm or
    /// its parameters cannot be decoded into a usable private key.
    pub fn from_jwk(algorithm: Algorithm, jwk: &PrivateKeyJwk) -> Result<Self> {
        match algorithm {
            Algorithm::Es256 => {
                assert_ec_p256(&jwk.public)?;
                let d = decode_param("d", jwk.d.as_ref())?;
                let signing_key = p256::ecdsa::SigningKey::from_slice(&d)
                    .map_err(|e| anyhow!("issue importing signing key: {e}"))?;
                Ok(Self::Es256(signing_key))
            }
            Algorithm::Ps256 => {
                if jwk.public.kty != KeyType::Rsa {
                    bail!("the key must be an RSA key for PS256");
                }
                let n = BigUint::from_bytes_be(&decode_param("n", jwk.public.n.as_ref())?);
                let e = BigUint::from_bytes_be(&decode_param("e", jwk.public.e.as_ref())?);
                let d = BigUint::from_bytes_be(&decode_param("d", jwk.d.as_ref())?);
                let p = BigUint::from_bytes_be(&decode_param("p", jwk.p.as_ref())?);
                let q = BigUint::from_bytes_be(&decode_param("q", jwk.q.as_ref())?);

                let private_key = RsaPrivateKey::from_components(n, e, d, vec![p, q])
                    .map_err(|e| anyhow!("issue importing signing key: {e}"))?;
                Ok(Self::Ps256(Box::new(rsa::pss::SigningKey::new(private_key))))
            }
        }
    }
}

impl Signer for LocalSigner {
    async fn try_sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Es256(signing_key) => {
                let signature: p256::ecdsa::Signature = signing_key.sign(msg);
                Ok(signature.to_vec())
            }
            Self::Ps256(signing_key) => {
                let signature = signing_key.sign_with_rng(&mut OsRng, msg);
                Ok(signature.to_vec())
            }
        }
    }
}

/// Default verifier derived from a public JWK.
#[derive(Clone, Debug)]
pub enum LocalVerifier {
    /// ECDSA P-256 verifying key.
    Es256(p256::ecdsa::VerifyingKey),

    /// RSA-PSS verifying key with digest-length salt.
    Ps256(Box<rsa::pss::VerifyingKey<Sha256>>),
}

impl LocalVerifier {
    /// Import a public JWK as a verifying key for the given algorithm.
    ///
    /// # Errors
    /// Returns an error if the JWK's type does not match the algorithm or
    /// its parameters cannot be decoded into a usable public key.
    pub fn from_jwk(algorithm: Algorithm, jwk: &PublicKeyJwk) -> Result<Self> {
        match algorithm {
            Algorithm::Es256 => {
                assert_ec_p256(jwk)?;

                // uncompressed SEC1 point
                let mut sec1 = vec![0x04];
                sec1.append(&mut decode_param("x", jwk.x.as_ref())?);
                sec1.append(&mut decode_param("y", jwk.y.as_ref())?);

                let verifying_key = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map_err(|e| anyhow!("unable to build verifying key: {e}"))?;
                Ok(Self::Es256(verifying_key))
            }
            Algorithm::Ps256 => {
                if jwk.kty != KeyType::Rsa {
                    bail!("the key must be an RSA key for PS256");
                }
                let n = BigUint::from_bytes_be(&decode_param("n", jwk.n.as_ref())?);
                let e = BigUint::from_bytes_be(&decode_param("e", jwk.e.as_ref())?);

                let public_key = RsaPublicKey::new(n, e)
                    .map_err(|e| anyhow!("unable to build verifying key: {e}"))?;
                Ok(Self::Ps256(Box::new(rsa::pss::VerifyingKey::new(public_key))))
            }
        }
    }
}

impl Verifier for LocalVerifier {
    async fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Es256(verifying_key) => {
                let Ok(signature) = p256::ecdsa::Signature::from_slice(signature) else {
                    return false;
                };
                let normalised = signature.normalize_s().unwrap_or(signature);
                verifying_key.verify(data, &normalised).is_ok()
            }
            Self::Ps256(verifying_key) => {
                let Ok(signature) = rsa::pss::Signature::try_from(signature) else {
                    return false;
                };
                verifying_key.verify(data, &signature).is_ok()
            }
        }
    }
}

fn assert_ec_p256(jwk: &PublicKeyJwk) -> Result<()> {
    if jwk.kty != KeyType::Ec || jwk.crv != Some(Curve::P256) {
        bail!("the key must be an EC key with P-256 curve for ES256");
    }
    Ok(())
}
