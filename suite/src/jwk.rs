//! # JSON Web Key (JWK)
//!
//! JWK ([RFC7517]) structures for the key material the suite consumes:
//! public keys carried by verification methods and the private keys a
//! locally managed [`KeyEntry`](crate::KeyEntry) owns. Key parameters use
//! the standard member names from JWA ([RFC7518]).
//!
//! [RFC7517]: https://www.rfc-editor.org/rfc/rfc7517
//! [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518

use std::fmt::Display;

use anyhow::{Result, anyhow};
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Cryptographic key type.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub enum KeyType {
    /// Elliptic curve key pair.
    #[default]
    #[serde(rename = "EC")]
    Ec,

    /// RSA key pair.
    #[serde(rename = "RSA")]
    Rsa,

    /// Octet key pair (Edwards curve).
    #[serde(rename = "OKP")]
    Okp,

    /// Octet string.
    #[serde(rename = "oct")]
    Oct,
}

impl Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ec => write!(f, "EC"),
            Self::Rsa => write!(f, "RSA"),
            Self::Okp => write!(f, "OKP"),
            Self::Oct => write!(f, "oct"),
        }
    }
}

/// Cryptographic curve type.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub enum Curve {
    /// secp256r1 curve.
    #[default]
    #[serde(rename = "P-256")]
    P256,

    /// Ed25519 signature (DSA) key pairs.
    Ed25519,

    /// X25519 function (encryption) key pairs.
    X25519,

    /// secp256k1 curve.
    #[serde(rename = "secp256k1", alias = "ES256K")]
    Es256K,
}

impl Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P256 => write!(f, "P-256"),
            Self::Ed25519 => write!(f, "Ed25519"),
            Self::X25519 => write!(f, "X25519"),
            Self::Es256K => write!(f, "secp256k1"),
        }
    }
}

/// A public key in JWK format.
///
/// Elliptic curve keys populate `crv`, `x` and `y`; RSA keys populate `n`
/// and `e`. All binary parameters are base64url-encoded without padding.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct PublicKeyJwk {
    /// Key type.
    pub kty: KeyType,

    /// Elliptic curve identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<Curve>,

    /// Curve point x-coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Curve point y-coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// RSA modulus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA public exponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    /// Intended JWA algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
}

impl PublicKeyJwk {
    /// The decoded RSA modulus, if this is an RSA key.
    ///
    /// # Errors
    /// Returns an error if the `n` member is not valid base64url.
    pub fn modulus(&self) -> Result<Option<Vec<u8>>> {
        let Some(n) = &self.n else {
            return Ok(None);
        };
        let bytes = Base64UrlUnpadded::decode_vec(n)
            .map_err(|e| anyhow!("issue decoding JWK 'n': {e}"))?;
        Ok(Some(bytes))
    }
}

/// A private key in JWK format.
///
/// The public members are flattened into the same JSON object, as required
/// by RFC 7517. Secret members are wiped from memory on drop.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyJwk {
    /// Public key members (`kty`, `crv`, `x`, `y`, `n`, `e`).
    #[serde(flatten)]
    #[zeroize(skip)]
    pub public: PublicKeyJwk,

    /// Private key or exponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    /// RSA first prime factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,

    /// RSA second prime factor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

/// Decode a base64url-encoded JWK member.
pub(crate) fn decode_param(name: &str, value: Option<&String>) -> Result<Vec<u8>> {
    let value = value.ok_or_else(|| anyhow!("JWK '{name}' is missing"))?;
    Base64UrlUnpadded::decode_vec(value).map_err(|e| anyhow!("issue decoding JWK '{name}': {e}"))
}

/// Encode a binary JWK member as unpadded base64url.
pub(crate) fn encode_param(value: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(value)
}
