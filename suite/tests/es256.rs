//! End-to-end ES256 suite tests: sign a credential, resolve the
//! verification method through a document store, and verify.

use jws2020::{
    Algorithm, Error, KeyEntry, Proof, Signer, SuiteBuilder, Verifier, SUITE_TYPE,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use test_utils::{did_document, DocumentStore};

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const KEY_ID: &str = "did:web:example.com#keys-1";
const CONTROLLER: &str = "did:web:example.com";

// Stand-in for the out-of-scope canonicalizer: JCS followed by SHA-256.
fn verify_data() -> Vec<u8> {
    let credential = json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "id": "https://example.edu/credentials/3732",
        "type": ["VerifiableCredential"],
        "issuer": "https://example.edu/issuers/565049",
        "issuanceDate": "2020-03-10T04:24:12.164Z",
        "credentialSubject": {
            "id": "did:example:ebfeb1f712ebc6f1c276e12ec21"
        }
    });
    let canonical = serde_json_canonicalizer::to_string(&credential).expect("should canonicalize");
    Sha256::digest(canonical.as_bytes()).to_vec()
}

fn resolver(store: &DocumentStore) -> impl Fn(String) -> std::future::Ready<anyhow::Result<serde_json::Value>> + use<> {
    let store = store.clone();
    move |id: String| std::future::ready(store.resolve(&id))
}

#[tokio::test]
async fn sign_and_verify_with_default_signer() {
    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let method = key.verification_method().expect("should synthesize");

    let store = DocumentStore::new();
    store.insert(CONTROLLER, &did_document(&method));
    store.insert(KEY_ID, &method);

    // sign with the key-bound suite
    let sign_suite = SuiteBuilder::es256().key(key).build().expect("should build");
    let proof = sign_suite
        .create_proof(&verify_data(), Proof::new("assertionMethod"))
        .await
        .expect("should sign");

    assert_eq!(proof.type_, SUITE_TYPE);
    let proof_value = proof.proof_value.as_deref().expect("should have proofValue");
    assert!(proof_value.starts_with('z'));
    assert!(proof_value.len() > 1);
    assert!(proof_value[1..].chars().all(|c| BASE58_ALPHABET.contains(c)));

    // verify with a key-less suite: the method is fetched and the default
    // verifier late-bound from its public key
    let verify_suite = SuiteBuilder::es256().build().expect("should build");
    let resolved = verify_suite
        .get_verification_method(&proof, resolver(&store))
        .await
        .expect("should resolve");
    assert_eq!(resolved, method);

    let verified = verify_suite
        .verify_signature(&verify_data(), &proof, &resolved)
        .await
        .expect("should verify");
    assert!(verified);
}

#[tokio::test]
async fn wrong_key_fails_verification() {
    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let suite = SuiteBuilder::es256().key(key).build().expect("should build");
    let proof = suite
        .create_proof(&verify_data(), Proof::new("assertionMethod"))
        .await
        .expect("should sign");

    let other = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let other_method = other.verification_method().expect("should synthesize");

    let verify_suite = SuiteBuilder::es256().build().expect("should build");
    let verified = verify_suite
        .verify_signature(&verify_data(), &proof, &other_method)
        .await
        .expect("should complete");
    assert!(!verified);
}

#[tokio::test]
async fn tampered_data_fails_verification() {
    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let method = key.verification_method().expect("should synthesize");
    let suite = SuiteBuilder::es256().key(key).build().expect("should build");

    let proof = suite
        .create_proof(&verify_data(), Proof::new("assertionMethod"))
        .await
        .expect("should sign");

    // flip one bit of the data
    let mut tampered = verify_data();
    tampered[0] ^= 0x01;
    let verified =
        suite.verify_signature(&tampered, &proof, &method).await.expect("should complete");
    assert!(!verified);

    // flip one bit of the decoded signature
    let (_, mut signature) =
        multibase::decode(proof.proof_value.as_deref().unwrap()).expect("should decode");
    signature[0] ^= 0x01;
    let mut corrupted = proof.clone();
    corrupted.proof_value = Some(multibase::encode(multibase::Base::Base58Btc, &signature));
    let verified =
        suite.verify_signature(&verify_data(), &corrupted, &method).await.expect("should complete");
    assert!(!verified);
}

#[tokio::test]
async fn non_base58btc_prefix_rejected() {
    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let method = key.verification_method().expect("should synthesize");
    let suite = SuiteBuilder::es256().key(key).build().expect("should build");

    let mut proof = suite
        .create_proof(&verify_data(), Proof::new("assertionMethod"))
        .await
        .expect("should sign");
    let base58_payload = proof.proof_value.take().expect("should have proofValue");
    proof.proof_value = Some(format!("u{}", &base58_payload[1..]));

    let result = suite.verify_signature(&verify_data(), &proof, &method).await;
    assert!(matches!(result, Err(Error::UnsupportedEncoding)));
}

#[tokio::test]
async fn malformed_proof_value_rejected() {
    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let method = key.verification_method().expect("should synthesize");
    let suite = SuiteBuilder::es256().key(key).build().expect("should build");

    // absent
    let proof = Proof::new("assertionMethod");
    let result = suite.verify_signature(&verify_data(), &proof, &method).await;
    assert!(matches!(result, Err(Error::MalformedProof)));

    // empty
    let mut proof = Proof::new("assertionMethod");
    proof.proof_value = Some(String::new());
    let result = suite.verify_signature(&verify_data(), &proof, &method).await;
    assert!(matches!(result, Err(Error::MalformedProof)));

    // invalid base58 characters after a valid header
    let mut proof = Proof::new("assertionMethod");
    proof.proof_value = Some("z0OIl".to_string());
    let result = suite.verify_signature(&verify_data(), &proof, &method).await;
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn revoked_method_rejected_at_resolution() {
    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let mut method = key.verification_method().expect("should synthesize");
    method.revoked = Some(chrono::Utc::now());

    let store = DocumentStore::new();
    store.insert(KEY_ID, &method);

    let suite = SuiteBuilder::es256().build().expect("should build");
    let mut proof = Proof::new("assertionMethod");
    proof.verification_method = Some(KEY_ID.into());

    let result = suite.get_verification_method(&proof, resolver(&store)).await;
    assert!(matches!(result, Err(Error::RevokedKey)));
}

#[tokio::test]
async fn external_signer_capability() {
    // KMS-style delegation: the suite never sees the private key, only a
    // signing capability.
    struct Kms(jws2020::LocalSigner);

    impl Signer for Kms {
        async fn try_sign(&self, msg: &[u8]) -> anyhow::Result<Vec<u8>> {
            self.0.try_sign(msg).await
        }
    }

    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let method = key.verification_method().expect("should synthesize");
    let kms = Kms(jws2020::LocalSigner::from_jwk(
        Algorithm::Es256,
        key.private_key.as_ref().expect("should have private key"),
    )
    .expect("should import"));

    let suite = SuiteBuilder::es256().signer(kms).build().expect("should build");
    let proof = suite
        .create_proof(&verify_data(), Proof::new("assertionMethod"))
        .await
        .expect("should sign");

    let verify_suite = SuiteBuilder::es256().build().expect("should build");
    let verified = verify_suite
        .verify_signature(&verify_data(), &proof, &method)
        .await
        .expect("should verify");
    assert!(verified);
}

#[tokio::test]
async fn external_verifier_capability() {
    // KMS-style delegation on the verification side: the suite holds no
    // key material and never derives a local verifier.
    struct KmsVerifier(jws2020::LocalVerifier);

    impl Verifier for KmsVerifier {
        async fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
            self.0.verify(data, signature).await
        }
    }

    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let sign_suite = SuiteBuilder::es256().key(key.clone()).build().expect("should build");
    let proof = sign_suite
        .create_proof(&verify_data(), Proof::new("assertionMethod"))
        .await
        .expect("should sign");

    let kms = KmsVerifier(
        jws2020::LocalVerifier::from_jwk(
            Algorithm::Es256,
            key.public_jwk().expect("should have public key"),
        )
        .expect("should import"),
    );
    let verify_suite = SuiteBuilder::es256().verifier(kms).build().expect("should build");

    // the method carries no key; the delegated capability decides
    let mut method = key.verification_method().expect("should synthesize");
    method.public_key_jwk = None;

    let verified = verify_suite
        .verify_signature(&verify_data(), &proof, &method)
        .await
        .expect("should verify");
    assert!(verified);

    let mut tampered = verify_data();
    tampered[0] ^= 0x01;
    let verified = verify_suite
        .verify_signature(&tampered, &proof, &method)
        .await
        .expect("should complete");
    assert!(!verified);
}

#[tokio::test]
async fn missing_verifier_rejected() {
    let key = KeyEntry::generate(Algorithm::Es256, KEY_ID, CONTROLLER).expect("should generate");
    let suite = SuiteBuilder::es256().key(key.clone()).build().expect("should build");
    let proof = suite
        .create_proof(&verify_data(), Proof::new("assertionMethod"))
        .await
        .expect("should sign");

    // no capability, and a method with no public key to late-bind from
    let mut method = key.verification_method().expect("should synthesize");
    method.public_key_jwk = None;

    let verify_suite = SuiteBuilder::es256().build().expect("should build");
    let result = verify_suite.verify_signature(&verify_data(), &proof, &method).await;
    assert!(matches!(result, Err(Error::MissingVerifier)));
}
