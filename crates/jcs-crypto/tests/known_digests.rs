//! # Known Digest Vectors
//!
//! Pins the canonicalize-then-hash pipeline to digests computed
//! independently with Python `hashlib` over the expected canonical bytes.
//! If these fail, two conforming implementations would disagree on the
//! content hash of the same logical value.
//!
//! ## How It Works
//!
//! 1. **Hardcoded test vectors**: known inputs are canonicalized and hashed
//!    in Rust, then compared against expected hex digests.
//!
//! 2. **Live Python verification**: if Python 3 is available, the canonical
//!    bytes produced in Rust are hashed with `hashlib` and compared. The
//!    check is skipped silently when Python is missing.

use jcs_core::{canonicalize_str, CanonicalBytes, JsonValue};
use jcs_crypto::{
    canonical_digest, canonical_fingerprint, canonical_hash, digest, serializable_digest,
    DigestAlgorithm,
};

/// Helper: canonical hash of a JSON text.
fn rust_hash(text: &str, algorithm: &str) -> String {
    let value: JsonValue = text.parse().expect("vector should parse");
    canonical_hash(&value, algorithm).expect("supported algorithm")
}

/// Helper: hash canonical bytes with Python hashlib.
/// Returns None if Python is not available.
fn python_hash(canonical: &CanonicalBytes, algorithm: DigestAlgorithm) -> Option<String> {
    let hex: String = canonical.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
    let script = format!(
        "import hashlib; print(hashlib.new('{}', bytes.fromhex('{hex}')).hexdigest(), end='')",
        algorithm.as_str()
    );
    let output = std::process::Command::new("python3")
        .arg("-c")
        .arg(&script)
        .output()
        .ok()?;
    if output.status.success() {
        Some(String::from_utf8(output.stdout).ok()?.trim().to_string())
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Vector 1: empty object under every algorithm
// ---------------------------------------------------------------------------

#[test]
fn test_empty_object_all_algorithms() {
    let cases = [
        ("SHA-224", "5cdd15a873608087be07a41b7f1a04e96d3a66fe7a9b0faac71f8d05"),
        ("SHA-256", "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"),
        (
            "SHA-384",
            "d2a23bc783e3aa38f401e13c7488505137c4954a7fd88331f1597c5ff71111dc807c7370a5b282c6da541c56ede69f30",
        ),
        (
            "SHA-512",
            "27c74670adb75075fad058d5ceaf7b20c4e7786c83bae8a32f626f9782af34c9a33c2046ef60fd2a7878d378e29fec851806bbd9a67878f3a9f1cda4830763fd",
        ),
    ];
    for (alg, expected) in cases {
        assert_eq!(rust_hash("{ }", alg), expected, "{alg} digest of {{}}");
    }
}

// ---------------------------------------------------------------------------
// Vector 2: two-member object, both member orders
// ---------------------------------------------------------------------------

#[test]
fn test_two_member_object_all_algorithms() {
    let cases = [
        ("sha224", "20fe9aad55b37eb33f2d953226f0bbf31169eec7ac7efa8069fdf0ae"),
        ("sha256", "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777"),
        (
            "sha384",
            "5b5061937d9429347654a4a661c91ebd23a83dd2233309e3d1a9eaab2085f2399ddfaee0fccfb405324e6bb5e008400b",
        ),
        (
            "sha512",
            "b5da773f945631ed9943f66ab28641439d8895e350fb1fb9e21377bc63cd546bb68a5db808c57f846ddb195def323b315fe8917213aa34f996edebfa8f9653aa",
        ),
    ];
    for (alg, expected) in cases {
        assert_eq!(rust_hash(r#"{"a":1,"b":2}"#, alg), expected);
        assert_eq!(rust_hash(r#"{"b": 2, "a": 1.0}"#, alg), expected);
    }
}

// ---------------------------------------------------------------------------
// Vector 3: scalars and empty array
// ---------------------------------------------------------------------------

#[test]
fn test_scalar_and_array_vectors() {
    assert_eq!(
        rust_hash("[ ]", "SHA-256"),
        "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
    );
    assert_eq!(
        rust_hash("null", "SHA-256"),
        "74234e98afe7498fb5daf1f36ac2d78acc339464f950703b8c019892f982b90b"
    );
}

// ---------------------------------------------------------------------------
// Vector 4: keys outside the BMP sort by UTF-16 code units
// ---------------------------------------------------------------------------

#[test]
fn test_astral_key_vector() {
    // U+1D306 encodes as D834 DF06, which sorts before U+E000.
    assert_eq!(
        rust_hash(r#"{"\ue000": 1, "\ud834\udf06": 2}"#, "SHA-256"),
        "bf796081b4d7f6cd4a08000ef04116ecbdad09cfe34989717b34ef876242797a"
    );
}

// ---------------------------------------------------------------------------
// Pipeline agreement
// ---------------------------------------------------------------------------

#[test]
fn test_serde_and_parse_paths_agree() {
    let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
    let from_serde = serializable_digest(&data, DigestAlgorithm::Sha256).unwrap();
    let value: JsonValue = r#"{"c":"hello","a":1,"b":2}"#.parse().unwrap();
    assert_eq!(from_serde, canonical_digest(&value, DigestAlgorithm::Sha256));
    assert_eq!(
        from_serde,
        digest(&canonicalize_str(r#"{"a":1,"b":2,"c":"hello"}"#).unwrap(), DigestAlgorithm::Sha256)
    );
}

#[test]
fn test_fingerprint_matches_sha256_prefix() {
    let value: JsonValue = "{}".parse().unwrap();
    assert_eq!(canonical_fingerprint(&value), "44136fa355b3678a");
}

#[test]
fn test_against_python_hashlib() {
    let samples = [
        r#"{"numbers":[333333333.33333329,1E30,4.50,2e-3],"literals":[null,true,false]}"#,
        r#"{"€":"Euro","\r":"CR","1":"One","ö":"o"}"#,
        r#"["\u0000\u001f", " ", "/"]"#,
    ];
    for text in samples {
        let canonical = canonicalize_str(text).unwrap();
        for alg in [
            DigestAlgorithm::Sha224,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            if let Some(py_hex) = python_hash(&canonical, alg) {
                assert_eq!(
                    digest(&canonical, alg).to_hex(),
                    py_hex,
                    "{alg} mismatch with hashlib for {text}"
                );
            }
        }
    }
}
