//! Private key loading

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{Algorithm, EncodingKey};
use std::fmt;

const PEM_BEGIN: &str = "-----BEGIN";

/// RSA private key ready for RS256 signing
#[derive(Clone)]
pub struct SigningKey {
    inner: EncodingKey,
}

impl SigningKey {
    /// Parse an unencrypted RSA private key (PKCS#1 or PKCS#8 PEM)
    ///
    /// The key is exercised with a trial signature before it is returned, so a
    /// structurally broken key fails here rather than at first use.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let pem = normalize_pem(pem)?;

        if pem.contains("ENCRYPTED") {
            return Err(Error::KeyParse(
                "encrypted private keys are not supported".to_string(),
            ));
        }

        let inner = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| Error::KeyParse(format!("not an RSA private key: {e}")))?;

        jsonwebtoken::crypto::sign(b"ghapp-key-check", &inner, Algorithm::RS256)
            .map_err(|e| Error::KeyParse(format!("key cannot sign: {e}")))?;

        Ok(Self { inner })
    }

    pub(crate) const fn encoding_key(&self) -> &EncodingKey {
        &self.inner
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Bring a key from the environment into plain PEM form
///
/// Accepts raw PEM, PEM whose newlines were flattened to literal `\n`
/// sequences, or base64-encoded PEM.
pub fn normalize_pem(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::KeyParse("private key is empty".to_string()));
    }

    if trimmed.starts_with(PEM_BEGIN) {
        if trimmed.contains("\\n") {
            return Ok(trimmed.replace("\\n", "\n"));
        }
        return Ok(trimmed.to_string());
    }

    let compact: String = trimmed.split_whitespace().collect();
    let decoded = STANDARD
        .decode(compact)
        .map_err(|_| Error::KeyParse("input is neither PEM nor base64-encoded PEM".to_string()))?;
    let text = String::from_utf8(decoded)
        .map_err(|_| Error::KeyParse("base64 payload is not PEM text".to_string()))?;

    if text.trim_start().starts_with(PEM_BEGIN) {
        Ok(text.trim().to_string())
    } else {
        Err(Error::KeyParse(
            "base64 payload does not contain a PEM block".to_string(),
        ))
    }
}
