//! RS256 access-token signing and JWKS publication.
//!
//! The signer holds the RSA keypair loaded (or generated) at startup; it is
//! read-only afterwards and shared across request tasks.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use shared_error::AppError;
use uuid::Uuid;

const RSA_BITS: usize = 2048;

/// JWT claims carried by issued access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer
    pub iss: String,

    /// Subject - user ID
    pub sub: Uuid,

    /// Audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Unique token id
    pub jti: Uuid,

    /// Email address of the subject
    pub email: String,

    /// OAuth client the token was issued through
    pub client_id: String,

    /// Space-delimited granted scopes
    pub scope: String,
}

impl Claims {
    /// Create access token claims expiring `expires_in` seconds from now
    pub fn new_access(
        issuer: &str,
        audience: &str,
        user_id: Uuid,
        email: &str,
        client_id: &str,
        scope: &str,
        expires_in: i64,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            iss: issuer.to_string(),
            sub: user_id,
            aud: audience.to_string(),
            exp: now + expires_in,
            iat: now,
            jti: Uuid::new_v4(),
            email: email.to_string(),
            client_id: client_id.to_string(),
            scope: scope.to_string(),
        }
    }
}

/// Single RSA public key in JWK form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: String,
    pub alg: String,
    pub kid: String,
    /// Modulus, base64url without padding
    pub n: String,
    /// Public exponent, base64url without padding
    pub e: String,
}

/// JWKS document published at /auth/.well-known/jwks.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksDocument {
    pub keys: Vec<Jwk>,
}

/// RS256 signer built once at startup from configured or generated key material
pub struct JwtSigner {
    key_id: String,
    issuer: String,
    audience: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    jwks: JwksDocument,
}

/// Hides key material from debug output
impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtSigner {
    /// Build a signer from a PEM-encoded RSA private key (PKCS#8 or PKCS#1)
    pub fn from_pem(key_id: &str, issuer: &str, audience: &str, pem: &str) -> Result<Self, AppError> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| AppError::InvalidRsa(format!("Failed to parse RSA private key: {}", e)))?;
        Self::from_private_key(key_id, issuer, audience, private_key)
    }

    /// Generate a fresh RSA-2048 keypair. Tokens signed with a generated key
    /// do not survive a restart; configure a persistent key in production.
    pub fn generate(key_id: &str, issuer: &str, audience: &str) -> Result<Self, AppError> {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, RSA_BITS)
            .map_err(|e| AppError::InvalidRsa(format!("Failed to generate RSA keypair: {}", e)))?;
        Self::from_private_key(key_id, issuer, audience, private_key)
    }

    fn from_private_key(
        key_id: &str,
        issuer: &str,
        audience: &str,
        private_key: RsaPrivateKey,
    ) -> Result<Self, AppError> {
        let public_key: RsaPublicKey = private_key.to_public_key();

        let private_pem = private_key
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| AppError::InvalidRsa(format!("Failed to encode private key: {}", e)))?;
        let public_pem = public_key
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| AppError::InvalidRsa(format!("Failed to encode public key: {}", e)))?;

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| AppError::InvalidRsa(format!("Unusable RSA private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| AppError::InvalidRsa(format!("Unusable RSA public key: {}", e)))?;

        let jwks = JwksDocument {
            keys: vec![Jwk {
                kty: "RSA".to_string(),
                key_use: "sig".to_string(),
                alg: "RS256".to_string(),
                kid: key_id.to_string(),
                n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
                e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
            }],
        };

        Ok(Self {
            key_id: key_id.to_string(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            encoding_key,
            decoding_key,
            jwks,
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Sign claims into a compact JWT with header `{alg: RS256, typ: JWT, kid}`
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key_id.clone());
        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign access token: {}", e)))
    }

    /// Decode and validate a token: signature, expiry, issuer and audience
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Public half of the signing key in JWK Set form
    pub fn jwks(&self) -> &JwksDocument {
        &self.jwks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    // Keypair generation is slow; share one signer across tests
    fn signer() -> &'static JwtSigner {
        static SIGNER: OnceLock<JwtSigner> = OnceLock::new();
        SIGNER.get_or_init(|| {
            JwtSigner::generate("test-key-1", "http://issuer.test", "test-api")
                .expect("keypair generation")
        })
    }

    fn sample_claims() -> Claims {
        Claims::new_access(
            "http://issuer.test",
            "test-api",
            Uuid::new_v4(),
            "u@x.test",
            "client-1",
            "read write",
            3600,
        )
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let claims = sample_claims();
        let token = signer().sign(&claims).unwrap();

        let decoded = signer().verify(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email, "u@x.test");
        assert_eq!(decoded.client_id, "client-1");
        assert_eq!(decoded.scope, "read write");
        assert_eq!(decoded.jti, claims.jti);
    }

    #[test]
    fn test_header_carries_kid_and_alg() {
        let token = signer().sign(&sample_claims()).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-1"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut claims = sample_claims();
        claims.iat -= 7200;
        claims.exp -= 7200;
        let token = signer().sign(&claims).unwrap();

        assert!(matches!(signer().verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let mut claims = sample_claims();
        claims.aud = "other-api".to_string();
        let token = signer().sign(&claims).unwrap();

        assert!(signer().verify(&token).is_err());
    }

    #[test]
    fn test_jwks_document_shape() {
        let jwks = signer().jwks();
        assert_eq!(jwks.keys.len(), 1);

        let key = &jwks.keys[0];
        assert_eq!(key.kty, "RSA");
        assert_eq!(key.key_use, "sig");
        assert_eq!(key.alg, "RS256");
        assert_eq!(key.kid, "test-key-1");
        assert!(!key.n.is_empty());
        // Standard public exponent 65537 -> AQAB
        assert_eq!(key.e, "AQAB");
        // base64url without padding
        assert!(!key.n.contains('='));
    }

    #[test]
    fn test_from_pem_rejects_garbage() {
        let result = JwtSigner::from_pem("k", "iss", "aud", "not a pem");
        assert!(matches!(result, Err(AppError::InvalidRsa(_))));
    }
}
