//! OAuth 1.0a request signing for NetSuite token-based authentication
//!
//! Produces the `Authorization` header NetSuite expects for restlet calls:
//! HMAC-SHA256 over the canonical base string, keyed with the consumer and
//! token secrets. Request bodies are JSON and never take part in the
//! signature.

use base64::{Engine as _, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::distr::{Alphanumeric, SampleString};
use reqwest::Method;
use sha2::Sha256;
use url::Url;

use crate::config::Credential;
use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA256";
pub const OAUTH_VERSION: &str = "1.0";

/// Nonce length; 62^32 possible values
const NONCE_LEN: usize = 32;

/// Single-use nonce and timestamp for one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthStamp {
    pub nonce: String,
    pub timestamp: i64,
}

impl OAuthStamp {
    /// Fresh stamp: current Unix seconds and a random alphanumeric nonce.
    ///
    /// `rand::rng()` is the thread-local ChaCha CSPRNG seeded from the OS.
    pub fn generate() -> Self {
        Self {
            nonce: Alphanumeric.sample_string(&mut rand::rng(), NONCE_LEN),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// A computed signature together with the intermediate values.
#[derive(Debug, Clone)]
pub struct SignedHeader {
    /// Canonical string that was HMAC'd
    pub base_string: String,
    /// Base64 HMAC-SHA256 digest
    pub signature: String,
    /// Complete `Authorization` header value
    pub header: String,
}

/// Build an `Authorization` header for a request using a fresh stamp.
pub fn authorization_header(
    method: &Method,
    url: &Url,
    credential: &Credential,
) -> Result<String, ApiError> {
    sign_request(method, url, credential, &OAuthStamp::generate()).map(|signed| signed.header)
}

/// Sign a request with an explicit stamp.
///
/// Deterministic for a given stamp, which is what makes golden-value tests
/// possible. Fails with `InvalidArgument` if the URL has no host.
pub fn sign_request(
    method: &Method,
    url: &Url,
    credential: &Credential,
    stamp: &OAuthStamp,
) -> Result<SignedHeader, ApiError> {
    let base_url = normalized_base_url(url)?;

    let mut oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), credential.consumer_key.clone()),
        ("oauth_token".into(), credential.token_id.clone()),
        ("oauth_signature_method".into(), SIGNATURE_METHOD.into()),
        ("oauth_timestamp".into(), stamp.timestamp.to_string()),
        ("oauth_nonce".into(), stamp.nonce.clone()),
        ("oauth_version".into(), OAUTH_VERSION.into()),
    ];

    let mut signing_params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    signing_params.extend(oauth_params.iter().cloned());

    let base_string = base_string(method, &base_url, signing_params);
    let signature = hmac_sha256_base64(&signing_key(credential), &base_string)?;

    oauth_params.push(("oauth_signature".into(), signature.clone()));
    oauth_params.sort();

    let mut parts = Vec::with_capacity(oauth_params.len() + 1);
    parts.push(format!(r#"realm="{}""#, percent_encode(&credential.realm)));
    for (key, value) in &oauth_params {
        parts.push(format!(r#"{}="{}""#, percent_encode(key), percent_encode(value)));
    }

    Ok(SignedHeader {
        base_string,
        signature,
        header: format!("OAuth {}", parts.join(", ")),
    })
}

/// RFC 3986 strict percent-encoding.
///
/// Only `A-Z a-z 0-9 - . _ ~` pass through; every other UTF-8 byte becomes
/// an uppercase `%XX`. Spaces are `%20`, never `+`.
pub fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Scheme, host, optional non-default port and cleaned path.
fn normalized_base_url(url: &Url) -> Result<String, ApiError> {
    let host = url
        .host_str()
        .ok_or_else(|| ApiError::InvalidArgument(format!("cannot sign URL without a host: {}", url)))?;

    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();

    Ok(format!(
        "{}://{}{}{}",
        url.scheme(),
        host,
        port,
        clean_path(url.path())
    ))
}

/// Lexical path cleanup: collapse repeated slashes, resolve `.` and `..`,
/// drop any trailing slash.
fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// `METHOD&encoded(base_url)&encoded(sorted params)`.
///
/// Parameters sort by key, then value, so repeated keys stay deterministic.
fn base_string(method: &Method, base_url: &str, mut params: Vec<(String, String)>) -> String {
    params.sort();

    let param_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

fn signing_key(credential: &Credential) -> String {
    format!(
        "{}&{}",
        percent_encode(&credential.consumer_secret),
        percent_encode(&credential.token_secret)
    )
}

fn hmac_sha256_base64(key: &str, message: &str) -> Result<String, ApiError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| ApiError::InvalidArgument(format!("failed to create HMAC: {}", e)))?;
    mac.update(message.as_bytes());
    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}
