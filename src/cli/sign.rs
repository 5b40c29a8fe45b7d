//! Sign command: show how a request would be signed
//!
//! Nothing is sent. Useful when NetSuite rejects a signature and the base
//! string needs comparing against another client's.

use reqwest::Method;
use serde_json::json;
use url::Url;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::oauth::{self, OAuthStamp, SignedHeader};
use crate::config::{Config, Credential};
use crate::error::{ApiError, Result};
use crate::output::json::format_json;
use crate::output::table;

pub fn run(
    opts: &GlobalOptions,
    method: &str,
    url: Option<&str>,
    nonce: Option<String>,
    timestamp: Option<i64>,
) -> Result<()> {
    let credential = Config::from_env().credential()?;

    let stamp = match (nonce, timestamp) {
        (Some(nonce), Some(timestamp)) => OAuthStamp { nonce, timestamp },
        _ => OAuthStamp::generate(),
    };

    let signed = sign(&credential, method, url, &stamp)?;
    println!("{}", render(&signed, opts.format)?);
    Ok(())
}

fn sign(
    credential: &Credential,
    method: &str,
    url: Option<&str>,
    stamp: &OAuthStamp,
) -> Result<SignedHeader> {
    let method = Method::from_bytes(method.trim().to_uppercase().as_bytes())
        .map_err(|_| ApiError::InvalidArgument(format!("invalid HTTP method: {}", method)))?;

    let url = match url {
        Some(raw) => Url::parse(raw)
            .map_err(|e| ApiError::InvalidArgument(format!("invalid URL {}: {}", raw, e)))?,
        None => credential.endpoint.clone(),
    };

    Ok(oauth::sign_request(&method, &url, credential, stamp)?)
}

fn render(signed: &SignedHeader, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format_json(&json!({
            "baseString": signed.base_string,
            "signature": signed.signature,
            "authorization": signed.header,
        }))?),
        OutputFormat::Table => Ok(table::format_fields(&[
            ("Base string", signed.base_string.clone()),
            ("Signature", signed.signature.clone()),
            ("Authorization", signed.header.clone()),
        ])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> OAuthStamp {
        OAuthStamp {
            nonce: "abcdefghijklmnopqrstuvwxyz012345".to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_sign_known_request() {
        let credential = Credential::for_tests("https://example.com/app/restlet?action=employees");

        let signed = sign(&credential, "get", None, &stamp()).unwrap();

        assert_eq!(signed.signature, "xEkpARQ0QEcK8W1YnnaAo1ZIZZHWYanBsoxVktg/T3k=");
        assert!(signed.base_string.starts_with("GET&https%3A%2F%2Fexample.com%2Fapp%2Frestlet&"));
    }

    #[test]
    fn test_sign_explicit_url_overrides_endpoint() {
        let credential = Credential::for_tests("https://example.com/app/restlet");

        let signed = sign(
            &credential,
            "POST",
            Some("https://other.example.com/x"),
            &stamp(),
        )
        .unwrap();

        assert!(signed.base_string.starts_with("POST&https%3A%2F%2Fother.example.com%2Fx&"));
    }

    #[test]
    fn test_sign_rejects_bad_input() {
        let credential = Credential::for_tests("https://example.com/app/restlet");

        assert!(sign(&credential, "GET", Some("not a url"), &stamp()).is_err());
        assert!(sign(&credential, "BAD METHOD", None, &stamp()).is_err());
    }

    #[test]
    fn test_render_json() {
        let credential = Credential::for_tests("https://example.com/app/restlet");
        let signed = sign(&credential, "GET", None, &stamp()).unwrap();

        let rendered = render(&signed, OutputFormat::Json).unwrap();
        assert!(rendered.contains("\"authorization\": \"OAuth realm="));
    }
}
