// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! OAuth 1.0a signing and the three-legged handshake.
//!
//! Withings authenticates every data request with an RFC 5849 HMAC-SHA1
//! signature. The authorization parameters are sent in the query string.
//!
//! The handshake runs once per user:
//! 1. [`OAuthHandshake::request_temp_token`] obtains a temporary token
//! 2. the user visits [`OAuthHandshake::authorize_url`] and approves access
//! 3. [`OAuthHandshake::exchange_access_token`] trades the temporary token
//!    for long-lived [`Credentials`]

use crate::config::Config;
use crate::constants::endpoints;
use crate::errors::{Result, WithingsError};
use crate::logging::AppLogger;
use crate::transport::{HttpTransport, ReqwestTransport};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use ring::hmac;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use url::Url;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LENGTH: usize = 32;

/// Application identity registered with the vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

/// A token and its secret, temporary or long-lived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub key: String,
    pub secret: String,
}

impl Token {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

/// Long-lived credentials produced by the handshake
///
/// Immutable once obtained. Persisting them is left to the embedding
/// application; the type is serializable for that purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub consumer: Consumer,
    pub access_token: Token,
    pub user_id: String,
}

impl Credentials {
    pub fn new(consumer: Consumer, access_token: Token, user_id: impl Into<String>) -> Self {
        Self {
            consumer,
            access_token,
            user_id: user_id.into(),
        }
    }
}

/// Produces OAuth authorization parameters for a request
pub trait OAuthSigner: Send + Sync {
    /// Authorization parameters (including `oauth_signature`) for a request
    ///
    /// `params` are the request's own query parameters; they are covered by
    /// the signature but not repeated in the result.
    fn sign(
        &self,
        consumer: &Consumer,
        token: Option<&Token>,
        method: &str,
        url: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>>;
}

/// RFC 5849 HMAC-SHA1 signer with a random nonce and the current time
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha1Signer;

impl HmacSha1Signer {
    /// Deterministic signing with a caller-chosen nonce and timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn sign_with(
        &self,
        consumer: &Consumer,
        token: Option<&Token>,
        method: &str,
        url: &str,
        params: &BTreeMap<String, String>,
        nonce: &str,
        timestamp: i64,
    ) -> Result<BTreeMap<String, String>> {
        let mut oauth_params = BTreeMap::new();
        oauth_params.insert("oauth_consumer_key".to_string(), consumer.key.clone());
        oauth_params.insert("oauth_nonce".to_string(), nonce.to_string());
        oauth_params.insert("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string());
        oauth_params.insert("oauth_timestamp".to_string(), timestamp.to_string());
        oauth_params.insert("oauth_version".to_string(), OAUTH_VERSION.to_string());
        if let Some(token) = token {
            oauth_params.insert("oauth_token".to_string(), token.key.clone());
        }

        let base_string = signature_base_string(method, url, params, &oauth_params)?;
        let signing_key = format!(
            "{}&{}",
            percent_encode(&consumer.secret),
            percent_encode(token.map_or("", |t| t.secret.as_str()))
        );

        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, signing_key.as_bytes());
        let tag = hmac::sign(&key, base_string.as_bytes());
        oauth_params.insert("oauth_signature".to_string(), STANDARD.encode(tag.as_ref()));

        Ok(oauth_params)
    }
}

impl OAuthSigner for HmacSha1Signer {
    fn sign(
        &self,
        consumer: &Consumer,
        token: Option<&Token>,
        method: &str,
        url: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect();

        self.sign_with(consumer, token, method, url, params, &nonce, Utc::now().timestamp())
    }
}

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn signature_base_string(
    method: &str,
    url: &str,
    params: &BTreeMap<String, String>,
    oauth_params: &BTreeMap<String, String>,
) -> Result<String> {
    let mut base_url = Url::parse(url)?;
    base_url.set_query(None);
    base_url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = params
        .iter()
        .chain(oauth_params.iter())
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    pairs.sort();

    let normalized = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url.as_str()),
        percent_encode(&normalized)
    ))
}

/// Three-legged OAuth 1.0a handshake against the vendor's account endpoints
pub struct OAuthHandshake<T = ReqwestTransport, S = HmacSha1Signer> {
    consumer: Consumer,
    oauth_base_url: String,
    transport: T,
    signer: S,
}

impl OAuthHandshake {
    /// Handshake against the default OAuth endpoints
    pub fn new(consumer: Consumer) -> Self {
        Self::with_base_url(consumer, endpoints::OAUTH_BASE_URL)
    }

    pub fn with_base_url(consumer: Consumer, oauth_base_url: impl Into<String>) -> Self {
        Self::with_parts(
            consumer,
            oauth_base_url,
            ReqwestTransport::new(),
            HmacSha1Signer,
        )
    }

    /// Handshake using the OAuth base URL and timeout from `config`
    pub fn from_config(config: &Config, consumer: Consumer) -> Result<Self> {
        let transport =
            ReqwestTransport::with_timeout(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::with_parts(
            consumer,
            config.oauth_base_url.as_str(),
            transport,
            HmacSha1Signer,
        ))
    }
}

impl<T: HttpTransport, S: OAuthSigner> OAuthHandshake<T, S> {
    pub fn with_parts(
        consumer: Consumer,
        oauth_base_url: impl Into<String>,
        transport: T,
        signer: S,
    ) -> Self {
        Self {
            consumer,
            oauth_base_url: oauth_base_url.into().trim_end_matches('/').to_string(),
            transport,
            signer,
        }
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.oauth_base_url, path)
    }

    /// Obtain a temporary token, optionally registering a callback URL
    pub async fn request_temp_token(&self, callback_url: Option<&str>) -> Result<Token> {
        let mut params = BTreeMap::new();
        if let Some(callback) = callback_url {
            params.insert("oauth_callback".to_string(), callback.to_string());
        }

        let response = self
            .signed_form_request(endpoints::REQUEST_TOKEN_PATH, None, params)
            .await;
        AppLogger::log_oauth_event("request_token", response.is_ok());
        let mut fields = response?;

        Ok(Token::new(
            take_field(&mut fields, "oauth_token")?,
            take_field(&mut fields, "oauth_token_secret")?,
        ))
    }

    /// URL the user must visit to approve the temporary token
    pub fn authorize_url(&self, temp_token: &Token) -> Result<String> {
        let mut url = Url::parse(&self.endpoint(endpoints::AUTHORIZE_PATH))?;
        url.query_pairs_mut()
            .append_pair("oauth_token", &temp_token.key);
        Ok(url.to_string())
    }

    /// Trade an approved temporary token for long-lived credentials
    pub async fn exchange_access_token(
        &self,
        temp_token: &Token,
        verifier: Option<&str>,
    ) -> Result<Credentials> {
        let mut params = BTreeMap::new();
        if let Some(verifier) = verifier {
            params.insert("oauth_verifier".to_string(), verifier.to_string());
        }

        let response = self
            .signed_form_request(endpoints::ACCESS_TOKEN_PATH, Some(temp_token), params)
            .await;
        AppLogger::log_oauth_event("access_token", response.is_ok());
        let mut fields = response?;

        Ok(Credentials::new(
            self.consumer.clone(),
            Token::new(
                take_field(&mut fields, "oauth_token")?,
                take_field(&mut fields, "oauth_token_secret")?,
            ),
            take_field(&mut fields, "userid")?,
        ))
    }

    async fn signed_form_request(
        &self,
        path: &str,
        token: Option<&Token>,
        params: BTreeMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let url = self.endpoint(path);
        let mut query = self.signer.sign(&self.consumer, token, "GET", &url, &params)?;
        query.extend(params);

        let response = self.transport.get(&url, &query).await?;
        if response.status != 200 {
            return Err(WithingsError::Transport {
                status: response.status,
                body: response.body,
            });
        }

        Ok(url::form_urlencoded::parse(response.body.as_bytes())
            .into_owned()
            .collect())
    }
}

fn take_field(fields: &mut HashMap<String, String>, name: &str) -> Result<String> {
    fields
        .remove(name)
        .ok_or_else(|| WithingsError::InvalidPayload(format!("token response is missing {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_hmac_sha1_reference_signature() {
        // Published reference request for HMAC-SHA1 request signing
        let consumer = Consumer::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        );
        let token = Token::new(
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        );
        let params = params_of(&[
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ("include_entities", "true"),
        ]);

        let signed = HmacSha1Signer
            .sign_with(
                &consumer,
                Some(&token),
                "POST",
                "https://api.twitter.com/1.1/statuses/update.json",
                &params,
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
                1_318_622_958,
            )
            .unwrap();

        assert_eq!(signed["oauth_signature"], "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
        assert_eq!(signed["oauth_token"], token.key);
        assert!(!signed.contains_key("status"));
    }

    #[test]
    fn test_sign_without_token() {
        let consumer = Consumer::new("key", "secret");
        let signed = HmacSha1Signer
            .sign(
                &consumer,
                None,
                "GET",
                "https://oauth.withings.com/account/request_token",
                &BTreeMap::new(),
            )
            .unwrap();

        assert!(!signed.contains_key("oauth_token"));
        assert_eq!(signed["oauth_signature_method"], "HMAC-SHA1");
        assert_eq!(signed["oauth_version"], "1.0");
        assert_eq!(signed["oauth_nonce"].len(), NONCE_LENGTH);
        assert!(signed.contains_key("oauth_signature"));
    }

    #[test]
    fn test_signature_ignores_url_query_and_covers_params() {
        let consumer = Consumer::new("key", "secret");
        let params = params_of(&[("action", "getmeas")]);
        let sign = |url: &str, params: &BTreeMap<String, String>| {
            HmacSha1Signer
                .sign_with(&consumer, None, "GET", url, params, "nonce", 1_700_000_000)
                .unwrap()["oauth_signature"]
                .clone()
        };

        assert_eq!(
            sign("https://wbsapi.withings.net/measure", &params),
            sign("https://wbsapi.withings.net/measure?ignored=1", &params)
        );
        assert_ne!(
            sign("https://wbsapi.withings.net/measure", &params),
            sign("https://wbsapi.withings.net/measure", &BTreeMap::new())
        );
    }

    #[test]
    fn test_percent_encoding_is_rfc3986() {
        assert_eq!(percent_encode("a b+c~d_e.f-g"), "a%20b%2Bc~d_e.f-g");
        assert_eq!(percent_encode("http://x/y"), "http%3A%2F%2Fx%2Fy");
    }

    #[test]
    fn test_authorize_url() {
        let handshake = OAuthHandshake::new(Consumer::new("key", "secret"));
        let url = handshake
            .authorize_url(&Token::new("temp token", "temp secret"))
            .unwrap();

        assert_eq!(
            url,
            "https://oauth.withings.com/account/authorize?oauth_token=temp+token"
        );
        assert!(!url.contains("temp secret"));
    }
}
