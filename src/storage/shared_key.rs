//! Shared Key request signing for the Blob service.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Request;
use sha2::Sha256;
use url::Url;

use super::BlobStoreError;

type HmacSha256 = Hmac<Sha256>;

pub const STORAGE_API_VERSION: &str = "2021-08-06";

/// Standard headers in the order the string-to-sign lists them.
const SIGNED_HEADERS: [&str; 11] = [
    "content-encoding",
    "content-language",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "if-modified-since",
    "if-match",
    "if-none-match",
    "if-unmodified-since",
    "range",
];

/// Storage account name plus its decoded access key.
#[derive(Clone)]
pub struct SharedKeyCredential {
    account: String,
    key: Vec<u8>,
}

impl fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account", &self.account)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl SharedKeyCredential {
    /// `access_key` is the base64 key shown in the storage account settings.
    pub fn new(account: impl Into<String>, access_key: &str) -> Result<Self, BlobStoreError> {
        let key = general_purpose::STANDARD.decode(access_key.trim())?;
        Ok(Self {
            account: account.into(),
            key,
        })
    }

    /// Stamps `x-ms-date`/`x-ms-version` and adds the `Authorization` header.
    pub fn sign(&self, request: &mut Request) -> Result<(), BlobStoreError> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        self.sign_at(request, &date)
    }

    fn sign_at(&self, request: &mut Request, date: &str) -> Result<(), BlobStoreError> {
        let headers = request.headers_mut();
        headers.insert("x-ms-date", header_value(date)?);
        headers.insert("x-ms-version", HeaderValue::from_static(STORAGE_API_VERSION));

        let signature = self.signature(&string_to_sign(&self.account, request))?;
        let authorization = header_value(&format!("SharedKey {}:{}", self.account, signature))?;
        request.headers_mut().insert(AUTHORIZATION, authorization);

        Ok(())
    }

    fn signature(&self, string_to_sign: &str) -> Result<String, BlobStoreError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| BlobStoreError::Signing(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());
        Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn header_value(value: &str) -> Result<HeaderValue, BlobStoreError> {
    HeaderValue::from_str(value).map_err(|e| BlobStoreError::Signing(e.to_string()))
}

pub(crate) fn string_to_sign(account: &str, request: &Request) -> String {
    let headers = request.headers();
    let mut out = String::from(request.method().as_str());

    for name in SIGNED_HEADERS {
        let value = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        // Zero length is signed as an empty string since version 2015-02-21.
        let value = if name == "content-length" && value == "0" {
            ""
        } else {
            value
        };
        out.push('\n');
        out.push_str(value);
    }
    out.push('\n');

    out.push_str(&canonicalized_headers(headers));
    out.push_str(&canonicalized_resource(account, request.url()));
    out
}

fn canonicalized_headers(headers: &HeaderMap) -> String {
    let ms_headers: BTreeMap<&str, &str> = headers
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("x-ms-"))
        .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?.trim())))
        .collect();

    ms_headers
        .into_iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect()
}

fn canonicalized_resource(account: &str, url: &Url) -> String {
    let mut resource = format!("/{}{}", account, url.path());

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in url.query_pairs() {
        params
            .entry(name.to_lowercase())
            .or_default()
            .push(value.into_owned());
    }

    for (name, mut values) in params {
        values.sort();
        resource.push_str(&format!("\n{}:{}", name, values.join(",")));
    }

    resource
}
