//! Azure Blob Storage container built from a storage connection string
//!
//! Supports the connection string forms handed out by the Azure portal and
//! by Azurite:
//! - `AccountName=...;AccountKey=...` (optionally `EndpointSuffix`, `DefaultEndpointsProtocol`)
//! - `...;BlobEndpoint=http://host:port/account` for custom or emulator endpoints
//! - `UseDevelopmentStorage=true`
//!
//! # Example
//!
//! ```no_run
//! use cdn_sync::backend::{azure, AssetStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = azure::connect(
//!     "DefaultEndpointsProtocol=https;AccountName=assets;AccountKey=c2VjcmV0;EndpointSuffix=core.windows.net",
//!     "cdn",
//! )?;
//! println!("present: {}", backend.exists("css/site-3f2a9c0d1e.css").await?);
//! # Ok(())
//! # }
//! ```

use super::error::{BackendResult, StoreError};
use super::object::ObjectStoreBackend;
use object_store::azure::MicrosoftAzureBuilder;
use secrecy::{ExposeSecret, SecretString};
use std::str::FromStr;
use std::sync::Arc;

const BACKEND: &str = "azure";

/// Parsed Azure storage connection string
#[derive(Debug, Clone, Default)]
pub struct ConnectionString {
    pub account_name: Option<String>,
    pub account_key: Option<SecretString>,
    pub blob_endpoint: Option<String>,
    pub endpoint_suffix: Option<String>,
    pub protocol: Option<String>,
    pub use_development_storage: bool,
}

impl FromStr for ConnectionString {
    type Err = StoreError;

    fn from_str(s: &str) -> BackendResult<Self> {
        let mut parsed = ConnectionString::default();

        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Account keys are base64 and may end in '=', so split on the first one only
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StoreError::invalid_config(
                    BACKEND,
                    format!("malformed connection string segment '{}'", pair),
                )
            })?;
            let value = value.trim().to_string();

            match key.trim() {
                "AccountName" => parsed.account_name = Some(value),
                "AccountKey" => {
                    parsed.account_key = Some(SecretString::new(value.into_boxed_str()))
                }
                "BlobEndpoint" => parsed.blob_endpoint = Some(value),
                "EndpointSuffix" => parsed.endpoint_suffix = Some(value),
                "DefaultEndpointsProtocol" => parsed.protocol = Some(value),
                "UseDevelopmentStorage" => {
                    parsed.use_development_storage = value.eq_ignore_ascii_case("true")
                }
                other => tracing::debug!(key = other, "Ignoring connection string setting"),
            }
        }

        Ok(parsed)
    }
}

impl ConnectionString {
    /// Blob endpoint implied by the connection string, if it is not the public cloud default
    fn endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.blob_endpoint {
            return Some(endpoint.trim_end_matches('/').to_string());
        }

        let suffix = self.endpoint_suffix.as_deref()?;
        if suffix == "core.windows.net" {
            return None;
        }
        let account = self.account_name.as_deref()?;
        let protocol = self.protocol.as_deref().unwrap_or("https");
        Some(format!("{}://{}.blob.{}", protocol, account, suffix))
    }

    fn builder(&self, container: &str) -> BackendResult<MicrosoftAzureBuilder> {
        let builder = MicrosoftAzureBuilder::new().with_container_name(container);

        if self.use_development_storage {
            return Ok(builder.with_use_emulator(true).with_allow_http(true));
        }

        let account = self
            .account_name
            .as_deref()
            .ok_or_else(|| StoreError::invalid_config(BACKEND, "AccountName is missing"))?;
        let key = self
            .account_key
            .as_ref()
            .ok_or_else(|| StoreError::invalid_config(BACKEND, "AccountKey is missing"))?;

        let mut builder = builder
            .with_account(account)
            .with_access_key(key.expose_secret());

        if let Some(endpoint) = self.endpoint() {
            let insecure = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(insecure);
        }

        Ok(builder)
    }
}

/// Build an asset store for `container` from a storage connection string
pub fn connect(connection_string: &str, container: &str) -> BackendResult<ObjectStoreBackend> {
    let parsed: ConnectionString = connection_string.parse()?;
    let store = parsed
        .builder(container)?
        .build()
        .map_err(|e| {
            StoreError::invalid_config(BACKEND, format!("failed to create client: {}", e))
        })?;

    Ok(ObjectStoreBackend::new(Arc::new(store), BACKEND))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account_key_with_padding() {
        let parsed: ConnectionString =
            "DefaultEndpointsProtocol=https;AccountName=assets;AccountKey=c2VjcmV0a2V5==;EndpointSuffix=core.windows.net"
                .parse()
                .unwrap();

        assert_eq!(parsed.account_name.as_deref(), Some("assets"));
        assert_eq!(
            parsed.account_key.as_ref().map(|k| k.expose_secret()),
            Some("c2VjcmV0a2V5==")
        );
        assert_eq!(parsed.endpoint(), None);
    }

    #[test]
    fn test_explicit_blob_endpoint() {
        let parsed: ConnectionString =
            "AccountName=devstoreaccount1;AccountKey=a2V5;BlobEndpoint=http://127.0.0.1:10000/devstoreaccount1/"
                .parse()
                .unwrap();
        assert_eq!(
            parsed.endpoint().as_deref(),
            Some("http://127.0.0.1:10000/devstoreaccount1")
        );
    }

    #[test]
    fn test_sovereign_cloud_suffix() {
        let parsed: ConnectionString =
            "AccountName=assets;AccountKey=a2V5;EndpointSuffix=core.chinacloudapi.cn"
                .parse()
                .unwrap();
        assert_eq!(
            parsed.endpoint().as_deref(),
            Some("https://assets.blob.core.chinacloudapi.cn")
        );
    }

    #[test]
    fn test_development_storage_flag() {
        let parsed: ConnectionString = "UseDevelopmentStorage=true".parse().unwrap();
        assert!(parsed.use_development_storage);
        assert!(parsed.builder("cdn").is_ok());
    }

    #[test]
    fn test_missing_account_key() {
        let parsed: ConnectionString = "AccountName=assets".parse().unwrap();
        let err = parsed.builder("cdn").unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("AccountKey"));
    }

    #[test]
    fn test_malformed_segment_and_redacted_key() {
        let err = "AccountName=assets;garbage".parse::<ConnectionString>().unwrap_err();
        assert!(err.to_string().contains("garbage"));

        let parsed = "AccountKey=c2VjcmV0".parse::<ConnectionString>().unwrap();
        assert!(!format!("{:?}", parsed).contains("c2VjcmV0"));
    }
}
