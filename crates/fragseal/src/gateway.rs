//! The Gateway: request handling around the envelope protocol.
//!
//! Holds the immutable key material and configuration loaded at startup and
//! serves two operations:
//!
//! - `POST /` with the fragment as body: encrypt it for every recipient
//! - `GET /?crypt=<blob>`: unwrap a wrapped key with the local private key
//!
//! Requests and responses are transport-agnostic; an HTTP layer maps its own
//! types onto [`GatewayRequest`] and [`GatewayResponse`].

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::task::JoinSet;

use fragseal_core::{EncryptionResult, Keyset};
use fragseal_crypto::{
    decrypt_wrapped_key_json, generate_encrypted_fragment, require_recipients, seal_fragment,
};
use fragseal_keys::{load_private_keyset_from_env, DirectoryKeySource, KeyMaterialStore, PublicKeySource};

use crate::auth::PskAuthenticator;
use crate::config::{GatewayConfig, ENV_PRIVATE_KEY};
use crate::error::{GatewayError, Result};

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

/// A transport-agnostic request.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: String,
    /// Decoded query parameters.
    pub query: Vec<(String, String)>,
    /// Raw `Authorization` header value.
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

impl GatewayRequest {
    /// `POST /` carrying a fragment.
    pub fn encrypt(authorization: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: Method::Post,
            path: "/".to_string(),
            query: Vec::new(),
            authorization: authorization.map(String::from),
            body: body.into(),
        }
    }

    /// `GET /?crypt=<blob>`.
    pub fn decrypt(authorization: Option<&str>, crypt: &str) -> Self {
        Self {
            method: Method::Get,
            path: "/".to_string(),
            query: vec![("crypt".to_string(), crypt.to_string())],
            authorization: authorization.map(String::from),
            body: Vec::new(),
        }
    }

    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A transport-agnostic response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl GatewayResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec_pretty(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    fn raw_json(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body,
        }
    }

    fn error(status: u16, message: &str) -> Self {
        // ErrorBody only holds a string; serialization cannot fail.
        let body = serde_json::to_vec_pretty(&ErrorBody { error: message }).unwrap_or_default();
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }

    fn from_error(err: &GatewayError) -> Self {
        Self::error(err.status(), &err.to_string())
    }
}

/// The envelope gateway.
pub struct Gateway {
    keys: Arc<KeyMaterialStore>,
    config: GatewayConfig,
    auth: PskAuthenticator,
}

impl Gateway {
    /// Create a gateway over already-loaded key material.
    pub fn new(keys: Arc<KeyMaterialStore>, config: GatewayConfig) -> Self {
        let auth = PskAuthenticator::new(config.psk.clone());
        Self { keys, config, auth }
    }

    /// Load key material for `config` from `source` and build a gateway.
    pub async fn load<S: PublicKeySource + ?Sized>(
        config: GatewayConfig,
        source: &S,
        private_keyset: Keyset,
    ) -> Result<Self> {
        let keys = KeyMaterialStore::load(source, &config.recipients, private_keyset).await?;
        Ok(Self::new(Arc::new(keys), config))
    }

    /// Build a gateway entirely from the environment.
    ///
    /// Intended for process startup: any failure here should stop the
    /// service.
    pub async fn from_env() -> anyhow::Result<Self> {
        let config = GatewayConfig::from_env().context("reading gateway configuration")?;
        let private = load_private_keyset_from_env(ENV_PRIVATE_KEY)
            .context("loading the local private key")?;
        let source = DirectoryKeySource::new(&config.public_key_dir);

        let gateway = Self::load(config, &source, private)
            .await
            .with_context(|| format!("loading recipient public keys from {}", source.describe()))?;
        Ok(gateway)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn keys(&self) -> &KeyMaterialStore {
        &self.keys
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Envelope Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Encrypt a fragment for every configured recipient.
    pub async fn encrypt_fragment(&self, payload: &[u8]) -> Result<EncryptionResult> {
        if self.config.parallel_wrap {
            self.encrypt_parallel(payload).await
        } else {
            let keys = Arc::clone(&self.keys);
            let requirements = self.config.access_requirements.clone();
            let payload = payload.to_vec();
            let result = tokio::task::spawn_blocking(move || {
                generate_encrypted_fragment(&payload, &requirements, keys.recipients())
            })
            .await
            .map_err(|e| GatewayError::Task(e.to_string()))??;
            Ok(result)
        }
    }

    /// Seal once, then wrap each recipient on the blocking pool. The first
    /// failure aborts the outstanding wraps and fails the whole call.
    async fn encrypt_parallel(&self, payload: &[u8]) -> Result<EncryptionResult> {
        require_recipients(self.keys.recipients())?;

        let sealed = Arc::new(seal_fragment(payload, &self.config.access_requirements)?);

        let mut tasks = JoinSet::new();
        for (domain, keyset) in self.keys.recipients().iter() {
            let sealed = Arc::clone(&sealed);
            let domain = domain.clone();
            let keyset = keyset.clone();
            tasks.spawn_blocking(move || {
                let wrapped = sealed.wrap_for(&keyset);
                (domain, wrapped)
            });
        }

        let mut keys = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (domain, wrapped) = joined.map_err(|e| GatewayError::Task(e.to_string()))?;
            match wrapped {
                Ok(blob) => {
                    keys.insert(domain.to_string(), blob);
                }
                Err(e) => {
                    tracing::warn!(domain = %domain, error = %e, "failed to wrap content key");
                    tasks.abort_all();
                    return Err(e.into());
                }
            }
        }

        Ok(sealed.finish(keys))
    }

    /// Unwrap a wrapped-key blob with the local private key, returning the
    /// payload JSON.
    pub fn decrypt_key(&self, crypt: &str) -> Result<Vec<u8>> {
        if crypt.is_empty() {
            return Err(GatewayError::InvalidRequest("invalid crypt token".to_string()));
        }
        Ok(decrypt_wrapped_key_json(crypt, self.keys.private_keyset())?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request Handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Authenticate and route a request.
    pub async fn handle(&self, request: GatewayRequest) -> GatewayResponse {
        let response = match self.route(&request).await {
            Ok(response) => response,
            Err(err) => {
                if matches!(err, GatewayError::Unauthorized | GatewayError::Forbidden) {
                    tracing::warn!(path = %request.path, "rejected unauthenticated request");
                } else if err.status() >= 500 {
                    tracing::warn!(error = %err, "request failed");
                }
                GatewayResponse::from_error(&err)
            }
        };
        tracing::debug!(method = ?request.method, path = %request.path, status = response.status, "handled request");
        response
    }

    async fn route(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        self.auth.authenticate(request.authorization.as_deref())?;

        match (request.method, request.path.as_str()) {
            (Method::Post, "/") => {
                let result = self.encrypt_fragment(&request.body).await?;
                Ok(GatewayResponse::json(200, &result))
            }
            (Method::Get, "/") => {
                let crypt = request.query_param("crypt").unwrap_or_default();
                let json = self.decrypt_key(crypt)?;
                Ok(GatewayResponse::raw_json(json))
            }
            (method, path) => Err(GatewayError::RouteNotFound {
                method: format!("{method:?}").to_uppercase(),
                path: path.to_string(),
            }),
        }
    }
}
