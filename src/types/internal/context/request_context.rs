use std::net::IpAddr;
use std::sync::Arc;

use poem::Request;
use poem::http::header;
use poem_openapi::auth::{Basic, BasicAuthorization};

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::providers::AuthenticationProvider;
use crate::types::internal::Identity;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the caller explicitly into every coordinator operation.
/// `identity` is `None` for anonymous callers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Authenticated caller, if credentials were supplied and valid
    pub identity: Option<Identity>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Context for an unauthenticated API caller
    pub fn anonymous() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            identity: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            identity: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            identity: None,
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Basic credentials from the Authorization header
    ///
    /// `Ok(None)` when the header is absent. A header that is present but is
    /// not well-formed Basic credentials is `InvalidCredentials`.
    fn extract_basic(req: &Request) -> Result<Option<Basic>, InternalError> {
        if !req.headers().contains_key(header::AUTHORIZATION) {
            return Ok(None);
        }

        Basic::from_request(req).map(Some).map_err(|_| {
            tracing::debug!("Malformed Authorization header");
            AccountError::InvalidCredentials.into()
        })
    }

    /// Create RequestContext from an incoming request
    ///
    /// Should be called at the beginning of every endpoint. Missing
    /// credentials yield an anonymous context; credentials that are present
    /// but wrong or malformed are rejected with `InvalidCredentials`.
    pub async fn validate_request(
        req: &Request,
        authentication_provider: &Arc<AuthenticationProvider>,
    ) -> Result<Self, InternalError> {
        let mut ctx = Self::anonymous();
        ctx.ip_address = Self::extract_ip_address(req);

        if let Some(basic) = Self::extract_basic(req)? {
            let identity = authentication_provider
                .authenticate(&basic.username, &basic.password)
                .await?;
            ctx = ctx.with_identity(identity);
        }

        tracing::trace!("Request context created: {:?}", ctx);

        Ok(ctx)
    }

    /// Set the authenticated caller and actor id
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.actor_id = identity.username.clone();
        self.identity = Some(identity);
        self
    }

    pub fn caller(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
