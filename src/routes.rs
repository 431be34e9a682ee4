//! Router assembly and the route table.
//!
//! Every `/api/...` request is matched against [`Route::resolve`], forwarded
//! upstream with the caller's bearer token, and its reply reshaped per
//! [`Reply`]. Matching and shaping are pure so they can be tested without a
//! network.

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION,
    CONTENT_TYPE, ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::UpstreamHost;
use crate::error::ProxyError;
use crate::state::AppState;
use crate::upstream::{Outgoing, UpstreamReply};

const ALLOW_METHODS: &str = "GET, POST, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const DEFAULT_IMAGE_TYPE: &str = "image/png";

/// Build the proxy router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(proxy)
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// A proxied endpoint with its captured path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CreateMenu,
    UploadImage { menu_id: String },
    DownloadImage { menu_id: String },
    ListMenus,
    GetMenu { menu_id: String },
    DeleteMenu { menu_id: String },
    SetDefault { menu_id: String },
    CancelDefault,
    LinkUser { user_id: String, menu_id: String },
    UnlinkUser { user_id: String },
    GetUserMenu { user_id: String },
    ListAliases,
    CreateAlias,
    GetAlias { alias_id: String },
    UpdateAlias { alias_id: String },
    DeleteAlias { alias_id: String },
}

/// How the request body is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    None,
    Json,
    Image,
}

/// How the upstream reply is turned into the client response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Upstream body and status as-is.
    Passthrough,
    /// Upstream body on success, an error envelope otherwise.
    Fetch { failed: &'static str },
    /// Image bytes on success, an error envelope otherwise.
    Image { failed: &'static str },
    /// Fixed message on success. `failed: None` passes upstream errors through.
    Message { ok: &'static str, failed: Option<&'static str> },
}

impl Route {
    /// Match a request. Literal segments (`list`, `default`, `alias`) win over captures.
    #[must_use]
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.strip_prefix("/api/")?.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        let owned = |s: &&str| (*s).to_owned();

        let route = match (method, segments.as_slice()) {
            (&Method::POST, ["richmenu"]) => Self::CreateMenu,
            (&Method::GET, ["richmenu", "list"]) => Self::ListMenus,
            (&Method::DELETE, ["richmenu", "default"]) => Self::CancelDefault,
            (&Method::GET, ["richmenu", "alias", "list"]) => Self::ListAliases,
            (&Method::POST, ["richmenu", "alias"]) => Self::CreateAlias,
            (&Method::GET, ["richmenu", "alias", alias]) => Self::GetAlias { alias_id: owned(alias) },
            (&Method::POST, ["richmenu", "alias", alias]) => Self::UpdateAlias { alias_id: owned(alias) },
            (&Method::DELETE, ["richmenu", "alias", alias]) => Self::DeleteAlias { alias_id: owned(alias) },
            (&Method::POST, ["richmenu", id, "content"]) => Self::UploadImage { menu_id: owned(id) },
            (&Method::GET, ["richmenu", id, "content"]) => Self::DownloadImage { menu_id: owned(id) },
            (&Method::POST, ["richmenu", id, "default"]) => Self::SetDefault { menu_id: owned(id) },
            (&Method::GET, ["richmenu", id]) => Self::GetMenu { menu_id: owned(id) },
            (&Method::DELETE, ["richmenu", id]) => Self::DeleteMenu { menu_id: owned(id) },
            (&Method::POST, ["user", user, "richmenu", id]) => {
                Self::LinkUser { user_id: owned(user), menu_id: owned(id) }
            }
            (&Method::DELETE, ["user", user, "richmenu"]) => Self::UnlinkUser { user_id: owned(user) },
            (&Method::GET, ["user", user, "richmenu"]) => Self::GetUserMenu { user_id: owned(user) },
            _ => return None,
        };
        Some(route)
    }

    /// Upstream method, base, and path.
    #[must_use]
    pub fn upstream(&self) -> (Method, UpstreamHost, String) {
        use UpstreamHost::{Api, Data};
        match self {
            Self::CreateMenu => (Method::POST, Api, "/richmenu".to_owned()),
            Self::UploadImage { menu_id } => (Method::POST, Data, format!("/richmenu/{menu_id}/content")),
            Self::DownloadImage { menu_id } => (Method::GET, Data, format!("/richmenu/{menu_id}/content")),
            Self::ListMenus => (Method::GET, Api, "/richmenu/list".to_owned()),
            Self::GetMenu { menu_id } => (Method::GET, Api, format!("/richmenu/{menu_id}")),
            Self::DeleteMenu { menu_id } => (Method::DELETE, Api, format!("/richmenu/{menu_id}")),
            Self::SetDefault { menu_id } => (Method::POST, Api, format!("/user/all/richmenu/{menu_id}")),
            Self::CancelDefault => (Method::DELETE, Api, "/user/all/richmenu".to_owned()),
            Self::LinkUser { user_id, menu_id } => (Method::POST, Api, format!("/user/{user_id}/richmenu/{menu_id}")),
            Self::UnlinkUser { user_id } => (Method::DELETE, Api, format!("/user/{user_id}/richmenu")),
            Self::GetUserMenu { user_id } => (Method::GET, Api, format!("/user/{user_id}/richmenu")),
            Self::ListAliases => (Method::GET, Api, "/richmenu/alias/list".to_owned()),
            Self::CreateAlias => (Method::POST, Api, "/richmenu/alias".to_owned()),
            Self::GetAlias { alias_id } => (Method::GET, Api, format!("/richmenu/alias/{alias_id}")),
            Self::UpdateAlias { alias_id } => (Method::POST, Api, format!("/richmenu/alias/{alias_id}")),
            Self::DeleteAlias { alias_id } => (Method::DELETE, Api, format!("/richmenu/alias/{alias_id}")),
        }
    }

    #[must_use]
    pub fn payload(&self) -> Payload {
        match self {
            Self::CreateMenu | Self::CreateAlias | Self::UpdateAlias { .. } => Payload::Json,
            Self::UploadImage { .. } => Payload::Image,
            _ => Payload::None,
        }
    }

    #[must_use]
    pub fn reply(&self) -> Reply {
        match self {
            Self::CreateMenu | Self::ListMenus | Self::GetMenu { .. } | Self::ListAliases | Self::GetAlias { .. } => {
                Reply::Passthrough
            }
            Self::GetUserMenu { .. } => Reply::Fetch { failed: "Failed to get user rich menu" },
            Self::DownloadImage { .. } => Reply::Image { failed: "Failed to download image" },
            Self::UploadImage { .. } => {
                Reply::Message { ok: "Image uploaded successfully", failed: Some("Failed to upload image") }
            }
            Self::DeleteMenu { .. } => {
                Reply::Message { ok: "Rich menu deleted successfully", failed: Some("Failed to delete rich menu") }
            }
            Self::SetDefault { .. } => Reply::Message {
                ok: "Default rich menu set successfully",
                failed: Some("Failed to set default rich menu"),
            },
            Self::CancelDefault => Reply::Message {
                ok: "Default rich menu cancelled successfully",
                failed: Some("Failed to cancel default rich menu"),
            },
            Self::LinkUser { .. } => Reply::Message {
                ok: "Rich menu linked to user successfully",
                failed: Some("Failed to link rich menu to user"),
            },
            Self::UnlinkUser { .. } => Reply::Message {
                ok: "Rich menu unlinked from user successfully",
                failed: Some("Failed to unlink rich menu from user"),
            },
            Self::CreateAlias => Reply::Message { ok: "Rich menu alias created successfully", failed: None },
            Self::UpdateAlias { .. } => Reply::Message { ok: "Rich menu alias updated successfully", failed: None },
            Self::DeleteAlias { .. } => Reply::Message {
                ok: "Rich menu alias deleted successfully",
                failed: Some("Failed to delete rich menu alias"),
            },
        }
    }
}

// =============================================================================
// RESPONSE SHAPING
// =============================================================================

/// Client response computed from an upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shaped {
    Json(StatusCode, Value),
    Bytes { status: StatusCode, content_type: String, body: Bytes },
}

impl Reply {
    #[must_use]
    pub fn shape(self, reply: UpstreamReply) -> Shaped {
        let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let success = reply.is_success();
        match self {
            Self::Passthrough => passthrough(status, reply),
            Self::Fetch { .. } if success => passthrough(status, reply),
            Self::Image { .. } if success => Shaped::Bytes {
                status,
                content_type: reply.content_type.unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_owned()),
                body: reply.body,
            },
            Self::Message { ok, .. } if success => Shaped::Json(StatusCode::OK, json!({ "message": ok })),
            Self::Message { failed: None, .. } => passthrough(status, reply),
            Self::Fetch { failed } | Self::Image { failed } | Self::Message { failed: Some(failed), .. } => {
                let details = String::from_utf8_lossy(&reply.body).into_owned();
                Shaped::Json(status, json!({ "error": failed, "details": details }))
            }
        }
    }
}

fn passthrough(status: StatusCode, reply: UpstreamReply) -> Shaped {
    Shaped::Bytes {
        status,
        content_type: reply.content_type.unwrap_or_else(|| "application/json".to_owned()),
        body: reply.body,
    }
}

impl IntoResponse for Shaped {
    fn into_response(self) -> Response {
        match self {
            Self::Json(status, value) => (status, Json(value)).into_response(),
            Self::Bytes { status, content_type, body } => (status, [(CONTENT_TYPE, content_type)], body).into_response(),
        }
    }
}

// =============================================================================
// REQUEST HELPERS
// =============================================================================

/// Token from an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

/// Origin to echo in CORS headers: the request's own if allowed, else the first allowed.
#[must_use]
pub fn cors_origin<'a>(allowed: &'a [String], origin: Option<&'a str>) -> &'a str {
    match origin {
        Some(o) if allowed.iter().any(|a| a == o) => o,
        _ => allowed.first().map_or("*", String::as_str),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Adds CORS headers to every response and answers preflights directly.
async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request.headers().get(ORIGIN).and_then(|v| v.to_str().ok());
    let allow_origin = HeaderValue::from_str(cors_origin(&state.config.allowed_origins, origin))
        .unwrap_or_else(|_| HeaderValue::from_static("*"));

    let mut response =
        if *request.method() == Method::OPTIONS { StatusCode::OK.into_response() } else { next.run(request).await };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    response
}

/// Fallback handler for everything except `/healthz`.
async fn proxy(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Shaped, ProxyError> {
    let token = bearer_token(&headers).ok_or(ProxyError::Unauthorized)?;
    let route = Route::resolve(&method, uri.path()).ok_or(ProxyError::NotFound)?;

    let outgoing = match route.payload() {
        Payload::None => Outgoing::Empty,
        Payload::Json => {
            serde_json::from_slice::<Value>(&body).map_err(|e| ProxyError::InvalidJson(e.to_string()))?;
            Outgoing::Json(body)
        }
        Payload::Image => {
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(DEFAULT_IMAGE_TYPE)
                .to_owned();
            info!(bytes = body.len(), content_type = %content_type, "forwarding image");
            Outgoing::Raw { content_type, body }
        }
    };

    let (upstream_method, host, path) = route.upstream();
    let url = state.config.upstream_url(host, &path);
    let reply = state.upstream.send(upstream_method, &url, token, outgoing).await?;
    if reply.is_success() {
        info!(route = ?route, status = reply.status, "proxied");
    } else {
        warn!(route = ?route, status = reply.status, "upstream rejected request");
    }
    Ok(route.reply().shape(reply))
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
