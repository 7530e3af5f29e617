//! Asset endpoint responses.

use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use super::path::{AssetQuery, matches_endpoint, parse_request};
use crate::asset::AssetType;
use crate::bundler::Bundler;
use crate::freshness::Fingerprint;
use crate::log;
use crate::utils::mime::types::PLAIN;

/// One year; a fingerprinted URL changes whenever its sources do.
const IMMUTABLE: &str = "public, max-age=31536000";
const NO_CACHE: &str = "no-cache";

/// A fully computed response, independent of the HTTP server.
#[derive(Debug, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub cache_control: Option<&'static str>,
    pub body: String,
}

impl AssetResponse {
    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: PLAIN,
            cache_control: None,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::text(404, "404 Not Found")
    }

    pub fn unavailable() -> Self {
        Self::text(503, "503 Service Unavailable")
    }

    pub fn method_not_allowed() -> Self {
        Self::text(405, "405 Method Not Allowed")
    }
}

/// Answer a request against the endpoint at `endpoint`. Only GET and HEAD
/// are served.
pub fn respond(bundler: &Bundler, endpoint: &str, method: &Method, url: &str) -> AssetResponse {
    if !matches!(method, Method::Get | Method::Head) {
        return AssetResponse::method_not_allowed();
    }

    let (path, query) = parse_request(url);
    if !matches_endpoint(path, endpoint) {
        return AssetResponse::not_found();
    }

    let AssetQuery { group, ty, lm } = query;
    let Some(group) = group.filter(|g| !g.is_empty()) else {
        return AssetResponse::not_found();
    };
    let Ok(ty) = ty.as_deref().unwrap_or_default().parse::<AssetType>() else {
        return AssetResponse::text(500, "Invalid asset type.");
    };
    let lm = Fingerprint::from_query(lm.as_deref());

    match bundler.group_source(&group, ty, lm) {
        Ok(body) => AssetResponse {
            status: 200,
            content_type: ty.mime(),
            cache_control: Some(if lm.is_some() { IMMUTABLE } else { NO_CACHE }),
            body,
        },
        Err(err) => {
            let status = err.status();
            if status >= 500 {
                log!("error"; "{} {}: {:#}", ty, group, anyhow::Error::from(err));
                AssetResponse::text(status, "500 Internal Server Error")
            } else {
                AssetResponse::text(status, err.to_string())
            }
        }
    }
}

/// Send `response`, omitting the body for HEAD requests.
pub fn send(request: Request, response: AssetResponse) -> Result<()> {
    let mut headers = vec![make_header("Content-Type", response.content_type)?];
    if let Some(cache_control) = response.cache_control {
        headers.push(make_header("Cache-Control", cache_control)?);
    }
    if response.status == 405 {
        headers.push(make_header("Allow", "GET, HEAD")?);
    }

    if request.method() == &Method::Head {
        let mut reply = Response::empty(StatusCode(response.status));
        for header in headers {
            reply.add_header(header);
        }
        request.respond(reply)?;
        return Ok(());
    }

    let mut reply = Response::from_string(response.body).with_status_code(StatusCode(response.status));
    for header in headers {
        reply.add_header(header);
    }
    request.respond(reply)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow::anyhow!("invalid header {key}: {value}"))
}
