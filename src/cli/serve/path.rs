//! Request URL parsing for the asset endpoint.

use url::form_urlencoded;

/// Query parameters of an asset request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AssetQuery {
    pub group: Option<String>,
    pub ty: Option<String>,
    pub lm: Option<String>,
}

/// Split a request target into its path and the asset query.
///
/// Repeated parameters keep their first value.
pub fn parse_request(url: &str) -> (&str, AssetQuery) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let mut parsed = AssetQuery::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match key.as_ref() {
            "group" => &mut parsed.group,
            "type" => &mut parsed.ty,
            "lm" => &mut parsed.lm,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    (path, parsed)
}

/// Whether `path` addresses the endpoint (a trailing slash is tolerated).
pub fn matches_endpoint(path: &str, endpoint: &str) -> bool {
    path == endpoint || path.strip_suffix('/') == Some(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let (path, query) = parse_request("/asset/index?group=abc&type=css&lm=12&x=1");
        assert_eq!(path, "/asset/index");
        assert_eq!(
            query,
            AssetQuery {
                group: Some("abc".into()),
                ty: Some("css".into()),
                lm: Some("12".into()),
            }
        );
    }

    #[test]
    fn test_parse_request_without_query() {
        let (path, query) = parse_request("/asset/index");
        assert_eq!(path, "/asset/index");
        assert_eq!(query, AssetQuery::default());
    }

    #[test]
    fn test_parse_request_decodes_and_keeps_first() {
        let (_, query) = parse_request("/a?type=j%73&type=css&lm=");
        assert_eq!(query.ty.as_deref(), Some("js"));
        assert_eq!(query.lm.as_deref(), Some(""));
    }

    #[test]
    fn test_matches_endpoint() {
        assert!(matches_endpoint("/asset/index", "/asset/index"));
        assert!(matches_endpoint("/asset/index/", "/asset/index"));
        assert!(!matches_endpoint("/asset/indexx", "/asset/index"));
        assert!(!matches_endpoint("/asset", "/asset/index"));
    }
}
