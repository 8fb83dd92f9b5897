use axum::body::Bytes;

use crate::database::models::ProductCandidate;
use crate::error::ApiError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Page/limit pair resolved from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Resolve `page` and `limit` from a raw query string.
    ///
    /// Anything absent, non-numeric or non-positive falls back to the default.
    /// A `limit` above the ceiling also falls back to the default; it is not
    /// clamped to the ceiling.
    pub fn from_query(raw: Option<&str>) -> Self {
        let page = first_param(raw, "page")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE);

        let limit = first_param(raw, "limit")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|l| *l > 0 && *l <= MAX_LIMIT)
            .unwrap_or(DEFAULT_LIMIT);

        Self { page, limit }
    }

    /// Rows to skip: `(page - 1) * limit`, saturating on absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// First value of `key` in a urlencoded query string.
fn first_param(raw: Option<&str>, key: &str) -> Option<String> {
    url::form_urlencoded::parse(raw?.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Parse a product id path segment.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid ID"))
}

/// Decode a product candidate from the raw request body.
///
/// Only the first JSON value is read; anything after it is ignored.
pub fn decode_candidate(body: &Bytes) -> Result<ProductCandidate, ApiError> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<ProductCandidate>()
        .next();

    match first {
        Some(Ok(candidate)) => Ok(candidate),
        Some(Err(e)) => {
            tracing::debug!("Rejecting product body: {}", e);
            Err(ApiError::invalid_json("Invalid input"))
        }
        None => {
            tracing::debug!("Rejecting empty product body");
            Err(ApiError::invalid_json("Invalid input"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        assert_eq!(Pagination::from_query(None), Pagination::default());
        assert_eq!(Pagination::from_query(Some("")), Pagination::default());
        assert_eq!(Pagination::from_query(Some("other=1")), Pagination::default());
    }

    #[test]
    fn accepts_in_range_values() {
        let p = Pagination::from_query(Some("page=3&limit=25"));
        assert_eq!(p, Pagination { page: 3, limit: 25 });
        assert_eq!(p.offset(), 50);

        let p = Pagination::from_query(Some("limit=100"));
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn bad_page_falls_back_to_one() {
        for query in ["page=0", "page=-5", "page=abc", "page=", "page=1.5"] {
            assert_eq!(Pagination::from_query(Some(query)).page, 1, "query {}", query);
        }
    }

    #[test]
    fn bad_limit_falls_back_to_default_not_ceiling() {
        for query in ["limit=0", "limit=101", "limit=x", "limit=-1", "limit=99999"] {
            assert_eq!(Pagination::from_query(Some(query)).limit, 10, "query {}", query);
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let p = Pagination::from_query(Some("page=2&page=7&limit=5&limit=50"));
        assert_eq!(p, Pagination { page: 2, limit: 5 });
    }

    #[test]
    fn offset_saturates() {
        let p = Pagination { page: i64::MAX, limit: 100 };
        assert_eq!(p.offset(), i64::MAX);
        assert_eq!(Pagination::default().offset(), 0);
    }

    #[test]
    fn parses_ids() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_id("4.2"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn decodes_candidates() {
        let body = Bytes::from_static(br#"{"name":"Box","price":5,"stock":1}"#);
        assert_eq!(decode_candidate(&body).unwrap(), ProductCandidate::new("Box", 5, 1));

        let body = Bytes::from_static(b"{not json");
        assert!(matches!(decode_candidate(&body), Err(ApiError::InvalidJson(_))));

        let body = Bytes::from_static(br#"{"name":"Box","price":"five"}"#);
        assert!(matches!(decode_candidate(&body), Err(ApiError::InvalidJson(_))));
    }

    #[test]
    fn decodes_first_value_and_ignores_trailing_data() {
        let body = Bytes::from_static(b"{\"name\":\"Box\",\"price\":5,\"stock\":1}\n{\"name\":\"Other\"} trailing");
        assert_eq!(decode_candidate(&body).unwrap(), ProductCandidate::new("Box", 5, 1));

        for body in [&b""[..], &b"  \n"[..]] {
            let body = Bytes::copy_from_slice(body);
            assert!(matches!(decode_candidate(&body), Err(ApiError::InvalidJson(_))));
        }
    }
}
