//! Standard success envelope for API responses.

use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::pagination::PageMeta;

/// Every successful response is wrapped in this envelope:
/// `{"success": true, "data": ..., "meta": {...}}` with `meta` present only
/// for paginated listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    pub fn paginated(data: T, meta: PageMeta) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_envelope_omits_meta() {
        let json = serde_json::to_value(ApiResponse::new(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn paginated_envelope_carries_meta() {
        let meta = PageMeta::new(2, 10, 35);
        let json = serde_json::to_value(ApiResponse::paginated(vec![1, 2], meta)).unwrap();
        assert_eq!(json["meta"]["page"], 2);
        assert_eq!(json["meta"]["total_pages"], 4);
    }
}
