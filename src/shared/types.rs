use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response envelope shared by every endpoint.
///
/// Successful responses carry `data`; failures carry `error` (and `errors` for
/// validation failures).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            error: None,
            errors: None,
        }
    }

    pub fn error(error: String, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: None,
            meta: None,
            error: Some(error),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::<()>::error(
            "Report 9 not found".to_string(),
            None,
        ))
        .unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Report 9 not found");
        assert!(body.get("data").is_none());
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_success_envelope_with_meta() {
        let body = serde_json::to_value(ApiResponse::success(
            Some(vec![1, 2, 3]),
            None,
            Some(Meta { total: 3 }),
        ))
        .unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert_eq!(body["meta"]["total"], 3);
        assert!(body.get("error").is_none());
    }
}
