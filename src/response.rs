use serde::Serialize;
use utoipa::ToSchema;

/// Common API response envelope
///
/// ```json
/// { "isSuccess": true, "code": "COMMON200", "message": "...", "result": { ... } }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T: Serialize> {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: Option<T>,
}

impl<T: Serialize> BaseResponse<T> {
    pub fn success(result: T) -> Self {
        Self {
            is_success: true,
            code: "COMMON200".to_string(),
            message: "با موفقیت انجام شد".to_string(),
            result: Some(result),
        }
    }
}

/// Error envelope (`result` is always null)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub is_success: bool,

    #[schema(example = "COMMON400")]
    pub code: String,

    #[schema(example = "لطفاً تمام فیلدهای ضروری را پر کنید")]
    pub message: String,

    #[schema(value_type = Option<Object>)]
    pub result: Option<()>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            code: code.into(),
            message: message.into(),
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_should_use_camel_case_envelope() {
        #[derive(Serialize)]
        struct TestData {
            value: String,
        }

        let response = BaseResponse::success(TestData {
            value: "test".to_string(),
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isSuccess"], true);
        assert_eq!(json["code"], "COMMON200");
        assert_eq!(json["result"]["value"], "test");
    }

    #[test]
    fn error_response_should_have_null_result() {
        let response = ErrorResponse::new("AI_001", "کلید محرمانه نامعتبر است");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["isSuccess"], false);
        assert_eq!(json["code"], "AI_001");
        assert!(json["result"].is_null());
    }
}
