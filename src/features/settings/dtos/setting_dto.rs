use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Set setting request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetSettingDto {
    /// New value; strings are stored as-is, numbers and booleans as text
    #[schema(value_type = String, example = "5")]
    #[serde(default)]
    pub value: Option<Value>,
}

impl SetSettingDto {
    /// Text to store, or a validation error when the value is absent or not a scalar
    pub fn stored_value(&self) -> Result<String, AppError> {
        match &self.value {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            None | Some(Value::Null) => Err(AppError::Validation("value is required".to_string())),
            Some(_) => Err(AppError::Validation(
                "value must be a string, number or boolean".to_string(),
            )),
        }
    }
}

/// Response DTO for a setting. `value` is null when the key was never set.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingResponseDto {
    pub key: String,
    pub value: Option<String>,
}
