// src/envelope.rs

//! The JSON response envelope: `{"success": true, "data": T}` or
//! `{"success": false, "errorMsg": "..."}`.

use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse<T> {
  Success(T),
  Failure(String),
}

impl<T> ApiResponse<T> {
  pub fn success(data: T) -> Self {
    ApiResponse::Success(data)
  }

  pub fn failure(error_msg: impl Into<String>) -> Self {
    ApiResponse::Failure(error_msg.into())
  }

  pub fn into_result(self) -> Result<T, String> {
    match self {
      ApiResponse::Success(data) => Ok(data),
      ApiResponse::Failure(msg) => Err(msg),
    }
  }
}

/// Payload of a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCount {
  pub count: u64,
}

/// Payload of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedId {
  pub id: i64,
}

impl<T: Serialize> Serialize for ApiResponse<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("ApiResponse", 2)?;
    match self {
      ApiResponse::Success(data) => {
        state.serialize_field("success", &true)?;
        state.serialize_field("data", data)?;
      }
      ApiResponse::Failure(msg) => {
        state.serialize_field("success", &false)?;
        state.serialize_field("errorMsg", msg)?;
      }
    }
    state.end()
  }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ApiResponse<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Raw<T> {
      success: bool,
      data: Option<T>,
      error_msg: Option<String>,
    }

    let raw = Raw::<T>::deserialize(deserializer)?;
    match (raw.success, raw.data) {
      (true, Some(data)) => Ok(ApiResponse::Success(data)),
      (true, None) => Err(D::Error::missing_field("data")),
      // A failure without a message still has to be surfaced to the user.
      (false, _) => Ok(ApiResponse::Failure(
        raw.error_msg.unwrap_or_else(|| "Unknown error".to_string()),
      )),
    }
  }
}
