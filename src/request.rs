//! Wire types for the `/generate` endpoint

use serde::{Deserialize, Serialize};

/// Immutable snapshot of the parameters, as posted to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest
{   /// The prompt text
    pub prompt: String
  , /// Story or poem
    #[serde(rename = "type")]
    pub content_type: crate::ContentType
  , /// Temperature for sampling
    pub temperature: f64
  , /// Top-k cutoff
    pub top_k: u32
  , /// Nucleus sampling threshold
    pub top_p: f64
  , /// Max tokens to generate
    pub max_new_tokens: u32
}

/// Successful reply from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse
{   /// Generated text
    pub result: String
}

impl GenerationResponse
{   /// Extract `result` from a decoded body.
    ///
    /// Anything other than an object with a non-empty string `result`
    /// is a `MalformedResponse`.
    pub fn from_value(
      body: &serde_json::Value
    ) -> Result<Self, crate::error::Error>
    {   match body.get("result")
        {   Some(serde_json::Value::String(text)) if !text.is_empty() => {
              Ok(GenerationResponse { result: text.clone() })
            }
          , Some(serde_json::Value::String(_)) => {
              Err(crate::error::Error::MalformedResponse(
                "result field is empty".to_string()
              ))
            }
          , Some(other) => {
              Err(crate::error::Error::MalformedResponse(
                format!("result field is not text: {}", other)
              ))
            }
          , None => {
              Err(crate::error::Error::MalformedResponse(
                "missing result field".to_string()
              ))
            }
        }
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use serde_json::json;

    #[test]
    fn body_uses_wire_field_names()
    {   let request = GenerationRequest
        {   prompt: "A rainy day in Tokyo".to_string()
          , content_type: crate::ContentType::Story
          , temperature: 0.8
          , top_k: 50
          , top_p: 0.95
          , max_new_tokens: 150
        };
        assert_eq!(
          serde_json::to_value(&request).unwrap()
        , json!({
            "prompt": "A rainy day in Tokyo",
            "type": "story",
            "temperature": 0.8,
            "top_k": 50,
            "top_p": 0.95,
            "max_new_tokens": 150
          })
        );
    }

    #[test]
    fn result_is_extracted()
    {   let response = GenerationResponse::from_value(
          &json!({ "result": "Once upon a time..." })
        ).unwrap();
        assert_eq!(response.result, "Once upon a time...");
    }

    #[test]
    fn unusable_bodies_are_malformed()
    {   for body in [
          json!({})
        , json!({ "result": "" })
        , json!({ "result": 42 })
        , json!({ "result": null })
        , json!(["Once upon a time..."])
        , json!("Once upon a time...")
        ]
        {   let err = GenerationResponse::from_value(&body).unwrap_err();
            assert_eq!(
              err.kind()
            , crate::error::FailureKind::MalformedResponse
            , "body {} should be malformed", body
            );
        }
    }
}
