//! Outbound call implementations

pub mod http;

// Re-export for convenience
pub use http::HttpBackend;

/// Anything that can turn a request into generated text.
///
/// Implementations report transport problems and unusable bodies as
/// `Err`; the controller turns both into a Failed session.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync
{   async fn generate(
      &self
    , request: &crate::request::GenerationRequest
    ) -> Result<String, crate::error::Error>;
}
