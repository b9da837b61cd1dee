use log::{debug, trace, error};

/// Posts requests to `<api_base>/generate` over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend
{   url: String
  , http_client: reqwest::Client
}

impl HttpBackend
{   pub fn new(
      config: &crate::config::StudioConfig
    ) -> Result<Self, crate::error::Error>
    {   config.validate()?;
        let http_client = reqwest::Client::builder()
          .timeout(config.timeout())
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            crate::error::Error::InvalidConfiguration(e.to_string())
          })?;

        debug!("Creating HttpBackend for {}", config.generate_url());
        Ok(HttpBackend
        {   url: config.generate_url()
          , http_client
        })
    }

    pub fn url(&self) -> &str
    {   &self.url
    }
}

#[async_trait::async_trait]
impl super::GenerationBackend for HttpBackend
{   async fn generate(
      &self
    , request: &crate::request::GenerationRequest
    ) -> Result<String, crate::error::Error>
    {   debug!(
          "POST {} ({}, prompt length {})",
          self.url, request.content_type, request.prompt.len()
        );
        trace!("Generation request: {:?}", request);

        let response = self.http_client
          .post(&self.url)
          .json(request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::from_reqwest(&e)
          })?;

        let status = response.status();
        trace!("Generation response status: {}", status);

        if !status.is_success()
        {   let body = response.text().await
              .unwrap_or_default();
            error!("Generation endpoint returned {}: {}", status, body);
            return Err(crate::error::Error::ApiError
            {   status: status.as_u16()
              , body: body.trim().to_string()
            });
        }

        let body: serde_json::Value
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            if e.is_timeout()
            {   crate::error::Error::Timeout
            } else
            {   crate::error::Error::ParseError(e.to_string())
            }
          })?;

        let parsed = crate::request::GenerationResponse::from_value(&body)
          .map_err(|e| {
            error!("Unusable response body: {}", e);
            e
          })?;

        debug!("Received {} characters", parsed.result.len());
        Ok(parsed.result)
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::backend::GenerationBackend;

    #[test]
    fn url_is_derived_from_config()
    {   let config = crate::config::StudioConfig
        {   api_base: "http://127.0.0.1:8000/".to_string()
          , timeout_secs: 5
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.url(), "http://127.0.0.1:8000/generate");
    }

    #[test]
    fn invalid_config_is_refused()
    {   let config = crate::config::StudioConfig
        {   api_base: "localhost".to_string()
          , timeout_secs: 5
        };
        assert!(HttpBackend::new(&config).is_err());
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error()
    {   let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = crate::config::StudioConfig
        {   api_base: format!("http://127.0.0.1:{}", port)
          , timeout_secs: 5
        };
        let backend = HttpBackend::new(&config).unwrap();
        let request = crate::params::ParameterModel::new().snapshot();

        let err = backend.generate(&request).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Transport);
        assert!(matches!(err, crate::error::Error::HttpError(_)), "{:?}", err);
    }
}
