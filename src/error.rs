use std::fmt;

/// Coarse classification of a failed generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind
{   /// The call could not be completed (network, timeout, status)
    Transport
  , /// The call completed but carried no usable result
    MalformedResponse
}

/// Custom error type for quill operations
/// Implements Clone so a failed session can keep it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Request could not be sent or the connection broke
    HttpError(String)
  , /// Endpoint answered with a non-success status
    ApiError
    {   status: u16
      , body: String
    }
  , /// Timeout error
    Timeout
  , /// Response body was not valid JSON
    ParseError(String)
  , /// Response body lacked a usable `result` field
    MalformedResponse(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Generic error
    Other(String)
}

impl Error
{   /// Build an `HttpError` from a reqwest failure, keeping the whole
    /// source chain ("error sending request ...: Connection refused").
    pub fn from_reqwest(e: &reqwest::Error) -> Self
    {   if e.is_timeout()
        {   return Error::Timeout;
        }
        Error::HttpError(error_chain(e))
    }

    /// Which user-invisible family this error belongs to
    pub fn kind(&self) -> FailureKind
    {   match self
        {   Error::ParseError(_)
          | Error::MalformedResponse(_) => {
              FailureKind::MalformedResponse
            }
          , _ => FailureKind::Transport
        }
    }
}

/// Join an error and its sources, skipping parts already printed.
fn error_chain(e: &dyn std::error::Error) -> String
{   let mut text = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source
    {   let part = inner.to_string();
        if !text.contains(&part)
        {   text.push_str(": ");
            text.push_str(&part);
        }
        source = inner.source();
    }
    text
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, body } => {
              if body.is_empty()
              {   write!(f, "Request failed with status code {}", status)
              } else
              {   write!(f,
                  "Request failed with status code {}: {}",
                  status, body
                )
              }
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::MalformedResponse(msg) => {
              write!(f, "Invalid response format: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
