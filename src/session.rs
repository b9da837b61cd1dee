//! GenerationSession: one submission's lifecycle, as seen by the UI

/// Prefix of every user-visible failure message
pub const FAILURE_PREFIX: &str = "Error: Failed to generate content.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus
{   Idle
  , InFlight
  , Succeeded
  , Failed
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState
{   Idle
  , InFlight
  , Succeeded(String)
  , Failed
    {   message: String
      , cause: crate::error::Error
    }
}

/// Immutable view of the latest submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSession
{   submission: u64
  , state: SessionState
}

impl Default for GenerationSession
{   fn default() -> Self
    {   GenerationSession::idle()
    }
}

impl GenerationSession
{   /// Initial session, before anything was submitted
    pub fn idle() -> Self
    {   GenerationSession
        {   submission: 0
          , state: SessionState::Idle
        }
    }

    pub(crate) fn in_flight(submission: u64) -> Self
    {   GenerationSession
        {   submission
          , state: SessionState::InFlight
        }
    }

    pub(crate) fn succeeded(submission: u64, text: String) -> Self
    {   GenerationSession
        {   submission
          , state: SessionState::Succeeded(text)
        }
    }

    pub(crate) fn failed(submission: u64, cause: crate::error::Error) -> Self
    {   GenerationSession
        {   submission
          , state: SessionState::Failed
            {   message: failure_message(&cause)
              , cause
            }
        }
    }

    /// Number of the submission this session belongs to; 0 when idle
    pub fn submission(&self) -> u64
    {   self.submission
    }

    pub fn status(&self) -> SessionStatus
    {   match self.state
        {   SessionState::Idle => SessionStatus::Idle
          , SessionState::InFlight => SessionStatus::InFlight
          , SessionState::Succeeded(_) => SessionStatus::Succeeded
          , SessionState::Failed { .. } => SessionStatus::Failed
        }
    }

    pub fn is_in_flight(&self) -> bool
    {   self.status() == SessionStatus::InFlight
    }

    /// Generated text; only present once Succeeded
    pub fn result_text(&self) -> Option<&str>
    {   match &self.state
        {   SessionState::Succeeded(text) => Some(text)
          , _ => None
        }
    }

    /// Display message; only present once Failed
    pub fn error_message(&self) -> Option<&str>
    {   match &self.state
        {   SessionState::Failed { message, .. } => Some(message)
          , _ => None
        }
    }

    /// Typed cause of a failure, for diagnostics
    pub fn failure(&self) -> Option<&crate::error::Error>
    {   match &self.state
        {   SessionState::Failed { cause, .. } => Some(cause)
          , _ => None
        }
    }

    /// Whatever should be shown in the output pane, if anything
    pub fn display_text(&self) -> Option<&str>
    {   self.result_text().or_else(|| self.error_message())
    }
}

/// "Error: Failed to generate content.\n\nDetails: <cause>"
pub fn failure_message(cause: &crate::error::Error) -> String
{   format!("{}\n\nDetails: {}", FAILURE_PREFIX, cause)
}
