use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use log::{debug, error, info};

use crate::backend::GenerationBackend;
use crate::session::GenerationSession;

/// Why `submit()` did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason
{   /// Prompt is empty or whitespace only
    EmptyPrompt
  , /// A previous submission has not settled yet
    InFlight
  , /// Called outside a Tokio runtime; nothing could be spawned
    NoRuntime
}

/// Outcome of one `submit()` call
#[derive(Debug)]
pub enum Submission
{   Accepted(PendingGeneration)
  , Skipped(SkipReason)
}

impl Submission
{   pub fn is_accepted(&self) -> bool
    {   matches!(self, Submission::Accepted(_))
    }

    pub fn skip_reason(&self) -> Option<SkipReason>
    {   match self
        {   Submission::Skipped(reason) => Some(*reason)
          , Submission::Accepted(_) => None
        }
    }

    pub fn into_pending(self) -> Option<PendingGeneration>
    {   match self
        {   Submission::Accepted(pending) => Some(pending)
          , Submission::Skipped(_) => None
        }
    }
}

/// Handle on an accepted submission's background call
#[derive(Debug)]
pub struct PendingGeneration
{   submission: u64
  , task: tokio::task::JoinHandle<GenerationSession>
  , session: Arc<watch::Sender<GenerationSession>>
}

impl PendingGeneration
{   pub fn submission(&self) -> u64
    {   self.submission
    }

    /// Wait for the call to settle and return the resulting session.
    ///
    /// Never returns an InFlight session: if the task died before
    /// publishing, a Failed session is published in its place.
    pub async fn settled(self) -> GenerationSession
    {   let submission = self.submission;
        match self.task.await
        {   Ok(session) => session
          , Err(e) => {
              error!("Generation task {} did not finish: {}", submission, e);
              let failed = GenerationSession::failed(
                submission
              , crate::error::Error::Other(
                  format!("generation task did not finish: {}", e)
                )
              );
              publish(&self.session, submission, &failed);
              failed
            }
        }
    }
}

/// Owns the parameters and drives one GenerationSession at a time
pub struct GenerationController
{   params: crate::params::ParameterModel
  , session: Arc<watch::Sender<GenerationSession>>
  , backend: Arc<dyn GenerationBackend>
  , timeout: Duration
  , last_submission: AtomicU64
}

impl GenerationController
{   /// Controller talking HTTP to `config.api_base`
    pub fn new(
      config: &crate::config::StudioConfig
    ) -> Result<Self, crate::error::Error>
    {   let backend = crate::backend::HttpBackend::new(config)?;
        Ok(Self::with_backend(Arc::new(backend), config.timeout()))
    }

    /// Controller over any backend; every call is bounded by `timeout`
    pub fn with_backend(
      backend: Arc<dyn GenerationBackend>
    , timeout: Duration
    ) -> Self
    {   debug!("Initializing GenerationController (timeout {:?})", timeout);
        let (session, _) = watch::channel(GenerationSession::idle());
        GenerationController
        {   params: crate::params::ParameterModel::new()
          , session: Arc::new(session)
          , backend
          , timeout
          , last_submission: AtomicU64::new(0)
        }
    }

    pub fn params(&self) -> &crate::params::ParameterModel
    {   &self.params
    }

    pub fn params_mut(&mut self) -> &mut crate::params::ParameterModel
    {   &mut self.params
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>)
    {   self.params.set_prompt(prompt);
    }

    pub fn set_content_type(&mut self, content_type: crate::ContentType)
    {   self.params.set_content_type(content_type);
    }

    pub fn set_temperature(&mut self, value: f64) -> f64
    {   self.params.set_temperature(value)
    }

    pub fn set_top_k(&mut self, value: u32) -> u32
    {   self.params.set_top_k(value)
    }

    pub fn set_top_p(&mut self, value: f64) -> f64
    {   self.params.set_top_p(value)
    }

    /// Latest session; never blocks on an outstanding call
    pub fn current_session(&self) -> GenerationSession
    {   self.session.borrow().clone()
    }

    /// Receiver notified on every session change
    pub fn subscribe(&self) -> watch::Receiver<GenerationSession>
    {   self.session.subscribe()
    }

    /// Start a generation unless the prompt is blank or one is running.
    ///
    /// The InFlight check and the transition into InFlight happen in a
    /// single `send_if_modified`, so two callers can never both pass.
    /// The outbound call runs on a task spawned on the current Tokio
    /// runtime; without one the call is skipped and nothing changes.
    pub fn submit(&self) -> Submission
    {   if !self.params.is_submittable()
        {   debug!("submit skipped: prompt is empty");
            return Submission::Skipped(SkipReason::EmptyPrompt);
        }

        let runtime = match tokio::runtime::Handle::try_current()
        {   Ok(handle) => handle
          , Err(e) => {
              error!("submit skipped: {}", e);
              return Submission::Skipped(SkipReason::NoRuntime);
            }
        };

        let mut accepted = None;
        self.session.send_if_modified(|current| {
          if current.is_in_flight()
          {   return false;
          }
          let submission
            = self.last_submission.fetch_add(1, Ordering::SeqCst) + 1;
          *current = GenerationSession::in_flight(submission);
          accepted = Some(submission);
          true
        });

        let submission = match accepted
        {   Some(submission) => submission
          , None => {
              debug!("submit skipped: a generation is already in flight");
              return Submission::Skipped(SkipReason::InFlight);
            }
        };

        let request = self.params.snapshot();
        info!(
          "Submission {} accepted ({}, temperature {}, top_k {}, top_p {})",
          submission, request.content_type,
          request.temperature, request.top_k, request.top_p
        );

        let backend = Arc::clone(&self.backend);
        let session = Arc::clone(&self.session);
        let timeout = self.timeout;
        let task = runtime.spawn(async move {
          run_generation(backend, session, submission, request, timeout).await
        });

        Submission::Accepted(PendingGeneration
        {   submission
          , task
          , session: Arc::clone(&self.session)
        })
    }
}

/// Perform one call and publish its settled session
async fn run_generation(
  backend: Arc<dyn GenerationBackend>
, session: Arc<watch::Sender<GenerationSession>>
, submission: u64
, request: crate::request::GenerationRequest
, timeout: Duration
) -> GenerationSession
{   let mut call = tokio::spawn(async move {
      backend.generate(&request).await
    });

    let outcome = match tokio::time::timeout(timeout, &mut call).await
    {   Ok(Ok(result)) => result
      , Ok(Err(e)) => {
          Err(crate::error::Error::Other(
            format!("generation task failed: {}", e)
          ))
        }
      , Err(_) => {
          call.abort();
          Err(crate::error::Error::Timeout)
        }
    };

    let settled = match outcome
    {   Ok(text) => {
          info!("Submission {} succeeded ({} characters)", submission, text.len());
          GenerationSession::succeeded(submission, text)
        }
      , Err(e) => {
          error!(
            "Submission {} failed ({:?}): {}",
            submission, e.kind(), e
          );
          GenerationSession::failed(submission, e)
        }
    };

    publish(&session, submission, &settled);
    settled
}

/// Write `settled` unless a newer submission owns the session
fn publish(
  session: &watch::Sender<GenerationSession>
, submission: u64
, settled: &GenerationSession
)
{   session.send_if_modified(|current| {
      if current.submission() != submission
      {   debug!(
            "Submission {} settled after being superseded by {}",
            submission, current.submission()
          );
          return false;
      }
      *current = settled.clone();
      true
    });
}
