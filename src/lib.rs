pub mod error;
pub mod config;
pub mod backend;
pub mod request;
pub mod params;
pub mod session;
pub mod controller;
use serde::{Deserialize, Serialize};

/*

quill: the request core behind a small "write me a story / poem"
front-end. One prompt plus a few sampling knobs go in, one POST to
`<api_base>/generate` goes out, and the latest outcome is published
for whatever draws the screen.

quill/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Shared types and re-exports
│   ├── error.rs        # Error type and failure classification
│   ├── config.rs       # Endpoint URL and timeout
│   ├── request.rs      # Wire types for /generate
│   ├── params.rs       # ParameterModel (prompt + sampling knobs)
│   ├── session.rs      # GenerationSession lifecycle view
│   ├── controller.rs   # GenerationController (submit / publish)
│   ├── backend/        # Outbound call implementations
│   │   ├── mod.rs      # GenerationBackend trait
│   │   └── http.rs     # reqwest client
│   └── main.rs         # Command-line front-end
└── tests/              # Integration tests

*/

pub use config::StudioConfig;
pub use controller::{
  GenerationController, PendingGeneration, SkipReason, Submission
};
pub use error::{Error, FailureKind};
pub use params::{ParamRange, ParameterModel};
pub use request::GenerationRequest;
pub use session::{GenerationSession, SessionStatus};

/// Tokens requested per generation; not user-editable
pub const MAX_NEW_TOKENS: u32 = 150;

/// What kind of text the service should write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType
{   /// Prose
    #[default]
    Story
  , /// Verse
    Poem
}

impl ContentType
{   /// Label sent as the `type` field
    pub fn label(&self) -> &'static str
    {   match self
        {   ContentType::Story => "story"
          , ContentType::Poem => "poem"
        }
    }

    /// Hint shown in an empty prompt box
    pub fn placeholder(&self) -> String
    {   format!(
          "Enter a theme or prompt for your {}... (e.g., \"A rainy day in Tokyo\")",
          self.label()
        )
    }
}

impl std::fmt::Display for ContentType
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {   f.write_str(self.label())
    }
}

impl std::str::FromStr for ContentType
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_ascii_lowercase().as_str()
        {   "story" => Ok(ContentType::Story)
          , "poem" => Ok(ContentType::Poem)
          , other => Err(crate::error::Error::InvalidConfiguration(
              format!("unknown content type: {}", other)
            ))
        }
    }
}
