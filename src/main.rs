use clap::Parser;
use log::{debug, error};

/// Ask the generation service for a story or a poem
#[derive(Debug, Parser)]
#[command(name = "quill", version, about)]
struct Cli
{   /// Theme or prompt, e.g. "A rainy day in Tokyo"
    prompt: String
  , /// What to write: story or poem
    #[arg(long = "type", default_value = "story")]
    content_type: quill::ContentType
  , /// Sampling temperature (clamped to 0.1..=1.5)
    #[arg(long)]
    temperature: Option<f64>
  , /// Top-k cutoff (clamped to 1..=100)
    #[arg(long)]
    top_k: Option<u32>
  , /// Nucleus threshold (clamped to 0.1..=1.0)
    #[arg(long)]
    top_p: Option<f64>
  , /// Service base URL (overrides QUILL_API_URL)
    #[arg(long)]
    api_url: Option<String>
  , /// Request timeout in seconds (overrides QUILL_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>
}

/// Defaults, then environment, then flags; validated once at the end
fn build_config<F>(
  cli: &Cli
, lookup: F
) -> Result<quill::StudioConfig, quill::Error>
where F: Fn(&str) -> Option<String>
{   let mut config = quill::StudioConfig::default();
    let env = config.overlay_env_with(lookup);
    if let Some(url) = &cli.api_url
    {   config.api_base = url.clone();
    }
    match (env, cli.timeout_secs)
    {   (_, Some(secs)) => config.timeout_secs = secs
      , (Err(e), None) => return Err(e)
      , (Ok(()), None) => {}
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main()
{   env_logger::init();
    let cli = Cli::parse();
    debug!("Parsed arguments: {:?}", cli);

    let config = match build_config(&cli, |key| std::env::var(key).ok())
    {   Ok(config) => config
      , Err(e) => {
          error!("Configuration rejected: {}", e);
          eprintln!("{}", e);
          std::process::exit(2);
        }
    };

    let mut controller = match quill::GenerationController::new(&config)
    {   Ok(controller) => controller
      , Err(e) => {
          eprintln!("{}", e);
          std::process::exit(2);
        }
    };

    controller.set_prompt(cli.prompt.clone());
    controller.set_content_type(cli.content_type);
    if let Some(t) = cli.temperature
    {   let stored = controller.set_temperature(t);
        debug!("temperature requested {}, using {}", t, stored);
    }
    if let Some(k) = cli.top_k
    {   let stored = controller.set_top_k(k);
        debug!("top_k requested {}, using {}", k, stored);
    }
    if let Some(p) = cli.top_p
    {   let stored = controller.set_top_p(p);
        debug!("top_p requested {}, using {}", p, stored);
    }

    let pending = match controller.submit()
    {   quill::Submission::Accepted(pending) => pending
      , quill::Submission::Skipped(reason) => {
          eprintln!("Nothing to generate ({:?})", reason);
          std::process::exit(1);
        }
    };

    let session = pending.settled().await;
    match session.result_text()
    {   Some(text) => println!("{}", text)
      , None => {
          eprintln!("{}", session.error_message().unwrap_or_default());
          std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    fn no_env(_: &str) -> Option<String>
    {   None
    }

    #[test]
    fn flags_override_invalid_env()
    {   let cli = Cli::parse_from([
          "quill", "a storm", "--api-url", "http://127.0.0.1:9000"
        , "--timeout-secs", "7"
        ]);
        let config = build_config(&cli, |key| match key
        {   quill::config::API_URL_ENV => Some("not a url".to_string())
          , quill::config::TIMEOUT_ENV => Some("soon".to_string())
          , _ => None
        }).unwrap();
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn invalid_env_without_flags_is_rejected()
    {   let cli = Cli::parse_from(["quill", "a storm"]);
        assert!(build_config(&cli, |key| match key
        {   quill::config::API_URL_ENV => Some("not a url".to_string())
          , _ => None
        }).is_err());
        assert!(build_config(&cli, |key| match key
        {   quill::config::TIMEOUT_ENV => Some("soon".to_string())
          , _ => None
        }).is_err());
    }

    #[test]
    fn defaults_apply_without_env_or_flags()
    {   let cli = Cli::parse_from(["quill", "--type", "poem", "a storm"]);
        assert_eq!(cli.content_type, quill::ContentType::Poem);
        let config = build_config(&cli, no_env).unwrap();
        assert_eq!(config, quill::StudioConfig::default());
    }
}
