use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use preflight_client::{ClientConfig, ConfigError};
use preflight_form::RunId;

#[derive(Parser)]
#[command(name = "preflight")]
#[command(about = "Fill in preflight forms, review runs and talk to the coach")]
pub struct Cli {
    /// API base URL, overrides PREFLIGHT_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token, overrides PREFLIGHT_API_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Request timeout in seconds, overrides PREFLIGHT_API_TIMEOUT_SECS
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Plain prompts without colors
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in a form page by page, saving as you go
    Survey(SurveyArgs),

    /// Talk to the coach about a completed run
    Coach {
        /// Run to discuss
        run_id: RunId,

        /// Coaching pipeline (server default if omitted)
        #[arg(long)]
        pipeline: Option<String>,
    },

    /// Render a form, optionally filled in with a run's answers, as HTML
    Render(RenderArgs),

    /// Show a run's status and saved answers
    Status {
        /// Run to show
        run_id: RunId,
    },
}

#[derive(Args)]
pub struct SurveyArgs {
    /// Form name
    #[arg(default_value = "ai-readiness")]
    pub form: String,

    /// Form version (latest if omitted)
    #[arg(long)]
    pub version: Option<String>,

    /// Continue an unfinished run instead of starting a new one
    #[arg(long)]
    pub resume: Option<RunId>,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Form name
    #[arg(default_value = "ai-readiness")]
    pub form: String,

    /// Form version (latest if omitted)
    #[arg(long)]
    pub version: Option<String>,

    /// Read the form definition from a file instead of the API
    #[arg(long, value_name = "FILE")]
    pub definition: Option<PathBuf>,

    /// Pre-fill the form with this run's saved answers
    #[arg(long)]
    pub run: Option<RunId>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Environment first, then flags on top.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::from_env()?;

        if let Some(url) = &self.api_url {
            let ClientConfig { token, timeout, .. } = config;
            config = ClientConfig::new(url)?;
            config.token = token;
            config.timeout = timeout;
        }
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn survey_defaults_to_readiness_form() {
        let cli = Cli::parse_from(["preflight", "survey"]);
        let Commands::Survey(args) = cli.command else {
            panic!("expected survey");
        };
        assert_eq!(args.form, "ai-readiness");
        assert!(args.resume.is_none());
    }

    #[test]
    fn run_ids_are_parsed() {
        let cli = Cli::parse_from([
            "preflight",
            "coach",
            "6f1c2a9e-3b1d-4c55-9a51-0d3c3d6f7e21",
            "--plain",
        ]);
        assert!(cli.plain);
        let Commands::Coach { run_id, pipeline } = cli.command else {
            panic!("expected coach");
        };
        assert_eq!(run_id.to_string(), "6f1c2a9e-3b1d-4c55-9a51-0d3c3d6f7e21");
        assert_eq!(pipeline, None);

        assert!(Cli::try_parse_from(["preflight", "status", "not-a-uuid"]).is_err());
    }

    #[test]
    fn render_from_file() {
        let cli = Cli::parse_from(["preflight", "render", "--definition", "form.json", "-o", "form.html"]);
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.definition, Some(PathBuf::from("form.json")));
        assert_eq!(args.output, Some(PathBuf::from("form.html")));
        assert!(args.run.is_none());
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::parse_from([
            "preflight",
            "status",
            "6f1c2a9e-3b1d-4c55-9a51-0d3c3d6f7e21",
            "--api-url",
            "https://api.example.com/",
            "--token",
            "secret",
            "--timeout",
            "5",
        ]);
        let config = cli.client_config().unwrap();

        assert_eq!(config.base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
