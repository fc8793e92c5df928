//! CLI command definitions, routing, and tracing setup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use profilescout_core::{ProfileResponse, ProfileReply, UNAVAILABLE_MESSAGE, extract, scrape_profile};
use profilescout_fetcher::{build_fetcher, validate_username};
use profilescout_readers::snapshot_from_html;
use profilescout_shared::{AppConfig, FetchBackend, FetchConfig, init_config, load_config, load_config_from};
use tracing::info;

use crate::server::{self, AppState};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ProfileScout: reconcile public profile data and find contact details.
#[derive(Parser)]
#[command(
    name = "profilescout",
    version,
    about = "Fetch a public profile page, merge its embedded data and extract contact details.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.profilescout/profilescout.toml.
    #[arg(long, global = true, env = "PROFILESCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Fetch-related overrides shared by `fetch` and `serve`.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct FetchArgs {
    /// Fetch backend: http or browser.
    #[arg(long)]
    pub backend: Option<String>,

    /// Overall page fetch timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Profile URL template containing `{username}`.
    #[arg(long)]
    pub url_template: Option<String>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch a profile and print the JSON reply.
    Fetch {
        /// Profile handle (a leading `@` is ignored).
        username: String,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Run extraction on a saved HTML page instead of fetching.
    Extract {
        /// Path to the saved page.
        file: PathBuf,

        /// Handle to report in the reply.
        #[arg(short, long)]
        username: String,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Serve profile lookups over HTTP.
    Serve {
        /// Interface to bind (defaults to config).
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on (defaults to config).
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so JSON replies on stdout stay machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "profilescout=info",
        1 => "profilescout=debug",
        _ => "profilescout=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    match cli.command {
        Command::Fetch {
            username,
            fetch,
            pretty,
        } => cmd_fetch(&config, &username, &fetch, pretty).await,
        Command::Extract {
            file,
            username,
            pretty,
        } => cmd_extract(&file, &username, pretty),
        Command::Serve { bind, port, fetch } => {
            cmd_serve(&config, bind.as_deref(), port, &fetch).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Merge config file values with CLI overrides.
fn fetch_config(config: &AppConfig, args: &FetchArgs) -> Result<FetchConfig> {
    let mut fetch = FetchConfig::from(config);

    if let Some(backend) = &args.backend {
        fetch.backend = backend.parse::<FetchBackend>()?;
    }
    if let Some(secs) = args.timeout_secs {
        fetch.timeout = Duration::from_secs(secs);
    }
    if let Some(template) = &args.url_template {
        fetch.profile_url_template = template.clone();
    }

    Ok(fetch)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_fetch(config: &AppConfig, username: &str, args: &FetchArgs, pretty: bool) -> Result<()> {
    let fetch = fetch_config(config, args)?;
    let fetcher = build_fetcher(&fetch)?;

    info!(username, backend = %fetch.backend, "fetching profile");

    let response = scrape_profile(fetcher.as_ref(), &fetch.profile_url_template, username).await?;
    print_response(&response, pretty)?;

    if !response.is_ok() {
        return Err(eyre!(UNAVAILABLE_MESSAGE));
    }
    Ok(())
}

fn cmd_extract(file: &Path, username: &str, pretty: bool) -> Result<()> {
    let username = validate_username(username)?;
    let html = std::fs::read_to_string(file)
        .map_err(|e| eyre!("cannot read '{}': {e}", file.display()))?;

    let extraction = extract(&snapshot_from_html(&html));
    info!(
        file = %file.display(),
        empty = extraction.fragments.all_empty(),
        "extracted saved page"
    );

    let reply = ProfileReply::new(username, extraction.profile, extraction.contacts);
    print_response(&ProfileResponse::Success(Box::new(reply)), pretty)
}

async fn cmd_serve(
    config: &AppConfig,
    bind: Option<&str>,
    port: Option<u16>,
    args: &FetchArgs,
) -> Result<()> {
    let fetch = fetch_config(config, args)?;
    let fetcher = build_fetcher(&fetch)?;

    let bind = bind.unwrap_or(config.server.bind.as_str());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .map_err(|e| eyre!("invalid bind address '{bind}:{port}': {e}"))?;

    let auth_token = config.server.auth_token();
    if auth_token.is_none() {
        tracing::warn!(
            env = %config.server.auth_token_env,
            "no auth token configured, requests are not authenticated"
        );
    }

    let state = AppState::new(fetcher, fetch.profile_url_template, auth_token);
    server::serve(addr, state).await
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_response(response: &ProfileResponse, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_fetch_overrides() {
        let cli = Cli::parse_from([
            "profilescout",
            "-vv",
            "fetch",
            "@ada",
            "--backend",
            "browser",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(cli.verbose, 2);

        let Command::Fetch { username, fetch, .. } = cli.command else {
            panic!("expected fetch command");
        };
        assert_eq!(username, "@ada");

        let merged = fetch_config(&AppConfig::default(), &fetch).unwrap();
        assert_eq!(merged.backend, FetchBackend::Browser);
        assert_eq!(merged.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_backend_override_rejected() {
        let args = FetchArgs {
            backend: Some("telnet".into()),
            ..FetchArgs::default()
        };
        assert!(fetch_config(&AppConfig::default(), &args).is_err());
    }

    #[test]
    fn cli_parses_serve() {
        let cli = Cli::parse_from(["profilescout", "serve", "--port", "9000"]);
        let Command::Serve { port, bind, .. } = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(port, Some(9000));
        assert!(bind.is_none());
    }
}
