use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use api::{ApiConfig, HttpApi, JsonFileSessionStore};
use services::{
    AttemptLoopService, AuthService, CatalogService, Clock, PerformanceService,
};
use ui::{App, UiApp, build_app_context};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_SESSION_FILE: &str = "prep-session.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    attempt_loop: Arc<AttemptLoopService>,
    catalog: Arc<CatalogService>,
    performance: Arc<PerformanceService>,
    auth: Arc<AuthService>,
}

impl UiApp for DesktopApp {
    fn attempt_loop(&self) -> Arc<AttemptLoopService> {
        Arc::clone(&self.attempt_loop)
    }

    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn performance(&self) -> Arc<PerformanceService> {
        Arc::clone(&self.performance)
    }

    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}

struct Args {
    api_url: String,
    session_file: PathBuf,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--session-file <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {DEFAULT_API_URL}");
    eprintln!("  --session-file {DEFAULT_SESSION_FILE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREP_API_URL, PREP_SESSION_FILE, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_url = std::env::var("PREP_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let mut session_file = std::env::var("PREP_SESSION_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api_url = value;
                }
                "--session-file" => {
                    let value = require_value(args, "--session-file")?;
                    session_file = PathBuf::from(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api_url,
            session_file,
        })
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let clock = Clock::default_clock();
    let remote = Arc::new(HttpApi::new(ApiConfig::new(parsed.api_url)));
    let sessions = Arc::new(JsonFileSessionStore::new(parsed.session_file));

    let attempt_loop = Arc::new(AttemptLoopService::new(
        clock,
        remote.clone(),
        remote.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(remote.clone()));
    let performance = Arc::new(PerformanceService::new(remote.clone()));
    let auth = Arc::new(AuthService::new(remote, sessions));

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        attempt_loop,
        catalog,
        performance,
        auth,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Olympiad Prep")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
