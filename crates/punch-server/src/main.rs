//! `punch`: serves the time-tracking API.
//!
//! Settings come from an optional TOML file (`--config`, default
//! `config.toml`) overridden by `PUNCH_*` environment variables. A signing
//! secret is mandatory.
//!
//! Seeding a first admin by hand needs a password hash:
//!
//! ```text
//! echo 'hunter2' | punch --hash-password
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use punch_server::{AppState, ServerConfig};
use punch_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Punch time-tracking API server")]
struct Cli {
  /// TOML settings file; missing is fine.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Hash one password read from stdin, print the PHC string, exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_stdin_line()?;
    let phc = punch_auth::password::hash_password(&password)
      .context("could not hash password")?;
    println!("{phc}");
    return Ok(());
  }

  let settings = load_settings(&cli.config)?;
  let store_path = expand_home(&settings.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("cannot open database {}", store_path.display()))?;

  let bind_to = format!("{}:{}", settings.host, settings.port);
  let listener = TcpListener::bind(&bind_to)
    .await
    .with_context(|| format!("cannot bind {bind_to}"))?;
  tracing::info!(address = %bind_to, store = %store_path.display(), "punch is up");

  let app = punch_server::router(AppState::new(store, settings)?);
  axum::serve(listener, app).await.context("server stopped with an error")
}

fn init_tracing() {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// File first, environment on top, then the startup checks.
fn load_settings(file: &Path) -> anyhow::Result<ServerConfig> {
  let settings: ServerConfig = config::Config::builder()
    .add_source(config::File::from(file).required(false))
    .add_source(config::Environment::with_prefix("PUNCH"))
    .build()
    .and_then(config::Config::try_deserialize)
    .with_context(|| format!("invalid settings (file {})", file.display()))?;

  anyhow::ensure!(
    !settings.token_secret.trim().is_empty(),
    "token_secret is empty; set it in the file or via PUNCH_TOKEN_SECRET",
  );
  if settings.token_ttl()?.is_none() {
    tracing::warn!("token_ttl_secs is not set, tokens will not expire");
  }
  Ok(settings)
}

fn read_stdin_line() -> anyhow::Result<String> {
  use std::io::{BufRead as _, Write as _};
  eprint!("Password: ");
  std::io::stderr().flush().ok();
  let mut line = String::new();
  std::io::stdin().lock().read_line(&mut line).context("cannot read stdin")?;
  Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// `~/x` becomes `$HOME/x`; anything else is returned as is.
fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}
