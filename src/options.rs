use clap::Parser;

/// Manage music playlists and songs through a small web UI
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (defaults to `playlist-app.toml` if present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Database connection string, e.g. `sqlite://playlist-app.sqlite?mode=rwc`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Secret used to sign session cookies (at least 32 bytes)
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Address to listen on
    #[arg(short, long, env = "PLAYLIST_ADDR")]
    pub address: Option<String>,
}
