//! Clear the running server's cache through its admin listener.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::debug;

use common::utils::logging::init_logging_from_env;

#[derive(Parser)]
#[command(name = "cache-clear")]
#[command(about = "Drop every entry from the API server's response cache")]
struct Cli {
    /// Address of the server's admin listener
    #[arg(long, env = "ADMIN_ADDR", default_value = "127.0.0.1:9188")]
    admin_addr: String,
}

fn clear_url(admin_addr: &str) -> String {
    let base = admin_addr.trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        format!("{}/cache/clear", base)
    } else {
        format!("http://{}/cache/clear", base)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging_from_env();
    let cli = Cli::parse();

    let url = clear_url(&cli.admin_addr);
    debug!(%url, "requesting cache clear");
    let res = reqwest::Client::new()
        .post(&url)
        .send()
        .await
        .with_context(|| format!("admin listener unreachable at {}", cli.admin_addr))?;

    let status = res.status();
    let body: serde_json::Value = res.json().await.unwrap_or_default();
    if !status.is_success() {
        bail!("cache clear failed ({}): {}", status, body);
    }

    let message = body["message"].as_str().unwrap_or("Cache cleared successfully.");
    println!("{}", message);
    Ok(())
}
