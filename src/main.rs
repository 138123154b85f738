use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinestream::Config;
use cinestream::player::source::{StreamSourceResolver, is_manifest_url};

/// Print how each stream URL given on the command line would be loaded.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "cinestream=debug".into()),
        )
        .init();

    let config = Config::load()?;
    let resolver = StreamSourceResolver::new(config.api_base_url());
    info!("Resolving against {}", resolver.api_base());

    for raw in std::env::args().skip(1) {
        let kind = if is_manifest_url(&raw) {
            "manifest"
        } else {
            "progressive"
        };
        println!("{} [{}] -> {}", raw, kind, resolver.resolve(&raw));
    }

    Ok(())
}
