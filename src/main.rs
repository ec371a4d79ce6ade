// Entrypoint for the bookshare terminal client.
// - Keeps `main` small: read config, build the API client and session store,
//   restore any saved session and hand over to the UI loop.

use anyhow::Context;
use bookshare_cli::{
    api::ApiClient, config::Config, dashboard::Startup, session::FileSessionStore, ui,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the menus.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshare_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let api = ApiClient::new(&config).context("Failed to build HTTP client")?;
    let store = FileSessionStore::new(&config.session_dir);

    // Without a saved session this lands on the login / register menu.
    ui::run(Startup::restore(api, store))
}
