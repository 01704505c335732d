use anyhow::Context;
use clap::Parser;

use mini_webserver::config::Config;
use mini_webserver::reactor::Reactor;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = Config::parse();

    let mut reactor = Reactor::bind(&config.listen_addr(), &config.root)
        .with_context(|| format!("failed to start listening on {}", config.listen_addr()))?;

    tracing::info!(
        "mini-webserver listening on http://{}/ (root: {})",
        reactor.local_addr()?,
        config.root.display(),
    );

    reactor.run().context("event loop failed")?;

    Ok(())
}
