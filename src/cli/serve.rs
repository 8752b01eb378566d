use super::AppContext;
use crate::Result;
use colored::Colorize;

/// Run the forwarding proxy in the foreground
pub async fn run(
    ctx: &AppContext,
    port: Option<u16>,
    bind: Option<String>,
    upstream: Option<String>,
) -> Result<()> {
    let mut config = ctx.config.proxy.clone();
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(bind) = bind {
        config.bind = bind;
    }
    if let Some(upstream) = upstream {
        config.upstream_url = upstream;
    }

    println!(
        "{}",
        format!("✓ Proxy on http://{}:{}/api/proxy", config.bind, config.port).cyan()
    );
    println!("  Forwarding to: {}", config.upstream_url);

    crate::proxy::start_server(&config).await
}
