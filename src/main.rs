//! attache-tools — staged email and DeepL translation tools behind a
//! gRPC host.
//!
//! Tools are discovered over `ListTools`/`GetTool` and run through the
//! execution pipeline: validate input → execute → audit. `ExecuteStream`
//! additionally delivers the tool's progress events.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tonic::transport::Server;
use tracing::info;

use attache_tools::audit::AuditLog;
use attache_tools::config::load_config;
use attache_tools::email;
use attache_tools::email::relay::SmtpRelay;
use attache_tools::email::staging::Mailroom;
use attache_tools::executor::{Executor, ToolContext};
use attache_tools::proto::tools::tool_host_server::ToolHostServer;
use attache_tools::registry::Registry;
use attache_tools::service::ToolHostService;
use attache_tools::translate;
use attache_tools::translate::client::Translator;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    info!("Attache tool host starting...");

    let cfg = load_config()?;

    let mut reg = Registry::new();
    register_builtin_tools(&mut reg);
    let registry = Arc::new(reg);

    let context = ToolContext {
        mailroom: Arc::new(Mailroom::new()),
        relay: Arc::new(SmtpRelay::new(cfg.smtp.clone())),
        smtp: Arc::new(cfg.smtp),
        translator: Arc::new(Translator::new(cfg.deepl)),
    };

    let audit = AuditLog::new(&cfg.service.audit_db)?;
    let executor = Arc::new(Executor::new(registry.clone(), context, audit));

    let service = ToolHostService {
        registry,
        executor,
        start_time: Instant::now(),
    };

    let addr: SocketAddr = cfg
        .service
        .listen_addr
        .parse()
        .context("Invalid listen address")?;
    info!("Tool host gRPC server listening on {addr}");

    Server::builder()
        .add_service(ToolHostServer::new(service))
        .serve(addr)
        .await
        .context("Tool host gRPC server failed")?;

    Ok(())
}

/// Register all built-in tools
fn register_builtin_tools(reg: &mut Registry) {
    email::register_tools(reg);
    translate::register_tools(reg);

    info!("Registered {} built-in tools", reg.tool_count());
}
