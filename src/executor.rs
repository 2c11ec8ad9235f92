//! Tool execution pipeline
//!
//! Pipeline: resolve tool → validate input against its schema → run the
//! async handler → audit. Operation-level failures (missing draft, SMTP or
//! API trouble) travel inside the tool's own output JSON; the `error` field
//! of the response envelope is reserved for host-level problems such as
//! malformed input.

use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::config::SmtpSettings;
use crate::email::relay::MailRelay;
use crate::email::staging::Mailroom;
use crate::proto::tools::{ExecuteRequest, ExecuteResponse};
use crate::registry::Registry;
use crate::schema::validate_input;
use crate::status::StatusSink;
use crate::translate::client::Translator;

/// Shared collaborators handed to every tool handler.
#[derive(Clone)]
pub struct ToolContext {
    pub mailroom: Arc<Mailroom>,
    pub relay: Arc<dyn MailRelay>,
    pub smtp: Arc<SmtpSettings>,
    pub translator: Arc<Translator>,
}

/// Per-call identity and progress channel.
#[derive(Clone)]
pub struct CallScope {
    /// Keys the draft slot; empty is valid and shares one slot
    pub session_id: String,
    pub sink: Arc<dyn StatusSink>,
}

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>;

/// A tool handler function
type ToolHandler = Box<dyn Fn(ToolContext, CallScope, Vec<u8>) -> HandlerFuture + Send + Sync>;

fn handler<F, Fut>(f: F) -> ToolHandler
where
    F: Fn(ToolContext, CallScope, Vec<u8>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    Box::new(move |ctx, scope, input| Box::pin(f(ctx, scope, input)))
}

/// Executes tools through the pipeline.
pub struct Executor {
    registry: Arc<Registry>,
    /// Map of tool name → handler function
    handlers: HashMap<String, ToolHandler>,
    context: ToolContext,
    audit: Mutex<AuditLog>,
}

impl Executor {
    pub fn new(registry: Arc<Registry>, context: ToolContext, audit: AuditLog) -> Self {
        let mut executor = Self {
            registry,
            handlers: HashMap::new(),
            context,
            audit: Mutex::new(audit),
        };
        executor.register_handlers();
        executor
    }

    /// Register all built-in tool handlers
    fn register_handlers(&mut self) {
        // Email staging tools
        self.handlers.insert(
            "email.prepare".into(),
            handler(crate::email::prepare::execute),
        );
        self.handlers
            .insert("email.send".into(), handler(crate::email::send::execute));
        self.handlers.insert(
            "email.discard".into(),
            handler(crate::email::discard::execute),
        );

        // Translation tools
        self.handlers.insert(
            "translate.text".into(),
            handler(crate::translate::text::execute),
        );
        self.handlers.insert(
            "translate.languages".into(),
            handler(crate::translate::languages::execute),
        );
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Execute a tool through the pipeline.
    ///
    /// Returns `Err` only when the tool is unknown; every other failure is
    /// reported inside the `ExecuteResponse`.
    pub async fn execute(
        &self,
        request: ExecuteRequest,
        sink: Arc<dyn StatusSink>,
    ) -> Result<ExecuteResponse> {
        let execution_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        // 1. Validate: check tool exists
        let tool_def = self
            .registry
            .get_tool(&request.tool_name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", request.tool_name))?;

        info!(
            "Executing: tool={} session={} execution={execution_id}",
            request.tool_name, request.session_id
        );

        // 2. Validate input against the tool's schema
        let result = match validate_input(&request.input_json, &tool_def.input_schema) {
            Err(e) => {
                warn!("Rejected input for {}: {e}", request.tool_name);
                ExecuteResponse {
                    success: false,
                    output_json: vec![],
                    error: e.to_string(),
                    execution_id: execution_id.clone(),
                    duration_ms: start.elapsed().as_millis() as i64,
                }
            }
            Ok(()) => {
                // 3. Run the handler
                let scope = CallScope {
                    session_id: request.session_id.clone(),
                    sink,
                };
                match self.handlers.get(&request.tool_name) {
                    Some(run) => {
                        match run(self.context.clone(), scope, request.input_json).await {
                            Ok(output) => ExecuteResponse {
                                success: true,
                                output_json: output,
                                error: String::new(),
                                execution_id: execution_id.clone(),
                                duration_ms: start.elapsed().as_millis() as i64,
                            },
                            Err(e) => ExecuteResponse {
                                success: false,
                                output_json: vec![],
                                error: e.to_string(),
                                execution_id: execution_id.clone(),
                                duration_ms: start.elapsed().as_millis() as i64,
                            },
                        }
                    }
                    None => ExecuteResponse {
                        success: false,
                        output_json: vec![],
                        error: format!("No handler registered for tool: {}", request.tool_name),
                        execution_id: execution_id.clone(),
                        duration_ms: start.elapsed().as_millis() as i64,
                    },
                }
            }
        };

        // 4. Audit log
        self.audit.lock().await.record(
            &execution_id,
            &request.tool_name,
            &request.session_id,
            &request.reason,
            result.success,
            result.duration_ms,
        );

        Ok(result)
    }
}
