//! gRPC service implementation for the ToolHost service.
//!
//! Wires the tonic-generated trait to the [`Registry`] and [`Executor`].

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tonic::{Request, Response, Status};
use tracing::{error, info};

use crate::executor::Executor;
use crate::proto::tools::execute_event::Event;
use crate::proto::tools::tool_host_server::ToolHost;
use crate::proto::tools::{
    Empty, ExecuteEvent, ExecuteRequest, ExecuteResponse, GetToolRequest, HealthStatus,
    ListToolsRequest, ListToolsResponse, StatusEvent as ProtoStatusEvent, ToolDefinition,
};
use crate::registry::Registry;
use crate::status::{ChannelSink, NullSink, StatusSink};

/// Shared gRPC service implementation.
pub struct ToolHostService {
    pub registry: Arc<Registry>,
    pub executor: Arc<Executor>,
    pub start_time: Instant,
}

#[tonic::async_trait]
impl ToolHost for ToolHostService {
    // ------------------------------------------------------------------
    // ListTools
    // ------------------------------------------------------------------
    async fn list_tools(
        &self,
        request: Request<ListToolsRequest>,
    ) -> Result<Response<ListToolsResponse>, Status> {
        let req = request.into_inner();
        let tools = self.registry.list_tools(&req.namespace);
        info!(count = tools.len(), namespace = %req.namespace, "gRPC ListTools");
        Ok(Response::new(ListToolsResponse { tools }))
    }

    // ------------------------------------------------------------------
    // GetTool
    // ------------------------------------------------------------------
    async fn get_tool(
        &self,
        request: Request<GetToolRequest>,
    ) -> Result<Response<ToolDefinition>, Status> {
        let req = request.into_inner();
        self.registry
            .get_tool(&req.name)
            .ok_or_else(|| Status::not_found(format!("Tool not found: {}", req.name)))
            .map(Response::new)
    }

    // ------------------------------------------------------------------
    // Execute (unary)
    // ------------------------------------------------------------------
    async fn execute(
        &self,
        request: Request<ExecuteRequest>,
    ) -> Result<Response<ExecuteResponse>, Status> {
        let req = request.into_inner();
        info!(
            tool = %req.tool_name,
            session = %req.session_id,
            reason = %req.reason,
            "gRPC Execute"
        );

        // No progress channel on the unary path: notifications are skipped
        match self.executor.execute(req, Arc::new(NullSink)).await {
            Ok(response) => Ok(Response::new(response)),
            Err(e) => {
                error!("Execute failed: {e:#}");
                Err(Status::internal(format!("Execution failed: {e:#}")))
            }
        }
    }

    // ------------------------------------------------------------------
    // ExecuteStream (server-streaming)
    // ------------------------------------------------------------------
    type ExecuteStreamStream =
        tokio_stream::wrappers::ReceiverStream<Result<ExecuteEvent, Status>>;

    async fn execute_stream(
        &self,
        request: Request<ExecuteRequest>,
    ) -> Result<Response<Self::ExecuteStreamStream>, Status> {
        let req = request.into_inner();
        info!(
            tool = %req.tool_name,
            session = %req.session_id,
            "gRPC ExecuteStream"
        );

        let (event_tx, event_rx) = mpsc::channel::<Result<ExecuteEvent, Status>>(128);
        let (status_tx, mut status_rx) = mpsc::channel(64);

        let executor = self.executor.clone();
        tokio::spawn(async move {
            let sink: Arc<dyn StatusSink> = Arc::new(ChannelSink::new(status_tx));
            let exec_task = tokio::spawn(async move { executor.execute(req, sink).await });

            // Forward progress events until the executor drops its sink,
            // which closes the status channel. Only then is the final
            // result emitted, so status events always precede it.
            while let Some(event) = status_rx.recv().await {
                let wrapped = ExecuteEvent {
                    event: Some(Event::Status(ProtoStatusEvent {
                        status: event.status.as_str().to_string(),
                        description: event.description,
                        done: event.done,
                    })),
                };
                if event_tx.send(Ok(wrapped)).await.is_err() {
                    break; // client went away
                }
            }

            let terminal = match exec_task.await {
                Ok(Ok(response)) => Ok(ExecuteEvent {
                    event: Some(Event::Result(response)),
                }),
                Ok(Err(e)) => {
                    error!("ExecuteStream failed: {e:#}");
                    Err(Status::internal(format!("Execution failed: {e:#}")))
                }
                Err(e) => Err(Status::internal(format!("Execution task failed: {e}"))),
            };
            let _ = event_tx.send(terminal).await;
        });

        Ok(Response::new(
            tokio_stream::wrappers::ReceiverStream::new(event_rx),
        ))
    }

    // ------------------------------------------------------------------
    // HealthCheck
    // ------------------------------------------------------------------
    async fn health_check(
        &self,
        _request: Request<Empty>,
    ) -> Result<Response<HealthStatus>, Status> {
        let tool_count = self.registry.tool_count();
        let uptime = self.start_time.elapsed().as_secs() as i64;

        info!(tool_count, uptime, "gRPC HealthCheck");

        Ok(Response::new(HealthStatus {
            healthy: true,
            service: "attache-tools".to_string(),
            message: format!("{tool_count} tools registered, uptime {uptime}s"),
            uptime_seconds: uptime,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
