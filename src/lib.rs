//! attache-tools — email staging and translation tools for LLM assistants.
//!
//! Hosts two tool namespaces behind a gRPC `ToolHost` service:
//! - `email.*`: prepare/send/discard workflow with one staged draft per
//!   session, delivered over SMTP after explicit confirmation.
//! - `translate.*`: stateless DeepL translation plus a static language list.
//!
//! Every execution goes through the pipeline: schema-validate input →
//! dispatch handler → record in the audit ledger.

pub mod audit;
pub mod config;
pub mod email;
pub mod executor;
pub mod registry;
pub mod schema;
pub mod service;
pub mod status;
pub mod translate;

pub mod proto {
    pub mod tools {
        tonic::include_proto!("attache.tools");
    }
}
