// Data models for the broker gateway
// Inbound envelope, per-action payloads and the uniform result envelope

pub mod envelope;

pub use envelope::{Action, AuthPayload, InboundEnvelope, LogPayload, MailPayload, ResultEnvelope};
