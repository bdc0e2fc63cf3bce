//! Pipeline Event tagged union (§3, §9): the Coordinator's output stream.
//!
//! Modeled as a sum type with an exhaustive `type` discriminant, per the
//! design note favoring a proper variant over structural typing. The event
//! sink is a synchronous callback from the Coordinator's point of view;
//! buffering toward the network is the gateway's problem.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Planner/researcher/critic/writer role tag on an `agent_log` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Planner,
    Researcher,
    Critic,
    Writer,
}

/// One citation entry, emitted in a `citations` event (§4.12 step g).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: Option<Uuid>,
    pub source: Option<String>,
    pub chunk_index: Option<i32>,
    pub citation_start: Option<usize>,
    pub citation_end: Option<usize>,
    pub is_web_source: bool,
}

/// Grade-count summary attached to a `verification` event.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GradeSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// The full payload of a `final` event, also what gets persisted into the
/// response cache (§4.12 step k).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalPayload {
    pub text: String,
    pub verified: bool,
    pub citations: Vec<Citation>,
}

/// The tagged-union pipeline event, streamed to the caller (§3, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    AgentLog { role: AgentRole, message: String, ts: i64 },
    Rewrite { original: String, rewritten: String, reason: String, ts: i64 },
    Tokens { text: String, ts: i64 },
    Citations { citations: Vec<Citation>, ts: i64 },
    WebSearchMetadata { query: String, result_count: usize, ts: i64 },
    Verification { is_valid: bool, grade_summary: GradeSummary, feedback: String, confidence: f32, ts: i64 },
    Final { payload: FinalPayload, ts: i64 },
    Ping { ts: i64 },
}

impl PipelineEvent {
    /// The discriminant string a gateway would frame as `event: <type>`.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineEvent::AgentLog { .. } => "agent_log",
            PipelineEvent::Rewrite { .. } => "rewrite",
            PipelineEvent::Tokens { .. } => "tokens",
            PipelineEvent::Citations { .. } => "citations",
            PipelineEvent::WebSearchMetadata { .. } => "web_search_metadata",
            PipelineEvent::Verification { .. } => "verification",
            PipelineEvent::Final { .. } => "final",
            PipelineEvent::Ping { .. } => "ping",
        }
    }

    /// Whether this event terminates the stream. `final` must be emitted
    /// exactly once per invocation (§4.12).
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineEvent::Final { .. })
    }
}

/// Synchronous callback the Coordinator emits events through. Buffering
/// toward the network (SSE framing, backpressure) is the gateway's concern,
/// not the Coordinator's (§9).
pub trait EventSink: Send {
    /// Emits one event. Returns `false` once the sink has been closed (the
    /// caller disconnected); the Coordinator stops emitting after that.
    fn send(&mut self, event: PipelineEvent) -> bool;
}

/// An in-memory sink used by tests and the `mock` binary mode.
#[derive(Default)]
pub struct VecSink {
    pub events: Vec<PipelineEvent>,
    closed: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates caller disconnect: subsequent `send` calls return `false`.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl EventSink for VecSink {
    fn send(&mut self, event: PipelineEvent) -> bool {
        if self.closed {
            return false;
        }
        self.events.push(event);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_serde_tag() {
        let event = PipelineEvent::Ping { ts: 0 };
        assert_eq!(event.kind(), "ping");
    }

    #[test]
    fn final_event_is_terminal() {
        let event = PipelineEvent::Final {
            payload: FinalPayload {
                text: "ok".to_string(),
                verified: true,
                citations: Vec::new(),
            },
            ts: 0,
        };
        assert!(event.is_terminal());
        assert!(!PipelineEvent::Ping { ts: 0 }.is_terminal());
    }

    #[test]
    fn closed_sink_rejects_further_sends() {
        let mut sink = VecSink::new();
        assert!(sink.send(PipelineEvent::Ping { ts: 0 }));
        sink.close();
        assert!(!sink.send(PipelineEvent::Ping { ts: 1 }));
        assert_eq!(sink.events.len(), 1);
    }
}
