//! The run context ("state") carried through every orchestrator stage.
//!
//! One `RunState` is created by Initialize, mutated in place by each stage it
//! visits, and consumed at Finalize. It is never persisted beyond the run;
//! the only externally durable side effects are the notes, replies, and
//! attribute updates each stage posts to the messaging platform.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message role in the conversation transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A file or image attached to a conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// One message in the conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// The trusted identity of the user the conversation belongs to.
///
/// `email` is the anchor used by the parameter-sanitization table to
/// override any `user_email` field an LLM-generated tool call tries to set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Whether a tool has externally visible side effects and, if so, whether
/// those effects reach outside the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    /// No externally visible side effects; freely invoked in Gather.
    Gather,
    /// Side-effecting, confined to platform-internal bookkeeping (e.g. linking a ticket).
    InternalAction,
    /// Side-effecting, with effects visible outside the platform.
    ExternalAction,
}

impl ToolType {
    pub fn is_action(self) -> bool {
        matches!(self, ToolType::InternalAction | ToolType::ExternalAction)
    }
}

/// One entry in the tool catalog loaded at Initialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub tool_type: ToolType,
}

/// A tool invocation proposed by Plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub parameters: Value,
    pub reasoning: String,
}

/// The outcome of executing one `ToolCall` during Gather or Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub parameters: Value,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
}

/// Plan's output for one hop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    pub reasoning: String,
    pub tool_calls: Vec<ToolCall>,
    pub gather_tool_calls: Vec<ToolCall>,
    pub action_tool_calls: Vec<ToolCall>,
}

/// Gather's output for one hop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatherRecord {
    pub tool_results: Vec<ToolResult>,
    pub total_execution_time_ms: u64,
    pub success_rate: f64,
    pub execution_status: String,
}

/// The LLM-structured coverage decision, before deterministic post-processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub data_sufficient: bool,
    #[serde(default)]
    pub missing_data: Vec<String>,
    pub reasoning: String,
    pub confidence: f64,
    pub next_action: NextAction,
    #[serde(default)]
    pub escalation_reason: Option<String>,
    #[serde(default)]
    pub action_decision: Option<ActionDecision>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDecision {
    pub action_tool_name: String,
    pub reasoning: String,
}

/// The coverage-decision enumeration. Defensively revalidated after every
/// LLM call per the design note on structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Continue,
    GatherMore,
    ExecuteAction,
    Escalate,
}

/// Coverage's output for one hop: the LLM's structured response plus the
/// routing target after the deterministic policy in §4.4 has been applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub coverage_response: CoverageResponse,
    pub next_node: Node,
}

/// One Plan → Gather → Coverage cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HopRecord {
    pub hop_number: u32,
    pub plan: Option<PlanRecord>,
    pub gather: Option<GatherRecord>,
    pub coverage: Option<CoverageRecord>,
}

impl HopRecord {
    pub fn new(hop_number: u32) -> Self {
        HopRecord {
            hop_number,
            plan: None,
            gather: None,
            coverage: None,
        }
    }
}

/// A single side-effecting action execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub hop_number: u32,
    pub tool_name: String,
    pub parameters: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<Value>,
    pub execution_time_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub audit_note: String,
    pub timestamp: DateTime<Utc>,
}

/// The kind of reply Draft produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    Reply,
    RouteToTeam,
}

/// Draft's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    pub response: String,
    pub response_type: ResponseType,
    #[serde(default)]
    pub escalation_reason: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub generation_time_ms: u64,
}

/// Validate's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRecord {
    pub overall_passed: bool,
    pub raw_verdict: Value,
    pub note_posted: bool,
}

/// Response-delivery outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDeliveryRecord {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The source stage that triggered an escalation, used by Finalize's status
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationSource {
    Initialization,
    Plan,
    Gather,
    Coverage,
    Action,
    Draft,
    Validate,
    Response,
}

/// Escalate's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalateRecord {
    pub source: EscalationSource,
    pub reason: String,
    pub note_posted: bool,
}

/// The closed vocabulary for the "Melvin Status" custom attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeStatus {
    Success,
    ResponseFailed,
    ValidationFailed,
    MessageFailed,
    RouteToTeam,
    Error,
}

impl FinalizeStatus {
    pub fn as_attribute_value(self) -> &'static str {
        match self {
            FinalizeStatus::Success => "success",
            FinalizeStatus::ResponseFailed => "response_failed",
            FinalizeStatus::ValidationFailed => "validation_failed",
            FinalizeStatus::MessageFailed => "message_failed",
            FinalizeStatus::RouteToTeam => "route_to_team",
            FinalizeStatus::Error => "error",
        }
    }
}

/// Finalize's outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeRecord {
    pub status: FinalizeStatus,
    pub attribute_set: bool,
    pub snoozed: bool,
}

/// The graph node the driver dispatches to next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Initialize,
    Plan,
    Gather,
    Coverage,
    Action,
    Draft,
    Validate,
    Response,
    Escalate,
    Finalize,
    Done,
}

/// The run context threaded through every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub conversation_id: String,
    pub messages: Vec<ConversationMessage>,
    pub subject: Option<String>,
    pub user_details: UserDetails,
    pub melvin_admin_id: String,

    pub available_tools: HashMap<String, ToolSpec>,
    pub tool_data: HashMap<String, Value>,
    pub docs_data: HashMap<String, Value>,

    pub hops: Vec<HopRecord>,
    pub max_hops: u32,

    pub actions: Vec<ActionRecord>,
    pub max_actions: u32,
    pub actions_taken: u32,

    pub draft: Option<DraftRecord>,
    pub validate: Option<ValidateRecord>,
    pub response_delivery: Option<ResponseDeliveryRecord>,
    pub escalate: Option<EscalateRecord>,
    pub finalize: Option<FinalizeRecord>,

    pub next_node: Node,
    pub error: Option<String>,
    pub escalation_reason: Option<String>,
    pub selected_procedure: Option<String>,

    /// Which stage most recently routed to Escalate; consumed by the
    /// Escalate stage when it builds `EscalateRecord` and by Finalize's
    /// status mapping.
    pub pending_escalation_source: Option<EscalationSource>,
}

impl RunState {
    /// Seed an empty state for a conversation before Initialize runs.
    pub fn new(conversation_id: impl Into<String>, max_hops: u32, max_actions: u32) -> Self {
        RunState {
            conversation_id: conversation_id.into(),
            messages: Vec::new(),
            subject: None,
            user_details: UserDetails::default(),
            melvin_admin_id: String::new(),
            available_tools: HashMap::new(),
            tool_data: HashMap::new(),
            docs_data: HashMap::new(),
            hops: Vec::new(),
            max_hops,
            actions: Vec::new(),
            max_actions,
            actions_taken: 0,
            draft: None,
            validate: None,
            response_delivery: None,
            escalate: None,
            finalize: None,
            next_node: Node::Initialize,
            error: None,
            escalation_reason: None,
            selected_procedure: None,
            pending_escalation_source: None,
        }
    }

    /// The current (last, in-progress or just-completed) hop, if any have started.
    pub fn current_hop(&self) -> Option<&HopRecord> {
        self.hops.last()
    }

    pub fn current_hop_mut(&mut self) -> Option<&mut HopRecord> {
        self.hops.last_mut()
    }

    /// Route this run to Escalate, recording the reason and source stage.
    pub fn escalate_with(&mut self, source: EscalationSource, reason: impl Into<String>) {
        self.escalation_reason = Some(reason.into());
        self.pending_escalation_source = Some(source);
        self.next_node = Node::Escalate;
    }
}
