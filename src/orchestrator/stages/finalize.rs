//! §4.10 Finalize: classify the run, set the "Melvin Status" custom
//! attribute, and snooze the conversation. Never fails the run.

use tracing::{instrument, warn};

use crate::orchestrator::dependencies::RunDependencies;
use crate::state::{EscalationSource, FinalizeRecord, FinalizeStatus, Node, ResponseType, RunState};

#[instrument(skip_all, fields(conversation_id = %state.conversation_id))]
pub async fn run(state: &mut RunState, deps: &RunDependencies) {
    let status = classify(state);

    let attribute_set = match deps
        .platform
        .update_custom_attribute(
            &state.conversation_id,
            "Melvin Status",
            serde_json::Value::String(status.as_attribute_value().to_string()),
        )
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to set Melvin Status attribute");
            false
        }
    };

    let snoozed = match deps.platform.snooze(&state.conversation_id, deps.snooze_secs as i64).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to snooze conversation");
            false
        }
    };

    state.finalize = Some(FinalizeRecord { status, attribute_set, snoozed });
    state.next_node = Node::Done;
}

/// §7's Finalize status mapping, applied to whatever combination of stage
/// records is present on a terminal state. Pure: calling this twice on the
/// same state yields the same label.
pub fn classify(state: &RunState) -> FinalizeStatus {
    if state.draft.as_ref().map(|d| d.response_type == ResponseType::RouteToTeam).unwrap_or(false) {
        return FinalizeStatus::RouteToTeam;
    }

    if let Some(escalate) = &state.escalate {
        return match escalate.source {
            EscalationSource::Validate => FinalizeStatus::ValidationFailed,
            EscalationSource::Draft => FinalizeStatus::ResponseFailed,
            EscalationSource::Coverage => FinalizeStatus::RouteToTeam,
            EscalationSource::Initialization => FinalizeStatus::Error,
            _ => FinalizeStatus::Error,
        };
    }

    if let Some(delivery) = &state.response_delivery {
        return if delivery.delivered { FinalizeStatus::Success } else { FinalizeStatus::MessageFailed };
    }

    FinalizeStatus::Error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DraftRecord, EscalateRecord, ResponseDeliveryRecord};
    use chrono::Utc;

    fn base_state() -> RunState {
        RunState::new("c1", 3, 1)
    }

    #[test]
    fn route_to_team_draft_wins_regardless_of_other_records() {
        let mut state = base_state();
        state.draft = Some(DraftRecord {
            response: "ok".to_string(),
            response_type: ResponseType::RouteToTeam,
            escalation_reason: None,
            timestamp: Utc::now(),
            generation_time_ms: 0,
        });
        assert_eq!(classify(&state), FinalizeStatus::RouteToTeam);
    }

    #[test]
    fn escalate_source_mapping() {
        let mut state = base_state();
        state.escalate = Some(EscalateRecord { source: EscalationSource::Validate, reason: "r".to_string(), note_posted: true });
        assert_eq!(classify(&state), FinalizeStatus::ValidationFailed);

        state.escalate = Some(EscalateRecord { source: EscalationSource::Draft, reason: "r".to_string(), note_posted: true });
        assert_eq!(classify(&state), FinalizeStatus::ResponseFailed);

        state.escalate = Some(EscalateRecord { source: EscalationSource::Coverage, reason: "r".to_string(), note_posted: true });
        assert_eq!(classify(&state), FinalizeStatus::RouteToTeam);

        state.escalate = Some(EscalateRecord { source: EscalationSource::Initialization, reason: "r".to_string(), note_posted: true });
        assert_eq!(classify(&state), FinalizeStatus::Error);
    }

    #[test]
    fn delivery_without_escalation_maps_to_success_or_message_failed() {
        let mut state = base_state();
        state.response_delivery = Some(ResponseDeliveryRecord { delivered: true, error: None });
        assert_eq!(classify(&state), FinalizeStatus::Success);

        state.response_delivery = Some(ResponseDeliveryRecord { delivered: false, error: Some("e".to_string()) });
        assert_eq!(classify(&state), FinalizeStatus::MessageFailed);
    }

    #[test]
    fn finalize_classification_is_idempotent() {
        let mut state = base_state();
        state.escalate = Some(EscalateRecord { source: EscalationSource::Coverage, reason: "r".to_string(), note_posted: true });
        assert_eq!(classify(&state), classify(&state));
    }
}
