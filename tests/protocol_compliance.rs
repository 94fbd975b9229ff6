//! A2A wire format compliance
//!
//! Checks the JSON shapes exchanged with remote agents: camelCase fields,
//! `kind` discriminators and kebab-case task states.

use serde_json::json;
use a2a_bridge::{
    client::{classify, Signal},
    protocol::{
        message::{Message, Part, Role},
        task::{Task, TaskState},
        AgentCapabilities, AgentCard, AgentSkill, Artifact, StreamResponse,
    },
    service::TaskTracker,
};

#[test]
fn test_role_serialization() {
    let json = serde_json::to_value(Message::user("Hello")).unwrap();
    assert_eq!(json["role"], "user");

    let json = serde_json::to_value(Message::agent("Hi there")).unwrap();
    assert_eq!(json["role"], "agent");
}

#[test]
fn test_text_part_carries_kind() {
    let json = serde_json::to_value(Part::text("Hello, world!")).unwrap();
    assert_eq!(json, json!({"kind": "text", "text": "Hello, world!"}));
}

#[test]
fn test_file_part_serialization() {
    let json = serde_json::to_value(Part::file_uri("document.pdf", "https://example.com/doc.pdf")).unwrap();

    assert_eq!(json["kind"], "file");
    assert_eq!(json["file"]["name"], "document.pdf");
    assert_eq!(json["file"]["uri"], "https://example.com/doc.pdf");
    assert!(json["file"].get("bytes").is_none());
}

#[test]
fn test_message_field_naming() {
    let mut msg = Message::user("Test")
        .with_message_id("msg-123")
        .with_context_id(Some("ctx-789".into()));
    msg.task_id = Some("task-456".into());

    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["kind"], "message");
    assert_eq!(json["messageId"], "msg-123");
    assert_eq!(json["taskId"], "task-456");
    assert_eq!(json["contextId"], "ctx-789");

    assert!(json.get("message_id").is_none());
    assert!(json.get("context_id").is_none());
}

#[test]
fn test_task_state_serialization() {
    for (state, wire) in [
        (TaskState::InputRequired, "input-required"),
        (TaskState::AuthRequired, "auth-required"),
        (TaskState::Submitted, "submitted"),
        (TaskState::Canceled, "canceled"),
    ] {
        let task = Task::new("task-1", None).with_status(state);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"]["state"], wire);
    }
}

#[test]
fn test_task_shape() {
    let task = Task::new("task-123", Some("ctx-456".into()))
        .with_status(TaskState::Completed)
        .with_artifact(Artifact::text("response", "Output"))
        .with_history_message(Message::user("Question"))
        .with_history_message(Message::agent("Output"));
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["kind"], "task");
    assert_eq!(json["contextId"], "ctx-456");
    assert!(json["status"]["timestamp"].is_string());
    assert_eq!(json["artifacts"][0]["name"], "response");
    assert!(json["artifacts"][0]["artifactId"].is_string());
    assert_eq!(json["artifacts"][0]["parts"][0]["text"], "Output");
    assert_eq!(json["history"][0]["role"], "user");
    assert_eq!(json["history"][1]["role"], "agent");
}

#[test]
fn test_optional_fields_omitted() {
    let json = serde_json::to_value(Message::user("Test")).unwrap();
    assert!(json.get("messageId").is_none());
    assert!(json.get("taskId").is_none());
    assert!(json.get("contextId").is_none());
    assert!(json.get("metadata").is_none());

    let json = serde_json::to_value(Task::new("t-1", None)).unwrap();
    assert!(json.get("contextId").is_none());
    assert!(json.get("artifacts").is_none());
    assert!(json.get("history").is_none());
}

#[test]
fn test_agent_card_shape() {
    let card = AgentCard::new("Homelab", "Answers homelab questions", AgentCapabilities::new())
        .with_version("1.0.0")
        .with_url("http://localhost:10001")
        .with_skill(AgentSkill::new("conversation", "Conversational Assistant", "Chat"));
    let json = serde_json::to_value(&card).unwrap();

    assert_eq!(
        json["capabilities"],
        json!({"streaming": false, "pushNotifications": false, "stateTransitionHistory": false})
    );
    assert_eq!(json["skills"][0], json!({"id": "conversation", "name": "Conversational Assistant", "description": "Chat"}));
    assert_eq!(json["defaultInputModes"], json!(["text"]));
    assert_eq!(json["defaultOutputModes"], json!(["text"]));
}

#[test]
fn test_remote_card_with_extra_fields() {
    let card: AgentCard = serde_json::from_value(json!({
        "name": "kagent",
        "url": "http://kagent:8083/api/a2a/kagent/homelab/",
        "capabilities": {"streaming": true, "extensions": []},
        "preferredTransport": "JSONRPC",
        "skills": []
    }))
    .unwrap();

    assert!(card.capabilities.streaming);
    assert_eq!(card.url, "http://kagent:8083/api/a2a/kagent/homelab/");
}

#[test]
fn test_message_deserialization_from_remote_agent() {
    let msg: Message = serde_json::from_value(json!({
        "kind": "message",
        "role": "agent",
        "parts": [
            {"kind": "text", "text": "Nodes are ready."},
            {"kind": "file", "file": {"name": "report.txt", "mimeType": "text/plain", "uri": "https://example.com/r.txt"}}
        ],
        "messageId": "msg-123",
        "contextId": "ctx-456"
    }))
    .unwrap();

    assert_eq!(msg.role, Role::Agent);
    assert_eq!(msg.parts.len(), 2);
    assert_eq!(msg.text(), "Nodes are ready.");
    match &msg.parts[1] {
        Part::File { file } => {
            assert_eq!(file.mime_type.as_deref(), Some("text/plain"));
            assert_eq!(file.uri.as_deref(), Some("https://example.com/r.txt"));
        }
        other => panic!("Expected File part, got {:?}", other),
    }
}

#[test]
fn test_stream_payloads_classify_in_order() {
    let payloads = [
        json!({"kind": "task", "id": "t-1", "contextId": "ctx-1", "status": {"state": "submitted"}}),
        json!({"kind": "status-update", "taskId": "t-1", "contextId": "ctx-1", "status": {"state": "working"}, "final": false}),
        json!({"kind": "artifact-update", "taskId": "t-1", "contextId": "ctx-1", "artifact": {"artifactId": "a-1", "parts": [{"kind": "text", "text": "All nodes ready"}]}}),
        json!({"kind": "something-new", "payload": 1}),
        json!({"kind": "status-update", "taskId": "t-1", "contextId": "ctx-1", "status": {"state": "completed"}, "final": true}),
    ];

    let mut tracker = TaskTracker::new();
    let signals: Vec<Signal> = payloads
        .into_iter()
        .map(|payload| tracker.observe(StreamResponse::from_value(payload)))
        .flat_map(|event| classify(&event))
        .collect();

    let context = Signal::ContextUpdate("ctx-1".into());
    assert_eq!(
        signals,
        vec![
            context.clone(),
            context.clone(),
            Signal::Progress(TaskState::Working),
            context.clone(),
            Signal::Text("All nodes ready".into()),
            context,
            Signal::Terminal(TaskState::Completed),
        ]
    );
}

#[test]
fn test_input_required_is_not_terminal_for_the_bridge() {
    let mut tracker = TaskTracker::new();
    let event = tracker.observe(StreamResponse::from_value(json!({
        "kind": "status-update",
        "taskId": "t-1",
        "status": {"state": "input-required"},
        "final": true
    })));

    let signals = classify(&event);
    assert!(signals.contains(&Signal::Progress(TaskState::InputRequired)));
    assert!(signals.contains(&Signal::ContextUpdate("t-1".into())));
}
