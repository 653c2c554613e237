use chrono::FixedOffset;
use fieldnotes::ai::{GenerationRequest, OllamaClient, OpenAiClient, TextGenerator};
use fieldnotes::db::{Database, EntryStore};
use fieldnotes::entry::{FormState, Section};
use fieldnotes::errors::{AIError, AppError};
use fieldnotes::ops::{self, ReformatOutput};
use mockito::Matcher;

fn request() -> GenerationRequest {
    GenerationRequest::new("test-model", "Tidy these notes.", "helo wrld")
}

#[test]
fn test_openai_success() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJsonString(r#"{"model":"test-model"}"#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hello world"}}]}"#,
        )
        .create();

    let client = OpenAiClient::new(server.url(), Some("sk-test".to_string()), 5).unwrap();
    let text = client.generate(&request()).unwrap();

    assert_eq!(text, "Hello world");
    mock.assert();
}

#[test]
fn test_openai_unauthorized() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create();

    let client = OpenAiClient::new(server.url(), Some("sk-bad".to_string()), 5).unwrap();
    match client.generate(&request()) {
        Err(AppError::AI(AIError::Unauthorized(msg))) => assert!(msg.contains("401")),
        other => panic!("Expected Unauthorized, got {:?}", other),
    }
}

#[test]
fn test_openai_rate_limited() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body("slow down")
        .create();

    let client = OpenAiClient::new(server.url(), Some("sk-test".to_string()), 5).unwrap();
    let result = client.generate(&request());
    assert!(matches!(result, Err(AppError::AI(AIError::RateLimited(_)))));
}

#[test]
fn test_openai_empty_choices() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create();

    let client = OpenAiClient::new(server.url(), Some("sk-test".to_string()), 5).unwrap();
    let result = client.generate(&request());
    assert!(matches!(result, Err(AppError::AI(AIError::InvalidResponse(_)))));
}

#[test]
fn test_ollama_success() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJsonString(
            r#"{"model":"test-model","stream":false}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(concat!(
            r#"{"model":"test-model","#,
            r#""message":{"role":"assistant","content":"Tidy text"},"done":true}"#
        ))
        .create();

    let client = OllamaClient::new(server.url(), 5).unwrap();
    assert_eq!(client.generate(&request()).unwrap(), "Tidy text");
    mock.assert();
}

#[test]
fn test_ollama_model_not_found() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_body(r#"{"error":"model 'test-model' not found"}"#)
        .create();

    let client = OllamaClient::new(server.url(), 5).unwrap();
    match client.generate(&request()) {
        Err(AppError::AI(AIError::ModelNotFound(model))) => assert_eq!(model, "test-model"),
        other => panic!("Expected ModelNotFound, got {:?}", other),
    }
}

#[test]
fn test_unreachable_service() {
    // Port 9 (discard) is closed on test machines
    let client = OllamaClient::new("http://127.0.0.1:9", 2).unwrap();
    let result = client.generate(&request());
    assert!(matches!(result, Err(AppError::AI(AIError::Unreachable(_)))));
}

#[test]
fn test_reformat_reports_service_errors_inline() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body("internal error")
        .expect(2)
        .create();

    let db = Database::open_in_memory().unwrap();
    db.initialize_schema().unwrap();
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    for location in ["Viveros", "Centro"] {
        let mut form = FormState::new();
        form.location = location.to_string();
        form.set_answers(Section::Research, vec!["observation"]).unwrap();
        ops::submit_form(&db, &mut form, ops::current_time(offset)).unwrap();
    }

    let client = OllamaClient::new(server.url(), 5).unwrap();
    let results = ops::reformat_entries(&db, &client, "test-model", None).unwrap();

    assert_eq!(results.len(), 2);
    for (_, output) in &results {
        assert!(matches!(output, ReformatOutput::Failed(_)));
        assert!(output.to_string().contains("internal error"));
    }
    assert_eq!(db.query_all(Default::default()).unwrap().len(), 2);
}
