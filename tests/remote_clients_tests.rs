use std::time::Duration;

use serde_json::{json, Map, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskrelay::application::{
    ask, ChatClient, EmbeddingService, ImageGenerator, Moderator, Transcriber, VectorStore,
};
use taskrelay::connector::{FirecrawlScraper, LlamaClient, OpenAiClient, QdrantStore};
use taskrelay::domain::{ChatMessage, CompletionRequest, ScrapeOptions};
use taskrelay::PageScraper;

const TIMEOUT: Duration = Duration::from_secs(5);

fn openai(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new("sk-test", server.uri(), TIMEOUT).unwrap()
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 1, "total_tokens": 13}
    })
}

#[tokio::test]
async fn chat_completion_sends_bearer_and_decodes_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "Answer with a number."},
                {"role": "user", "content": "6 * 7?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("42")))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai(&server);
    let result = client
        .complete_short(
            vec![
                ChatMessage::system("Answer with a number."),
                ChatMessage::user("6 * 7?"),
            ],
            "gpt-4o-mini",
        )
        .await
        .unwrap();

    assert_eq!(result.first_content().unwrap(), "42");
    assert_eq!(result.usage.unwrap().total_tokens, 13);
}

#[tokio::test]
async fn empty_choices_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = openai(&server);
    let result = client
        .complete(CompletionRequest::new("gpt-4o", vec![ChatMessage::user("hi")]))
        .await
        .unwrap();
    assert!(result.is_empty());

    let err = ask(&client, "gpt-4o", "s", "u").await.unwrap_err();
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn error_status_body_is_still_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "Incorrect API key provided"}})),
        )
        .mount(&server)
        .await;

    let err = ask(&openai(&server), "gpt-4o", "s", "u").await.unwrap_err();
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = openai(&server)
        .complete(CompletionRequest::new("gpt-4o", vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, taskrelay::DomainError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = OpenAiClient::new("sk-test", "http://127.0.0.1:1", TIMEOUT).unwrap();
    let err = client.moderate("hello").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn embedding_requests_float_vectors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_json(json!({
            "input": "Kraków",
            "model": "text-embedding-3-small",
            "encoding_format": "float"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"object": "embedding", "index": 0, "embedding": [0.25, -0.5, 1.0]}]
        })))
        .mount(&server)
        .await;

    let vector = openai(&server)
        .embed("Kraków", "text-embedding-3-small")
        .await
        .unwrap();
    assert_eq!(vector, vec![0.25, -0.5, 1.0]);
}

#[tokio::test]
async fn embedding_without_data_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let err = openai(&server).embed("x", "m").await.unwrap_err();
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn transcription_uploads_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"text": "Andrzej wykładał na AGH."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let text = openai(&server)
        .transcribe(b"ID3fake-audio".to_vec(), "whisper-1", "m4a")
        .await
        .unwrap();
    assert_eq!(text, "Andrzej wykładał na AGH.");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("filename=\"file.m4a\""));
    assert!(body.contains("whisper-1"));
}

#[tokio::test]
async fn short_image_generation_uses_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(body_json(json!({
            "model": "dall-e-3",
            "prompt": "robot on tracks",
            "n": 1,
            "size": "1024x1024"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [{"url": "https://images.example/robot.png"}]
        })))
        .mount(&server)
        .await;

    let images = openai(&server)
        .generate_image_short("robot on tracks")
        .await
        .unwrap();
    assert_eq!(images.first_url().unwrap(), "https://images.example/robot.png");
}

#[tokio::test]
async fn moderation_report_is_flagged_when_any_result_is() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/moderations"))
        .and(body_json(json!({"input": "some text"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "modr-1",
            "model": "omni-moderation-latest",
            "results": [
                {
                    "flagged": false,
                    "categories": {"violence": false},
                    "category_scores": {"violence": 0.01}
                },
                {
                    "flagged": true,
                    "categories": {"violence": true},
                    "category_scores": {"violence": 0.93}
                }
            ]
        })))
        .mount(&server)
        .await;

    let report = openai(&server).moderate("some text").await.unwrap();
    assert!(report.flagged());
    assert_eq!(
        report.results[1].flagged_categories().collect::<Vec<_>>(),
        vec!["violence"]
    );
}

#[tokio::test]
async fn llama_client_flattens_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({
            "model": "llama3:8b",
            "prompt": "Jan Nowak mieszka w Krakowie.",
            "stream": false,
            "system": "Censor personal data."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3:8b",
            "created_at": "2024-11-04T10:00:00Z",
            "response": "CENZURA mieszka w CENZURA.",
            "done": true
        })))
        .mount(&server)
        .await;

    let client = LlamaClient::new(format!("{}/api/generate", server.uri()), TIMEOUT).unwrap();
    let answer = ask(
        &client,
        "llama3:8b",
        "Censor personal data.",
        "Jan Nowak mieszka w Krakowie.",
    )
    .await
    .unwrap();
    assert_eq!(answer, "CENZURA mieszka w CENZURA.");
}

#[tokio::test]
async fn llama_error_body_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": "model 'llama3:8b' not found"})),
        )
        .mount(&server)
        .await;

    let client = LlamaClient::new(format!("{}/api/generate", server.uri()), TIMEOUT).unwrap();
    let err = ask(&client, "llama3:8b", "s", "u").await.unwrap_err();
    assert!(err.is_empty_result());
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn llama_blank_response_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"model": "llama3:8b", "response": "", "done": true})),
        )
        .mount(&server)
        .await;

    let client = LlamaClient::new(format!("{}/api/generate", server.uri()), TIMEOUT).unwrap();
    let err = ask(&client, "llama3:8b", "s", "u").await.unwrap_err();
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn qdrant_upsert_and_search() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/collections/notes/points"))
        .and(query_param("wait", "true"))
        .and(header("api-key", "qd-key"))
        .and(body_json(json!({
            "points": [{"id": 7, "vector": [0.5, 0.5], "payload": {"text": "Kraków"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"operation_id": 3, "status": "completed"},
            "status": "ok",
            "time": 0.001
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/collections/notes/points/search"))
        .and(body_json(json!({"vector": [0.5, 0.5], "top": 2, "with_payload": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"id": 7, "version": 3, "score": 0.99, "payload": {"text": "Kraków"}},
                {"id": 2, "version": 1, "score": 0.41, "payload": {"text": "Gdańsk"}}
            ],
            "status": "ok",
            "time": 0.002
        })))
        .mount(&server)
        .await;

    let store =
        QdrantStore::new(server.uri(), Some("qd-key".to_string()), TIMEOUT).unwrap();

    let mut payload = Map::new();
    payload.insert("text".to_string(), Value::from("Kraków"));
    let ack = store.upsert("notes", 7, vec![0.5, 0.5], payload).await.unwrap();
    assert!(ack.is_completed());
    assert_eq!(ack.operation_id, 3);

    let hits = store.search("notes", vec![0.5, 0.5], 2).await.unwrap();
    let ids: Vec<u64> = hits.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![7, 2]);
    assert_eq!(hits[0].payload_str("text"), Some("Kraków"));
}

#[tokio::test]
async fn qdrant_error_without_result_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/missing/points/search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": {"error": "Not found: Collection `missing` doesn't exist!"},
            "time": 0.0
        })))
        .mount(&server)
        .await;

    let store = QdrantStore::new(server.uri(), None, TIMEOUT).unwrap();
    let err = store.search("missing", vec![1.0], 1).await.unwrap_err();
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn firecrawl_scrape_returns_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .and(header("authorization", "Bearer fc-key"))
        .and(body_json(json!({
            "url": "https://xyz.example",
            "formats": ["html", "markdown"],
            "includeTags": ["p"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"html": "<p id=\"human-question\">Question:<br>Rok?</p>", "markdown": "Rok?"}
        })))
        .mount(&server)
        .await;

    let scraper = FirecrawlScraper::new("fc-key", server.uri(), TIMEOUT).unwrap();
    let page = scraper
        .scrape(
            "https://xyz.example",
            ScrapeOptions::default().with_include_tags(["p"]),
        )
        .await
        .unwrap();
    assert!(page.html().unwrap().contains("human-question"));
}

#[tokio::test]
async fn firecrawl_failure_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(
            ResponseTemplate::new(402)
                .set_body_json(json!({"success": false, "error": "Payment required"})),
        )
        .mount(&server)
        .await;

    let scraper = FirecrawlScraper::new("fc-key", server.uri(), TIMEOUT).unwrap();
    let err = scraper
        .scrape("https://xyz.example", ScrapeOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_empty_result());
}
