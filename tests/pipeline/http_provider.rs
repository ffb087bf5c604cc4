use lullaby::providers::create_provider;
use lullaby::story::{Stage, Verdict};
use lullaby::{Config, StoryPipeline};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::{CLEAN_STORY, REQUEST, classify_reply, extract_reply, judge_reply, plan_reply};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn mount_stage(server: &MockServer, marker: &str, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains(marker))
        .respond_with(completion(reply))
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        ..Config::default()
    }
}

#[tokio::test]
async fn full_run_over_chat_completions() {
    let server = MockServer::start().await;
    mount_stage(&server, "You sort story requests", &classify_reply("bedtime", &[])).await;
    mount_stage(&server, "Pull the hard constraints", &extract_reply()).await;
    mount_stage(&server, "You plan stories", &plan_reply("about 480 words")).await;
    mount_stage(&server, "Write the complete story", CLEAN_STORY).await;
    mount_stage(&server, "strict judge", &judge_reply(5)).await;

    let config = config_for(&server);
    let pipeline = StoryPipeline::new(create_provider(&config), &config).unwrap();
    let run = pipeline.run(REQUEST).await.unwrap();

    assert_eq!(run.trace.len(), 6);
    assert_eq!(run.trace.last(), Some(&Stage::Finalize));
    assert_eq!(run.report.verdict, Verdict::Pass);
    assert_eq!(run.story.text(), CLEAN_STORY);
}

#[tokio::test]
async fn request_carries_model_and_sampling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(wiremock::matchers::body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.2,
            "max_tokens": 300,
        })))
        .respond_with(completion("no json here"))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        model: "gpt-4o-mini".to_string(),
        ..config_for(&server)
    };
    let pipeline = StoryPipeline::new(create_provider(&config), &config).unwrap();

    let err = pipeline.run(REQUEST).await.unwrap_err();

    assert!(err.to_string().contains("classify"), "{err}");
}

#[tokio::test]
async fn http_error_surfaces_without_the_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("invalid api key sk-test-key-123456"),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let pipeline = StoryPipeline::new(create_provider(&config), &config).unwrap();

    let err = pipeline.run(REQUEST).await.unwrap_err().to_string();

    assert!(err.contains("401"), "{err}");
    assert!(!err.contains("sk-test-key-123456"), "{err}");
}
