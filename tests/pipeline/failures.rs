use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lullaby::error::{LlmError, ParseError, StoryError};
use lullaby::providers::scripted::ScriptedReply;
use lullaby::providers::{CompletionRequest, Provider, TimeoutProvider};
use lullaby::{Config, StoryPipeline};

use crate::fixtures::{
    CLEAN_STORY, REQUEST, classify_reply, extract_reply, opening_replies, pipeline,
    pipeline_from, plan_reply,
};

#[tokio::test]
async fn unparseable_classification_aborts_the_run() {
    let (provider, pipeline) = pipeline(vec!["I'd love to help with that!".to_string()]);

    let err = pipeline.run(REQUEST).await.unwrap_err();

    assert!(
        matches!(err, StoryError::Parse(ParseError::NoJson { stage: "classify", .. })),
        "{err:?}"
    );
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn extraction_array_is_not_an_object() {
    let (_, pipeline) = pipeline(vec![
        classify_reply("bedtime", &[]),
        r#"["firefly", "friend"]"#.to_string(),
    ]);

    let err = pipeline.run(REQUEST).await.unwrap_err();

    assert!(
        matches!(err, StoryError::Parse(ParseError::NotAnObject { stage: "extract" })),
        "{err:?}"
    );
}

#[tokio::test]
async fn unparseable_judgement_never_yields_a_story() {
    let mut replies = opening_replies("bedtime", CLEAN_STORY);
    replies.push("Looks lovely to me.".to_string());
    let (provider, pipeline) = pipeline(replies);

    let err = pipeline.run(REQUEST).await.unwrap_err();

    assert!(
        matches!(err, StoryError::Parse(ParseError::NoJson { stage: "judge", .. })),
        "{err:?}"
    );
    assert_eq!(provider.call_count(), 5);
}

#[tokio::test]
async fn blank_story_is_an_empty_completion() {
    let (_, pipeline) = pipeline(vec![
        classify_reply("bedtime", &[]),
        extract_reply(),
        plan_reply("500"),
        "   \n".to_string(),
    ]);

    let err = pipeline.run(REQUEST).await.unwrap_err();

    assert!(
        matches!(err, StoryError::Llm(LlmError::EmptyCompletion { ref provider }) if provider == "scripted"),
        "{err:?}"
    );
}

#[tokio::test]
async fn provider_failure_stops_at_the_failing_stage() {
    let (provider, pipeline) = pipeline_from([
        ScriptedReply::Text(classify_reply("bedtime", &[])),
        ScriptedReply::Text(extract_reply()),
        ScriptedReply::Fail("HTTP 503 upstream overloaded".to_string()),
        ScriptedReply::Text(CLEAN_STORY.to_string()),
    ]);

    let err = pipeline.run(REQUEST).await.unwrap_err();

    let StoryError::Llm(LlmError::Request { provider: name, message }) = err else {
        panic!("expected a request error, got {err:?}");
    };
    assert_eq!(name, "scripted");
    assert!(message.contains("503"));
    assert_eq!(provider.call_count(), 3);
    assert_eq!(provider.remaining(), 1);
}

#[tokio::test]
async fn exhausted_provider_is_a_request_error() {
    let (_, pipeline) = pipeline(vec![classify_reply("bedtime", &[])]);

    let err = pipeline.run(REQUEST).await.unwrap_err();

    assert!(matches!(err, StoryError::Llm(LlmError::Request { .. })), "{err:?}");
}

struct StalledProvider;

#[async_trait]
impl Provider for StalledProvider {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn complete(&self, _request: &CompletionRequest<'_>) -> anyhow::Result<String> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(String::new())
    }
}

#[tokio::test]
async fn stalled_provider_times_out() {
    let provider = Arc::new(TimeoutProvider::new(
        StalledProvider,
        Duration::from_millis(20),
    ));
    let pipeline = StoryPipeline::new(provider, &Config::default()).unwrap();

    let err = pipeline.run(REQUEST).await.unwrap_err();

    assert!(
        matches!(err, StoryError::Llm(LlmError::Timeout { ref provider, .. }) if provider == "stalled"),
        "{err:?}"
    );
}
