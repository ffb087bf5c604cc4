use lullaby::story::{Stage, Verdict};
use lullaby::story::revise::SOFTEN_FIX;

use crate::fixtures::{
    CLEAN_STORY, REQUEST, classify_reply, extract_reply, is_judge_prompt, judge_reply, pipeline,
    plan_reply,
};

const SPOOKY_STORY: &str = "Lumi was a shy firefly. One night a ghost floated over the pond. \
Pip the moth became her friend. Sweet dreams.";

fn replies_with_draft(draft: &str, softened: &str) -> Vec<String> {
    vec![
        classify_reply("bedtime", &[]),
        extract_reply(),
        plan_reply("500"),
        draft.to_string(),
        softened.to_string(),
        judge_reply(5),
    ]
}

#[tokio::test]
async fn flagged_draft_is_softened_before_judging() {
    let (provider, pipeline) = pipeline(replies_with_draft(SPOOKY_STORY, CLEAN_STORY));

    let run = pipeline.run(REQUEST).await.unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 6);

    let soften = &calls[4];
    assert!(soften.prompt.contains(SOFTEN_FIX));
    assert!(soften.prompt.contains("a ghost floated"));
    assert_eq!(soften.max_tokens, 900);
    assert!((soften.temperature - 0.5).abs() < f64::EPSILON);

    let judge = &calls[5];
    assert!(is_judge_prompt(&judge.prompt));
    assert!(judge.prompt.contains(CLEAN_STORY));
    assert!(!judge.prompt.contains("ghost"));

    assert_eq!(run.trace.iter().filter(|s| **s == Stage::Generate).count(), 1);
    assert_eq!(run.story.text(), CLEAN_STORY);
    assert_eq!(run.story.revision(), 0);
}

#[tokio::test]
async fn softened_text_is_not_rescanned() {
    // Passes every metric, so only a rescan could add another call.
    let still_spooky = CLEAN_STORY.replace("Sweet dreams.", "A kind ghost waved. Sweet dreams.");
    let (provider, pipeline) = pipeline(replies_with_draft(SPOOKY_STORY, &still_spooky));

    let run = pipeline.run(REQUEST).await.unwrap();

    assert_eq!(provider.call_count(), 6);
    let judge = &provider.calls()[5];
    assert!(is_judge_prompt(&judge.prompt));
    assert!(judge.prompt.contains("A kind ghost waved."));
    assert_eq!(run.report.verdict, Verdict::Pass);
    assert_eq!(run.trace.len(), 6);
    assert_eq!(run.story.text(), still_spooky);
}

#[tokio::test]
async fn clean_draft_skips_the_rewrite() {
    let (provider, pipeline) = pipeline(vec![
        classify_reply("bedtime", &[]),
        extract_reply(),
        plan_reply("500"),
        CLEAN_STORY.to_string(),
        judge_reply(5),
    ]);

    pipeline.run(REQUEST).await.unwrap();

    assert!(
        provider
            .calls()
            .iter()
            .all(|call| !call.prompt.contains(SOFTEN_FIX))
    );
}
