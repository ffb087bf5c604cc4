use lullaby::story::Verdict;

use crate::fixtures::{
    CLEAN_STORY, REQUEST, REVISED_STORY, TAILLESS_STORY, is_judge_prompt, judge_reply,
    opening_replies, pipeline,
};

const FEEDBACK: &str = "  Please add a friendly owl.  ";

#[tokio::test]
async fn rejudge_scores_the_finalized_story() {
    let mut replies = opening_replies("bedtime", TAILLESS_STORY);
    replies.extend([judge_reply(5), REVISED_STORY.to_string(), judge_reply(5)]);
    let (provider, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();
    let report = pipeline.rejudge(&run.story, &run.brief).await.unwrap();

    let final_text = format!("{REVISED_STORY}\n\nSweet dreams.");
    assert_eq!(run.story.text(), final_text);

    let last = provider.calls().pop().unwrap();
    assert!(is_judge_prompt(&last.prompt));
    assert!(last.prompt.contains(&final_text));
    assert!(report.metrics.bedtime_tail_ok);
    assert_eq!(report.verdict, Verdict::Pass);
    assert_eq!(run.story.revision(), 1);
}

#[tokio::test]
async fn feedback_round_revises_and_finalizes() {
    let mut replies = opening_replies("bedtime", CLEAN_STORY);
    replies.extend([
        judge_reply(5),
        judge_reply(3),
        REVISED_STORY.to_string(),
        judge_reply(5),
    ]);
    let (provider, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();
    let report = pipeline.rejudge(&run.story, &run.brief).await.unwrap();
    let v2 = pipeline
        .apply_feedback(&run.story, FEEDBACK, &report, &run.brief)
        .await
        .unwrap();
    let v2_report = pipeline.rejudge(&v2, &run.brief).await.unwrap();

    assert_eq!(v2.revision(), run.story.revision() + 1);
    assert_eq!(v2.text(), format!("{REVISED_STORY}\n\nSweet dreams."));
    assert_eq!(v2_report.metrics.word_count, 21);

    let calls = provider.calls();
    assert_eq!(calls.len(), 8);
    let feedback_call = &calls[6];
    assert!(feedback_call.prompt.contains("Reader feedback:\nPlease add a friendly owl.\n"));
    assert!(feedback_call.prompt.contains("Give Pip a kind line."));
    assert!(feedback_call.prompt.contains(CLEAN_STORY));
    assert_eq!(feedback_call.max_tokens, 1000);
    assert!(is_judge_prompt(&calls[7].prompt));
}

#[tokio::test]
async fn general_feedback_keeps_its_own_ending() {
    let mut replies = opening_replies("general", TAILLESS_STORY);
    replies.extend([judge_reply(5), REVISED_STORY.to_string()]);
    let (_, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();
    let v2 = pipeline
        .apply_feedback(&run.story, "More stars, please.", &run.report, &run.brief)
        .await
        .unwrap();

    assert_eq!(v2.text(), REVISED_STORY);
    assert_eq!(v2.revision(), 1);
}
