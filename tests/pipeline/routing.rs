use crate::fixtures::{
    CLEAN_STORY, REQUEST, REVISED_STORY, TAILLESS_STORY, classify_reply, extract_reply,
    is_judge_prompt, judge_reply, opening_replies, pipeline, plan_reply,
};
use lullaby::story::{Criterion, Stage, Verdict, route};

const PASS_TRACE: [Stage; 6] = [
    Stage::Classify,
    Stage::Extract,
    Stage::Plan,
    Stage::Generate,
    Stage::Judge,
    Stage::Finalize,
];

const REVISE_TRACE: [Stage; 7] = [
    Stage::Classify,
    Stage::Extract,
    Stage::Plan,
    Stage::Generate,
    Stage::Judge,
    Stage::Revise,
    Stage::Finalize,
];

fn with_replies(mut replies: Vec<String>, more: &[String]) -> Vec<String> {
    replies.extend_from_slice(more);
    replies
}

#[tokio::test]
async fn passing_draft_goes_straight_to_finalize() {
    let replies = with_replies(opening_replies("bedtime", CLEAN_STORY), &[judge_reply(5)]);
    let (provider, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();

    assert_eq!(run.trace, PASS_TRACE);
    assert_eq!(run.report.verdict, Verdict::Pass);
    assert_eq!(run.story.text(), CLEAN_STORY);
    assert_eq!(run.story.revision(), 0);
    assert_eq!(provider.call_count(), 5);
    assert_eq!(provider.remaining(), 0);
}

#[tokio::test]
async fn failing_draft_is_revised_exactly_once() {
    let replies = with_replies(
        opening_replies("bedtime", CLEAN_STORY),
        &[judge_reply(3), REVISED_STORY.to_string()],
    );
    let (provider, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();

    assert_eq!(run.trace, REVISE_TRACE);
    assert_eq!(run.report.verdict, Verdict::Revise);
    assert_eq!(run.story.revision(), 1);
    assert_eq!(
        run.story.text(),
        format!("{REVISED_STORY}\n\nSweet dreams.")
    );

    let calls = provider.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls.iter().filter(|c| is_judge_prompt(&c.prompt)).count(), 1);
    let revise_prompt = &calls[5].prompt;
    assert!(revise_prompt.contains("Give Pip a kind line."));
    assert!(revise_prompt.contains("gentle imagery"));
    assert!(revise_prompt.contains(CLEAN_STORY));
}

#[tokio::test]
async fn over_limit_draft_gets_a_single_trim_fix() {
    let long_story = format!("{}Sweet dreams.", "Lumi the firefly sat with her friend. ".repeat(80));
    let replies = vec![
        classify_reply("bedtime", &[]),
        extract_reply(),
        plan_reply("500"),
        long_story,
        judge_reply(5),
        REVISED_STORY.to_string(),
    ];
    let (provider, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();

    assert!(run.report.metrics.over_word_limit);
    assert!(run.report.scores.get(Criterion::InstructionAdherence) <= 3);
    assert_eq!(run.report.verdict, Verdict::Revise);
    let trims = run
        .report
        .required_fixes
        .iter()
        .filter(|fix| fix.starts_with("Trim to the"))
        .count();
    assert_eq!(trims, 1);
    assert!(provider.calls()[5].prompt.contains("Trim to the 500-word limit."));
}

#[tokio::test]
async fn bedtime_draft_without_goodnight_is_sent_back() {
    let replies = with_replies(
        opening_replies("bedtime", TAILLESS_STORY),
        &[judge_reply(5), REVISED_STORY.to_string()],
    );
    let (_, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();

    assert!(!run.report.metrics.bedtime_tail_ok);
    assert!(run.report.scores.get(Criterion::BedtimeTone) <= 3);
    assert!(
        run.report
            .required_fixes
            .iter()
            .any(|fix| fix == "End with a cozy goodnight image or line.")
    );
    assert_eq!(run.trace, REVISE_TRACE);
}

#[tokio::test]
async fn general_story_keeps_its_own_ending() {
    let replies = with_replies(opening_replies("general", TAILLESS_STORY), &[judge_reply(5)]);
    let (_, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();

    assert_eq!(run.trace, PASS_TRACE);
    assert_eq!(run.story.text(), TAILLESS_STORY);
}

#[tokio::test]
async fn routing_agrees_with_verdict_for_every_score() {
    for score in 0..=5u8 {
        let mut replies = with_replies(opening_replies("bedtime", CLEAN_STORY), &[judge_reply(score)]);
        replies.push(REVISED_STORY.to_string());
        let (_, pipeline) = pipeline(replies);

        let run = pipeline.run(REQUEST).await.unwrap();

        let revised = run.trace.contains(&Stage::Revise);
        assert_eq!(revised, run.report.verdict == Verdict::Revise, "score {score}");
        assert_eq!(
            route(&run.report) == Stage::Revise,
            revised,
            "score {score}"
        );
        assert!(run.trace.len() <= 7);
        assert_eq!(run.trace.iter().filter(|s| **s == Stage::Judge).count(), 1);
    }
}

#[tokio::test]
async fn each_call_uses_its_own_sampling() {
    let replies = with_replies(opening_replies("bedtime", CLEAN_STORY), &[judge_reply(5)]);
    let (provider, pipeline) = pipeline(replies);

    pipeline.run(REQUEST).await.unwrap();

    let calls = provider.calls();
    let temperatures: Vec<f64> = calls.iter().map(|c| c.temperature).collect();
    let max_tokens: Vec<u32> = calls.iter().map(|c| c.max_tokens).collect();
    assert_eq!(temperatures, vec![0.2, 0.1, 0.4, 0.8, 0.0]);
    assert_eq!(max_tokens, vec![300, 300, 700, 1000, 900]);
    assert!(calls.iter().all(|c| c.model == "gpt-3.5-turbo"));
}

#[tokio::test]
async fn red_flags_soften_the_plan() {
    let replies = vec![
        classify_reply("bedtime", &["monsters"]),
        extract_reply(),
        plan_reply("450-600"),
        CLEAN_STORY.to_string(),
        judge_reply(5),
    ];
    let (provider, pipeline) = pipeline(replies);

    let run = pipeline.run(REQUEST).await.unwrap();

    let plan_prompt = &provider.calls()[2].prompt;
    assert!(plan_prompt.contains("Tone: very-soothing."));
    assert!(plan_prompt.contains("soften any intense content"));
    assert_eq!(run.brief.plan.word_limit.get(), 450);
    assert!(run.brief.classification.red_flags.contains("monsters"));
}
