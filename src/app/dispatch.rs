use crate::cli::commands::Cli;
use anyhow::Result;
use console::Term;
use dialoguer::Input;
use lullaby::providers::create_provider;
use lullaby::story::FinalStory;
use lullaby::ui::{render_metrics, render_scores, style, wrap_text};
use lullaby::{Config, DEFAULT_REQUEST, StoryPipeline};
use std::future::Future;
use std::io::{BufRead, IsTerminal};

const RULE_WIDTH: usize = 70;

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    override_model(&mut config, cli.model)?;
    let provider = create_provider(&config);
    let pipeline = StoryPipeline::new(provider.clone(), &config)?;

    // Warm the connection while the reader is typing.
    tokio::spawn(async move {
        if let Err(e) = provider.warmup().await {
            tracing::debug!("Warmup failed (non-fatal): {e:#}");
        }
    });

    println!(
        "{}",
        style::header("Welcome to Lullaby: gentle stories for ages 5-10")
    );
    let request = match cli.request {
        Some(request) => request,
        None => ask("What kind of story do you want to hear?")?.unwrap_or_default(),
    };
    let request = if request.trim().is_empty() {
        DEFAULT_REQUEST.to_string()
    } else {
        request
    };

    let run = cancellable(pipeline.run(&request)).await?;
    tracing::debug!(run_id = %run.run_id, trace = ?run.trace, "Story ready");
    print_story("FINAL STORY (v1)", &run.story, config.story.wrap_width);

    let report = cancellable(pipeline.rejudge(&run.story, &run.brief)).await?;
    println!("\n{}", render_scores(&report));
    println!("{}", render_metrics(&report.metrics));

    if cli.no_feedback {
        return Ok(());
    }

    println!(
        "{}",
        style::dim(
            "Would you like any changes? (e.g., 'make it shorter', 'add a friendly owl', 'more rhyme')"
        )
    );
    let Some(feedback) = ask("Your feedback (or press Enter to skip)")?.filter(|f| !f.is_empty())
    else {
        return Ok(());
    };

    let story = cancellable(pipeline.apply_feedback(&run.story, &feedback, &report, &run.brief)).await?;
    print_story(
        "FINAL STORY (v2, after feedback)",
        &story,
        config.story.wrap_width,
    );
    let report = cancellable(pipeline.rejudge(&story, &run.brief)).await?;
    println!("\n{}", render_scores(&report));
    Ok(())
}

/// `--model` wins over the file and env, and is held to the same rules.
fn override_model(config: &mut Config, model: Option<String>) -> Result<()> {
    if let Some(model) = model {
        config.model = model.trim().to_string();
        config.validate()?;
    }
    Ok(())
}

/// Prompt on a terminal, otherwise take the next line of piped input.
/// `None` once piped input is exhausted.
fn ask(prompt: &str) -> Result<Option<String>> {
    if std::io::stdin().is_terminal() && Term::stderr().is_term() {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        return Ok(Some(answer.trim().to_string()));
    }
    tracing::debug!(prompt, "stdin is not a terminal, reading one line");
    read_answer(&mut std::io::stdin().lock())
}

fn read_answer(reader: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_story(title: &str, story: &FinalStory, width: usize) {
    let rule = style::dim("-".repeat(RULE_WIDTH));
    println!("\n{rule}\n");
    println!("{}\n", style::header(title));
    println!("{}", wrap_text(story.text(), width));
    println!("\n{rule}");
}

/// Race a pipeline call against Ctrl-C. Dropping the call cancels its HTTP request.
async fn cancellable<T>(call: impl Future<Output = lullaby::Result<T>>) -> Result<T> {
    tokio::select! {
        result = call => Ok(result?),
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted"),
    }
}
