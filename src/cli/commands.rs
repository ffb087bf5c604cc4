use clap::Parser;

/// `lullaby` - bedtime stories for ages 5-10, judged and repaired once.
#[derive(Parser, Debug)]
#[command(name = "lullaby")]
#[command(version)]
#[command(about = "Generate a gentle children's story, grade it, and fix it once.", long_about = None)]
pub struct Cli {
    /// Story request (prompted for when omitted)
    #[arg(short, long)]
    pub request: Option<String>,

    /// Model to use (overrides config and LULLABY_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Config file (default: ~/.lullaby/config.toml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Skip the feedback round after the first story
    #[arg(long)]
    pub no_feedback: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
