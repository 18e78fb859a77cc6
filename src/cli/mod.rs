use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "presumption-validator",
    about = "Fact-checks the presumptions embedded in medical questions",
    version,
    author,
    long_about = None
)]
pub struct ValidatorCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub output_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fact-check the presumptions in a single prompt
    Check {
        /// Prompt text to check
        #[arg(short, long, conflicts_with = "prompt_file")]
        prompt: Option<String>,

        /// File holding the prompt text
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// Also produce a summary of the inaccurate presumptions only
        #[arg(long, default_value = "false")]
        consolidate: bool,

        /// Directory to save the report (and summary) into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the pipeline over a dataset split and save one report pair per question
    Batch {
        /// Dataset directory
        #[arg(short, long)]
        dataset: PathBuf,

        /// Dataset split to read
        #[arg(long, default_value = "validation")]
        split: String,

        /// First dataset index to process
        #[arg(long, default_value = "0")]
        start: usize,

        /// Number of items to process
        #[arg(long, default_value = "20")]
        count: usize,

        /// Output directory for the result files
        #[arg(short, long)]
        output: PathBuf,

        /// Stop at the first failing item instead of skipping it
        #[arg(long, default_value = "false")]
        fail_fast: bool,
    },

    /// Score saved consolidated summaries against the dataset's reference corrections
    Evaluate {
        /// Dataset directory
        #[arg(short, long)]
        dataset: PathBuf,

        /// Dataset split to read
        #[arg(long, default_value = "validation")]
        split: String,

        /// Directory holding consolidated_results_<i>.txt files
        #[arg(short, long)]
        results: PathBuf,

        /// First dataset index to evaluate
        #[arg(long, default_value = "0")]
        start: usize,

        /// Number of items to evaluate
        #[arg(long, default_value = "20")]
        count: usize,

        /// Output directory for eval_save.json
        #[arg(short, long, default_value = "evaluation_result")]
        output: PathBuf,

        /// Model used as judge (defaults to the configured judge model)
        #[arg(long)]
        judge_model: Option<String>,

        /// Stop at the first failing item instead of recording null
        #[arg(long, default_value = "false")]
        fail_fast: bool,
    },
}
