use colored::*;
use console::Term;
use dialoguer::{ theme::ColorfulTheme, Input };
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use presumption_validator::{ JudgeScore, ScoreTally, ValidationReport };

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping
pub fn print_text(text: &str) {
    let width = Term::stdout().size().1 as usize;
    for line in text.lines() {
        if line.starts_with('#') {
            println!("{}", line.bold());
        } else if line.starts_with('-') || line.starts_with('=') {
            // Rules and list items keep their layout
            println!("{}", line);
        } else if line.is_empty() {
            println!();
        } else {
            for wrapped_line in wrap(line, width.saturating_sub(10).max(20)) {
                println!("{}", wrapped_line);
            }
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Create a new progress bar
pub fn create_progress_bar(length: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(length);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    );
    pb.set_message(message.to_string());
    pb
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Ask the user for a prompt to check
pub fn get_prompt() -> std::io::Result<String> {
    Input::with_theme(&get_theme())
        .with_prompt("Prompt to fact-check")
        .interact_text()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Print a validation report with the search mode highlighted
pub fn print_report(report: &ValidationReport) {
    print_header("Presumption Validation Report");
    if report.used_web_search() {
        print_info("Fact-checks grounded in real-time web search");
    } else {
        print_warning("No web search available; fact-checks rely on model knowledge only");
    }
    print_text(&report.render());
}

/// Print a judge score with color
pub fn print_judge_score(index: usize, raw: Option<&str>) {
    let label = format!("Item {}", index);
    let Some(raw) = raw else {
        println!("{}: {}", label.bold(), "skipped".dimmed());
        return;
    };

    let score = JudgeScore::parse(raw);
    let status = match score {
        JudgeScore::PositiveOne => "✓ 1".green().bold(),
        JudgeScore::Zero => "~ 0".yellow().bold(),
        JudgeScore::NegativeOne => "✗ -1".red().bold(),
        JudgeScore::Unparseable => format!("⚠ unparseable: {}", raw.trim()).red().bold(),
    };
    println!("{}: {}", label.bold(), status);
}

/// Summarize the distribution of judge scores
pub fn print_tally(tally: &ScoreTally) {
    print_result("Score  1", &tally.positive_one.to_string());
    print_result("Score  0", &tally.zero.to_string());
    print_result("Score -1", &tally.negative_one.to_string());
    if tally.unparseable > 0 {
        print_warning(&format!("{} judge answer(s) could not be parsed", tally.unparseable));
    }
    if tally.missing > 0 {
        print_warning(&format!("{} item(s) were skipped", tally.missing));
    }
    match tally.mean() {
        Some(mean) => print_result("Mean score", &format!("{:.2}", mean)),
        None => print_warning("No parseable scores"),
    }
}
