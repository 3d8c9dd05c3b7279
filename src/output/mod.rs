use colored::Colorize;

use crate::prober::ProbeOutcome;

/// Fixed trailer written to stderr whenever a run concludes, on every
/// exit path.
pub const ATTRIBUTION: &str = "Made by corndog16";

/// The plain text of the line a given outcome produces, or None when the
/// outcome is suppressed. Coloring is applied at print time only, so this
/// is also the exact content the dispatch tests assert on.
pub fn format_outcome(outcome: &ProbeOutcome) -> Option<String> {
    match outcome {
        ProbeOutcome::Found { url } => Some(format!("Found: {}", url)),
        ProbeOutcome::Checked { url, status } => Some(format!("Checked: {} - {}", url, status)),
        ProbeOutcome::Filtered { .. } => None,
        ProbeOutcome::Failed { url, error } => {
            Some(format!("Failed to connect to {}: {}", url, error))
        }
    }
}

pub fn print_outcome(outcome: &ProbeOutcome) {
    match outcome {
        ProbeOutcome::Found { url } => {
            println!("{} {}", "Found:".bold().green(), url.bold().white());
        }
        ProbeOutcome::Checked { url, status } => {
            println!(
                "{} {} {} {}",
                "Checked:".bold().blue(),
                url.bold().white(),
                "-".bold().white(),
                status.to_string().bold().yellow()
            );
        }
        ProbeOutcome::Filtered { .. } => {}
        ProbeOutcome::Failed { url, error } => {
            println!(
                "{} {}{} {}",
                "Failed to connect to".bold().red(),
                url.bold().white(),
                ":".bold().white(),
                error
            );
        }
    }
}

pub fn print_task_fault(detail: &str) {
    println!("{} {}", "Error occurred:".bold().red(), detail);
}

pub fn print_interrupt_notice() {
    println!("\nReceived keyboard interrupt. Shutting down...");
}

pub fn print_attribution() {
    eprintln!("\n{}", ATTRIBUTION);
}
