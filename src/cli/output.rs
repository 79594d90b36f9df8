use colored::*;

use crate::cleaner::DeletionOutcome;
use crate::common::format::{self, format_path, format_size, format_size_colored};
use crate::registry::{self, Application};
use crate::scanner::ScanResults;

/// Print scan results in human-readable format
pub fn print_scan_results(results: &ScanResults) {
    println!();
    println!("{}  csiclean Scan Results", "🧹");
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {}  •  {} model files  •  scanned in {}",
        results.root.display().to_string().cyan(),
        results.primary_files.len(),
        format::format_duration(results.duration_secs).cyan()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if results.is_empty() {
        println!("  {} Nothing left over, the folder is already clean!", "✨");
        println!();
        return;
    }

    for candidate in &results.candidates {
        println!(
            "    {} {:<50} {:>10}",
            "•".dimmed(),
            format::truncate_start(&format_path(&candidate.path, &results.root), 50),
            format_size(candidate.size_bytes).dimmed()
        );
    }
    println!();

    print_scan_summary(results);
}

/// The "N files (total size X) found" line
pub fn print_scan_summary(results: &ScanResults) {
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} {} (total size: {}) found",
        "💾",
        format::format_count(results.candidates.len()).bold(),
        format_size_colored(results.total_bytes)
    );
    println!();
}

/// Print scan results as JSON
pub fn print_scan_json(results: &ScanResults) {
    match serde_json::to_string_pretty(results) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize results: {}", e),
    }
}

/// Print scan results in quiet mode: one path per line, then the totals
pub fn print_scan_quiet(results: &ScanResults) {
    for candidate in &results.candidates {
        println!("{}", candidate.path.display());
    }
    println!("{}  {}", results.candidates.len(), results.total_bytes);
}

/// Print the outcome of a deletion run
pub fn print_deletion_outcome(outcome: &DeletionOutcome) {
    println!();
    let status = if outcome.is_complete() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} {} of {} ({}) have been deleted",
        status,
        outcome.deleted,
        format::format_count(outcome.attempted),
        format_size_colored(outcome.bytes_freed)
    );

    if !outcome.failures.is_empty() {
        println!(
            "  {} {}",
            "⚠".yellow(),
            format!("{} could not be deleted:", format::format_count(outcome.failed)).yellow()
        );
        for failure in &outcome.failures {
            println!(
                "    {} {} {}",
                "→".dimmed(),
                failure.path.display(),
                format!("({})", failure.error).dimmed()
            );
        }
    }
    println!();
}

/// Print a deletion outcome as JSON
pub fn print_deletion_json(outcome: &DeletionOutcome) {
    match serde_json::to_string_pretty(outcome) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize outcome: {}", e),
    }
}

/// Print the supported applications
pub fn print_apps() {
    println!();
    for app in Application::ALL {
        let profile = app.profile();
        println!(
            "  {} {}  {}",
            "●".cyan(),
            profile.name.bold(),
            format!("model files: *{}", profile.primary_extension).dimmed()
        );
        println!("      {}", registry::junk_union(&[profile]).join(" "));
        println!();
    }
}
