use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use csiclean::cli::args::{Cli, Commands, CompletionShell, ConfigAction, ScanArgs};
use csiclean::cli::output;
use csiclean::common::config::{Config, OutputFormat};
use csiclean::common::format;
use csiclean::registry::{self, Application};
use csiclean::{Engine, ScanRequest, ScanResults};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Commands::Scan { ref target } => {
            let config = Config::load_from(&config_path)?;
            cmd_scan(&cli, &config, target)
        }

        Commands::Clean {
            ref target,
            yes,
            dry_run,
        } => {
            let config = Config::load_from(&config_path)?;
            cmd_clean(&cli, &config, target, yes, dry_run)
        }

        Commands::Apps => {
            let config = Config::load_from(&config_path)?;
            cmd_apps(output_format(&cli, &config))
        }

        Commands::Config { ref action } => cmd_config(action, &config_path),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                CompletionShell::Bash => clap_complete::Shell::Bash,
                CompletionShell::Zsh => clap_complete::Shell::Zsh,
                CompletionShell::Fish => clap_complete::Shell::Fish,
                CompletionShell::Powershell => clap_complete::Shell::PowerShell,
            };
            clap_complete::generate(shell, &mut cmd, "csiclean", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Logs go to stderr so JSON on stdout stays parseable.
/// `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "csiclean=debug" } else { "csiclean=error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn output_format(cli: &Cli, config: &Config) -> OutputFormat {
    cli.format.map(OutputFormat::from).unwrap_or(config.output_format)
}

fn build_request(config: &Config, target: &ScanArgs) -> ScanRequest {
    let apps: Vec<Application> = if target.apps.is_empty() {
        config.default_apps.clone()
    } else {
        target.apps.clone()
    };
    ScanRequest::new(&target.path, apps).recursive(config.recursive && !target.no_recursive)
}

fn run_scan(engine: &Engine, request: &ScanRequest, show_progress: bool) -> Result<ScanResults> {
    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.set_message(format!("Scanning {}...", request.root.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let results = engine.scan(request);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(results?)
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

fn cmd_scan(cli: &Cli, config: &Config, target: &ScanArgs) -> Result<()> {
    let fmt = output_format(cli, config);
    let show_progress = !cli.quiet && fmt == OutputFormat::Human;

    let engine = Engine::new();
    let results = run_scan(&engine, &build_request(config, target), show_progress)?;

    match fmt {
        OutputFormat::Human if cli.quiet => output::print_scan_summary(&results),
        OutputFormat::Human => output::print_scan_results(&results),
        OutputFormat::Json => output::print_scan_json(&results),
        OutputFormat::Quiet => output::print_scan_quiet(&results),
    }

    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(
    cli: &Cli,
    config: &Config,
    target: &ScanArgs,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    let fmt = output_format(cli, config);
    let human = fmt == OutputFormat::Human;
    let show_progress = !cli.quiet && human;

    let engine = Engine::new();
    let results = run_scan(&engine, &build_request(config, target), show_progress)?;

    if human && !cli.quiet {
        output::print_scan_results(&results);
    }

    // Nothing to delete while the total size is zero, even with candidates
    if results.total_bytes == 0 {
        match fmt {
            OutputFormat::Human => println!("  {} Nothing to clean!", "✨"),
            OutputFormat::Json => output::print_deletion_json(&Default::default()),
            OutputFormat::Quiet => println!("0  0  0"),
        }
        return Ok(());
    }

    if dry_run {
        match fmt {
            OutputFormat::Human => println!(
                "  {} Dry run — would delete {} ({}). No files modified.",
                "ℹ️",
                format::format_count(results.candidates.len()),
                format::format_size(results.total_bytes)
            ),
            OutputFormat::Json => output::print_scan_json(&results),
            OutputFormat::Quiet => output::print_scan_quiet(&results),
        }
        return Ok(());
    }

    if !yes && !confirm(&results)? {
        eprintln!("  {} Cancelled", "✗".red());
        return Ok(());
    }

    let pb = if show_progress {
        let pb = ProgressBar::new(results.candidates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.red} [{bar:40.red/blue}] {pos}/{len} Deleting... {msg}")?
                .progress_chars("━━░"),
        );
        Some(pb)
    } else {
        None
    };

    let outcome = engine.delete_last_scan_with(|path| {
        if let Some(ref pb) = pb {
            pb.set_message(format::truncate_start(
                &format::format_path(path, &results.root),
                40,
            ));
        }
        let result = std::fs::remove_file(path);
        if let Some(ref pb) = pb {
            pb.inc(1);
        }
        result
    })?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match fmt {
        OutputFormat::Human => output::print_deletion_outcome(&outcome),
        OutputFormat::Json => output::print_deletion_json(&outcome),
        OutputFormat::Quiet => println!(
            "{}  {}  {}",
            outcome.deleted, outcome.failed, outcome.bytes_freed
        ),
    }

    if !outcome.is_complete() {
        anyhow::bail!(
            "{} could not be deleted",
            format::format_count(outcome.failed)
        );
    }

    Ok(())
}

/// Ask before deleting. The prompt goes to stderr so stdout stays clean.
fn confirm(results: &ScanResults) -> Result<bool> {
    use std::io::Write;

    eprint!(
        "\n  {} Delete {} ({})? There isn't any undo available! [y/N] ",
        "❓",
        format::format_count(results.candidates.len()),
        format::format_size(results.total_bytes)
    );
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .context("Failed to read confirmation")?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

// ─── Apps ─────────────────────────────────────────────────────────────────────

fn cmd_apps(fmt: OutputFormat) -> Result<()> {
    match fmt {
        OutputFormat::Human => output::print_apps(),
        OutputFormat::Json => {
            let json: Vec<_> = Application::ALL
                .iter()
                .map(|app| {
                    let profile = app.profile();
                    serde_json::json!({
                        "application": app,
                        "name": profile.name,
                        "primary_extension": profile.primary_extension,
                        "junk_extensions": registry::junk_union(&[profile]),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Quiet => {
            for app in Application::ALL {
                println!("{}  {}", app, app.profile().primary_extension);
            }
        }
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(path)?;
            format::print_header(&format!("Configuration ({})", path.display()));
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            if path.exists() {
                println!("  {} Config already exists: {}", "ℹ️", path.display());
            } else {
                Config::default().save_to(path)?;
                println!("  {} Wrote default config to {}", "✓".green(), path.display());
            }
        }
    }
    Ok(())
}
