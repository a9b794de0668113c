//! surgedup CLI
//!
//! Finds rule values listed in more than one Surge `.list` file and removes
//! them from every file but the preferred one.

mod prompt;
mod report;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use sd_cleaner::{load_plan, save_plan, scan_dir, Cleaner, Config, DEFAULT_CONFIG_FILE};
use sd_core::{CleanupPlan, DuplicateReport, Suggestion};

#[derive(Parser)]
#[command(name = "surgedup")]
#[command(about = "Duplicate finder and cleaner for Surge rule lists")]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding the .list files (overrides config)
    #[arg(short, long, global = true)]
    rules_dir: Option<PathBuf>,

    /// Directory for backups (overrides config)
    #[arg(short, long, global = true)]
    backup_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report values found in more than one rule file
    Scan {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive a cleanup plan from the current duplicates
    Plan {
        /// Write the plan to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a cleanup plan
    Clean {
        /// Plan file (JSON)
        #[arg(short, long)]
        plan: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Only count what would be removed
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove specific values from one rule file
    Remove {
        /// Rule file name inside the rules directory
        #[arg(short, long)]
        file: String,

        /// Values to remove
        #[arg(short, long, required = true)]
        value: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Only count what would be removed
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Scan { json } => cmd_scan(&config, json),
        Commands::Plan { output } => cmd_plan(&config, output.as_deref()),
        Commands::Clean { plan, yes, dry_run } => cmd_clean(&config, &plan, yes, dry_run),
        Commands::Remove {
            file,
            value,
            yes,
            dry_run,
        } => cmd_remove(&config, file, value, yes, dry_run),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config = Config::load_or_default(&cli.config).map_err(|e| e.to_string())?;
    if let Some(dir) = &cli.rules_dir {
        config.rules_dir = dir.clone();
    }
    if let Some(dir) = &cli.backup_dir {
        config.backup_dir = dir.clone();
    }
    log::debug!(
        "rules dir {}, backup dir {}",
        config.rules_dir.display(),
        config.backup_dir.display()
    );
    Ok(config)
}

fn analyze(config: &Config) -> Result<(DuplicateReport, Vec<Suggestion>), String> {
    let report = scan_dir(&config.rules_dir).map_err(|e| e.to_string())?;
    let suggestions = config.priority.suggest(&report);
    Ok((report, suggestions))
}

fn cmd_scan(config: &Config, json: bool) -> Result<(), String> {
    let (report, suggestions) = analyze(config)?;
    let output = report::scan_output(&report, &suggestions);

    if json {
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", text);
    } else {
        print!("{}", report::render_scan(&output));
    }

    Ok(())
}

fn cmd_plan(config: &Config, output: Option<&Path>) -> Result<(), String> {
    let (_, suggestions) = analyze(config)?;
    let plan = CleanupPlan::from_suggestions(&suggestions);

    match output {
        Some(path) => {
            save_plan(path, &plan).map_err(|e| e.to_string())?;
            println!(
                "Wrote plan for {} files ({} removals) to '{}'",
                plan.removals.len(),
                plan.removal_count(),
                path.display()
            );
        }
        None => {
            let text = serde_json::to_string_pretty(&plan)
                .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
            println!("{}", text);
        }
    }

    Ok(())
}

fn cmd_clean(config: &Config, plan_path: &Path, yes: bool, dry_run: bool) -> Result<(), String> {
    let plan = load_plan(plan_path).map_err(|e| e.to_string())?;
    if plan.is_empty() {
        println!("Plan '{}' has nothing to remove", plan_path.display());
        return Ok(());
    }

    println!("Plan '{}':", plan_path.display());
    for file in plan.files() {
        let count = plan.values_for(file).map_or(0, BTreeSet::len);
        println!("  {}: remove {} values", file, count);
    }

    if !dry_run && !yes {
        println!("Files will be backed up to '{}' before they are modified.", config.backup_dir.display());
        if !prompt::confirm("Continue?")? {
            println!("Cancelled");
            return Ok(());
        }
    }

    run_plan(config, &plan, dry_run)
}

fn cmd_remove(config: &Config, file: String, values: Vec<String>, yes: bool, dry_run: bool) -> Result<(), String> {
    let mut plan = CleanupPlan::new();
    for value in values {
        plan.add(file.clone(), value);
    }

    if !dry_run && !yes {
        let question = format!("Remove {} values from {}?", plan.removal_count(), file);
        if !prompt::confirm(&question)? {
            println!("Cancelled");
            return Ok(());
        }
    }

    run_plan(config, &plan, dry_run)
}

/// Prints what was done even when a file fails, so changed files and their
/// backups are always reported.
fn run_plan(config: &Config, plan: &CleanupPlan, dry_run: bool) -> Result<(), String> {
    let outcome = cleaner(config, dry_run)
        .apply_plan(&config.rules_dir, plan)
        .map_err(|e| e.to_string())?;
    println!("{}", report::render_plan_outcome(&outcome));

    match outcome.failure {
        Some(failure) => Err(failure.error.to_string()),
        None => Ok(()),
    }
}

fn cleaner(config: &Config, dry_run: bool) -> Cleaner {
    Cleaner::new(&config.backup_dir)
        .with_backup_label(config.backup_label.clone())
        .dry_run(dry_run)
}
