use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use leadrank::config::Config;
use leadrank::contacted::{self, ContactedState};
use leadrank::leads::{self, LeadRecord};
use leadrank::outreach::{
    self, DeliveryStatus, Dispatcher, DryRunDispatcher, OutboxDispatcher,
};
use leadrank::{output, LeadQualifier};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_OUTPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum ContactedCommand {
    /// List contacted leads, most recent first
    List,
    /// Remove a lead from the ledger so it ranks again
    Forget {
        /// Ledger key (normalized phone, or "name:<business name>")
        key: String,
    },
    /// Drop entries older than the configured cooldown
    Prune,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score, rank and tier leads from a .json or .tsv file
    Rank {
        /// Leads file
        input: PathBuf,

        /// Write the ranked sheet to a .json or .tsv file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Terminal output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Override the configured number of leads to keep
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        top: Option<usize>,

        /// Leave out leads already contacted within the cooldown
        #[arg(long)]
        skip_contacted: bool,
    },
    /// Explain the score of each lead, in input order
    Score {
        /// Leads file
        input: PathBuf,

        /// Only explain the lead at this 1-based row
        #[arg(long)]
        index: Option<usize>,
    },
    /// Send templated messages to the top uncontacted leads
    Outreach {
        /// Leads file
        input: PathBuf,

        /// Outbox file (defaults to ~/.config/leadrank/outbox.jsonl)
        #[arg(long)]
        outbox: Option<PathBuf>,

        /// Print messages instead of queueing them; the ledger is not updated
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of messages
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Inspect or edit the contacted ledger
    Contacted {
        #[command(subcommand)]
        action: ContactedCommand,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "leadrank")]
#[command(about = "Lead qualification and outreach prioritization CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/leadrank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn exit_with(code: i32, message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn load_leads_or_exit(input: &Path) -> Vec<LeadRecord> {
    match leads::load_leads(input) {
        Ok(records) => records,
        Err(e) => exit_with(EXIT_INPUT, format!("Input error: {:#}", e)),
    }
}

fn contacted_path(config: &Config) -> PathBuf {
    match config.contacted_file {
        Some(ref path) => PathBuf::from(path),
        None => match contacted::get_contacted_path() {
            Ok(path) => path,
            Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
        },
    }
}

fn load_ledger_or_exit(path: &Path) -> ContactedState {
    match contacted::load_contacted_state(path) {
        Ok(state) => state,
        Err(e) => exit_with(EXIT_INPUT, format!("Ledger error: {:#}", e)),
    }
}

fn main() {
    let cli = Cli::parse();
    leadrank::logging::init_tracing(cli.verbose);
    let start_time = Instant::now();

    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading so it works without an existing config
    if let Commands::Init { force } = cli.command {
        let path = match config_path {
            Some(path) => path,
            None => match leadrank::config::get_config_path() {
                Ok(path) => path,
                Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
            },
        };
        if let Err(e) = leadrank::config::write_default_config(&path, force) {
            exit_with(EXIT_CONFIG, format!("Config error: {:#}", e));
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match leadrank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    // Validate config at startup
    if let Err(errors) = leadrank::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let cooldown = match config.cooldown() {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    let qualifier = LeadQualifier::new(&config.qualifier);
    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Rank {
            input,
            output: output_path,
            format,
            top,
            skip_contacted,
        } => {
            let mut records = load_leads_or_exit(&input);
            tracing::info!(count = records.len(), "loaded leads");

            if skip_contacted {
                let ledger = load_ledger_or_exit(&contacted_path(&config));
                let before = records.len();
                records = contacted::filter_uncontacted(
                    records,
                    &ledger,
                    &config.outreach.phone,
                    cooldown,
                );
                tracing::info!(skipped = before - records.len(), "filtered contacted leads");
            }

            let qualifier = match top {
                Some(n) => qualifier.with_top_n(n),
                None => qualifier,
            };
            let ranked = qualifier.rank(&records);

            if let Some(ref path) = output_path {
                if let Err(e) = leads::write_ranked(path, &ranked) {
                    exit_with(EXIT_OUTPUT, format!("Output error: {:#}", e));
                }
                eprintln!("Wrote {} ranked leads to {}", ranked.len(), path.display());
            }

            match format {
                Format::Table => {
                    if cli.verbose && !ranked.is_empty() {
                        for (idx, lead) in ranked.iter().enumerate() {
                            println!("{}", output::format_lead_detail(idx + 1, lead, use_colors));
                            println!();
                        }
                    } else {
                        println!("{}", output::format_ranked_table(&ranked, use_colors));
                    }
                }
                Format::Tsv => {
                    let tsv = output::format_tsv(&ranked);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                Format::Json => match serde_json::to_string_pretty(&leads::to_rows(&ranked)) {
                    Ok(json) => println!("{}", json),
                    Err(e) => exit_with(EXIT_OUTPUT, format!("Output error: {}", e)),
                },
            }

            tracing::info!(
                ranked = ranked.len(),
                elapsed = ?start_time.elapsed(),
                "done"
            );
        }
        Commands::Score { input, index } => {
            let records = load_leads_or_exit(&input);

            let selected: Vec<(usize, &LeadRecord)> = match index {
                Some(i) => {
                    if i < 1 || i > records.len() {
                        exit_with(
                            EXIT_INPUT,
                            format!(
                                "Invalid index {}. Must be between 1 and {}.",
                                i,
                                records.len()
                            ),
                        );
                    }
                    vec![(i, &records[i - 1])]
                }
                None => records.iter().enumerate().map(|(i, r)| (i + 1, r)).collect(),
            };

            if selected.is_empty() {
                println!("No leads found.");
            }
            for (row, record) in selected {
                let lead = qualifier.qualify(record);
                println!("{}", output::format_lead_detail(row, &lead, use_colors));
                println!();
            }
        }
        Commands::Outreach {
            input,
            outbox,
            dry_run,
            limit,
        } => {
            let records = load_leads_or_exit(&input);
            let ledger_path = contacted_path(&config);
            let mut ledger = load_ledger_or_exit(&ledger_path);

            let records =
                contacted::filter_uncontacted(records, &ledger, &config.outreach.phone, cooldown);
            let ranked = qualifier.rank(&records);

            let mut plan = outreach::plan_outreach(&ranked, &config.outreach);
            if let Some(limit) = limit {
                plan.messages.truncate(limit);
            }
            for (lead, reason) in &plan.skipped {
                tracing::info!(lead = lead.record().display_name(), reason, "skipped");
            }

            let mut dispatcher: Box<dyn Dispatcher> = if dry_run {
                Box::new(DryRunDispatcher)
            } else {
                let path = match outbox {
                    Some(path) => path,
                    None => match leadrank::config::get_config_dir() {
                        Ok(dir) => dir.join("outbox.jsonl"),
                        Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
                    },
                };
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        if let Err(e) = std::fs::create_dir_all(parent) {
                            exit_with(
                                EXIT_OUTPUT,
                                format!("Failed to create {}: {}", parent.display(), e),
                            );
                        }
                    }
                }
                match OutboxDispatcher::open(&path) {
                    Ok(d) => Box::new(d),
                    Err(e) => exit_with(EXIT_OUTPUT, format!("Output error: {:#}", e)),
                }
            };

            let results = outreach::dispatch_all(&plan.messages, dispatcher.as_mut());

            let mut delivered = 0;
            for (message, result) in plan.messages.iter().zip(&results) {
                if dry_run {
                    println!("To {}:\n  {}\n", message.recipient, message.text);
                }
                if result.status == DeliveryStatus::Failed {
                    eprintln!(
                        "Failed to send to {}: {}",
                        result.recipient,
                        result.detail.as_deref().unwrap_or("unknown error")
                    );
                    continue;
                }
                delivered += 1;
                if !dry_run {
                    // Keyed by recipient so ranking and ledger agree on the phone form
                    ledger.mark(
                        message.recipient.clone(),
                        dispatcher.backend(),
                        &message.lead.record().business_name,
                    );
                }
            }

            if !dry_run {
                if let Err(e) = contacted::save_contacted_state(&ledger_path, &ledger) {
                    exit_with(EXIT_OUTPUT, format!("Ledger error: {:#}", e));
                }
            }

            eprintln!(
                "{} {} message(s) via {}, {} lead(s) skipped",
                if dry_run { "Previewed" } else { "Queued" },
                delivered,
                dispatcher.backend(),
                plan.skipped.len()
            );
        }
        Commands::Contacted { action } => {
            let ledger_path = contacted_path(&config);
            let mut ledger = load_ledger_or_exit(&ledger_path);

            match action {
                ContactedCommand::List => {
                    let entries = ledger.entries();
                    if entries.is_empty() {
                        println!("No contacted leads.");
                    }
                    for (key, entry) in entries {
                        println!(
                            "{}\t{}\t{}\t{}",
                            key,
                            entry.business_name,
                            entry.channel,
                            entry.format_age()
                        );
                    }
                }
                ContactedCommand::Forget { key } => {
                    if !ledger.forget(&key) {
                        exit_with(EXIT_INPUT, format!("No contacted entry for '{}'", key));
                    }
                    if let Err(e) = contacted::save_contacted_state(&ledger_path, &ledger) {
                        exit_with(EXIT_OUTPUT, format!("Ledger error: {:#}", e));
                    }
                    println!("Forgot {}", key);
                }
                ContactedCommand::Prune => {
                    let removed = ledger.prune(cooldown);
                    if let Err(e) = contacted::save_contacted_state(&ledger_path, &ledger) {
                        exit_with(EXIT_OUTPUT, format!("Ledger error: {:#}", e));
                    }
                    println!("Pruned {} entr{}", removed, if removed == 1 { "y" } else { "ies" });
                }
            }
        }
        Commands::Init { .. } => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}
