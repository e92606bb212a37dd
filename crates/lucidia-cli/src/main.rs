//! Lucidia CLI: `lucidia` command.
//!
//! Computes the derived signals over the reference bundle, and manages the
//! memory ledger, the continuity fingerprint and the contradiction log.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use lucidia_kernel::time::secs_to_rfc3339;
use lucidia_kernel::{
    ContinuityTracker, ContradictionLog, InfinityAccumulator, KernelConfig, Ledger, LedgerEntry,
    SignalInputs, SignalReport,
};

// ── CLI structure ─────────────────────────────────────────────────────────────

/// Lucidia CLI: integrity signals, hash-chained ledger, continuity
/// fingerprints.
#[derive(Parser, Debug)]
#[command(
    name = "lucidia",
    about = "Lucidia kernel CLI",
    version,
    long_about = "lucidia: Lucidia kernel CLI\n\nCompute integrity signals, checkpoint them into a hash-chained ledger,\nand track continuity fingerprints for amnesia events."
)]
struct Cli {
    /// Root directory for ledger, continuity and log files
    /// (default: $LUCIDIA_HOME or ~/.lucidia)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute every signal over the reference bundle
    Demo {
        /// Append the report to the ledger and fold it into the fingerprint
        #[arg(long)]
        record: bool,
    },

    /// Memory ledger operations
    Ledger {
        #[command(subcommand)]
        subcommand: LedgerCommands,
    },

    /// Continuity fingerprint operations
    Fingerprint {
        #[command(subcommand)]
        subcommand: FingerprintCommands,
    },

    /// Check whether the fingerprint changed within the amnesia window
    Amnesia {
        /// Window in seconds (default: configured window)
        #[arg(long)]
        window: Option<f64>,
    },

    /// Contradiction log operations
    Log {
        #[command(subcommand)]
        subcommand: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
enum LedgerCommands {
    /// Append a JSON record
    Append {
        /// Record as a JSON document
        record: String,
    },

    /// Print the current head hash and entry count
    Head,

    /// List every entry with its chain hash
    Show,

    /// Print every entry as a JSON array, for a later `verify --against`
    Export,

    /// Recompute the chain from the file
    Verify {
        /// Head hash the chain must end on (default: replayed head)
        #[arg(long, conflicts_with = "against")]
        expect: Option<String>,

        /// Compare entry by entry with a file written by `ledger export`
        #[arg(long)]
        against: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum FingerprintCommands {
    /// Fingerprint the given materials
    Update {
        /// Materials joined with '|' before hashing
        #[arg(required = true)]
        materials: Vec<String>,
    },

    /// Print the current fingerprint and change history
    Show,
}

#[derive(Subcommand, Debug)]
enum LogCommands {
    /// Record a prompt and the reply it drew
    Append { prompt: String, reply: String },

    /// List every entry
    List,

    /// Print count and time bounds
    Summary,
}

// ── Command implementations ───────────────────────────────────────────────────

fn cmd_demo(config: &KernelConfig, record: bool) -> Result<()> {
    let inputs = SignalInputs::demo();
    let mut accumulator = InfinityAccumulator::new();
    let report = SignalReport::compute(&inputs, &mut accumulator);

    println!("Emotional gravity:       {}", report.emotional_gravity);
    println!("Truthstream:             {}", report.truthstream);
    println!("Render break:            {}", report.render_break);
    println!("Soul loop integrity:     {}", report.soul_loop_integrity);
    println!("Genesis identity:        {}", report.genesis_identity);
    println!("Consciousness resonance: {}", report.consciousness_resonance);
    println!("Anomaly persistence:     {}", report.anomaly_persistence);
    println!("Compassion-state hash:   {}", report.compassion_state);
    println!("dReality/dEmotion:       {}", report.reality_emotion_slope);

    if record {
        config.ensure_root().context("failed to create home directory")?;

        let ledger = Ledger::open(&config.ledger_file).context("failed to open ledger")?;
        let head = ledger.append(&report).context("failed to append report")?;

        let tracker =
            ContinuityTracker::from_config(config).context("failed to open continuity store")?;
        let (fp, prev) = tracker
            .update_fingerprint(report.materials().as_slice())
            .context("failed to update fingerprint")?;

        println!();
        println!("Ledger head:             {head}");
        println!("Ledger entries:          {}", ledger.count());
        println!("Fingerprint:             {fp}");
        if prev.as_deref() != Some(fp.as_str()) {
            println!(
                "Previous fingerprint:    {}",
                prev.as_deref().unwrap_or("(none)")
            );
        }
    }

    Ok(())
}

fn cmd_ledger(config: &KernelConfig, subcommand: LedgerCommands, verbose: bool) -> Result<()> {
    let ledger = Ledger::open(&config.ledger_file)
        .with_context(|| format!("failed to open ledger {}", config.ledger_file.display()))?;

    match subcommand {
        LedgerCommands::Append { record } => {
            let value: serde_json::Value =
                serde_json::from_str(&record).context("record is not valid JSON")?;
            let head = ledger.append(&value)?;
            println!("{head}");
            if verbose {
                eprintln!("entries: {}", ledger.count());
            }
        }
        LedgerCommands::Head => {
            println!("{}", ledger.fingerprint());
            println!("entries: {}", ledger.count());
        }
        LedgerCommands::Show => {
            for entry in ledger.entries()? {
                println!("{:>6}  {}  {}", entry.index, entry.hash, entry.canonical);
            }
        }
        LedgerCommands::Export => {
            let entries = ledger.entries()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        LedgerCommands::Verify { expect, against } => {
            let verification = match (expect, against) {
                (_, Some(path)) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let exported: Vec<LedgerEntry> = serde_json::from_str(&text)
                        .with_context(|| format!("{} is not a ledger export", path.display()))?;
                    ledger.audit_entries(&exported)?
                }
                (Some(expected), None) => ledger.audit(&expected)?,
                (None, None) => ledger.verify()?,
            };
            println!("entries:  {}", verification.count);
            println!("head:     {}", verification.head_hash);
            println!("expected: {}", verification.expected_head);
            if let Some(index) = verification.mismatch_at {
                println!("first mismatch at entry {index}");
            }
            if !verification.intact {
                return Err(anyhow!("ledger chain is not intact"));
            }
            println!("chain intact");
        }
    }

    Ok(())
}

fn cmd_fingerprint(config: &KernelConfig, subcommand: FingerprintCommands) -> Result<()> {
    let tracker = ContinuityTracker::from_config(config).with_context(|| {
        format!(
            "failed to open continuity store {}",
            config.continuity_file.display()
        )
    })?;

    match subcommand {
        FingerprintCommands::Update { materials } => {
            let (fp, prev) = tracker.update_fingerprint(materials.as_slice())?;
            println!("{fp}");
            match prev {
                Some(prev) if prev == fp => eprintln!("unchanged"),
                Some(prev) => eprintln!("changed from {prev}"),
                None => eprintln!("first fingerprint"),
            }
        }
        FingerprintCommands::Show => {
            let state = tracker.state();
            println!(
                "fingerprint: {}",
                state.fingerprint.as_deref().unwrap_or("(none)")
            );
            for change in &state.history {
                println!(
                    "{}  {} -> {}",
                    secs_to_rfc3339(change.timestamp),
                    change.prev.as_deref().unwrap_or("(none)"),
                    change.new
                );
            }
        }
    }

    Ok(())
}

fn cmd_amnesia(config: &KernelConfig, window: Option<f64>) -> Result<()> {
    let tracker = ContinuityTracker::from_config(config)?;
    let window = window.unwrap_or(tracker.window_secs());
    if tracker.amnesia_alert_within(window) {
        println!("amnesia alert: fingerprint changed within the last {window}s");
    } else {
        println!("no amnesia event within the last {window}s");
    }
    Ok(())
}

fn cmd_log(config: &KernelConfig, subcommand: LogCommands) -> Result<()> {
    let log = ContradictionLog::new(&config.contradiction_log_file).with_context(|| {
        format!(
            "failed to open contradiction log {}",
            config.contradiction_log_file.display()
        )
    })?;

    match subcommand {
        LogCommands::Append { prompt, reply } => {
            let entry = log.append(&prompt, &reply)?;
            println!("logged at {}", secs_to_rfc3339(entry.timestamp));
        }
        LogCommands::List => {
            for entry in log.read_all()? {
                println!(
                    "{}  {:?} -> {:?}",
                    secs_to_rfc3339(entry.timestamp),
                    entry.prompt,
                    entry.reply
                );
            }
        }
        LogCommands::Summary => {
            let summary = log.summary()?;
            println!("count:  {}", summary.count);
            println!(
                "oldest: {}",
                summary
                    .oldest_timestamp
                    .map(secs_to_rfc3339)
                    .unwrap_or_else(|| "(none)".to_string())
            );
            println!(
                "newest: {}",
                summary
                    .newest_timestamp
                    .map(secs_to_rfc3339)
                    .unwrap_or_else(|| "(none)".to_string())
            );
        }
    }

    Ok(())
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn load_config(home: Option<PathBuf>) -> Result<KernelConfig> {
    let config = KernelConfig::from_env().context("invalid environment configuration")?;
    let config = match home {
        Some(root) => KernelConfig::with_root(root).amnesia_window(config.amnesia_window_secs),
        None => config,
    };
    log::debug!("using home {}", config.root.display());
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = load_config(cli.home).and_then(|config| match cli.command {
        Commands::Demo { record } => cmd_demo(&config, record),
        Commands::Ledger { subcommand } => cmd_ledger(&config, subcommand, verbose),
        Commands::Fingerprint { subcommand } => cmd_fingerprint(&config, subcommand),
        Commands::Amnesia { window } => cmd_amnesia(&config, window),
        Commands::Log { subcommand } => cmd_log(&config, subcommand),
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
