use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

use commands::{export, report, seed, signal, StoreArgs};

#[derive(Parser)]
#[command(name = "signal-catalog", version, about = "Group signal catalog CLI")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the storage backend
    Init,
    /// Add a signal
    Add(signal::AddArgs),
    /// List signals
    List(signal::ListArgs),
    /// Close a signal
    Close {
        /// Signal id
        id: i64,
        /// Closing note to append
        #[arg(long)]
        note: Option<String>,
    },
    /// Reopen a closed signal
    Reopen {
        /// Signal id
        id: i64,
        /// Reopening note to append
        #[arg(long)]
        note: Option<String>,
    },
    /// Update fields on a signal
    Update(signal::UpdateArgs),
    /// Count rollups by status, category, severity and owner
    Summary,
    /// Export signals to CSV
    Export(export::ExportArgs),
    /// Markdown digest of overdue, due-soon and recent signals
    Digest(report::WindowedArgs),
    /// Rank open signals by urgency
    Triage(report::WindowedArgs),
    /// Per-owner workload table
    Workload(report::WindowedArgs),
    /// Open signals grouped by due-date week
    Calendar(report::WindowedArgs),
    /// Flag signals with hygiene problems
    Audit(report::StaleArgs),
    /// Catalog-wide counts and cycle times
    Metrics(report::MetricsArgs),
    /// Open signals nobody has touched lately
    Stale(report::StaleArgs),
    /// Signals created, updated and closed in the window
    Activity(report::WindowedArgs),
    /// Weekly created/closed trend
    Trend(report::TrendArgs),
    /// Load deterministic sample data
    Seed(seed::SeedArgs),
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("SIGNAL_CATALOG_LOG")
        .unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let store = cli.store;
    let result = match cli.command {
        Commands::Init => signal::run_init(&store),
        Commands::Add(args) => signal::run_add(&store, args),
        Commands::List(args) => signal::run_list(&store, args),
        Commands::Close { id, note } => signal::run_close(&store, id, note),
        Commands::Reopen { id, note } => signal::run_reopen(&store, id, note),
        Commands::Update(args) => signal::run_update(&store, args),
        Commands::Summary => signal::run_summary(&store),
        Commands::Export(args) => export::run(&store, args),
        Commands::Digest(args) => report::run_digest(&store, args),
        Commands::Triage(args) => report::run_triage(&store, args),
        Commands::Workload(args) => report::run_workload(&store, args),
        Commands::Calendar(args) => report::run_calendar(&store, args),
        Commands::Audit(args) => report::run_audit(&store, args),
        Commands::Metrics(args) => report::run_metrics(&store, args),
        Commands::Stale(args) => report::run_stale(&store, args),
        Commands::Activity(args) => report::run_activity(&store, args),
        Commands::Trend(args) => report::run_trend(&store, args),
        Commands::Seed(args) => seed::run(&store, args),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
