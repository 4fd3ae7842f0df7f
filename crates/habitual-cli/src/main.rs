use clap::{Args, CommandFactory, Parser, Subcommand};
use habitual_core::{CoreError, ReportFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "habitual", version, about = "Habit tracker for AI agents")]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Habit store file (overrides store.path from config)
    #[arg(long, global = true, env = "HABITUAL_STORE")]
    pub store: Option<PathBuf>,
    /// Output format: text, markdown or json
    #[arg(long, global = true)]
    pub format: Option<ReportFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty habit store
    Init,
    /// Apply decay, then show all habits by weight
    Status,
    /// Mark a habit completed for today
    Complete {
        /// Habit ID
        id: String,
    },
    /// Log positive or negative feedback for a habit
    Feedback(commands::feedback::FeedbackArgs),
    /// Aggregate feedback per habit
    FeedbackReport,
    /// Daily summary: completion rate, average weight, streak leader
    Summary,
    /// Habit definitions
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("habitual=warn,habitual_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &CoreError) -> i32 {
    match err {
        CoreError::InvalidArgument(_) => 2,
        _ => 1,
    }
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let globals = cli.globals;
    let result = match cli.command {
        Commands::Init => commands::status::init(&globals),
        Commands::Status => commands::status::run(&globals),
        Commands::Complete { id } => commands::complete::run(&globals, &id),
        Commands::Feedback(args) => commands::feedback::run(&globals, args),
        Commands::FeedbackReport => commands::feedback::report(&globals),
        Commands::Summary => commands::status::summary(&globals),
        Commands::Habit { action } => commands::habit::run(&globals, action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "habitual", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}
