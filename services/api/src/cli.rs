use crate::demo::{run_demo, run_progress_report, DemoArgs, ProgressReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pathways::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Learning Pathways Platform",
    about = "Run the learning pathways assessment service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect a user's aggregated progress from the data directory
    Progress {
        #[command(subcommand)]
        command: ProgressCommand,
    },
    /// Run a seeded end-to-end demo covering sampling, scoring, and
    /// recommendations
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ProgressCommand {
    /// Print the full progress report for one user
    Report(ProgressReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Progress {
            command: ProgressCommand::Report(args),
        } => run_progress_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
