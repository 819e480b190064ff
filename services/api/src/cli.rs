use crate::report::{run_ranking_report, RankingReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use property_eval::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Property Evaluation Service",
    about = "Run the property evaluation HTTP service or produce a one-off ranking report",
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
    /// Evaluate a listing sheet with the configured engine and print the ranking report
    Report(RankingReportArgs),
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
        Command::Report(args) => run_ranking_report(args),
    }
}
