use crate::demo::{run_demo, run_training, DemoArgs, TrainArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use subsidy_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Subsidy Scoring Service",
    about = "Run the subsidy application scoring service and its training jobs from the command line",
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
    /// Train the adoption model from a CSV of historical outcomes
    Train(TrainArgs),
    /// Score a sample application end to end and print the full report
    Demo(DemoArgs),
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
        Command::Train(args) => run_training(args),
        Command::Demo(args) => run_demo(args),
    }
}
