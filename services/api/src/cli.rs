use crate::demo::{run_gallery, run_transaction_simulation, GalleryArgs, TransactionArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use estate_showcase::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Estate Showcase",
    about = "Browse showcase listings, generate listing photos, and simulate purchases",
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
    /// Generate listing photos in the foreground and print each as it resolves
    Gallery(GalleryArgs),
    /// Simulated purchase flow
    Transaction {
        #[command(subcommand)]
        command: TransactionCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TransactionCommand {
    /// Run the pending -> confirmed -> explorer sequence for one listing
    Simulate(TransactionArgs),
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
        Command::Gallery(args) => run_gallery(args).await,
        Command::Transaction {
            command: TransactionCommand::Simulate(args),
        } => run_transaction_simulation(args).await,
    }
}
