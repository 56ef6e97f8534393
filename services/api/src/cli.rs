use crate::demo::{run_assign, run_demo, AssignArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use model_scanner::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Model Scanner Lead Service",
    about = "Run the lead-capture service or exercise campaign attribution from the command line",
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
    /// Campaign attribution utilities
    Campaign {
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Walk sample coordinates through the territory matcher offline
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CampaignCommand {
    /// Resolve a zip code and print the assigned campaign code
    Assign(AssignArgs),
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
        Command::Campaign {
            command: CampaignCommand::Assign(args),
        } => run_assign(args).await,
        Command::Demo(args) => run_demo(args),
    }
}
