use crate::demo::{run_check_photo, run_demo, run_form_view, CheckPhotoArgs, DemoArgs, FormViewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruitment_form::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Form",
    about = "Serve the recruitment application form or exercise it from the command line",
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
    /// Run a single photo through the upload rules
    CheckPhoto(CheckPhotoArgs),
    /// Print the rendered form as JSON
    FormView(FormViewArgs),
    /// Fill in a sample applicant and submit it with the given photos
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
        Command::CheckPhoto(args) => run_check_photo(args).await,
        Command::FormView(args) => run_form_view(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
