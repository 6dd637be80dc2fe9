use clap::Parser;
use thumbnailer::{setup_logging, Cli, CliRunner};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(e) = setup_logging(args.verbose) {
        eprintln!("failed to set up logging: {e}");
        std::process::exit(1);
    }

    info!("Starting thumbnailer v{}", env!("CARGO_PKG_VERSION"));

    let runner = match CliRunner::new(&args).await {
        Ok(runner) => runner,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    // Per-job render failures are recorded as .error files and do not reach
    // this point; an Err here means the URL source or the output directory
    // was unusable.
    if let Err(e) = runner.run(&args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
