//! `wizmail` binary entry point.

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = wizmail::cli::Cli::parse();

    if let Err(err) = wizmail::run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
