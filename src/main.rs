use clap::Parser;

#[tokio::main]
async fn main() {
    parley_lib::init_tracing();

    let cli = parley_lib::Cli::parse();
    if let Err(error) = parley_lib::run(cli).await {
        eprintln!("Error: {:#}", error);
        std::process::exit(1);
    }
}
