// src/main.rs

use livewatch::{cli, logging, run};

#[tokio::main]
async fn main() {
    logging::install_panic_hook();
    if let Err(err) = run_main().await {
        logging::report_fault(&err);
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
