use std::process::ExitCode;
use suite_runner::cli;

mod smoke;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
