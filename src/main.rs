use kosha::cli;

#[tokio::main]
async fn main() {
    // Errors are reported with hints inside `run`
    if cli::Cli::run().await.is_err() {
        std::process::exit(1);
    }
}
