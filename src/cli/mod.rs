pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// KOSHA occupational-safety regulation search CLI
#[derive(Parser, Debug)]
#[command(
    name = "kosha",
    about = "KOSHA smart-search CLI - Look up occupational-safety laws, decrees and rules from the terminal",
    version,
    author,
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Numbered report (default)
    Text,
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Markdown format
    Markdown,
    /// CSV format
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a single category (전체/법/시행령/규칙)
    #[command(alias = "s")]
    Search(args::SearchArgs),

    /// Search the act, its enforcement decree and the safety rules together
    #[command(alias = "m")]
    Main(args::MainArgs),

    /// Search an explicit list of categories and merge the results
    #[command(alias = "l")]
    Laws(args::LawsArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completion scripts
    fn generate_completions(shell: Shell) {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
    }

    /// Run the CLI application
    pub async fn run() -> crate::error::Result<()> {
        let cli = Self::parse();

        // Set up logging
        let default_filter = if cli.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .init();

        let opts = commands::GlobalOptions {
            format: cli.format,
            quiet: cli.quiet,
            verbose: cli.verbose,
        };

        let result = match cli.command {
            Commands::Search(args) => commands::search::execute(args, opts).await,
            Commands::Main(args) => commands::laws::execute_main(args, opts).await,
            Commands::Laws(args) => commands::laws::execute(args, opts).await,
            Commands::Config(args) => commands::config::execute(args),
            Commands::Version => {
                commands::version::execute();
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::generate_completions(shell);
                Ok(())
            }
        };

        // Handle errors with better messaging
        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                use crate::error::KoshaError;
                match &e {
                    KoshaError::NoApiKey => {
                        eprintln!("Error: No service key configured.");
                        eprintln!("\nGet a service key from https://www.data.go.kr and configure it with:");
                        eprintln!("  kosha config set kosha.key YOUR_SERVICE_KEY");
                        eprintln!("or export {}.", crate::config::API_KEY_ENV);
                    }
                    KoshaError::ApiError { code, message, hint } => {
                        eprintln!("Error: {}", message);
                        if cli.verbose {
                            eprintln!("Code: {}", code);
                        }
                        if let Some(hint) = hint {
                            eprintln!("\nHint: {}", hint);
                        }
                    }
                    _ => {
                        eprintln!("Error: {}", e);
                        if let Some(hint) = e.hint() {
                            eprintln!("\nHint: {}", hint);
                        }
                    }
                }
                Err(e)
            }
        }
    }
}
