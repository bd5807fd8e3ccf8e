use clap::{Args, Subcommand};

use crate::api::Category;

/// Parse a category code or alias (0, 1, 2, 4, all, law, decree, rules)
pub fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_str(s).ok_or_else(|| {
        format!(
            "unknown category '{}' (use 0=all, 1=law, 2=decree, 4=rules or a numeric code)",
            s
        )
    })
}

/// Request tuning shared by the search commands
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Starting number of rows per request (shrinks automatically on oversized responses)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

/// Single-category search arguments
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keyword (passed to the service unchanged)
    pub keyword: String,

    /// Category code or alias
    #[arg(short, long, default_value = "0", value_parser = parse_category)]
    pub category: Category,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

/// Main-laws search arguments (law, enforcement decree, safety rules)
#[derive(Args, Debug)]
pub struct MainArgs {
    /// Search keyword
    pub keyword: String,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

/// Multi-category search arguments
#[derive(Args, Debug)]
pub struct LawsArgs {
    /// Search keyword
    pub keyword: String,

    /// Categories to search, in merge order (comma-separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_values = ["1", "2", "4"],
        value_parser = parse_category
    )]
    pub categories: Vec<Category>,

    #[command(flatten)]
    pub fetch: FetchArgs,
}

/// Configuration command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (kosha.key, kosha.endpoint, kosha.page_size, kosha.timeout)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Initialize configuration
    Init,
}
