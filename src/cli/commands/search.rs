use chrono::Utc;
use log::info;

use crate::api::types::{AggregatedReport, CategorySummary};
use crate::cli::args::SearchArgs;
use crate::error::Result;
use crate::output;
use crate::progress::{messages, ProgressManager};

use super::{build_client, GlobalOptions};

/// Execute a single-category search
///
/// Unlike the aggregate commands, a failed fetch is reported as an error
/// instead of an empty result.
pub async fn execute(args: SearchArgs, opts: GlobalOptions) -> Result<()> {
    let client = build_client(&args.fetch)?;
    let progress = ProgressManager::new(opts.quiet, opts.verbose);

    let spinner = progress.create_search_spinner(&messages::searching_category(args.category, 1, 1));
    let report = client.fetch_report(&args.keyword, args.category).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    info!(
        "{}: {}회 시도, 마지막 numOfRows={}",
        args.category, report.attempts, report.page_size
    );

    let records = report.outcome.into_result()?;
    let count = records.len();
    progress.show_message(&messages::search_done(count));

    let aggregated = AggregatedReport {
        keyword: args.keyword,
        total_count: count,
        categories: vec![CategorySummary {
            category: args.category,
            fetched: count,
            added: count,
        }],
        records,
        generated_at: Utc::now(),
    };

    println!("{}", output::format_report(&aggregated, opts.format)?);
    Ok(())
}
