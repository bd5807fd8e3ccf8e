use crate::api::Category;
use crate::cli::args::{FetchArgs, LawsArgs, MainArgs};
use crate::error::Result;
use crate::output;
use crate::progress::{CategoryProgress, ProgressManager};
use crate::search::Aggregator;

use super::{build_client, GlobalOptions};

/// Execute the main-laws search (act, enforcement decree, safety rules)
pub async fn execute_main(args: MainArgs, opts: GlobalOptions) -> Result<()> {
    run(&args.keyword, &Category::MAIN, &args.fetch, opts).await
}

/// Execute a search over an explicit category list
pub async fn execute(args: LawsArgs, opts: GlobalOptions) -> Result<()> {
    run(&args.keyword, &args.categories, &args.fetch, opts).await
}

async fn run(
    keyword: &str,
    categories: &[Category],
    fetch: &FetchArgs,
    opts: GlobalOptions,
) -> Result<()> {
    let aggregator = Aggregator::new(build_client(fetch)?);
    let manager = ProgressManager::new(opts.quiet, opts.verbose);

    let report = {
        let mut progress = CategoryProgress::new(&manager);
        aggregator
            .search_across_categories_with(keyword, categories, |event| progress.handle(event))
            .await
    };

    // An empty report is a valid answer, not a failure
    println!("{}", output::format_report(&report, opts.format)?);
    Ok(())
}
