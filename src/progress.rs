use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::time::Duration;

use crate::search::AggregateEvent;

/// Progress indicator manager
pub struct ProgressManager {
    multi: MultiProgress,
    enabled: bool,
    verbose: bool,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(quiet: bool, verbose: bool) -> Self {
        // Only enable progress if we're in a terminal and not in quiet mode
        let enabled = !quiet && io::stderr().is_terminal();

        Self {
            multi: MultiProgress::new(),
            enabled,
            verbose,
        }
    }

    /// Create a spinner for searching
    pub fn create_search_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .ok()?
            .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷", "✔"]);

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Some(pb)
    }

    /// Show a simple message (for verbose mode)
    pub fn show_message(&self, message: &str) {
        if self.verbose && self.enabled {
            eprintln!("🔍 {}", message);
        }
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Spinner that follows an aggregate search category by category
pub struct CategoryProgress<'a> {
    manager: &'a ProgressManager,
    spinner: Option<ProgressBar>,
}

impl<'a> CategoryProgress<'a> {
    pub fn new(manager: &'a ProgressManager) -> Self {
        Self {
            manager,
            spinner: None,
        }
    }

    /// Update the display for one aggregate event
    pub fn handle(&mut self, event: AggregateEvent) {
        match event {
            AggregateEvent::Fetching {
                category,
                index,
                total,
            } => {
                let message = messages::searching_category(category, index + 1, total);
                self.manager.show_message(&message);
                self.spinner = self.manager.create_search_spinner(&message);
            }
            AggregateEvent::Merged(summary) => {
                let message = messages::category_complete(summary.category, summary.fetched, summary.added);
                if let Some(pb) = self.spinner.take() {
                    pb.finish_with_message(format!("✅ {}", message));
                }
                self.manager.show_message(&message);
            }
            AggregateEvent::Done { total_count } => {
                self.manager.show_message(&messages::search_done(total_count));
            }
        }
    }
}

impl Drop for CategoryProgress<'_> {
    fn drop(&mut self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

/// Progress messages for different operations
pub mod messages {
    use crate::api::Category;

    pub fn searching_category(category: Category, current: usize, total: usize) -> String {
        format!("{} 에서 검색 중... ({}/{})", category, current, total)
    }

    pub fn category_complete(category: Category, fetched: usize, added: usize) -> String {
        format!("{}: {}건 (신규 {}건)", category.display_name(), fetched, added)
    }

    pub fn search_done(total: usize) -> String {
        format!("검색 완료: 총 {}건", total)
    }
}
