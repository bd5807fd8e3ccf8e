use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::types::AggregatedReport;
use crate::cli::OutputFormat;
use crate::error::{KoshaError, Result};

static EM_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<em\s+class\s*=\s*['"]?smart['"]?\s*>"#).expect("valid regex"));
static EM_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</em\s*>").expect("valid regex"));

const NO_TITLE: &str = "제목 없음";
const NO_CONTENT: &str = "내용 없음";
const NO_LINK: &str = "링크 없음";

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format an aggregated report
    pub fn format_report(&self, report: &AggregatedReport) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.format_report_text(report)),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Markdown => Ok(self.format_report_markdown(report)),
            OutputFormat::Csv => self.format_report_csv(report),
        }
    }

    fn format_report_text(&self, report: &AggregatedReport) -> String {
        if report.is_empty() {
            return empty_message(report);
        }

        let mut result = format!(
            "✅ '{}'에 대한 {} 종합 검색 결과 (총 {}건)\n\n",
            report.keyword,
            scope_label(report),
            report.total_count
        );

        for (idx, record) in report.records.iter().enumerate() {
            result.push_str(&format!(
                "📄 **{}. {}**\n",
                idx + 1,
                emphasize(or_placeholder(&record.title, NO_TITLE))
            ));
            result.push_str(&format!(
                "   - 내용: {}\n",
                emphasize(or_placeholder(&record.highlighted_content, NO_CONTENT))
            ));
            result.push_str(&format!(
                "   - 원문 링크: {}\n\n",
                or_placeholder(&record.source_link, NO_LINK)
            ));
        }

        result
    }

    fn format_report_table(&self, report: &AggregatedReport) -> String {
        if report.is_empty() {
            return empty_message(report);
        }

        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("번호").fg(Color::Cyan),
            Cell::new("제목").fg(Color::Cyan),
            Cell::new("내용").fg(Color::Cyan),
            Cell::new("원문 링크").fg(Color::Cyan),
        ]);

        for (idx, record) in report.records.iter().enumerate() {
            table.add_row(vec![
                Cell::new((idx + 1).to_string()),
                Cell::new(truncate_string(&plain(&record.title, NO_TITLE), 40)),
                Cell::new(truncate_string(&plain(&record.highlighted_content, NO_CONTENT), 60)),
                Cell::new(or_placeholder(&record.source_link, NO_LINK)),
            ]);
        }

        table.set_content_arrangement(ContentArrangement::Dynamic);

        let mut result = String::new();
        result.push_str(&format!(
            "\n{} Keyword: {} | Total: {} | {}\n\n",
            "📊".cyan(),
            report.keyword.yellow(),
            report.total_count.to_string().yellow(),
            category_breakdown(report)
        ));
        result.push_str(&table.to_string());
        result
    }

    fn format_report_json(&self, report: &AggregatedReport) -> Result<String> {
        serde_json::to_string_pretty(report).map_err(KoshaError::Serialization)
    }

    fn format_report_markdown(&self, report: &AggregatedReport) -> String {
        let mut result = String::new();

        result.push_str(&format!("# '{}' 검색 결과\n\n", escape_markdown(&report.keyword)));
        result.push_str(&format!("- **총 결과**: {}건\n", report.total_count));
        result.push_str(&format!("- **검색 범위**: {}\n\n", category_breakdown(report)));

        if report.is_empty() {
            result.push_str(&empty_message(report));
            result.push('\n');
            return result;
        }

        for (idx, record) in report.records.iter().enumerate() {
            result.push_str(&format!(
                "## {}. {}\n\n",
                idx + 1,
                emphasize(or_placeholder(&record.title, NO_TITLE))
            ));
            result.push_str(&format!(
                "{}\n\n",
                emphasize(or_placeholder(&record.highlighted_content, NO_CONTENT))
            ));
            if record.source_link.is_empty() {
                result.push_str(&format!("- 원문 링크: {}\n\n", NO_LINK));
            } else {
                result.push_str(&format!("- [원문 링크]({})\n\n", record.source_link));
            }
        }

        result
    }

    fn format_report_csv(&self, report: &AggregatedReport) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        wtr.write_record(["번호", "문서ID", "제목", "내용", "원문 링크"])?;

        for (idx, record) in report.records.iter().enumerate() {
            let row_num = (idx + 1).to_string();
            let title = plain(&record.title, "");
            let content = plain(&record.highlighted_content, "");
            wtr.write_record([
                row_num.as_str(),
                record.document_id.as_deref().unwrap_or(""),
                title.as_str(),
                content.as_str(),
                record.source_link.as_str(),
            ])?;
        }

        let data = wtr
            .into_inner()
            .map_err(|e| KoshaError::Other(e.to_string()))?;

        // Add BOM for Excel compatibility
        let mut result = vec![0xEF, 0xBB, 0xBF];
        result.extend_from_slice(&data);

        String::from_utf8(result).map_err(|e| KoshaError::Other(e.to_string()))
    }
}

/// Rewrite the service's emphasis markup as markdown bold
pub fn emphasize(s: &str) -> String {
    let opened = EM_OPEN.replace_all(s, "**");
    EM_CLOSE.replace_all(&opened, "**").into_owned()
}

/// Remove the service's emphasis markup
pub fn strip_emphasis(s: &str) -> String {
    let opened = EM_OPEN.replace_all(s, "");
    EM_CLOSE.replace_all(&opened, "").into_owned()
}

fn plain(s: &str, placeholder: &str) -> String {
    strip_emphasis(or_placeholder(s, placeholder))
}

fn or_placeholder<'a>(s: &'a str, placeholder: &'a str) -> &'a str {
    if s.trim().is_empty() {
        placeholder
    } else {
        s
    }
}

fn scope_label(report: &AggregatedReport) -> String {
    match report.categories.len() {
        0 => "법규".to_string(),
        1 => report.categories[0].category.display_name().to_string(),
        _ => "주요 법규".to_string(),
    }
}

fn category_breakdown(report: &AggregatedReport) -> String {
    report
        .categories
        .iter()
        .map(|summary| format!("{} {}건", summary.category.display_name(), summary.added))
        .collect::<Vec<_>>()
        .join(", ")
}

fn empty_message(report: &AggregatedReport) -> String {
    let names = report
        .categories
        .iter()
        .map(|summary| summary.category.display_name())
        .collect::<Vec<_>>();

    if names.is_empty() {
        format!("'{}'에 대해 검색된 내용이 없습니다.", report.keyword)
    } else {
        format!(
            "'{}'에 대한 {}에서 검색된 내용이 없습니다.",
            report.keyword,
            names.join(", ")
        )
    }
}

// Helper functions
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|")
        .replace('*', "\\*")
        .replace('_', "\\_")
}
