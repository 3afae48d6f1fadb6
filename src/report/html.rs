//! HTML rendering of the master table.
//!
//! Display transforms run on an owned copy of the table, so the master file
//! itself is never touched by this stage. Each transform is keyed to a
//! column label and silently skipped when that column is absent — the master
//! file's column set is curated by hand and varies between groups.

use std::fs;

use chrono::Local;
use tracing::info;

use crate::domain::{FundGroupConfig, MASTER_SIZE_COLUMN};
use crate::error::AppError;
use crate::io::load_master_file;

/// Inline stylesheet for the report shell.
const CSS_STYLES: &str = "
    body { font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; font-size: 14px; background-color: #f4f7f6; color: #333; margin: 0; padding: 20px; }
    h1 { color: #2c5e2e; text-align: center; margin-bottom: 25px; }
    .table-container { overflow-x: auto; }
    .fund-table { width: 95%; margin: 0 auto; border-collapse: collapse; box-shadow: 0 4px 10px rgba(0, 0, 0, 0.1); background-color: #ffffff; }
    .fund-table th, .fund-table td { padding: 12px 15px; border: 1px solid #ddd; text-align: left; }
    .fund-table th { background-color: #347a38; color: #ffffff; font-weight: bold; text-align: center; }
    .fund-table tr:nth-child(even) { background-color: #f9f9f9; }
    .fund-table tr:hover { background-color: #e8f5e9; cursor: pointer; }
    .report-footer { width: 95%; margin: 15px auto 0; color: #888; font-size: 12px; text-align: right; }
";

/// Display-label substitutions applied to the rendered header row.
const HEADER_RENAMES: [(&str, &str); 6] = [
    ("一年涨幅(%)", "一年涨幅"),
    ("三年涨幅(%)", "三年涨幅"),
    ("规模(亿元)", "规模"),
    ("买入费率(%)", "买入费率"),
    ("运作费率(年，%)", "运作费率"),
    ("零成本持有天数", "天数"),
];

/// Columns rendered with a literal percent sign appended to each value.
const PERCENT_COLUMNS: [&str; 2] = ["买入费率(%)", "运作费率(年，%)"];

/// Render one fund group's report.
pub fn run(group: &FundGroupConfig) -> Result<(), AppError> {
    let (mut headers, mut rows) = load_master_file(&group.master_file)?.into_parts();
    apply_display_transforms(&mut headers, &mut rows);

    let html = render_document(&group.report_title, &headers, &rows);
    fs::write(&group.report_file, html).map_err(|e| {
        AppError::usage(format!("Failed to write report '{}': {e}", group.report_file.display()))
    })?;

    info!(
        group = %group.id,
        rows = rows.len(),
        file = %group.report_file.display(),
        "report written"
    );
    Ok(())
}

/// In-place display transforms: size truncation, fee percent signs, header
/// renames.
pub fn apply_display_transforms(headers: &mut [String], rows: &mut [Vec<String>]) {
    if let Some(idx) = column_index(headers, MASTER_SIZE_COLUMN) {
        for row in rows.iter_mut() {
            row[idx] = truncate_at_fullwidth_paren(&row[idx]).to_string();
        }
    }

    for column in PERCENT_COLUMNS {
        if let Some(idx) = column_index(headers, column) {
            for row in rows.iter_mut() {
                row[idx].push('%');
            }
        }
    }

    for header in headers.iter_mut() {
        if let Some((_, display)) = HEADER_RENAMES.iter().find(|(from, _)| from == header) {
            *header = (*display).to_string();
        }
    }
}

/// Drop an embedded "（截至...）" style annotation: everything from the first
/// full-width opening parenthesis on.
fn truncate_at_fullwidth_paren(value: &str) -> &str {
    value.split('（').next().unwrap_or(value)
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Assemble the complete standalone document.
pub fn render_document(title: &str, headers: &[String], rows: &[Vec<String>]) -> String {
    let table = render_table(headers, rows);
    let generated_at = Local::now().format("%Y-%m-%d %H:%M");
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"zh-CN\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style>{CSS_STYLES}</style>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <div class=\"table-container\">\n{table}</div>\n\
         <div class=\"report-footer\">报告生成时间：{generated_at}</div>\n\
         </body>\n\
         </html>\n",
        title = escape_html(title),
    )
}

/// The data table itself: plain rows, no index column.
fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str("<table class=\"fund-table\">\n<thead>\n<tr>");
    for header in headers {
        out.push_str("<th>");
        out.push_str(&escape_html(header));
        out.push_str("</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&escape_html(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
