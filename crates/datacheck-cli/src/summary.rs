//! Console summary tables.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use datacheck_model::{BatchCheckResult, CheckResult, Severity};
use datacheck_report::quality_grade;
use datacheck_rules::RuleSet;

/// Print the headline numbers and the per-rule breakdown for one result.
pub fn print_check_summary(result: &CheckResult) {
    println!("Samples: {}", result.total_samples);
    println!(
        "Passed: {} / Failed: {} (pass rate {:.1}%)",
        result.passed_samples,
        result.failed_samples,
        result.pass_rate * 100.0
    );
    println!("Grade: {}", quality_grade(result.pass_rate));
    if result.sampled {
        println!(
            "Sampled: {} of {} records",
            result.sampled_count, result.original_count
        );
    }
    if !result.duplicates.is_empty() {
        println!("Duplicate groups: {}", result.duplicates.len());
    }
    if !result.near_duplicates.is_empty() {
        println!("Near-duplicate groups: {}", result.near_duplicates.len());
    }
    if result.anomaly_count > 0 {
        println!(
            "Anomalies: {} across {} field(s)",
            result.anomaly_count,
            result.anomalies.len()
        );
    }

    if result.rule_results.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Severity"),
        header_cell("Passed"),
        header_cell("Failed"),
        header_cell("Failing samples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for summary in result.rule_results.values() {
        table.add_row(vec![
            Cell::new(&summary.name),
            severity_cell(summary.severity),
            Cell::new(summary.passed),
            count_cell(summary.failed, severity_color(summary.severity)),
            failing_samples_cell(&summary.failed_samples),
        ]);
    }
    println!("{table}");
}

/// Print the per-file table and the aggregate row for a batch result.
pub fn print_batch_summary(result: &BatchCheckResult) {
    println!("Directory: {}", result.directory);
    println!(
        "Files: {} ({} passed, {} failed, {} skipped)",
        result.total_files,
        result.passed_files,
        result.failed_files,
        result.skipped_files.len()
    );
    println!(
        "Overall pass rate: {:.1}% ({})",
        result.overall_pass_rate * 100.0,
        quality_grade(result.overall_pass_rate)
    );

    if !result.file_results.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("File"),
            header_cell("Samples"),
            header_cell("Pass rate"),
            header_cell("Errors"),
            header_cell("Warnings"),
            header_cell("Status"),
        ]);
        apply_table_style(&mut table);
        for index in 1..=4 {
            align_column(&mut table, index, CellAlignment::Right);
        }
        align_column(&mut table, 5, CellAlignment::Center);

        let mut total_samples = 0usize;
        for (path, file_result) in &result.file_results {
            total_samples += file_result.total_samples;
            table.add_row(vec![
                Cell::new(path),
                Cell::new(file_result.total_samples),
                Cell::new(format!("{:.1}%", file_result.pass_rate * 100.0)),
                count_cell(file_result.error_count, Color::Red),
                count_cell(file_result.warning_count, Color::Yellow),
                status_cell(file_result.error_count == 0),
            ]);
        }
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(total_samples).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}%", result.overall_pass_rate * 100.0))
                .add_attribute(Attribute::Bold),
            count_cell(result.total_error_count, Color::Red).add_attribute(Attribute::Bold),
            count_cell(result.total_warning_count, Color::Yellow).add_attribute(Attribute::Bold),
            dim_cell("-"),
        ]);
        println!("{table}");
    }

    if !result.skipped_files.is_empty() {
        eprintln!("Skipped:");
        for skipped in &result.skipped_files {
            eprintln!("- {skipped}");
        }
    }
}

/// Print every rule in the set, enabled or not.
pub fn print_rules(ruleset: &RuleSet) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Name"),
        header_cell("Severity"),
        header_cell("Enabled"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);

    for rule in ruleset.rules() {
        table.add_row(vec![
            Cell::new(&rule.id).fg(Color::Blue),
            Cell::new(&rule.name),
            severity_cell(rule.severity),
            status_cell(rule.enabled),
            Cell::new(&rule.description),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Info => Cell::new("INFO").fg(Color::Blue),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Blue,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn status_cell(ok: bool) -> Cell {
    if ok {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn failing_samples_cell(ids: &[String]) -> Cell {
    if ids.is_empty() {
        return dim_cell("-");
    }
    let shown: Vec<&str> = ids.iter().take(5).map(String::as_str).collect();
    let mut text = shown.join(", ");
    if ids.len() > 5 {
        text.push_str(", ...");
    }
    Cell::new(text)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
