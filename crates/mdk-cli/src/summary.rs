use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use mdk_cli::report::{RunReport, UnitStatus};
use mdk_validate::Severity;

pub fn print_summary(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Status"),
        header_cell("Records"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Archive"),
    ]);
    apply_outcome_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total_records = 0usize;
    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;
    for unit in &report.units {
        total_records += unit.records;
        total_errors += unit.error_count();
        total_warnings += unit.warning_count();
        let archive = match &unit.status {
            UnitStatus::Packaged { archive, .. } => Cell::new(archive.display().to_string()),
            _ => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(unit.variable.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            status_cell(&unit.status),
            Cell::new(unit.records),
            count_cell(unit.error_count(), Color::Red),
            count_cell(unit.warning_count(), Color::Yellow),
            archive,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(totals_label(report)).add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        count_cell(total_errors, Color::Red).add_attribute(Attribute::Bold),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_issue_table(report);
}

fn totals_label(report: &RunReport) -> String {
    let mut parts = vec![format!("{} packaged", report.packaged_count())];
    if report.validated_count() > 0 {
        parts.push(format!("{} validated", report.validated_count()));
    }
    if report.failed_count() > 0 {
        parts.push(format!("{} failed", report.failed_count()));
    }
    parts.join(", ")
}

fn print_issue_table(report: &RunReport) {
    let mut rows = Vec::new();
    for unit in &report.units {
        for issue in &unit.issues {
            rows.push((unit.variable.as_str(), issue));
        }
    }
    if rows.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        severity_rank(b.1.severity())
            .cmp(&severity_rank(a.1.severity()))
            .then_with(|| a.0.cmp(b.0))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Severity"),
        header_cell("Category"),
        header_cell("Row"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for (variable, issue) in rows {
        table.add_row(vec![
            Cell::new(variable),
            severity_cell(issue.severity()),
            Cell::new(issue.category().label()),
            row_cell(issue.row()),
            Cell::new(issue.message()),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

/// Shared style for plain listing tables (`mdk variables`).
pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_outcome_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ColumnConstraint::LowerBoundary(Width::Fixed(12)),
        ColumnConstraint::LowerBoundary(Width::Fixed(7)),
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::UpperBoundary(Width::Percentage(45)),
    ]);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(12)),
        ColumnConstraint::UpperBoundary(Width::Fixed(9)),
        ColumnConstraint::UpperBoundary(Width::Fixed(12)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::UpperBoundary(Width::Percentage(55)),
    ]);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: &UnitStatus) -> Cell {
    match status {
        UnitStatus::Packaged { .. } => Cell::new(status.label())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        UnitStatus::Validated => Cell::new(status.label()).fg(Color::Cyan),
        _ => Cell::new(status.label())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 2,
        Severity::Warning => 1,
    }
}

fn row_cell(row: Option<usize>) -> Cell {
    match row {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
