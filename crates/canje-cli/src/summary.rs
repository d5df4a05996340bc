use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::DataFrame;

use canje_ingest::{any_to_string, column_names};
use canje_model::Summary;
use canje_cli::types::ValidateResult;

pub fn print_summary(result: &ValidateResult) {
    println!("Input: {}", result.input.display());
    println!("Rules: {}", result.label);
    match &result.output_dir {
        Some(dir) => println!("Output: {} ({} files)", dir.display(), result.written.len()),
        None => println!("Output: dry run, nothing written"),
    }
    println!("{}", metrics_table(result.output.summary()));
    if let Some(errors) = result.errors_sheet() {
        print_error_preview(errors, result.show_errors);
    }
}

fn metrics_table(summary: &Summary) -> Table {
    let mut header = vec![
        header_cell("Total"),
        header_cell("OK"),
        header_cell("ERROR"),
    ];
    header.extend(
        summary
            .partition_errors
            .iter()
            .map(|count| header_cell(&format!("{} errors", count.partition))),
    );
    header.push(header_cell("Excluded"));
    header.push(header_cell("Duplicates"));

    let mut row = vec![
        Cell::new(summary.total_rows).add_attribute(Attribute::Bold),
        Cell::new(summary.total_ok).fg(Color::Green),
        count_cell(summary.total_error, Color::Red),
    ];
    row.extend(
        summary
            .partition_errors
            .iter()
            .map(|count| count_cell(count.errors, Color::Red)),
    );
    row.push(count_cell(summary.excluded_rows, Color::Yellow));
    row.push(count_cell(summary.duplicates_removed, Color::Yellow));

    let mut table = Table::new();
    table.set_header(header);
    table.add_row(row);
    apply_summary_table_style(&mut table);
    for index in 0..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table
}

fn print_error_preview(errors: &DataFrame, limit: usize) {
    if errors.height() == 0 || limit == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(
        column_names(errors)
            .iter()
            .map(|name| header_cell(name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    let shown = errors.height().min(limit);
    for idx in 0..shown {
        let cells: Vec<Cell> = errors
            .get_columns()
            .iter()
            .map(|column| match column.get(idx) {
                Ok(value) => Cell::new(any_to_string(value)),
                Err(_) => dim_cell("-"),
            })
            .collect();
        table.add_row(cells);
    }
    println!();
    println!("Errors:");
    println!("{table}");
    if errors.height() > shown {
        println!("... and {} more", errors.height() - shown);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
