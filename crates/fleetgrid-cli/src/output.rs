//! Output formatting module

use fleetgrid_domain::model::{CellView, GridModel, PaletteField};
use fleetgrid_types::{
    day_label, DirectoryEntry, MetaResponse, OutputFormat, Palette, Result, SchedulePayload,
};

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

pub fn print_meta(output_format: OutputFormat, meta: &MetaResponse) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(meta);
    }

    if !meta.has_data {
        println!("Файл ещё не загружен.");
        return Ok(());
    }

    println!("\nDates");
    println!("=====");
    for day in &meta.dates {
        println!("  {}  ({})", day_label(day), day);
    }

    println!("\nFilter columns");
    println!("==============");
    for column in &meta.columns {
        let values = meta.values_of(column);
        println!("  {} [{}]", column, values.len());
        for value in values.iter().take(10) {
            println!("      {}", value);
        }
        if values.len() > 10 {
            println!("      ... +{}", values.len() - 10);
        }
    }
    Ok(())
}

fn cell_glyph(cell: &CellView) -> &'static str {
    match cell {
        CellView::Flag { filled: true, .. } => "█",
        CellView::Flag { filled: false, .. } => "·",
        CellView::Plan { tag: Some(_), .. } => "#",
        CellView::Plan { tag: None, .. } => " ",
    }
}

/// Text rendering of the board: one block per vehicle, one line per layer
pub fn print_grid(payload: &SchedulePayload, grid: &GridModel) {
    println!("\n{}", day_label(&grid.day));
    println!("{}", payload.summary());
    if grid.slots.is_empty() {
        return;
    }
    println!(
        "\n  {:<14} {} - {}",
        "",
        grid.slots.first().map(String::as_str).unwrap_or(""),
        grid.slots.last().map(String::as_str).unwrap_or("")
    );

    for row in &grid.rows {
        if let Some(d) = &row.descriptive {
            println!();
            println!(
                "{} | {} | {} | {} | {}",
                d.name, d.plate, d.class, d.schedule_text, d.regime
            );
        }
        let cells: String = row.cells.iter().map(cell_glyph).collect();
        println!("  {:<14} {}", row.layer_label(), cells);

        let tags: Vec<String> = row
            .cells
            .iter()
            .zip(&grid.slots)
            .filter_map(|(cell, slot)| match cell {
                CellView::Plan { tag: Some(tag), .. } => Some(format!("{} {}", slot, tag)),
                _ => None,
            })
            .collect();
        if !tags.is_empty() {
            println!("  {:<14} {}", "", tags.join(", "));
        }
    }
}

pub fn print_palette(output_format: OutputFormat, palette: &Palette) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(palette);
    }
    println!("\nPalette");
    println!("=======");
    for field in PaletteField::ALL {
        println!("  {:<16} {}", field.label(), field.get(palette));
    }
    Ok(())
}

pub fn print_directory(output_format: OutputFormat, items: &[DirectoryEntry]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&items);
    }

    println!(
        "\n{:<14} {:<20} {:<8} {:<8}",
        "Гос номер", "График работы", "Начало", "Конец"
    );
    println!("{}", "-".repeat(54));
    for item in items {
        println!(
            "{:<14} {:<20} {:<8} {:<8}",
            item.vehicle_plate, item.schedule_text, item.regime_start, item.regime_end
        );
    }
    println!("\nСтрок: {}", items.len());
    Ok(())
}
