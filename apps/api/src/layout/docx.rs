//! Training verification log renderer — schedule in, `.docx` bytes out.
//!
//! CPU-bound; callers run it inside `tokio::task::spawn_blocking`.

use std::io::Cursor;

use anyhow::{anyhow, Result};
use docx_rs::{
    AlignmentType, Docx, HeightRule, LineSpacing, PageMargin, Paragraph, Run, RunFonts, Shading,
    Table, TableCell, TableCellMargins, TableRow, VAlignType, WidthType,
};

use crate::layout::config::LogLayout;
use crate::layout::table::{event_cells, header_cells, CellLines};
use crate::models::{AgencyProfile, StaffIdentity};
use crate::schedule::TrainingEvent;

pub const LOG_TITLE: &str = "NHTD WAIVER PROGRAM STAFF TRAINING VERIFICATION LOG";
pub const STAFF_TITLE: &str = "Service Coordinator";

/// `<safe_name>_Training_Log.docx`
pub fn log_file_name(staff: &StaffIdentity) -> String {
    format!("{}_Training_Log.docx", staff.safe_name)
}

/// Renders the full log document and returns the packed `.docx` bytes.
pub fn render_training_log(
    staff: &StaffIdentity,
    events: &[TrainingEvent],
    profile: &AgencyProfile,
    layout: &LogLayout,
) -> Result<Vec<u8>> {
    let doc = Docx::new()
        .page_size(layout.page_width, layout.page_height)
        .page_margin(
            PageMargin::new()
                .top(layout.page_margin)
                .right(layout.page_margin)
                .bottom(layout.page_margin)
                .left(layout.page_margin),
        )
        .default_fonts(fonts(layout))
        .default_size(layout.body_size)
        .add_paragraph(title_paragraph(layout))
        .add_paragraph(staff_paragraph(staff, layout))
        .add_table(log_table(events, profile, layout))
        .add_paragraph(Paragraph::new().line_spacing(LineSpacing::new().before(200)))
        .add_paragraph(footer_paragraph(profile, layout));

    let mut buf = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buf)
        .map_err(|e| anyhow!("Failed to pack training log: {e}"))?;
    Ok(buf.into_inner())
}

// ────────────────────────────────────────────────────────────────────────────
// Document parts
// ────────────────────────────────────────────────────────────────────────────

fn fonts(layout: &LogLayout) -> RunFonts {
    RunFonts::new()
        .ascii(&layout.font)
        .hi_ansi(&layout.font)
        .cs(&layout.font)
}

fn body_run(text: &str, layout: &LogLayout) -> Run {
    Run::new()
        .add_text(text)
        .fonts(fonts(layout))
        .size(layout.body_size)
}

fn title_paragraph(layout: &LogLayout) -> Paragraph {
    Paragraph::new()
        .add_run(body_run(LOG_TITLE, layout))
        .indent(Some(layout.heading_indent), None, None, None)
        .line_spacing(LineSpacing::new().after(200))
}

fn staff_paragraph(staff: &StaffIdentity, layout: &LogLayout) -> Paragraph {
    Paragraph::new()
        .add_run(body_run("Staff Name: ", layout))
        .add_run(body_run(&format!("  {}  ", staff.display_name), layout).underline("single"))
        .add_run(body_run("    Title: ", layout))
        .add_run(body_run(&format!("  {STAFF_TITLE}  "), layout).underline("single"))
        .indent(Some(layout.heading_indent), None, None, None)
        .line_spacing(LineSpacing::new().after(100))
}

fn footer_paragraph(profile: &AgencyProfile, layout: &LogLayout) -> Paragraph {
    Paragraph::new()
        .add_run(body_run(profile.organization_name, layout).bold())
        .align(AlignmentType::Center)
}

fn log_table(events: &[TrainingEvent], profile: &AgencyProfile, layout: &LogLayout) -> Table {
    let mut rows = Vec::with_capacity(events.len() + 1);

    let header = header_cells()
        .iter()
        .zip(layout.column_widths)
        .map(|(texts, width)| header_cell(texts, width, layout))
        .collect();
    rows.push(
        TableRow::new(header)
            .row_height(layout.header_row_height)
            .height_rule(HeightRule::AtLeast),
    );

    for event in events {
        let cells = event_cells(event, profile)
            .iter()
            .zip(layout.column_widths)
            .map(|(texts, width)| data_cell(texts, width, layout))
            .collect();
        rows.push(
            TableRow::new(cells)
                .row_height(layout.data_row_height)
                .height_rule(HeightRule::AtLeast),
        );
    }

    let m = layout.cell_margins;
    Table::new(rows)
        .set_grid(layout.column_widths.to_vec())
        .width(layout.table_width(), WidthType::Dxa)
        .margins(TableCellMargins::new().margin(m.top, m.right, m.bottom, m.left))
}

fn header_cell(texts: &CellLines, width: usize, layout: &LogLayout) -> TableCell {
    let cell = TableCell::new()
        .width(width, WidthType::Dxa)
        .shading(Shading::new().fill(&layout.header_fill))
        .vertical_align(VAlignType::Center);
    texts.iter().fold(cell, |cell, text| {
        cell.add_paragraph(centered(
            Run::new()
                .add_text(text)
                .fonts(fonts(layout))
                .size(layout.cell_size)
                .color(&layout.header_color)
                .bold(),
        ))
    })
}

fn data_cell(texts: &CellLines, width: usize, layout: &LogLayout) -> TableCell {
    let cell = TableCell::new()
        .width(width, WidthType::Dxa)
        .vertical_align(VAlignType::Center);
    texts.iter().fold(cell, |cell, text| {
        cell.add_paragraph(centered(
            Run::new()
                .add_text(text)
                .fonts(fonts(layout))
                .size(layout.cell_size)
                .color(&layout.cell_color),
        ))
    })
}

fn centered(run: Run) -> Paragraph {
    Paragraph::new().add_run(run).align(AlignmentType::Center)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
