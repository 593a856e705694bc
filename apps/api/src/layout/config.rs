//! Page geometry and styling for the training verification log.
//!
//! All lengths are in twentieths of a point (DXA / twips), the unit Word uses
//! for page and table geometry. Font sizes are in half-points.
//! Example: US letter = 8.5" × 11" = 12240 × 15840 twips.

use serde::{Deserialize, Serialize};

/// Number of columns in the log table.
pub const COLUMN_COUNT: usize = 6;

/// Padding inside every table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMargins {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

/// Immutable layout for one rendered log. Built once at startup and shared
/// through `AppState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLayout {
    pub page_width: u32,
    pub page_height: u32,
    /// Same margin on all four sides.
    pub page_margin: i32,
    pub column_widths: [usize; COLUMN_COUNT],
    pub font: String,
    /// Body text size (half-points).
    pub body_size: usize,
    /// Table text size (half-points).
    pub cell_size: usize,
    pub header_fill: String,
    pub header_color: String,
    pub cell_color: String,
    /// Minimum header row height.
    pub header_row_height: f32,
    /// Minimum data row height.
    pub data_row_height: f32,
    pub cell_margins: CellMargins,
    /// Left indent of the title and staff-name paragraphs.
    pub heading_indent: i32,
}

impl LogLayout {
    /// Total table width: sum of the column widths.
    pub fn table_width(&self) -> usize {
        self.column_widths.iter().sum()
    }

    /// Width available between the page margins.
    pub fn text_width(&self) -> i64 {
        self.page_width as i64 - 2 * self.page_margin as i64
    }
}

/// US letter, half-inch margins, Tahoma.
///
/// Table width = 1200 + 1500 + 1500 + 1400 + 1700 + 1400 = 8700 twips,
/// which fits inside the 10800-twip text width.
pub fn default_log_layout() -> LogLayout {
    LogLayout {
        page_width: 12240,
        page_height: 15840,
        page_margin: 720,
        column_widths: [1200, 1500, 1500, 1400, 1700, 1400],
        font: "Tahoma".to_string(),
        body_size: 20,
        cell_size: 18,
        header_fill: "5B9BD5".to_string(),
        header_color: "FFFFFF".to_string(),
        cell_color: "021730".to_string(),
        header_row_height: 1400.0,
        data_row_height: 1100.0,
        cell_margins: CellMargins {
            top: 40,
            bottom: 40,
            left: 80,
            right: 60,
        },
        heading_indent: 400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_width() {
        assert_eq!(default_log_layout().table_width(), 8700);
    }

    #[test]
    fn test_table_fits_between_margins() {
        let layout = default_log_layout();
        assert!((layout.table_width() as i64) <= layout.text_width());
    }

    #[test]
    fn test_default_is_us_letter_portrait() {
        let layout = default_log_layout();
        assert_eq!((layout.page_width, layout.page_height), (12240, 15840));
        assert!(layout.page_height > layout.page_width);
    }
}
