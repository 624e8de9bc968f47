// src/export/pdf_export.rs

use crate::core::report::AttendanceRow;
use crate::errors::{AppError, AppResult};
use crate::export::model::{MatrixSheet, get_headers, rows_to_table};
use crate::export::notify_export_success;
use crate::export::pdf::{Orientation, PdfManager};
use crate::ui::messages::info;
use std::path::Path;

/// Flat report as a portrait table.
pub(crate) fn export_pdf(rows: &[AttendanceRow], path: &Path, title: &str) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let headers = get_headers();
    let data_vec = rows_to_table(rows);

    let mut pdf = PdfManager::new(Orientation::Portrait);
    pdf.write_table(title, &headers, &data_vec);

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}

/// Monthly sheet, landscape.
pub(crate) fn export_matrix_pdf(sheet: &MatrixSheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting matrix to PDF: {}", path.display()));

    let mut pdf = PdfManager::new(Orientation::Landscape);
    pdf.write_matrix(sheet);

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}
