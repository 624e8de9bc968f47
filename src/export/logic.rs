// src/export/logic.rs

use crate::config::ReportConfig;
use crate::core::report::{AttendanceMatrix, AttendanceRow};
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::{ensure_writable, require_absolute};
use crate::export::json_csv::{export_csv, export_json, export_matrix_csv, export_matrix_json};
use crate::export::model::MatrixSheet;
use crate::export::pdf_export::{export_matrix_pdf, export_pdf};
use crate::export::xlsx::{export_matrix_xlsx, export_xlsx};
use crate::ui::messages::warning;
use std::path::Path;

/// High-level export entry points used by the CLI.
pub struct ExportLogic;

impl ExportLogic {
    /// Flat attendance report.
    ///
    /// `file` must be an absolute path; an existing file is only replaced
    /// with `force` or after confirmation. An empty report writes nothing.
    pub fn export_rows(
        rows: &[AttendanceRow],
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);
        require_absolute(path)?;

        if rows.is_empty() {
            warning("No attendance recorded yet; nothing to export.");
            return Ok(());
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(rows, path),
            ExportFormat::Json => export_json(rows, path),
            ExportFormat::Xlsx => export_xlsx(rows, path),
            ExportFormat::Pdf => export_pdf(rows, path, "Reporte de asistencia"),
        }
    }

    /// Monthly member × meeting-date sheet.
    pub fn export_matrix(
        matrix: &AttendanceMatrix,
        report: &ReportConfig,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);
        require_absolute(path)?;
        ensure_writable(path, force)?;

        let sheet = MatrixSheet::new(matrix, report);

        match format {
            ExportFormat::Csv => export_matrix_csv(&sheet, path),
            ExportFormat::Json => export_matrix_json(&sheet, path),
            ExportFormat::Xlsx => export_matrix_xlsx(&sheet, path),
            ExportFormat::Pdf => export_matrix_pdf(&sheet, path),
        }
    }
}
