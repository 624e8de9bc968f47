// src/export/json_csv.rs

use crate::core::report::AttendanceRow;
use crate::errors::{AppError, AppResult};
use crate::export::model::MatrixSheet;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn csv_error(e: csv::Error) -> AppError {
    AppError::Export(format!("CSV write error: {e}"))
}

fn write_json(value: &impl serde::Serialize, path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(value)?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

/// Flat report as pretty-printed JSON.
pub(crate) fn export_json(rows: &[AttendanceRow], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));
    write_json(&rows, path)?;
    notify_export_success("JSON", path);
    Ok(())
}

/// Flat report as CSV (headers come from the serde renames).
pub(crate) fn export_csv(rows: &[AttendanceRow], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
    for item in rows {
        wtr.serialize(item).map_err(csv_error)?;
    }
    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}

pub(crate) fn export_matrix_json(sheet: &MatrixSheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting matrix to JSON: {}", path.display()));

    let rows: Vec<_> = sheet
        .rows
        .iter()
        .map(|(fixed, cells)| {
            json!({
                "id": fixed.first(),
                "fullName": fixed.get(1),
                "communityNumber": fixed.get(2),
                "cells": cells.iter().map(|c| c.symbol()).collect::<Vec<_>>(),
            })
        })
        .collect();

    let doc = json!({
        "organization": sheet.organization,
        "zone": sheet.zone,
        "title": sheet.title,
        "dates": sheet.dates,
        "rows": rows,
    });

    write_json(&doc, path)?;
    notify_export_success("JSON", path);
    Ok(())
}

pub(crate) fn export_matrix_csv(sheet: &MatrixSheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting matrix to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
    wtr.write_record(sheet.headers()).map_err(csv_error)?;
    for row in sheet.table() {
        wtr.write_record(&row).map_err(csv_error)?;
    }
    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
