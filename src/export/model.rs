// src/export/model.rs

use crate::config::ReportConfig;
use crate::core::report::{AttendanceMatrix, AttendanceRow, Cell};
use crate::utils::date::month_name;
use crate::utils::formatting::{community_or, pad_member_id};

/// Header for the flat report (CSV / XLSX / PDF), same keys as the JSON.
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec!["ID", "Fecha", "Hora", "Nombre", "Comunidad", "qrCode"]
}

pub(crate) fn row_to_cells(r: &AttendanceRow) -> Vec<String> {
    vec![
        r.id.clone(),
        r.date.clone(),
        r.time.clone(),
        r.name.clone(),
        r.community.clone(),
        r.qr_code.clone(),
    ]
}

pub(crate) fn rows_to_table(rows: &[AttendanceRow]) -> Vec<Vec<String>> {
    rows.iter().map(row_to_cells).collect()
}

/// Fixed leading columns of the monthly sheet.
pub(crate) const MATRIX_FIXED_HEADERS: [&str; 3] = ["ID", "NOMBRE Y APELLIDO", "N° COM"];

/// Everything needed to lay out the monthly attendance sheet.
pub(crate) struct MatrixSheet {
    pub organization: String,
    pub zone: String,
    pub title: String,
    pub month_label: String,
    pub dates: Vec<String>,
    /// `(fixed columns, cells)` per member, already sorted.
    pub rows: Vec<(Vec<String>, Vec<Cell>)>,
    pub signatures: Vec<(String, String)>,
}

impl MatrixSheet {
    pub fn new(matrix: &AttendanceMatrix, report: &ReportConfig) -> Self {
        let month_label = month_name(matrix.month).to_string();

        let rows = matrix
            .rows
            .iter()
            .map(|r| {
                let fixed = vec![
                    pad_member_id(r.member.id),
                    r.member.full_name.to_uppercase(),
                    community_or(r.member.community_number.as_deref(), "-"),
                ];
                (fixed, r.cells.clone())
            })
            .collect();

        Self {
            organization: report.organization.clone(),
            zone: report.zone.clone(),
            title: format!("ASISTENCIA DE {month_label}"),
            month_label,
            dates: matrix.date_labels(),
            rows,
            signatures: report
                .signatures
                .iter()
                .map(|s| (s.name.clone(), s.role.clone()))
                .collect(),
        }
    }

    pub fn headers(&self) -> Vec<String> {
        MATRIX_FIXED_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(self.dates.iter().cloned())
            .collect()
    }

    /// Rows as plain strings (fixed columns followed by A/F/blank).
    pub fn table(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|(fixed, cells)| {
                fixed
                    .iter()
                    .cloned()
                    .chain(cells.iter().map(|c| c.symbol().to_string()))
                    .collect()
            })
            .collect()
    }
}
