// src/export/xlsx.rs

use crate::core::report::{AttendanceRow, Cell};
use crate::errors::{AppError, AppResult};
use crate::export::model::{MatrixSheet, get_headers, row_to_cells};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x000000))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
}

fn text_format(bg: Color) -> Format {
    Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

fn write_headers(ws: &mut Worksheet, row: u32, headers: &[String]) -> AppResult<Vec<usize>> {
    let fmt = header_format();
    for (col, header) in headers.iter().enumerate() {
        ws.write_with_format(row, col as u16, header.as_str(), &fmt)
            .map_err(xlsx_error)?;
    }
    Ok(headers.iter().map(|h| UnicodeWidthStr::width(h.as_str())).collect())
}

fn set_widths(ws: &mut Worksheet, widths: &[usize]) -> AppResult<()> {
    for (c, w) in widths.iter().enumerate() {
        ws.set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

/// Flat report with banded rows and auto-sized columns.
pub(crate) fn export_xlsx(rows: &[AttendanceRow], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Asistencia").map_err(xlsx_error)?;

    let headers: Vec<String> = get_headers().iter().map(|h| h.to_string()).collect();
    let mut col_widths = write_headers(worksheet, 0, &headers)?;
    worksheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;

    let band1 = Color::RGB(0xF2F2F2);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, r) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let fmt = text_format(if row_index % 2 == 0 { band1 } else { band2 });

        for (col, value) in row_to_cells(r).iter().enumerate() {
            // ids, dates and QR tokens stay text
            worksheet
                .write_with_format(row, col as u16, value.as_str(), &fmt)
                .map_err(xlsx_error)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    set_widths(worksheet, &col_widths)?;
    workbook.save(path).map_err(xlsx_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Monthly sheet: titles, month band, A in green and F in red.
pub(crate) fn export_matrix_xlsx(sheet: &MatrixSheet, path: &Path) -> AppResult<()> {
    info(format!("Exporting matrix to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.month_label).map_err(xlsx_error)?;

    let headers = sheet.headers();
    let last_col = headers.len().saturating_sub(1) as u16;
    let fixed_cols = (headers.len() - sheet.dates.len()) as u16;

    let title_fmt = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);
    let titles = [&sheet.organization, &sheet.zone, &sheet.title];
    for (i, title) in titles.iter().enumerate() {
        worksheet
            .merge_range(i as u32, 0, i as u32, last_col, title.as_str(), &title_fmt)
            .map_err(xlsx_error)?;
    }

    if !sheet.dates.is_empty() {
        if fixed_cols < last_col {
            worksheet
                .merge_range(4, fixed_cols, 4, last_col, &sheet.month_label, &header_format())
                .map_err(xlsx_error)?;
        } else {
            worksheet
                .write_with_format(4, fixed_cols, sheet.month_label.as_str(), &header_format())
                .map_err(xlsx_error)?;
        }
    }

    let mut col_widths = write_headers(worksheet, 5, &headers)?;
    worksheet.set_freeze_panes(6, fixed_cols).map_err(xlsx_error)?;

    let plain = text_format(Color::RGB(0xFFFFFF));
    let present = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x059669))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let absent = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xE11D48))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);
    let blank = Format::new().set_border(FormatBorder::Thin);

    for (i, (fixed, cells)) in sheet.rows.iter().enumerate() {
        let row = 6 + i as u32;

        for (col, value) in fixed.iter().enumerate() {
            worksheet
                .write_with_format(row, col as u16, value.as_str(), &plain)
                .map_err(xlsx_error)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }

        for (j, cell) in cells.iter().enumerate() {
            let fmt = match cell {
                Cell::Present => &present,
                Cell::Absent => &absent,
                Cell::Blank => &blank,
            };
            worksheet
                .write_with_format(row, fixed_cols + j as u16, cell.symbol(), fmt)
                .map_err(xlsx_error)?;
        }
    }

    set_widths(worksheet, &col_widths)?;
    workbook.save(path).map_err(xlsx_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn xlsx_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
