use crate::core::report::Cell;
use crate::export::model::MatrixSheet;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A4 in points.
const A4_SHORT: f32 = 595.0;
const A4_LONG: f32 = 842.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Helvetica uses WinAnsiEncoding; Latin-1 characters map to the same byte,
/// anything else is replaced by `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let cp = c as u32;
            if cp < 0x100 { cp as u8 } else { b'?' }
        })
        .collect()
}

/// Rough Helvetica advance width, good enough for centering and column sizing.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.52
}

pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,
    bold_id: Ref,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl PdfManager {
    pub fn new(orientation: Orientation) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_id = Ref::new(4);
        let next_id = 5;

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let (page_w, page_h) = match orientation {
            Orientation::Portrait => (A4_SHORT, A4_LONG),
            Orientation::Landscape => (A4_LONG, A4_SHORT),
        };

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            page_w,
            page_h,
            margin: 40.0,
            row_h: 18.0,

            next_id,
            font_id,
            bold_id,

            font_size: 8.0,
            header_font_size: 8.5,
            title_font_size: 14.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Start a new page and its content stream.
    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        {
            let mut page = self.pdf.page(page_id);
            page.parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
                .contents(content_id);

            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            fonts.pair(Name(b"F1"), self.font_id);
            fonts.pair(Name(b"F2"), self.bold_id);
        }

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, bold: bool, text: &str) {
        let font = if bold { Name(b"F2") } else { Name(b"F1") };
        let bytes = win_ansi(text);
        content.begin_text();
        content.set_font(font, size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn draw_text_centered(&self, content: &mut Content, cx: f32, y: f32, size: f32, text: &str) {
        let x = cx - text_width(text, size) / 2.0;
        self.draw_text(content, x, y, size, true, text);
    }

    fn fill_rect(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32, rgb: [f32; 3]) {
        content.save_state();
        content.set_fill_rgb(rgb[0], rgb[1], rgb[2]);
        content.rect(x, y, w, h);
        content.fill_nonzero();
        content.restore_state();
    }

    fn draw_cell_borders(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_stroke_rgb(0.0, 0.0, 0.0);
        content.set_line_width(0.4);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    fn draw_row(
        &self,
        content: &mut Content,
        y: f32,
        col_widths: &[f32],
        row: &[String],
        font_size: f32,
        bold: bool,
    ) {
        let mut x = self.margin;

        for (i, text) in row.iter().enumerate() {
            let w = col_widths.get(i).copied().unwrap_or(0.0);
            self.draw_text(content, x + 3.0, y + 5.5, font_size, bold, text);
            self.draw_cell_borders(content, x, y, w, self.row_h);
            x += w;
        }
    }

    /// Column widths from header + content, scaled to fit the page width.
    fn compute_col_widths(&self, headers: &[String], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| text_width(h, self.header_font_size) + 8.0)
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = w.max(text_width(cell, self.font_size) + 8.0);
                }
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;

        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    fn draw_page_number(&self, content: &mut Content, page: usize) {
        let pg = format!("Page {}", page);
        self.draw_text(
            content,
            self.page_w - self.margin - 40.0,
            self.margin / 2.0,
            self.font_size,
            false,
            &pg,
        );
    }

    fn draw_header_row(&self, content: &mut Content, y: f32, widths: &[f32], headers: &[String]) {
        let total: f32 = widths.iter().sum();
        content.save_state();
        content.set_fill_rgb(0.0, 0.0, 0.0);
        content.rect(self.margin, y, total, self.row_h);
        content.fill_nonzero();
        content.restore_state();

        // white header text on black
        content.save_state();
        content.set_fill_rgb(1.0, 1.0, 1.0);
        self.draw_row(content, y, widths, headers, self.header_font_size, true);
        content.restore_state();
    }

    /// Multi-page table with a title (flat attendance report).
    pub fn write_table(&mut self, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let col_widths = self.compute_col_widths(&headers, rows);

        let mut remaining: &[Vec<String>] = rows;
        let mut page_idx = 1;

        loop {
            let mut content = self.new_page();
            self.draw_text(
                &mut content,
                self.margin,
                self.page_h - self.margin,
                self.title_font_size,
                true,
                title,
            );
            self.draw_page_number(&mut content, page_idx);

            let mut y = self.page_h - self.margin - 30.0;
            self.draw_header_row(&mut content, y, &col_widths, &headers);
            y -= self.row_h;

            let mut consumed = 0;
            for (i, row) in remaining.iter().enumerate() {
                if y < self.margin {
                    break;
                }

                if i % 2 == 0 {
                    let total: f32 = col_widths.iter().sum();
                    self.fill_rect(&mut content, self.margin, y, total, self.row_h, [0.96; 3]);
                }

                self.draw_row(&mut content, y, &col_widths, row, self.font_size, false);
                y -= self.row_h;
                consumed += 1;
            }

            self.finalize_page(content);
            remaining = &remaining[consumed..];
            page_idx += 1;

            if remaining.is_empty() || consumed == 0 {
                break;
            }
        }
    }

    /// Monthly sheet: titles, month band over the date columns, coloured
    /// A/F cells and signature lines after the table.
    pub fn write_matrix(&mut self, sheet: &MatrixSheet) {
        let headers = sheet.headers();
        let table = sheet.table();
        let col_widths = self.compute_col_widths(&headers, &table);
        let center = self.page_w / 2.0;
        let fixed_cols = headers.len() - sheet.dates.len();

        let mut remaining: &[(Vec<String>, Vec<Cell>)] = &sheet.rows;
        let mut page_idx = 1;

        loop {
            let mut content = self.new_page();
            let top = self.page_h - self.margin;

            self.draw_text_centered(&mut content, center, top, 20.0, &sheet.organization);
            self.draw_text_centered(&mut content, center, top - 20.0, 13.0, &sheet.zone);
            self.draw_text_centered(&mut content, center, top - 42.0, 16.0, &sheet.title);
            self.draw_page_number(&mut content, page_idx);

            // month band above the date columns
            let mut y = top - 75.0;
            let fixed_w: f32 = col_widths[..fixed_cols].iter().sum();
            let dates_w: f32 = col_widths[fixed_cols..].iter().sum();
            if dates_w > 0.0 {
                let x = self.margin + fixed_w;
                self.fill_rect(&mut content, x, y, dates_w, self.row_h, [0.0; 3]);
                content.save_state();
                content.set_fill_rgb(1.0, 1.0, 1.0);
                self.draw_text_centered(
                    &mut content,
                    x + dates_w / 2.0,
                    y + 5.5,
                    self.header_font_size,
                    &sheet.month_label,
                );
                content.restore_state();
            }
            y -= self.row_h;

            self.draw_header_row(&mut content, y, &col_widths, &headers);
            y -= self.row_h;

            let mut consumed = 0;
            for (fixed, cells) in remaining.iter() {
                if y < self.margin {
                    break;
                }

                self.draw_row(&mut content, y, &col_widths, fixed, self.font_size, false);

                let mut x = self.margin + fixed_w;
                for (i, cell) in cells.iter().enumerate() {
                    let w = col_widths[fixed_cols + i];
                    content.save_state();
                    match cell {
                        Cell::Present => content.set_fill_rgb(0.02, 0.59, 0.41),
                        Cell::Absent => content.set_fill_rgb(0.88, 0.11, 0.28),
                        Cell::Blank => content.set_fill_rgb(0.0, 0.0, 0.0),
                    };
                    let symbol = cell.symbol();
                    self.draw_text_centered(&mut content, x + w / 2.0, y + 5.5, self.font_size, symbol);
                    content.restore_state();
                    self.draw_cell_borders(&mut content, x, y, w, self.row_h);
                    x += w;
                }

                y -= self.row_h;
                consumed += 1;
            }

            remaining = &remaining[consumed..];

            if remaining.is_empty() || consumed == 0 {
                self.finish_with_signatures(content, y, &sheet.signatures);
                break;
            }

            self.finalize_page(content);
            page_idx += 1;
        }
    }

    /// Close the last table page, adding the signature lines below the
    /// table or on a page of their own when there is no room left.
    fn finish_with_signatures(&mut self, mut content: Content, table_bottom: f32, signatures: &[(String, String)]) {
        let line_y = table_bottom - 40.0;

        if signatures.is_empty() || line_y >= self.margin {
            self.draw_signature_lines(&mut content, line_y, signatures);
            self.finalize_page(content);
            return;
        }

        self.finalize_page(content);

        let mut extra = self.new_page();
        let top = self.page_h - self.margin;
        self.draw_signature_lines(&mut extra, top - 60.0, signatures);
        self.finalize_page(extra);
    }

    fn draw_signature_lines(&self, content: &mut Content, line_y: f32, signatures: &[(String, String)]) {
        if signatures.is_empty() {
            return;
        }

        let slot = (self.page_w - 2.0 * self.margin) / signatures.len() as f32;

        for (i, (name, role)) in signatures.iter().enumerate() {
            let cx = self.margin + slot * (i as f32 + 0.5);
            let half = (slot * 0.35).min(110.0);

            content.save_state();
            content.set_stroke_rgb(0.0, 0.0, 0.0);
            content.move_to(cx - half, line_y);
            content.line_to(cx + half, line_y);
            content.stroke();
            content.restore_state();

            self.draw_text_centered(content, cx, line_y - 12.0, 9.0, name);
            let x = cx - text_width(role, 9.0) / 2.0;
            self.draw_text(content, x, line_y - 24.0, 9.0, false, role);
        }
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();

        let bytes = self.pdf.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}
