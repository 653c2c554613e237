//! Paginated PDF export of journal entries.
//!
//! Export runs in two steps. [`layout_document`] places every line on a page
//! without touching the PDF backend, which keeps pagination and blank-answer
//! handling testable. [`render_pdf`] then draws the placed lines with the
//! built-in Helvetica faces.

use super::metrics::text_width_mm;
use crate::constants::{DISPLAY_TIMESTAMP_FORMAT, PDF_DOCUMENT_TITLE};
use crate::entry::StoredEntry;
use crate::errors::{AppResult, ExportError};
use chrono::FixedOffset;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const INDENT_MM: f32 = 5.0;
/// Printable width of a line starting at the left margin.
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
/// Printable width of an indented body line.
const BODY_WIDTH_MM: f32 = TEXT_WIDTH_MM - INDENT_MM;

/// Visual role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    EntryHeader,
    SectionHeading,
    Body,
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 18.0,
            LineStyle::EntryHeader => 13.0,
            LineStyle::SectionHeading => 11.0,
            LineStyle::Body => 10.0,
        }
    }

    /// Vertical space the line occupies, in millimetres.
    fn height(self) -> f32 {
        match self {
            LineStyle::Title => 12.0,
            LineStyle::EntryHeader => 9.0,
            LineStyle::SectionHeading => 7.0,
            LineStyle::Body => 5.0,
        }
    }

    fn is_bold(self) -> bool {
        !matches!(self, LineStyle::Body)
    }

    /// Rendered width of `text` in this style, in millimetres.
    pub fn width_mm(self, text: &str) -> f32 {
        text_width_mm(text, self.font_size(), self.is_bold())
    }
}

/// A line with its position on the page (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub style: LineStyle,
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
}

/// One laid-out page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

struct Cursor {
    pages: Vec<Page>,
    y_mm: f32,
}

impl Cursor {
    fn new() -> Self {
        Cursor {
            pages: vec![Page::default()],
            y_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn break_page(&mut self) {
        self.pages.push(Page::default());
        self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    /// Starts a new page unless `needed` millimetres fit on the current one.
    fn ensure_room(&mut self, needed: f32) {
        let page_is_empty = self.pages.last().map_or(true, |p| p.lines.is_empty());
        if self.y_mm - needed < MARGIN_MM && !page_is_empty {
            self.break_page();
        }
    }

    fn push(&mut self, style: LineStyle, text: impl Into<String>, indent: bool) {
        self.ensure_room(style.height());
        self.y_mm -= style.height();
        let x_mm = if indent { MARGIN_MM + INDENT_MM } else { MARGIN_MM };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(PlacedLine {
                style,
                text: text.into(),
                x_mm,
                y_mm: self.y_mm,
            });
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y_mm -= mm;
    }
}

/// Greedy word wrap on whitespace, measured in the given style.
///
/// Lines never exceed `max_width_mm`; a word wider than that on its own is
/// split between characters.
pub fn wrap_text(text: &str, style: LineStyle, max_width_mm: f32) -> Vec<String> {
    let fits = |candidate: &str| style.width_mm(candidate) <= max_width_mm;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Replaces characters the built-in fonts cannot draw.
///
/// The base-14 fonts cover Latin-1, so accented Spanish text survives while
/// typographic punctuation is folded to ASCII and anything else becomes `?`.
pub fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            c if c.is_control() => out.push(' '),
            c if (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Lays out entries in the given order.
///
/// Each entry gets a header line with its timestamp (in `offset`) and
/// location, then one block per section. Blank answers are skipped and a
/// section whose answers are all blank is omitted. Answers keep their
/// questionnaire ordinal.
pub fn layout_document(entries: &[StoredEntry], offset: FixedOffset) -> Vec<Page> {
    let mut cursor = Cursor::new();
    cursor.push(LineStyle::Title, PDF_DOCUMENT_TITLE, false);

    if entries.is_empty() {
        cursor.push(LineStyle::Body, "No entries recorded.", false);
    }

    for stored in entries {
        let entry = &stored.entry;
        cursor.gap(3.0);
        // Keep a header together with at least one following line
        cursor.ensure_room(LineStyle::EntryHeader.height() + LineStyle::SectionHeading.height());
        let header = format!(
            "{} - {}",
            entry
                .timestamp
                .with_timezone(&offset)
                .format(DISPLAY_TIMESTAMP_FORMAT),
            entry.display_location()
        );
        for line in wrap_text(&pdf_safe(&header), LineStyle::EntryHeader, TEXT_WIDTH_MM) {
            cursor.push(LineStyle::EntryHeader, line, false);
        }

        for (section, answers) in entry.sections() {
            let filled: Vec<(usize, &String)> = answers
                .iter()
                .enumerate()
                .filter(|(_, answer)| !answer.trim().is_empty())
                .collect();
            if filled.is_empty() {
                continue;
            }

            cursor.ensure_room(LineStyle::SectionHeading.height() + LineStyle::Body.height());
            cursor.push(LineStyle::SectionHeading, section.title(), false);

            for (index, answer) in filled {
                let text = pdf_safe(&format!("{}. {}", index + 1, answer.trim()));
                for line in wrap_text(&text, LineStyle::Body, BODY_WIDTH_MM) {
                    cursor.push(LineStyle::Body, line, true);
                }
            }
        }
    }

    debug!("Laid out {} entries on {} pages", entries.len(), cursor.pages.len());
    cursor.pages
}

fn pdf_err<E: std::fmt::Debug>(e: E) -> ExportError {
    ExportError::Pdf(format!("{:?}", e))
}

/// Draws laid-out pages into PDF bytes.
pub fn render_pdf(pages: &[Page]) -> AppResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        PDF_DOCUMENT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", index + 1),
            )
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let font = if line.style.is_bold() { &bold } else { &regular };
            layer.use_text(
                line.text.clone(),
                line.style.font_size(),
                Mm(line.x_mm),
                Mm(line.y_mm),
                font,
            );
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_err)?;
    debug!("Rendered PDF ({} bytes, {} pages)", bytes.len(), pages.len().max(1));
    Ok(bytes)
}
