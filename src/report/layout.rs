//! Page model and pagination
//!
//! Coordinates are millimetres from the top-left corner of the page. A line's
//! `y` is its baseline. The [`Paginator`] walks a vertical cursor down the page
//! and opens a new page whenever the next block would cross the bottom margin.

use serde::Serialize;

/// Vertical position of the footer, measured up from the bottom edge
const FOOTER_OFFSET: f32 = 10.0;

/// Millimetres per character column in the plain-text rendering
const TEXT_MM_PER_CHAR: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PageGeometry {
    /// A4 with 20mm margins
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin: 20.0,
        }
    }
}

impl PageGeometry {
    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextStyle {
    Title,
    Subtitle,
    SectionHeader,
    SubHeader,
    TableHeader,
    Body,
    Notice,
    Summary,
    Footer,
}

impl TextStyle {
    pub fn font_size(self) -> f32 {
        match self {
            TextStyle::Title => 24.0,
            TextStyle::Subtitle => 16.0,
            TextStyle::SectionHeader => 18.0,
            TextStyle::SubHeader => 12.0,
            TextStyle::Summary => 12.0,
            TextStyle::TableHeader | TextStyle::Body | TextStyle::Notice => 10.0,
            TextStyle::Footer => 8.0,
        }
    }

    pub fn bold(self) -> bool {
        matches!(
            self,
            TextStyle::Title | TextStyle::SectionHeader | TextStyle::SubHeader | TextStyle::TableHeader
        )
    }

    /// Headers must not be left alone at the bottom of a page
    pub fn is_heading(self) -> bool {
        matches!(
            self,
            TextStyle::SectionHeader | TextStyle::SubHeader | TextStyle::TableHeader
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Neutral,
    Income,
    Expense,
    Summary,
    Sharing,
    Negative,
    Muted,
}

impl Tone {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tone::Neutral => (0, 0, 0),
            Tone::Income => (34, 197, 94),
            Tone::Expense => (239, 68, 68),
            Tone::Summary => (37, 99, 235),
            Tone::Sharing => (147, 51, 234),
            Tone::Negative => (234, 88, 58),
            Tone::Muted => (128, 128, 128),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Offset from the left page edge
    pub x: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub y: f32,
    pub style: TextStyle,
    pub tone: Tone,
    pub cells: Vec<Cell>,
}

impl Line {
    /// Cell texts joined by single spaces
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub lines: Vec<Line>,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            lines: Vec::new(),
        }
    }

    /// Lines above the footer
    pub fn body(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(|l| l.style != TextStyle::Footer)
    }
}

/// A rendered, paginated report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines().any(|l| l.text().contains(needle))
    }

    /// Plain-text rendering. Cells are aligned to character columns and pages
    /// are separated by a form feed.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (idx, page) in self.pages.iter().enumerate() {
            if idx > 0 {
                out.push('\u{c}');
                out.push('\n');
            }

            for (line_idx, line) in page.lines.iter().enumerate() {
                if line_idx > 0
                    && matches!(line.style, TextStyle::SectionHeader | TextStyle::Footer)
                {
                    out.push('\n');
                }
                out.push_str(&self.text_row(line));
                out.push('\n');
            }
        }

        out
    }

    fn text_row(&self, line: &Line) -> String {
        let mut row = String::new();
        for cell in &line.cells {
            let column = ((cell.x - self.geometry.margin).max(0.0) / TEXT_MM_PER_CHAR) as usize;
            let width = row.chars().count();
            if width < column {
                row.push_str(&" ".repeat(column - width));
            } else if width > 0 {
                row.push(' ');
            }
            row.push_str(&cell.text);
        }
        row.trim_end().to_string()
    }
}

/// Something to place on the page: one line of cells plus the space it consumes
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub style: TextStyle,
    pub tone: Tone,
    pub cells: Vec<(f32, String)>,
    pub advance: f32,
}

impl Block {
    pub fn text(style: TextStyle, tone: Tone, text: impl Into<String>, advance: f32) -> Self {
        Self {
            style,
            tone,
            cells: vec![(0.0, text.into())],
            advance,
        }
    }

    /// `cells` offsets are relative to the left margin
    pub fn row(style: TextStyle, tone: Tone, cells: Vec<(f32, String)>, advance: f32) -> Self {
        Self {
            style,
            tone,
            cells,
            advance,
        }
    }
}

pub struct Paginator {
    geometry: PageGeometry,
    cursor: f32,
    pages: Vec<Page>,
}

impl Paginator {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            cursor: geometry.margin,
            pages: vec![Page::new(1)],
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor + height <= self.geometry.bottom()
    }

    fn at_page_top(&self) -> bool {
        self.current_page().lines.is_empty()
    }

    fn current_page(&self) -> &Page {
        // Invariant: `pages` is never empty
        &self.pages[self.pages.len() - 1]
    }

    pub fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number));
        self.cursor = self.geometry.margin;
    }

    /// Vertical whitespace. Dropped at the top of a fresh page.
    pub fn gap(&mut self, height: f32) {
        if !self.at_page_top() {
            self.cursor += height;
        }
    }

    pub fn place(&mut self, block: Block) {
        if !self.fits(block.advance) && !self.at_page_top() {
            self.new_page();
        }
        self.push(block);
    }

    /// Place blocks on the same page, breaking before the group if it does not fit.
    /// A group taller than a whole page falls back to block-by-block placement.
    pub fn keep_together(&mut self, blocks: Vec<Block>) {
        let height: f32 = blocks.iter().map(|b| b.advance).sum();
        if !self.fits(height) && !self.at_page_top() {
            self.new_page();
        }
        for block in blocks {
            self.place(block);
        }
    }

    fn push(&mut self, block: Block) {
        let margin = self.geometry.margin;
        let line = Line {
            y: self.cursor,
            style: block.style,
            tone: block.tone,
            cells: block
                .cells
                .into_iter()
                .map(|(x, text)| Cell { x: margin + x, text })
                .collect(),
        };
        let last = self.pages.len() - 1;
        self.pages[last].lines.push(line);
        self.cursor += block.advance;
    }

    /// Stamp footers now that the page count is known
    pub fn finish(mut self, footer: impl Fn(usize, usize) -> Vec<(f32, String)>) -> Document {
        let total = self.pages.len();
        let y = self.geometry.height - FOOTER_OFFSET;
        let margin = self.geometry.margin;

        for page in &mut self.pages {
            let cells = footer(page.number, total)
                .into_iter()
                .map(|(x, text)| Cell { x: margin + x, text })
                .collect();
            page.lines.push(Line {
                y,
                style: TextStyle::Footer,
                tone: Tone::Muted,
                cells,
            });
        }

        Document {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}
