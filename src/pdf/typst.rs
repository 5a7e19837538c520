use std::fmt::Write as _;
use std::process::Command;

use crate::error::{LedgerError, Result};
use crate::report::{Document, Line};

/// Points to millimetres
const PT_TO_MM: f32 = 0.3528;

/// Share of the font size between the top of a glyph box and its baseline
const ASCENT: f32 = 0.8;

/// Preamble for the generated Typst source. Pagination is already decided, so
/// the page has no margin and every line is placed absolutely.
const PREAMBLE: &str = r##"// Income & Expense Report
// Generated layout: every line is placed at a fixed position

#set page(width: PAGE_WIDTHmm, height: PAGE_HEIGHTmm, margin: 0mm)
#set text(font: "Helvetica", size: 10pt)
"##;

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn place_line(out: &mut String, line: &Line) {
    let size = line.style.font_size();
    let dy = (line.y - size * PT_TO_MM * ASCENT).max(0.0);
    let (r, g, b) = line.tone.rgb();
    let weight = if line.style.bold() { "bold" } else { "regular" };

    for cell in &line.cells {
        let _ = writeln!(
            out,
            "#place(top + left, dx: {:.2}mm, dy: {:.2}mm, text(size: {}pt, weight: \"{}\", fill: rgb({}, {}, {}), \"{}\"))",
            cell.x,
            dy,
            size,
            weight,
            r,
            g,
            b,
            escape(&cell.text)
        );
    }
}

/// Typst markup reproducing the document page for page
pub fn typst_source(document: &Document) -> String {
    let mut out = PREAMBLE
        .replace("PAGE_WIDTH", &format!("{:.2}", document.geometry.width))
        .replace("PAGE_HEIGHT", &format!("{:.2}", document.geometry.height));

    for (idx, page) in document.pages.iter().enumerate() {
        if idx > 0 {
            out.push_str("#pagebreak()\n");
        }
        let _ = writeln!(out, "// Page {}", page.number);
        for line in &page.lines {
            place_line(&mut out, line);
        }
    }

    out
}

/// Compile the document with the Typst CLI and return the PDF bytes
pub fn render_pdf(document: &Document) -> Result<Vec<u8>> {
    // Check if typst is available
    let typst_check = Command::new("typst").arg("--version").output();

    if typst_check.is_err() {
        return Err(LedgerError::TypstNotFound);
    }

    // Private directory per call so parallel renders never share files
    let temp_dir = tempfile::Builder::new().prefix("payshare-").tempdir()?;

    let template_path = temp_dir.path().join("report.typ");
    let pdf_path = temp_dir.path().join("report.pdf");
    std::fs::write(&template_path, typst_source(document))?;

    let output = Command::new("typst")
        .arg("compile")
        .arg("--root")
        .arg(temp_dir.path())
        .arg(&template_path)
        .arg(&pdf_path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LedgerError::PdfGeneration(stderr.to_string()));
    }

    Ok(std::fs::read(&pdf_path)?)
}
