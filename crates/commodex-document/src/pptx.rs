//! PowerPoint (OOXML) text extraction with slide markers.
//!
//! Reads `ppt/slides/slideN.xml` entries straight from the zip container and
//! pulls the `<a:t>` text runs out of each slide. Inside `<a:tbl>` tables,
//! cell texts are collected per row and joined with ` | ` so tabular data
//! stays readable as one line per row.

use crate::DocumentError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Extract text from a PowerPoint file, one `--- Slide N ---` marker per
/// slide.
pub(crate) fn extract(path: &Path) -> Result<String, DocumentError> {
    let file = File::open(path).map_err(|e| DocumentError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        DocumentError::Parse(format!(
            "not an OOXML container: {e}; legacy .ppt files must be converted to .pptx"
        ))
    })?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    if slides.is_empty() {
        return Err(DocumentError::Parse(
            "no slides found in presentation".to_string(),
        ));
    }

    let mut text = String::new();
    for (number, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| DocumentError::Parse(e.to_string()))?
            .read_to_string(&mut xml)
            .map_err(|e| DocumentError::Io {
                path: name.clone(),
                source: e,
            })?;
        text.push_str(&format!("\n--- Slide {number} ---\n"));
        text.push_str(&slide_text(&xml)?);
    }
    Ok(text)
}

/// Slide index from an archive entry name, e.g. `ppt/slides/slide3.xml` → 3.
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Pull the visible text out of one slide's XML: one line per paragraph,
/// table rows flattened as ` | `-joined cells.
fn slide_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();

    let mut in_run_text = false;
    let mut table_depth = 0usize;
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut row_cells: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                b"a:t" => in_run_text = true,
                b"a:tbl" => table_depth += 1,
                b"a:tr" => row_cells.clear(),
                b"a:tc" => cell.clear(),
                _ => {}
            },
            Ok(Event::Text(run)) if in_run_text => {
                let run = run
                    .unescape()
                    .map_err(|e| DocumentError::Parse(format!("slide XML error: {e}")))?;
                if table_depth > 0 {
                    cell.push_str(&run);
                } else {
                    paragraph.push_str(&run);
                }
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"a:t" => in_run_text = false,
                b"a:p" => {
                    if table_depth > 0 {
                        // Paragraph break inside a table cell.
                        cell.push(' ');
                    } else if !paragraph.trim().is_empty() {
                        out.push_str(paragraph.trim());
                        out.push('\n');
                    }
                    paragraph.clear();
                }
                b"a:tc" => {
                    row_cells.push(cell.trim().to_string());
                    cell.clear();
                }
                b"a:tr" => {
                    let row: Vec<&str> = row_cells
                        .iter()
                        .map(String::as_str)
                        .filter(|cell| !cell.is_empty())
                        .collect();
                    if !row.is_empty() {
                        out.push_str(&row.join(" | "));
                        out.push('\n');
                    }
                    row_cells.clear();
                }
                b"a:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::Parse(format!("slide XML error: {e}"))),
            _ => {}
        }
    }

    Ok(out)
}
