use std::path::Path;
use std::process::Command;

use super::{DocumentRenderer, ReportDocument};
use crate::error::{DashboardError, Result};

/// Embedded Typst template for the monthly report
/// Uses a placeholder that gets replaced with the actual JSON file path
const REPORT_TEMPLATE: &str = r##"// Monthly Report Template
// Layout blocks are loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  margin: (top: 15mm, bottom: 15mm, left: 10mm, right: 10mm),
)

#set text(font: "Helvetica", size: 12pt)

#align(center)[#text(size: 14pt, weight: "bold")[#data.title]]
#if data.subtitle != none [
  #align(center)[#text(size: 9pt, fill: gray)[#data.subtitle]]
]
#v(10pt)

#for item in data.blocks {
  if item.kind == "line" {
    [#item.text \ ]
  } else if item.kind == "space" {
    v(item.points * 1pt)
  } else if item.kind == "image" {
    image(item.file, width: 100%)
  } else if item.kind == "pagebreak" {
    pagebreak()
  }
}
"##;

/// Builds the report PDF with the Typst CLI
#[derive(Debug, Clone)]
pub struct TypstRenderer {
    program: String,
}

impl Default for TypstRenderer {
    fn default() -> Self {
        Self::new("typst")
    }
}

impl TypstRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DocumentRenderer for TypstRenderer {
    fn render(&self, document: &ReportDocument, work_dir: &Path) -> Result<Vec<u8>> {
        // Check if typst is available
        let typst_check = Command::new(&self.program).arg("--version").output();

        if typst_check.is_err() {
            return Err(DashboardError::TypstNotFound);
        }

        // Serialize the layout to JSON
        let json_data = serde_json::to_string(document)
            .map_err(|e| DashboardError::PdfGeneration(e.to_string()))?;

        let json_path = work_dir.join("report_data.json");
        std::fs::write(&json_path, &json_data)?;

        // Template reads the JSON relative to itself
        let template_content = REPORT_TEMPLATE.replace("DATA_JSON_PATH", "report_data.json");
        let template_path = work_dir.join("report.typ");
        std::fs::write(&template_path, &template_content)?;

        let pdf_path = work_dir.join("report.pdf");

        // Run typst compile with root set to the work directory
        let output = Command::new(&self.program)
            .arg("compile")
            .arg("--root")
            .arg(work_dir)
            .arg(&template_path)
            .arg(&pdf_path)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DashboardError::PdfGeneration(stderr.to_string()));
        }

        let bytes = std::fs::read(&pdf_path)?;

        // Clean up temp files
        let _ = std::fs::remove_file(&template_path);
        let _ = std::fs::remove_file(&json_path);
        let _ = std::fs::remove_file(&pdf_path);

        log::debug!("typst produced {} bytes", bytes.len());
        Ok(bytes)
    }
}
