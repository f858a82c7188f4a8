use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::core::geometry::ClipRegion;
use crate::parser::{DocumentOpener, PageTextSource};

/// PDF access through poppler-utils (`pdfinfo`, `pdftotext`).
#[derive(Debug, Clone)]
pub struct PdfReader {
    path: PathBuf,
    page_count: u32,
}

impl PdfReader {
    /// Opens the file and reads its page count, which also verifies that
    /// poppler can parse it.
    pub fn new(path: PathBuf) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("not a readable file: {}", path.display());
        }
        let page_count = get_page_count(&path)?;
        debug!(path = %path.display(), page_count, "opened PDF");
        Ok(Self { path, page_count })
    }
}

impl PageTextSource for PdfReader {
    fn page_count(&self) -> Result<u32> {
        Ok(self.page_count)
    }

    fn region_text(&self, page: u32, clip: &ClipRegion) -> Result<String> {
        extract_region_text(&self.path, page, clip)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PopplerOpener;

impl DocumentOpener for PopplerOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn PageTextSource>> {
        Ok(Box::new(PdfReader::new(path.to_path_buf())?))
    }
}

fn get_page_count(pdf_path: &Path) -> Result<u32> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| {
            format!(
                "failed to invoke pdfinfo on {}; is poppler-utils installed?",
                pdf_path.display()
            )
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("pdfinfo failed with status {}: {}", output.status, stderr.trim());
    }

    parse_page_count(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("reading page count of {}", pdf_path.display()))
}

fn parse_page_count(pdfinfo_stdout: &str) -> Result<u32> {
    for line in pdfinfo_stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            let pages: u32 = num_str.parse().with_context(|| {
                format!("failed to parse page count from 'Pages:' line: {num_str}")
            })?;
            return Ok(pages);
        }
    }

    anyhow::bail!("pdfinfo output did not contain a 'Pages:' line");
}

fn extract_region_text(pdf_path: &Path, page: u32, clip: &ClipRegion) -> Result<String> {
    // At 72 dpi pdftotext's crop box is in points.
    let (x, y, w, h) = clip.to_pixel_box();

    let output = Command::new("pdftotext")
        .arg("-f")
        .arg(page.to_string())
        .arg("-l")
        .arg(page.to_string())
        .arg("-r")
        .arg("72")
        .arg("-x")
        .arg(x.to_string())
        .arg("-y")
        .arg(y.to_string())
        .arg("-W")
        .arg(w.to_string())
        .arg("-H")
        .arg(h.to_string())
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| "failed to invoke pdftotext; is poppler-utils installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "pdftotext failed on page {page} with status {}: {}",
            output.status,
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pages_line() {
        let stdout = "Producer:       IRS\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(stdout).unwrap(), 12);
    }

    #[test]
    fn missing_pages_line_is_an_error() {
        assert!(parse_page_count("Producer: IRS\n").is_err());
        assert!(parse_page_count("Pages: many\n").is_err());
    }

    #[test]
    fn missing_file_fails_to_open() {
        let err = PdfReader::new(PathBuf::from("definitely/not/here.pdf")).unwrap_err();
        assert!(err.to_string().contains("not a readable file"));
    }
}
