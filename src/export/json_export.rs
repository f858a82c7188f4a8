use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::export::Exporter;

/// Where rendered results go.
#[derive(Debug, Clone, Default)]
pub enum OutputTarget {
    #[default]
    Stdout,
    File(PathBuf),
}

/// Pretty-prints results as JSON indented by four spaces.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    target: OutputTarget,
}

impl JsonExporter {
    pub fn new(target: OutputTarget) -> Self {
        Self { target }
    }

    pub fn to_file(path: PathBuf) -> Self {
        Self::new(OutputTarget::File(path))
    }
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .context("failed to serialize results")?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

impl Exporter for JsonExporter {
    fn export<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let data = render_json(value)?;
        match &self.target {
            OutputTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data.as_bytes())?;
                stdout.flush()?;
            }
            OutputTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, data)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Ok(())
    }
}
