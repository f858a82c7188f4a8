pub mod json_export;

use anyhow::Result;
use serde::Serialize;

pub use json_export::{render_json, JsonExporter, OutputTarget};

pub trait Exporter {
    fn export<T: Serialize + ?Sized>(&self, value: &T) -> Result<()>;
}
