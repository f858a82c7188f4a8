pub mod memory;
pub mod pdf_reader;

pub use memory::MemoryDocument;
pub use pdf_reader::{PdfReader, PopplerOpener};

use anyhow::Result;
use std::path::Path;

use crate::core::geometry::ClipRegion;

/// A document whose pages can be read one clip region at a time.
pub trait PageTextSource {
    fn page_count(&self) -> Result<u32>;

    /// Text inside `clip` on the 1-based `page`.
    fn region_text(&self, page: u32, clip: &ClipRegion) -> Result<String>;
}

/// Opens documents by path. Shared across worker threads in corpus mode.
pub trait DocumentOpener: Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PageTextSource>>;
}
