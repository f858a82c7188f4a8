use anyhow::Result;

use crate::core::geometry::ClipRegion;
use crate::parser::PageTextSource;

/// Pages held as already-extracted corner text. The clip region is ignored;
/// each string stands for what the region would yield.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<String>,
}

impl MemoryDocument {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }
}

impl PageTextSource for MemoryDocument {
    fn page_count(&self) -> Result<u32> {
        Ok(u32::try_from(self.pages.len())?)
    }

    fn region_text(&self, page: u32, _clip: &ClipRegion) -> Result<String> {
        let idx = page
            .checked_sub(1)
            .ok_or_else(|| anyhow::anyhow!("page numbers start at 1"))? as usize;
        self.pages
            .get(idx)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("page {page} out of range ({} pages)", self.pages.len()))
    }
}
