//! Raw-markup diagnostics for pages where no product container was found

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Receives the markup of listing pages that yielded no containers
pub trait DiagnosticsSink: Send + Sync {
    fn page_markup(&self, page: u32, markup: &str);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl DiagnosticsSink for NoDiagnostics {
    fn page_markup(&self, _page: u32, _markup: &str) {}
}

/// Writes `debug_page_{n}.html` files into a directory
#[derive(Debug, Clone)]
pub struct DirectoryDiagnostics {
    dir: PathBuf,
}

impl DirectoryDiagnostics {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, page: u32) -> PathBuf {
        self.dir.join(format!("debug_page_{}.html", page))
    }

    fn write(&self, path: &Path, markup: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, markup)
    }
}

impl DiagnosticsSink for DirectoryDiagnostics {
    fn page_markup(&self, page: u32, markup: &str) {
        let path = self.path_for(page);
        match self.write(&path, markup) {
            Ok(()) => tracing::info!("Page HTML saved to {} for analysis", path.display()),
            Err(e) => tracing::warn!("Could not save page HTML to {}: {}", path.display(), e),
        }
    }
}

/// Keeps captured pages in memory
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    pages: Mutex<Vec<(u32, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> Vec<(u32, String)> {
        self.pages
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn page_markup(&self, page: u32, markup: &str) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.push((page, markup.to_string()));
        }
    }
}
