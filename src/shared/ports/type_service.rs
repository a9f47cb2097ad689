//! Type-service port (§6, consumed by L3 LSP Enrichment)
//!
//! An external type-checker is out of scope (Non-goals); L3 only ever talks
//! to it through this cache-fronted port.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub type_str: Option<String>,
    pub docs: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionLocation {
    pub line: u32,
    pub col: u32,
}

pub trait TypeService: Send + Sync {
    fn hover(&self, file: &str, line: u32, col: u32) -> Option<HoverInfo>;
    fn definition(&self, file: &str, line: u32, col: u32) -> Option<DefinitionLocation>;
}

/// A no-op implementation: every call misses. Used when no external type
/// service is configured; L3 degrades to "no hover/definition" rather than
/// failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTypeService;

impl TypeService for NullTypeService {
    fn hover(&self, _file: &str, _line: u32, _col: u32) -> Option<HoverInfo> {
        None
    }

    fn definition(&self, _file: &str, _line: u32, _col: u32) -> Option<DefinitionLocation> {
        None
    }
}
