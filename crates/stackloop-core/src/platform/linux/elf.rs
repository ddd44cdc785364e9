//! ELF symbol tables
//!
//! Minimal symbol information for one binary image: every defined text
//! symbol with its address, size, and section name. This is the same data a
//! debugger's `info symbol` works from; no DWARF is read.

use std::fs;
use std::path::{Path, PathBuf};

use object::{Object, ObjectSection, ObjectSegment, ObjectSymbol, SymbolKind};
use tracing::debug;

use crate::error::{Result, StackloopError};
use crate::types::{MemoryRegion, SymbolHit};

#[derive(Debug, Clone)]
struct ElfSymbol
{
    name: String,
    address: u64,
    size: u64,
    section: String,
    section_end: u64,
}

#[derive(Debug, Clone, Copy)]
struct LoadSegment
{
    address: u64,
    file_offset: u64,
    file_size: u64,
}

/// Text symbols of one ELF file, sorted by address
#[derive(Debug)]
pub struct ElfImage
{
    path: PathBuf,
    symbols: Vec<ElfSymbol>,
    segments: Vec<LoadSegment>,
}

impl ElfImage
{
    /// Parse `path` and collect its function symbols
    ///
    /// Falls back to the dynamic symbol table when `.symtab` has been
    /// stripped.
    ///
    /// ## Errors
    ///
    /// - `Io`: the file cannot be read
    /// - `SymbolTable`: the file is not a parseable object
    pub fn load(path: &Path) -> Result<Self>
    {
        let data = fs::read(path)?;
        let file = object::File::parse(&*data)
            .map_err(|err| StackloopError::SymbolTable(format!("failed to parse {}: {err}", path.display())))?;

        let mut symbols = collect_text_symbols(&file, file.symbols());
        if symbols.is_empty() {
            symbols = collect_text_symbols(&file, file.dynamic_symbols());
        }
        symbols.sort_by_key(|symbol| symbol.address);

        let segments = file
            .segments()
            .map(|segment| {
                let (file_offset, file_size) = segment.file_range();
                LoadSegment {
                    address: segment.address(),
                    file_offset,
                    file_size,
                }
            })
            .collect();

        debug!(path = %path.display(), symbols = symbols.len(), "Loaded ELF symbols");
        Ok(Self {
            path: path.to_path_buf(),
            symbols,
            segments,
        })
    }

    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// Difference between runtime and link-time addresses for `region`
    ///
    /// Found from the `PT_LOAD` segment whose file range covers the
    /// mapping's file offset. Non-PIE executables come out as 0.
    pub fn load_bias(&self, region: &MemoryRegion) -> Option<u64>
    {
        let segment = self.segments.iter().find(|segment| {
            region.offset >= segment.file_offset && region.offset < segment.file_offset + segment.file_size.max(1)
        })?;
        let linked = segment.address.wrapping_add(region.offset - segment.file_offset);
        Some(region.start.value().wrapping_sub(linked))
    }

    /// Symbol containing the link-time address `file_address`
    ///
    /// Sized symbols must contain the address. Unsized ones (common for
    /// hand-written assembly) match anything up to the end of their section.
    pub fn lookup(&self, file_address: u64) -> Option<SymbolHit>
    {
        let end = self.symbols.partition_point(|symbol| symbol.address <= file_address);
        let nearest = self.symbols[..end].last()?;
        let candidates = || {
            self.symbols[..end]
                .iter()
                .rev()
                .take_while(|symbol| symbol.address == nearest.address)
        };

        let symbol = candidates()
            .find(|symbol| symbol.size > 0 && file_address < symbol.address.saturating_add(symbol.size))
            .or_else(|| candidates().find(|symbol| symbol.size == 0 && file_address < symbol.section_end))?;

        Some(SymbolHit::new(
            symbol.name.clone(),
            file_address - symbol.address,
            symbol.section.clone(),
        ))
    }
}

fn collect_text_symbols<'data, 'file>(
    file: &'file object::File<'data>,
    symbols: impl Iterator<Item = object::Symbol<'data, 'file>>,
) -> Vec<ElfSymbol>
{
    symbols
        .filter(|symbol| symbol.kind() == SymbolKind::Text && symbol.is_definition() && symbol.address() != 0)
        .filter_map(|symbol| {
            let name = symbol.name().ok().filter(|name| !name.is_empty())?;
            let section = symbol
                .section_index()
                .and_then(|index| file.section_by_index(index).ok());
            let (section_name, section_end) = section.map_or((String::new(), 0), |section| {
                (
                    section.name().unwrap_or_default().to_string(),
                    section.address().saturating_add(section.size()),
                )
            });

            Some(ElfSymbol {
                name: name.to_string(),
                address: symbol.address(),
                size: symbol.size(),
                section: section_name,
                section_end,
            })
        })
        .collect()
}
