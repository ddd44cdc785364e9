//! Executable mappings of a process and their symbol tables.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use super::elf::ElfImage;
use super::maps::read_maps;
use crate::error::Result;
use crate::types::{Address, MemoryRegion, ProcessId, SymbolHit};

/// One executable mapping with the image it came from
#[derive(Debug, Clone)]
pub struct MappedImage
{
    pub region: MemoryRegion,
    pub image: Arc<ElfImage>,
    pub bias: u64,
}

/// Symbol lookup across every executable, file-backed mapping of a process
#[derive(Debug, Default)]
pub struct ImageIndex
{
    mappings: Vec<MappedImage>,
}

impl ImageIndex
{
    /// Load symbol tables for the executable mappings of `pid`
    ///
    /// Each file is parsed once even if it is mapped several times. Files
    /// that cannot be read or parsed are skipped with a warning; their
    /// addresses simply stay unresolved.
    ///
    /// ## Errors
    ///
    /// - `Io`: `/proc/<pid>/maps` cannot be read
    pub fn load(pid: ProcessId) -> Result<Self>
    {
        Ok(Self::from_regions(read_maps(pid)?))
    }

    /// Build an index from already-parsed regions
    pub fn from_regions(regions: Vec<MemoryRegion>) -> Self
    {
        let mut images: HashMap<PathBuf, Option<Arc<ElfImage>>> = HashMap::new();
        let mut mappings = Vec::new();

        for region in regions {
            if !region.is_executable() || !region.is_file_backed() {
                continue;
            }
            let Some(path) = region.path.clone() else {
                continue;
            };

            let image = images
                .entry(path)
                .or_insert_with_key(|path| match ElfImage::load(path) {
                    Ok(image) => Some(Arc::new(image)),
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "Skipping image without usable symbols");
                        None
                    }
                })
                .clone();

            let Some(image) = image else {
                continue;
            };
            let Some(bias) = image.load_bias(&region) else {
                warn!(path = %image.path().display(), offset = region.offset, "No load segment covers mapping");
                continue;
            };

            mappings.push(MappedImage { region, image, bias });
        }

        debug!(mappings = mappings.len(), images = images.len(), "Indexed executable mappings");
        Self { mappings }
    }

    pub fn mappings(&self) -> &[MappedImage]
    {
        &self.mappings
    }

    /// Symbol containing the runtime address `address`
    pub fn lookup(&self, address: Address) -> Option<SymbolHit>
    {
        let mapping = self.mappings.iter().find(|mapping| mapping.region.contains(address))?;
        mapping.image.lookup(address.value().wrapping_sub(mapping.bias))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[inline(never)]
    fn image_index_marker(depth: u32) -> u32
    {
        if depth == 0 {
            0
        } else {
            std::hint::black_box(image_index_marker(depth - 1)) + 1
        }
    }

    #[test]
    fn test_lookup_own_function()
    {
        let index = ImageIndex::load(ProcessId::from(std::process::id())).unwrap();
        assert!(!index.mappings().is_empty());

        let marker = image_index_marker as fn(u32) -> u32 as usize as u64;
        assert_eq!(image_index_marker(std::hint::black_box(3)), 3);

        let hit = index.lookup(Address::from(marker + 1)).expect("marker function should resolve");
        assert!(hit.identifier.contains("image_index_marker"), "unexpected symbol {hit}");
        assert_eq!(hit.offset, 1);
        assert_eq!(hit.section, ".text");
    }

    #[test]
    fn test_lookup_outside_mappings()
    {
        let index = ImageIndex::default();
        assert!(index.lookup(Address::from(0x1000)).is_none());
    }
}
