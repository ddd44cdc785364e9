//! Memory map parsing
//!
//! Reads `/proc/<pid>/maps` so code addresses can be attributed to the
//! binary image they were loaded from.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::types::{Address, MemoryRegion, ProcessId};

/// Read and parse `/proc/<pid>/maps`
///
/// ## Errors
///
/// - `Io`: the maps file cannot be read (process gone, no permission)
pub fn read_maps(pid: ProcessId) -> Result<Vec<MemoryRegion>>
{
    let maps_path = format!("/proc/{pid}/maps");
    let maps = fs::read_to_string(&maps_path)?;
    let regions = parse_maps(&maps);
    debug!(%pid, regions = regions.len(), "Read memory map");
    Ok(regions)
}

/// Parse the contents of a maps file, skipping malformed lines
pub fn parse_maps(maps: &str) -> Vec<MemoryRegion>
{
    maps.lines().filter_map(parse_line).collect()
}

/// Parse one line: "start-end perms offset dev inode [pathname]"
fn parse_line(line: &str) -> Option<MemoryRegion>
{
    let mut fields = line.split_whitespace();
    let (start, end) = fields.next()?.split_once('-')?;
    let permissions = fields.next()?;
    let offset = u64::from_str_radix(fields.next()?, 16).ok()?;
    let _device = fields.next()?;
    let _inode = fields.next()?;

    let name = fields.collect::<Vec<_>>().join(" ");
    let name = name.strip_suffix(" (deleted)").unwrap_or(&name);
    let path = (!name.is_empty()).then(|| PathBuf::from(name));

    Some(MemoryRegion::new(
        Address::from(u64::from_str_radix(start, 16).ok()?),
        Address::from(u64::from_str_radix(end, 16).ok()?),
        permissions.to_string(),
        offset,
        path,
    ))
}
