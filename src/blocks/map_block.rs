//! Map Block - the directory at offset 0 of every SOR file.
//!
//! The Map lists every other block in file order together with its revision
//! number and byte size. Blocks are stored back to back, starting right after
//! the Map itself, so a block's position is the Map's `block_size` plus the
//! sizes of every entry listed before it.

use crate::{
    Error, Result,
    blocks::common::{BlockBuilder, BlockParse, BlockWrite, ByteCursor, checked_count},
};
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

/// Size of the Map's fixed part: `"Map\0"`, revision, block size, block count.
pub const MAP_FIXED_SIZE: i32 = 4 + 2 + 4 + 2;

/// One directory entry of the Map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockInfo {
    /// Block identifier, e.g. `"FxdParams"`.
    pub identifier: String,
    /// Revision of the block layout (e.g. 200 for SR-4731 issue 2).
    pub revision_number: u16,
    /// Size of the block in bytes, including its header.
    pub size: i32,
}

impl BlockInfo {
    /// Number of bytes this entry occupies inside the Map.
    pub fn encoded_len(&self) -> usize {
        self.identifier.len() + 1 + 2 + 4
    }

    fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let identifier = cursor.read_nul_str()?;
        let revision_number = cursor.read_u16()?;
        let size = cursor.read_i32()?;
        Ok(Self {
            identifier,
            revision_number,
            size,
        })
    }

    fn write(&self, builder: &mut BlockBuilder) -> Result<()> {
        builder.write_nul_str("block identifier", &self.identifier)?;
        builder.write_u16(self.revision_number);
        builder.write_i32(self.size);
        Ok(())
    }
}

/// The SOR directory block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapBlock {
    /// Revision of the Map layout.
    pub revision_number: u16,
    /// Size of the Map in bytes; equally, the offset of the first listed block.
    pub block_size: i32,
    /// Number of blocks in the file, counting the Map itself.
    pub block_count: i16,
    /// Entries for every block after the Map, in file order.
    pub block_info: Vec<BlockInfo>,
}

impl BlockParse for MapBlock {
    const ID: &'static str = "Map";

    fn parse_body(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let revision_number = cursor.read_u16()?;
        let block_size = cursor.read_i32()?;
        let block_count = cursor.read_i16()?;

        let entries = checked_count(i64::from(block_count) - 1, "Map block count")?;
        // The smallest entry is a one-byte identifier: 1 + 1 + 2 + 4 bytes.
        let mut block_info = Vec::with_capacity(cursor.capacity_for(entries, 8));
        for _ in 0..entries {
            block_info.push(BlockInfo::parse(cursor)?);
        }

        Ok(Self {
            revision_number,
            block_size,
            block_count,
            block_info,
        })
    }
}

impl BlockWrite for MapBlock {
    const ID: &'static str = "Map";

    fn write_body(&self, builder: &mut BlockBuilder) -> Result<()> {
        builder.write_u16(self.revision_number);
        builder.write_i32(self.block_size);
        builder.write_i16(self.block_count);
        for info in &self.block_info {
            info.write(builder)?;
        }
        Ok(())
    }
}

impl MapBlock {
    /// Start a new, empty directory carrying `revision_number`.
    pub fn new(revision_number: u16) -> Self {
        Self {
            revision_number,
            block_size: MAP_FIXED_SIZE,
            block_count: 1,
            block_info: Vec::new(),
        }
    }

    /// Look up the entry for `identifier`. The first match wins.
    pub fn find(&self, identifier: &str) -> Option<&BlockInfo> {
        self.block_info.iter().find(|b| b.identifier == identifier)
    }

    /// Append an entry for a block of `size` bytes, taking its revision from
    /// the same identifier in `original`.
    ///
    /// # Errors
    /// [`Error::MissingMapEntry`] if `original` has no such identifier, and
    /// [`Error::FieldOverflow`] if the size or counts exceed their wire width.
    pub fn push_entry(&mut self, original: &MapBlock, identifier: &str, size: usize) -> Result<()> {
        let revision_number = original
            .find(identifier)
            .map(|b| b.revision_number)
            .ok_or_else(|| Error::MissingMapEntry(String::from(identifier)))?;

        let info = BlockInfo {
            identifier: String::from(identifier),
            revision_number,
            size: i32::try_from(size).map_err(|_| Error::FieldOverflow {
                field: "block size",
                value: size,
            })?,
        };
        let entry_len = info.encoded_len();
        self.block_size = i32::try_from(entry_len)
            .ok()
            .and_then(|len| self.block_size.checked_add(len))
            .ok_or(Error::FieldOverflow {
                field: "Map block size",
                value: entry_len,
            })?;
        self.block_count = self.block_count.checked_add(1).ok_or(Error::FieldOverflow {
            field: "Map block count",
            value: self.block_info.len() + 2,
        })?;
        self.block_info.push(info);
        Ok(())
    }

    /// Compute the byte range of every listed block, in directory order.
    ///
    /// Ranges come from a single running sum that starts at `block_size`.
    /// A range is an `Err` when the running offset overflows, when a size is
    /// negative, or when the block would end past `buffer_len`. Once the
    /// offset itself can no longer be tracked, every later entry fails too.
    pub fn block_ranges(&self, buffer_len: usize) -> Vec<(&BlockInfo, Result<Range<usize>>)> {
        let mut ranges = Vec::with_capacity(self.block_info.len());
        let mut offset = usize::try_from(self.block_size).ok();

        for info in &self.block_info {
            let range = match offset {
                Some(start) => locate(info, start, buffer_len),
                None => Err(Error::OffsetOverflow {
                    identifier: info.identifier.clone(),
                }),
            };
            offset = offset.and_then(|start| {
                usize::try_from(info.size)
                    .ok()
                    .and_then(|size| start.checked_add(size))
            });
            ranges.push((info, range));
        }

        ranges
    }

    /// Compute the byte range of the block named `identifier`.
    pub fn block_range(&self, identifier: &str, buffer_len: usize) -> Result<Range<usize>> {
        self.block_ranges(buffer_len)
            .into_iter()
            .find(|(info, _)| info.identifier == identifier)
            .map(|(_, range)| range)
            .unwrap_or_else(|| Err(Error::BlockNotFound(String::from(identifier))))
    }

    /// Slice the bytes of the block named `identifier` out of a whole file.
    pub fn extract<'a>(&self, data: &'a [u8], identifier: &str) -> Result<&'a [u8]> {
        let range = self.block_range(identifier, data.len())?;
        Ok(&data[range])
    }
}

fn locate(info: &BlockInfo, start: usize, buffer_len: usize) -> Result<Range<usize>> {
    let size = usize::try_from(info.size).map_err(|_| Error::InvalidCount {
        field: "block size",
        value: i64::from(info.size),
    })?;
    let end = start.checked_add(size).ok_or_else(|| Error::OffsetOverflow {
        identifier: info.identifier.clone(),
    })?;
    if start > buffer_len || end > buffer_len {
        return Err(Error::BlockOutOfRange {
            identifier: info.identifier.clone(),
            offset: start,
            size,
            buffer_len,
        });
    }
    Ok(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn entry(id: &str, size: i32) -> BlockInfo {
        BlockInfo {
            identifier: String::from(id),
            revision_number: 200,
            size,
        }
    }

    fn map(entries: Vec<BlockInfo>) -> MapBlock {
        let mut map = MapBlock::new(200);
        map.block_count = entries.len() as i16 + 1;
        map.block_size += entries.iter().map(|e| e.encoded_len() as i32).sum::<i32>();
        map.block_info = entries;
        map
    }

    #[test]
    fn map_roundtrip() -> Result<()> {
        let map = map(vec![entry("GenParams", 58), entry("DataPts", 1024)]);
        let bytes = map.to_bytes()?;
        assert_eq!(bytes.len(), map.block_size as usize);
        assert_eq!(MapBlock::from_bytes(&bytes)?, map);
        Ok(())
    }

    #[test]
    fn zero_block_count_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"Map\0");
        bytes.extend_from_slice(&200u16.to_le_bytes());
        bytes.extend_from_slice(&12i32.to_le_bytes());
        bytes.extend_from_slice(&0i16.to_le_bytes());
        assert!(matches!(
            MapBlock::from_bytes(&bytes),
            Err(Error::InvalidCount { value: -1, .. })
        ));
    }

    #[test]
    fn ranges_follow_running_sum() -> Result<()> {
        let map = map(vec![entry("A", 10), entry("B", 20), entry("C", 5)]);
        let base = map.block_size as usize;
        let len = base + 35;
        assert_eq!(map.block_range("A", len)?, base..base + 10);
        assert_eq!(map.block_range("B", len)?, base + 10..base + 30);
        assert_eq!(map.block_range("C", len)?, base + 30..base + 35);
        Ok(())
    }

    #[test]
    fn out_of_range_block_fails() {
        let map = map(vec![entry("A", 10), entry("B", 20)]);
        let len = map.block_size as usize + 15;
        let ranges = map.block_ranges(len);
        assert!(ranges[0].1.is_ok());
        assert!(matches!(ranges[1].1, Err(Error::BlockOutOfRange { .. })));
    }

    #[test]
    fn negative_size_poisons_later_offsets() {
        let map = map(vec![entry("A", -1), entry("B", 4)]);
        let ranges = map.block_ranges(usize::MAX);
        assert!(matches!(ranges[0].1, Err(Error::InvalidCount { .. })));
        assert!(matches!(ranges[1].1, Err(Error::OffsetOverflow { .. })));
    }

    #[test]
    fn missing_identifier() {
        let map = map(vec![entry("A", 1)]);
        assert!(matches!(
            map.block_range("Z", 100),
            Err(Error::BlockNotFound(_))
        ));
    }

    #[test]
    fn push_entry_reuses_revision() -> Result<()> {
        let mut original = map(vec![entry("SupParams", 10)]);
        original.block_info[0].revision_number = 210;

        let mut rebuilt = MapBlock::new(original.revision_number);
        rebuilt.push_entry(&original, "SupParams", 42)?;
        assert_eq!(rebuilt.block_count, 2);
        assert_eq!(rebuilt.block_size, MAP_FIXED_SIZE + 10 + 1 + 2 + 4);
        assert_eq!(rebuilt.block_info[0].revision_number, 210);
        assert_eq!(rebuilt.block_info[0].size, 42);

        assert!(matches!(
            rebuilt.push_entry(&original, "KeyEvents", 1),
            Err(Error::MissingMapEntry(_))
        ));
        Ok(())
    }
}
