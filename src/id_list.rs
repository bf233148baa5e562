//! LinkTargetIDList: the shell namespace path of the link target
//!
//! The list is a sequence of size-prefixed ItemIDs ending in a zero size. Item
//! contents are shell-item specific and kept as opaque bytes.

use crate::error::{Error, Result};
use crate::reader::ByteReader;
use crate::text::base64_bytes;
use serde::{Deserialize, Serialize};

/// LinkTargetIDList structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdList {
    /// IDListSize: bytes following the size field
    pub size: u16,
    pub items: Vec<ItemId>,
}

/// One shell item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemId {
    /// ItemIDSize, including the size field itself
    pub size: u16,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl ItemId {
    /// Shell item class byte, when the item has one
    pub fn class_type(&self) -> Option<u8> {
        self.data.first().copied()
    }
}

impl IdList {
    /// Decode a LinkTargetIDList at the reader's position
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let size = reader.read_u16()?;
        let mut list = reader.take(size as usize, "LinkTargetIDList")?;
        let items = Self::parse_items(&mut list)?;
        log::debug!("IDList: {} bytes, {} items", size, items.len());
        Ok(Self { size, items })
    }

    /// Decode ItemIDs until a zero size or the end of the region
    pub fn parse_items(reader: &mut ByteReader<'_>) -> Result<Vec<ItemId>> {
        let mut items = Vec::new();
        while !reader.is_exhausted() {
            let size = reader.read_u16()?;
            if size == 0 {
                break;
            }
            if size < 2 {
                return Err(Error::InvalidSize {
                    section: reader.section(),
                    field: "ItemIDSize",
                    minimum: 2,
                    actual: size as u64,
                });
            }
            let data = reader.read_bytes(size as usize - 2)?.to_vec();
            items.push(ItemId { size, data });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::id_list_bytes;

    // My Computer root folder item
    const MY_COMPUTER: [u8; 20] = [
        0x14, 0x00, 0x1F, 0x50, 0xE0, 0x4F, 0xD0, 0x20, 0xEA, 0x3A, 0x69, 0x10, 0xA2, 0xD8, 0x08, 0x00, 0x2B,
        0x30, 0x30, 0x9D,
    ];

    #[test]
    fn test_single_root_item() {
        let mut reader = ByteReader::with_section(&MY_COMPUTER, "LinkTargetIDList");
        let items = IdList::parse_items(&mut reader).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].size, 0x14);
        assert_eq!(items[0].data, MY_COMPUTER[2..].to_vec());
        assert_eq!(items[0].data.len(), 18);
        assert_eq!(items[0].class_type(), Some(0x1F));
    }

    #[test]
    fn test_items_in_order() {
        let first = [0x31u8, 0x00, 0xAA];
        let second = [0x32u8; 7];
        let third = [0x2Fu8, b'C', b':', b'\\'];
        let data = id_list_bytes(&[&first, &second, &third]);
        let mut reader = ByteReader::new(&data);
        let list = IdList::parse(&mut reader).unwrap();

        assert_eq!(list.size as usize, data.len() - 2);
        assert_eq!(list.items.len(), 3);
        assert_eq!(list.items[0].data, first.to_vec());
        assert_eq!(list.items[1].data, second.to_vec());
        assert_eq!(list.items[2].data, third.to_vec());
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_empty_list() {
        let data = [0x02, 0x00, 0x00, 0x00];
        let list = IdList::parse(&mut ByteReader::new(&data)).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_item_size_one_is_invalid() {
        let data = [0x04, 0x00, 0x01, 0x00, 0x00, 0x00];
        assert!(matches!(
            IdList::parse(&mut ByteReader::new(&data)),
            Err(Error::InvalidSize { field: "ItemIDSize", actual: 1, .. })
        ));
    }

    #[test]
    fn test_item_overruns_list() {
        // Item claims 16 bytes inside a 6-byte list
        let data = [0x06, 0x00, 0x10, 0x00, 0xAA, 0xBB, 0x00, 0x00];
        assert!(matches!(
            IdList::parse(&mut ByteReader::new(&data)),
            Err(Error::UnexpectedEnd { section: "LinkTargetIDList", .. })
        ));
    }

    #[test]
    fn test_list_overruns_buffer() {
        let data = [0x40, 0x00, 0x00, 0x00];
        assert!(matches!(
            IdList::parse(&mut ByteReader::new(&data)),
            Err(Error::UnexpectedEnd { needed: 0x40, .. })
        ));
    }
}
