//! Synthetic shell link buffers for unit tests

use crate::header::LINK_CLSID;

/// A 76-byte header with the given flag and attribute words
pub fn header_bytes(link_flags: u32, file_attributes: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(76);
    data.extend_from_slice(&0x4Cu32.to_le_bytes());
    data.extend_from_slice(&LINK_CLSID);
    data.extend_from_slice(&link_flags.to_le_bytes());
    data.extend_from_slice(&file_attributes.to_le_bytes());
    data.extend_from_slice(&0x01D0_0000_0000_0000u64.to_le_bytes()); // creation
    data.extend_from_slice(&0u64.to_le_bytes()); // access
    data.extend_from_slice(&0x01D0_0000_0000_0000u64.to_le_bytes()); // write
    data.extend_from_slice(&4096u32.to_le_bytes()); // file size
    data.extend_from_slice(&0i32.to_le_bytes()); // icon index
    data.extend_from_slice(&1u32.to_le_bytes()); // SW_SHOWNORMAL
    data.extend_from_slice(&0u16.to_le_bytes()); // hotkey
    data.extend_from_slice(&[0u8; 10]); // reserved
    data
}

/// A LinkTargetIDList: u16 size, items, terminator
pub fn id_list_bytes(items: &[&[u8]]) -> Vec<u8> {
    let mut body = Vec::new();
    for item in items {
        body.extend_from_slice(&((item.len() + 2) as u16).to_le_bytes());
        body.extend_from_slice(item);
    }
    body.extend_from_slice(&0u16.to_le_bytes());

    let mut data = (body.len() as u16).to_le_bytes().to_vec();
    data.extend(body);
    data
}

/// UTF-16LE bytes of `text` with no terminator
pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

/// UTF-16LE bytes of `text` followed by a NUL code unit
pub fn utf16z(text: &str) -> Vec<u8> {
    let mut data = utf16(text);
    data.extend_from_slice(&[0, 0]);
    data
}

/// One counted StringData field
pub fn string_field(text: &str, unicode: bool) -> Vec<u8> {
    if unicode {
        let mut data = (text.encode_utf16().count() as u16).to_le_bytes().to_vec();
        data.extend(utf16(text));
        data
    } else {
        let mut data = (text.len() as u16).to_le_bytes().to_vec();
        data.extend_from_slice(text.as_bytes());
        data
    }
}

/// An ExtraData block: size, signature, payload
pub fn extra_block(signature: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = ((payload.len() + 8) as u32).to_le_bytes().to_vec();
    data.extend_from_slice(&signature.to_le_bytes());
    data.extend_from_slice(payload);
    data
}

/// ExtraData terminal block
pub fn terminal_block() -> Vec<u8> {
    vec![0, 0, 0, 0]
}

/// LinkInfo with a VolumeID and local base path, from a real shortcut
pub const LOCAL_LINK_INFO: [u8; 101] = [
    101, 0, 0, 0, 28, 0, 0, 0, 1, 0, 0, 0, 28, 0, 0, 0, 45, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0, 17, 0, 0, 0, 3, 0,
    0, 0, 62, 147, 144, 66, 16, 0, 0, 0, 0, 67, 58, 92, 85, 115, 101, 114, 115, 92, 98, 111, 98, 92, 80, 114,
    111, 106, 101, 99, 116, 115, 92, 97, 114, 116, 101, 109, 105, 115, 45, 99, 111, 114, 101, 92, 115, 114, 99,
    92, 102, 105, 108, 101, 115, 121, 115, 116, 101, 109, 92, 110, 116, 102, 115, 0, 0,
];

/// CommonNetworkRelativeLink for \\VBoxSvr\Downloads mapped to Z:
pub const VBOX_NETWORK_LINK: [u8; 43] = [
    43, 0, 0, 0, 3, 0, 0, 0, 20, 0, 0, 0, 40, 0, 0, 0, 0, 0, 37, 0, 92, 92, 86, 66, 111, 120, 83, 118, 114, 92,
    68, 111, 119, 110, 108, 111, 97, 100, 115, 0, 90, 58, 0,
];

/// TrackerDataBlock written on host "desktop-eis938n"
pub const TRACKER_BLOCK: [u8; 96] = [
    96, 0, 0, 0, 3, 0, 0, 160, 88, 0, 0, 0, 0, 0, 0, 0, 100, 101, 115, 107, 116, 111, 112, 45, 101, 105, 115,
    57, 51, 56, 110, 0, 104, 69, 141, 62, 17, 228, 24, 73, 143, 120, 151, 205, 108, 179, 64, 197, 192, 88, 241,
    9, 106, 90, 237, 17, 161, 13, 8, 0, 39, 110, 180, 94, 104, 69, 141, 62, 17, 228, 24, 73, 143, 120, 151,
    205, 108, 179, 64, 197, 192, 88, 241, 9, 106, 90, 237, 17, 161, 13, 8, 0, 39, 110, 180, 94,
];

/// A ConsoleDataBlock payload for a Consolas 16px window
pub fn console_payload() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&0x0007u16.to_le_bytes());
    data.extend_from_slice(&0x00F5u16.to_le_bytes());
    for value in [120i16, 9001, 120, 30, 0, 0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0x0010_0000u32.to_le_bytes());
    data.extend_from_slice(&0x36u32.to_le_bytes());
    data.extend_from_slice(&400u32.to_le_bytes());
    let mut face = utf16("Consolas");
    face.resize(64, 0);
    data.extend(face);
    for value in [25u32, 0, 1, 1, 1, 50, 4, 0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    for index in 0..16u32 {
        data.extend_from_slice(&(index * 0x0011_1111).to_le_bytes());
    }
    data
}

/// A serialized property storage around already-encoded values, without terminator
pub fn property_storage(format_id: &uuid::Uuid, values: &[u8]) -> Vec<u8> {
    let size = 4 + 4 + 16 + values.len() + 4;
    let mut data = (size as u32).to_le_bytes().to_vec();
    data.extend_from_slice(&0x5350_5331u32.to_le_bytes());
    data.extend_from_slice(&format_id.to_bytes_le());
    data.extend_from_slice(values);
    data.extend_from_slice(&0u32.to_le_bytes());
    data
}
