// rc522/src/protocol/checksum.rs

/// CRC_A preset defined by ISO/IEC 14443-3 Annex B (ModeReg = 0x3D).
pub const CRC_A_PRESET: u16 = 0x6363;

/// Compute CRC_A in software, as the MFRC522 CRC coprocessor does.
///
/// The result is in transmission order: low byte first.
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    let mut crc = CRC_A_PRESET;
    for &byte in data {
        let mut b = byte ^ (crc & 0x00ff) as u8;
        b ^= b << 4;
        let b = b as u16;
        crc = (crc >> 8) ^ (b << 8) ^ (b << 3) ^ (b >> 4);
    }
    crc.to_le_bytes()
}

/// Block Check Character: XOR of the four UID-field bytes of a cascade level.
pub fn bcc(uid_field: &[u8]) -> u8 {
    uid_field.iter().fold(0u8, |acc, &b| acc ^ b)
}
