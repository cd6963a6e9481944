// rc522/src/protocol/access.rs

use crate::{Error, Result};

/// Encode MIFARE Classic access conditions into sector-trailer bytes 6..=8.
///
/// `g0`..`g2` are the 3-bit conditions (C1 C2 C3) for the data blocks,
/// `g3` for the trailer itself.
pub fn access_bits(g0: u8, g1: u8, g2: u8, g3: u8) -> Result<[u8; 3]> {
    if let Some(bad) = [g0, g1, g2, g3].iter().find(|&&g| g > 0b111) {
        return Err(Error::InvalidArgument(format!(
            "access condition {:#05b} wider than 3 bits",
            bad
        )));
    }

    let c1 = ((g3 & 4) << 1) | (g2 & 4) | ((g1 & 4) >> 1) | ((g0 & 4) >> 2);
    let c2 = ((g3 & 2) << 2) | ((g2 & 2) << 1) | (g1 & 2) | ((g0 & 2) >> 1);
    let c3 = ((g3 & 1) << 3) | ((g2 & 1) << 2) | ((g1 & 1) << 1) | (g0 & 1);

    Ok([
        (!c2 << 4) | (!c1 & 0x0F),
        (c1 << 4) | (!c3 & 0x0F),
        (c3 << 4) | (c2 & 0x0F),
    ])
}
