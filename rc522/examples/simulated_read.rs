// Read a MIFARE Classic 1K card through the register-level simulator.
//
// Usage:
//   RUST_LOG=rc522=debug cargo run -p rc522 --example simulated_read

use anyhow::Context;
use rc522::prelude::*;
use rc522::protocol::access_bits;
use rc522::test_support::{SimulatedCard, SimulatedField};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let field = SimulatedField::with_cards(vec![
        SimulatedCard::mifare_1k(&[0x04, 0x52, 0x1A, 0x2B, 0x3C, 0x4D, 0x80]),
        SimulatedCard::ultralight(&[0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66]),
    ]);
    field.update_card(0, |card| card.set_block(4, *b"hello, mfrc522!\0"));

    let mut device = DeviceBuilder::new()
        .with_transport(Box::new(MockTransport::with_field(field)))
        .with_rx_gain(RxGain::Db43)
        .build()
        .context("initializing the reader")?;
    println!("Chip version: {:?}", device.version()?);

    while device.is_new_card_present() {
        let card = device.read_card_serial().context("selecting a card")?;
        println!("Card UID = {} ({})", card.uid().to_hex(), card.picc_type());

        if card.picc_type().is_mifare_classic() {
            let block = card.read_block(&mut device, KeyType::A, &MifareKey::DEFAULT, 4)?;
            println!("  block 4: {}", block.to_hex());
            println!("           {:?}", block.to_ascii_safe());
            println!(
                "  factory trailer access bytes: {}",
                bytes_to_hex_spaced(&access_bits(0, 0, 0, 1)?)
            );
        } else {
            let mut buffer = [0u8; 18];
            let n = device.mifare_read(0, &mut buffer)?;
            println!("  pages 0-3: {}", bytes_to_hex_spaced(&buffer[..n - 2]));
        }
        card.halt(&mut device)?;
    }

    println!("No more cards in the field");
    Ok(())
}
