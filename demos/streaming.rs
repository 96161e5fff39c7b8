//! Drives the engine one byte at a time and reports triggers and retries.

use libctph::{FuzzyHash, StepOutcome};

fn main() -> libctph::Result<()> {
    println!("=== Streaming fuzzy hash ===\n");

    let text = b"The crow sat upon a branch holding a piece of cheese in her beak, \
while a fox passing below caught the scent and stopped to look up.";
    let mut engine = FuzzyHash::new(text.len() as u64)?;
    println!(
        "Input: {} bytes, initial block size {}",
        text.len(),
        engine.block_size()
    );

    while engine.needs_retry() {
        println!("\nAttempt {} (block size {}):", engine.attempt(), engine.block_size());
        for (i, &byte) in text.iter().enumerate() {
            match engine.step(byte) {
                StepOutcome::Consumed => {
                    let triggers = engine.last_triggers();
                    if triggers.first || triggers.second {
                        println!(
                            "   byte {i:3} {:?}: first={} second={} -> {engine}",
                            byte as char, triggers.first, triggers.second
                        );
                    }
                }
                StepOutcome::Retry => {
                    println!("   too short, halving to {}", engine.block_size());
                }
                StepOutcome::Finalized => break,
            }
        }
    }

    println!("\nSignature: {engine}");
    Ok(())
}
