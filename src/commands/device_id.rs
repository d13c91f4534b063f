use anyhow::Result;
use showcase_core::fingerprint::{DeviceSignals, VoterIdentity};

pub fn run(
    user_agent: String,
    language: String,
    screen_width: u32,
    screen_height: u32,
    timezone_offset: i32,
) -> Result<()> {
    let signals = DeviceSignals {
        user_agent,
        language,
        screen_width,
        screen_height,
        timezone_offset,
    };

    println!("{}", signals.voter_id());
    Ok(())
}
