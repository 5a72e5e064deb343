//! Identifier helpers.

use bech32::Bech32m;
use uuid7::uuid7;

// construct a collision-resistant id then encode using bech32 under a readable prefix
pub fn new_prefixed_id(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}
