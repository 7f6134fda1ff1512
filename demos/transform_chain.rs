use tracing::info;
use tracing_subscriber::fmt;

use recrypt_engine::{AsyncRecrypt, EngineConfig, PairingEngine, RecryptScheme, TransformEncryption};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    fmt()
        .with_max_level(tracing::Level::INFO)
        .with_span_events(fmt::format::FmtSpan::ENTER | fmt::format::FmtSpan::CLOSE)
        .with_target(false)
        .with_ansi(false)
        .init();

    let config = EngineConfig::default();
    info!(curve = ?config.curve, hash = ?config.hash, "starting transform chain example");

    let scheme = RecryptScheme::<PairingEngine>::from_config(&config)?;
    let signing = scheme.generate_signing_key_pair()?;

    // group -> user -> device
    let group = scheme.generate_key_pair()?;
    let user = scheme.generate_key_pair()?;
    let device = scheme.generate_key_pair()?;

    // The plaintext only seeds a symmetric key; bulk data never enters the engine
    let plaintext = scheme.generate_plaintext()?;
    let data_key = scheme.derive_symmetric_key(&plaintext);

    let value = scheme.encrypt(&plaintext, group.public_key(), &signing.public, &signing.private)?;
    info!(bytes = value.encoded_len(), "encrypted to the group");

    let group_to_user = scheme.generate_transform_key(
        group.private_key(),
        user.public_key(),
        &signing.public,
        &signing.private,
    )?;
    let user_to_device = scheme.generate_transform_key(
        user.private_key(),
        device.public_key(),
        &signing.public,
        &signing.private,
    )?;
    info!(
        bytes = scheme.create_transform_key_bytes(&group_to_user).len(),
        "transform keys ready"
    );

    // Transforms run on the worker pool
    let engine = AsyncRecrypt::new(scheme);
    let for_user = engine
        .transform(value, group_to_user, signing.clone())
        .wait()?;
    let for_device = engine
        .transform(for_user, user_to_device, signing)
        .wait()?;
    info!(
        hops = for_device.hops(),
        bytes = for_device.encoded_len(),
        "transformed to the device"
    );

    let recovered = engine
        .decrypt(for_device, device.private_key().clone())
        .wait()?;
    let matches = engine.derive_symmetric_key(&recovered) == data_key;
    info!(matches, "device recovered the data key");

    Ok(())
}
