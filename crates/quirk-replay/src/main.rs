//! Quirk replay - runs recorded device traffic through the quirk registry
//!
//! Usage: `quirk-replay [SCENARIO]`. The scenario path falls back to the
//! `QUIRK_SCENARIO` environment variable.

use anyhow::Context;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuya_quirks::{QuirkEvent, QuirkRegistry};

mod scenario;

use scenario::Step;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quirk_replay=debug,tuya_quirks=debug,info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QUIRK_SCENARIO").ok())
        .map(PathBuf::from)
        .context("No scenario given (pass a path or set QUIRK_SCENARIO)")?;

    tracing::info!("Replaying scenario {}", path.display());
    let scenario = scenario::load(&path).await?;

    let registry = QuirkRegistry::with_builtin_quirks()?;
    let mut events = registry.subscribe();

    let device = scenario.device.to_device()?;
    let ieee = device.ieee_address;
    if !registry.pair(&device) {
        anyhow::bail!(
            "No quirk matches {} ({:?} / {:?})",
            device.ieee_address_string(),
            device.manufacturer,
            device.model
        );
    }

    for (i, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            Step::Frame { cluster_id, asdu } => {
                let bytes = scenario::parse_hex(asdu)
                    .with_context(|| format!("Step {i}: bad frame"))?;
                registry.handle_zcl(&ieee, *cluster_id, &bytes).map(|_| ())
            }
            Step::DataPoint { dp } => registry.handle_data_point(&ieee, dp).map(|_| ()),
        };
        if let Err(e) = result {
            tracing::warn!("Step {} rejected: {}", i, e);
        }

        while let Ok(event) = events.try_recv() {
            if let QuirkEvent::AttributeUpdated { update, .. } = event {
                tracing::info!(
                    "EP{} cluster {:#06x} attr {:#06x} -> {:?}",
                    update.endpoint_id,
                    update.cluster_id,
                    update.attribute_id,
                    update.value
                );
            }
        }
    }

    let snapshot = registry
        .snapshot(&ieee)
        .context("Device disappeared during replay")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
