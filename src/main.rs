use serde_json::json;
use timerecorder::Recorder;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug)]
struct UpstreamTimeout {
    after_ms: u64,
}

impl std::fmt::Display for UpstreamTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no answer after {}ms", self.after_ms)
    }
}

impl std::error::Error for UpstreamTimeout {}

async fn fetch_user(id: u32) -> Result<serde_json::Value, UpstreamTimeout> {
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    Ok(json!({ "id": id, "name": "ada" }))
}

async fn fetch_orders() -> Result<Vec<u32>, UpstreamTimeout> {
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    Err(UpstreamTimeout { after_ms: 300 })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let recorder = Recorder::new();
    recorder.mark("Boot");

    let config = recorder.track_plain_with("Config", 42u32, |v| Ok(json!({ "retries": v })));
    tracing::info!(config, "config loaded");

    let user = recorder.track_with("Fetch user", fetch_user(7), |outcome| {
        Ok(match outcome {
            Ok(user) => (*user).clone(),
            Err(e) => json!({ "error": e.to_string() }),
        })
    });
    let orders = recorder.track("Fetch orders", fetch_orders());
    let pause = recorder.sleep(200);

    let (user, orders, ()) = tokio::join!(user, orders, pause);
    tracing::info!(?user, "user fetched");
    if let Err(e) = orders {
        tracing::warn!("orders failed: {}", e);
    }

    recorder.mark("Done");
    recorder.play();
    Ok(())
}
