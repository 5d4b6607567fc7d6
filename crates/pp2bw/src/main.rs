use pp2bw::{cli, helpers::messages::fail, TARGET};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "pp2bw=info,pp2bw_migrate=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Err(e) = cli::run().await {
        tracing::error!(target: TARGET, error = ?e, "conversion failed");
        fail(e.to_string());
        std::process::exit(1);
    }
}
