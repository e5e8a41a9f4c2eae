use tracing_subscriber::EnvFilter;

use tableau::AppConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = tableau::run(AppConfig::from_env()) {
        tracing::error!(error = %err, "tableau exited with an error");
        std::process::exit(1);
    }
}
