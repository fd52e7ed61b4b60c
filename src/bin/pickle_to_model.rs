use log::info;
use rl_rnn_convert::config::ConversionConfig;
use rl_rnn_convert::conversion::run_conversion;

/// Rebuilds the recurrent model from the weight dictionaries under
/// `models/tmp/` and exports it to `models/rl_rnn_2/model`.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ConversionConfig::default();
    info!("converting with {:?}", config);

    let model = run_conversion(&config)?;
    model.summary();

    info!("model written to {}", config.output_dir.display());
    Ok(())
}
