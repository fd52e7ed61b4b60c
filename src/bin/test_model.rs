use log::info;
use rl_rnn_convert::config::SmokeTestConfig;
use rl_rnn_convert::smoke_test::{probe_unseeded_stack, smoke_test};

/// Reloads the exported model, runs it on one random input, then runs the
/// unseeded probe layers.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SmokeTestConfig::default();

    let output = smoke_test(&config.model_dir)?;
    println!("{}", output);

    let probe = probe_unseeded_stack(config.probe_input_width)?;
    info!(
        "probe shapes: single unit {:?}, stack {:?}",
        probe.single_unit, probe.stacked
    );
    Ok(())
}
