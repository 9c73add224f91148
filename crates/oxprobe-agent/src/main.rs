mod config;
mod output;

use anyhow::Result;
use oxprobe_common::accumulator::Accumulator;
use oxprobe_inputs::iptables::{Iptables, IptablesConfig};
use oxprobe_inputs::nginx_plus::{NginxPlus, NginxPlusConfig};
use oxprobe_inputs::Input;
use output::JsonLinesAccumulator;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing_subscriber::EnvFilter;

fn build_inputs(config: &config::AgentConfig) -> Vec<Box<dyn Input>> {
    let mut inputs: Vec<Box<dyn Input>> = Vec::new();
    for cfg in &config.inputs.iptables {
        inputs.push(Box::new(Iptables::new(cfg.clone())));
    }
    for cfg in &config.inputs.nginx_plus {
        inputs.push(Box::new(NginxPlus::new(cfg.clone())));
    }
    inputs
}

fn print_sample_config() {
    let samples: [Box<dyn Input>; 2] = [
        Box::new(Iptables::new(IptablesConfig::default())),
        Box::new(NginxPlus::new(NginxPlusConfig::default())),
    ];
    println!("interval_secs = 10\n");
    for input in &samples {
        println!("{}", input.sample_config());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("oxprobe=info".parse()?))
        .init();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--sample-config") {
        print_sample_config();
        return Ok(());
    }
    let config_path = arg.unwrap_or_else(|| "config/agent.toml".to_string());

    let config = config::AgentConfig::load(&config_path)?;
    let mut inputs = build_inputs(&config);
    if inputs.is_empty() {
        tracing::warn!(config = %config_path, "No inputs configured");
    }

    let acc: Arc<dyn Accumulator> = Arc::new(JsonLinesAccumulator::new(std::io::stdout()));
    let mut tick = interval(Duration::from_secs(config.interval_secs));

    tracing::info!(
        interval_secs = config.interval_secs,
        inputs = config.input_count(),
        "oxprobe-agent starting"
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {
                for input in &mut inputs {
                    if let Err(e) = input.gather(Arc::clone(&acc)).await {
                        tracing::warn!(input = input.name(), error = %e, "Gather failed");
                    }
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Shutting down gracefully");
                break;
            }
        }
    }

    Ok(())
}
