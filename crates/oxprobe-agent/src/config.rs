use anyhow::Context;
use oxprobe_inputs::iptables::IptablesConfig;
use oxprobe_inputs::nginx_plus::NginxPlusConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default)]
    pub inputs: InputsConfig,
}

/// One entry per `[[inputs.<name>]]` table.
#[derive(Debug, Default, Deserialize)]
pub struct InputsConfig {
    #[serde(default)]
    pub iptables: Vec<IptablesConfig>,
    #[serde(default)]
    pub nginx_plus: Vec<NginxPlusConfig>,
}

fn default_interval() -> u64 {
    10
}

impl AgentConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {path}"))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.interval_secs == 0 {
            anyhow::bail!("interval_secs must be greater than zero");
        }
        Ok(config)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.iptables.len() + self.inputs.nginx_plus.len()
    }
}
