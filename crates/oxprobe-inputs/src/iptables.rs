//! Packet and byte counters of commented iptables rules.
//!
//! Each configured chain is listed with `iptables -nvL <chain> -t <table> -x`
//! and every rule carrying a `/* comment */` becomes one `iptables` metric.
//! Rules without a comment are skipped: the comment is the only stable rule
//! identifier across reloads.

use crate::error::{InputError, Result};
use crate::Input;
use async_trait::async_trait;
use oxprobe_common::accumulator::Accumulator;
use oxprobe_common::fields;
use oxprobe_common::types::Tags;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tokio::process::Command;

const MEASUREMENT: &str = "iptables";

const SAMPLE_CONFIG: &str = r#"# Gather packets and bytes throughput from iptables
[[inputs.iptables]]
  ## iptables normally needs root. Either run the agent as root, grant it
  ## CAP_NET_ADMIN, or allow `sudo iptables -nvL *` without a password.
  use_sudo = false
  ## Wait for the xtables lock (-w 5) instead of failing when it is held.
  use_lock = false
  ## Binary to run, e.g. "ip6tables" for the IPv6 tables.
  # binary = "iptables"
  ## Table and chains to monitor. Only rules with a comment are reported.
  table = "filter"
  chains = ["INPUT"]
"#;

static CHAIN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Chain\s+(\S+)").expect("static regex"));
static FIELDS_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*pkts\s+bytes\s+target").expect("static regex"));
static VALUES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s+(\d+)\s+(\w+).*?/\*\s*(.+?)\s*\*/\s*").expect("static regex")
});

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IptablesConfig {
    #[serde(default)]
    pub use_sudo: bool,
    #[serde(default)]
    pub use_lock: bool,
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub chains: Vec<String>,
}

fn default_binary() -> String {
    "iptables".to_string()
}

/// Counters of a single commented rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCounters {
    pub chain: String,
    pub target: String,
    pub rule_id: String,
    pub pkts: u64,
    pub bytes: u64,
}

/// Produces the raw `-nvL` listing of a chain.
#[async_trait]
pub trait ChainLister: Send + Sync {
    async fn list(&self, table: &str, chain: &str) -> Result<String>;
}

/// Lists chains by running the iptables binary.
pub struct CommandLister {
    binary: String,
    use_sudo: bool,
    use_lock: bool,
}

impl CommandLister {
    pub fn new(config: &IptablesConfig) -> Self {
        let binary = if config.binary.is_empty() {
            default_binary()
        } else {
            config.binary.clone()
        };
        Self {
            binary,
            use_sudo: config.use_sudo,
            use_lock: config.use_lock,
        }
    }

    /// Program and argv for listing `chain` of `table` with an already
    /// resolved binary path.
    fn command_line(&self, resolved: &Path, table: &str, chain: &str) -> (String, Vec<String>) {
        let resolved = resolved.to_string_lossy().into_owned();
        let mut args = Vec::new();
        let program = if self.use_sudo {
            args.push(resolved);
            "sudo".to_string()
        } else {
            resolved
        };
        if self.use_lock {
            args.extend(["-w".to_string(), "5".to_string()]);
        }
        args.extend([
            "-nvL".to_string(),
            chain.to_string(),
            "-t".to_string(),
            table.to_string(),
            "-x".to_string(),
        ]);
        (program, args)
    }
}

#[async_trait]
impl ChainLister for CommandLister {
    async fn list(&self, table: &str, chain: &str) -> Result<String> {
        let resolved = look_path(&self.binary)?;
        let (program, args) = self.command_line(&resolved, table, chain);
        tracing::debug!(program = %program, args = ?args, "Listing iptables chain");

        let output = Command::new(&program)
            .args(&args)
            .output()
            .await
            .map_err(|source| InputError::Command {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InputError::CommandStatus {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Resolves `binary` the way a shell would: names containing a slash are
/// taken as paths, anything else is searched for in `$PATH`.
fn look_path(binary: &str) -> Result<PathBuf> {
    if binary.contains('/') {
        let path = PathBuf::from(binary);
        return if is_executable(&path) {
            Ok(path)
        } else {
            Err(InputError::BinaryNotFound(binary.to_string()))
        };
    }

    std::env::var_os("PATH")
        .and_then(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join(binary))
                .find(|candidate| is_executable(candidate))
        })
        .ok_or_else(|| InputError::BinaryNotFound(binary.to_string()))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Parses the output of `iptables -nvL <chain> -x`.
///
/// Listings shorter than three lines (header only, or empty) yield no rules.
///
/// # Errors
///
/// Returns [`InputError::IptablesParse`] when the first line is not a
/// `Chain` header or the second line is not the column header.
pub fn parse_chain_listing(data: &str) -> Result<Vec<RuleCounters>> {
    let lines: Vec<&str> = data.split('\n').collect();
    if lines.len() < 3 {
        return Ok(Vec::new());
    }

    let chain = CHAIN_NAME_RE
        .captures(lines[0])
        .map(|c| c[1].to_string())
        .ok_or(InputError::IptablesParse)?;
    if !FIELDS_HEADER_RE.is_match(lines[1]) {
        return Err(InputError::IptablesParse);
    }

    let mut rules = Vec::new();
    for line in &lines[2..] {
        let Some(caps) = VALUES_RE.captures(line) else {
            continue;
        };
        // Counters wider than u64 cannot come from the kernel; drop the line.
        let (Ok(pkts), Ok(bytes)) = (caps[1].parse::<u64>(), caps[2].parse::<u64>()) else {
            continue;
        };
        rules.push(RuleCounters {
            chain: chain.clone(),
            target: caps[3].to_string(),
            rule_id: caps[4].to_string(),
            pkts,
            bytes,
        });
    }

    Ok(rules)
}

pub struct Iptables {
    config: IptablesConfig,
    lister: Box<dyn ChainLister>,
}

impl Iptables {
    pub fn new(config: IptablesConfig) -> Self {
        let lister = Box::new(CommandLister::new(&config));
        Self { config, lister }
    }

    pub fn with_lister(config: IptablesConfig, lister: Box<dyn ChainLister>) -> Self {
        Self { config, lister }
    }

    fn emit(&self, rule: RuleCounters, acc: &dyn Accumulator) {
        let mut tags = Tags::new();
        tags.insert("table".to_string(), self.config.table.clone());
        tags.insert("chain".to_string(), rule.chain);
        tags.insert("target".to_string(), rule.target);
        tags.insert("ruleid".to_string(), rule.rule_id);

        acc.add_fields(
            MEASUREMENT,
            fields! { "pkts" => rule.pkts, "bytes" => rule.bytes },
            tags,
        );
    }
}

#[async_trait]
impl Input for Iptables {
    fn name(&self) -> &str {
        "iptables"
    }

    fn sample_config(&self) -> &'static str {
        SAMPLE_CONFIG
    }

    async fn gather(&mut self, acc: Arc<dyn Accumulator>) -> Result<()> {
        if self.config.table.is_empty() || self.config.chains.is_empty() {
            return Ok(());
        }

        // Best effort: a failing chain is reported and the next one is tried.
        for chain in &self.config.chains {
            let data = match self.lister.list(&self.config.table, chain).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(table = %self.config.table, chain = %chain, error = %e, "Failed to list chain");
                    acc.add_error(e.into());
                    continue;
                }
            };

            match parse_chain_listing(&data) {
                Ok(rules) => {
                    tracing::debug!(chain = %chain, count = rules.len(), "Parsed iptables rules");
                    for rule in rules {
                        self.emit(rule, acc.as_ref());
                    }
                }
                Err(e) => acc.add_error(e.into()),
            }
        }

        Ok(())
    }
}
