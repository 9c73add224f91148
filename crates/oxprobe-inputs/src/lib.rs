//! Metric inputs for the oxprobe agent.
//!
//! Each [`Input`] implementation polls one kind of source (the `iptables`
//! CLI, an NGINX Plus status endpoint) and hands every record it builds to
//! the [`Accumulator`] supplied by the caller.

pub mod error;
pub mod iptables;
pub mod nginx_plus;

use async_trait::async_trait;
use oxprobe_common::accumulator::Accumulator;
use std::sync::Arc;

/// A metric source polled by the host at every collection interval.
#[async_trait]
pub trait Input: Send + Sync {
    /// Returns the input name (e.g., `"iptables"`), used for logging and
    /// configuration sections.
    fn name(&self) -> &str;

    /// Example TOML for this input, as accepted by its config struct.
    fn sample_config(&self) -> &'static str;

    /// Gathers one round of metrics into `acc`.
    ///
    /// # Errors
    ///
    /// Returns an error only when the gather cannot run at all. Failures of a
    /// single chain or URL are reported through [`Accumulator::add_error`]
    /// and the remaining sources are still polled.
    async fn gather(&mut self, acc: Arc<dyn Accumulator>) -> error::Result<()>;
}
