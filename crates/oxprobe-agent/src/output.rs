use oxprobe_common::accumulator::Accumulator;
use oxprobe_common::types::{Fields, Metric, Tags};
use std::io::Write;
use std::sync::Mutex;

/// Writes each metric as one JSON object per line.
pub struct JsonLinesAccumulator<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesAccumulator<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> Accumulator for JsonLinesAccumulator<W> {
    fn add_fields(&self, measurement: &str, fields: Fields, tags: Tags) {
        let metric = Metric::new(measurement, fields, tags);
        let line = match serde_json::to_string(&metric) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(measurement, error = %e, "Failed to serialize metric");
                return;
            }
        };

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            tracing::warn!(measurement, error = %e, "Failed to write metric");
        }
    }

    fn add_error(&self, err: anyhow::Error) {
        tracing::warn!(error = %format!("{err:#}"), "Gather error");
    }
}
