//! Default metrics reporter backed by a private Prometheus registry

use parking_lot::RwLock;
use platform_core::MetricsReporter;
use prometheus::core::Collector;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

use crate::TelemetryError;

pub const DEFAULT_NAMESPACE: &str = "micro";

/// Reporter keeping one metric family per name in its own registry
///
/// Label names are fixed by the first sample of a family. Samples that
/// conflict with an existing family (another kind under the same name, or a
/// different label set) are dropped with a warning.
pub struct PrometheusReporter {
    namespace: String,
    registry: Registry,
    counters: RwLock<HashMap<String, IntCounterVec>>,
    gauges: RwLock<HashMap<String, GaugeVec>>,
    timings: RwLock<HashMap<String, HistogramVec>>,
}

impl PrometheusReporter {
    pub fn new(namespace: &str) -> Result<Self, TelemetryError> {
        if !is_valid_name(namespace) {
            return Err(TelemetryError::InvalidNamespace(namespace.to_string()));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            registry: Registry::new(),
            counters: RwLock::new(HashMap::new()),
            gauges: RwLock::new(HashMap::new()),
            timings: RwLock::new(HashMap::new()),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode every family in the Prometheus text format
    pub fn render(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }

    fn opts(&self, metric: &str) -> Opts {
        Opts::new(metric, format!("{} reported by the platform", metric))
            .namespace(self.namespace.clone())
    }

    /// Look up the family for `name`, registering it on first use
    fn family<V>(
        &self,
        families: &RwLock<HashMap<String, V>>,
        name: &str,
        make: impl FnOnce(&str) -> prometheus::Result<V>,
    ) -> Option<V>
    where
        V: Collector + Clone + 'static,
    {
        let metric = sanitize(name);
        if let Some(family) = families.read().get(&metric) {
            return Some(family.clone());
        }

        let mut families = families.write();
        if let Some(family) = families.get(&metric) {
            return Some(family.clone());
        }

        let registered = make(&metric).and_then(|family| {
            self.registry.register(Box::new(family.clone()))?;
            Ok(family)
        });
        match registered {
            Ok(family) => {
                families.insert(metric, family.clone());
                Some(family)
            }
            Err(e) => {
                warn!(metric = %metric, error = %e, "Dropping metric sample");
                None
            }
        }
    }
}

impl MetricsReporter for PrometheusReporter {
    fn count(&self, name: &str, value: u64, tags: &[(&str, &str)]) {
        let names = label_names(tags);
        let keys: Vec<&str> = names.iter().map(String::as_str).collect();
        let Some(family) = self.family(&self.counters, name, |metric| {
            IntCounterVec::new(self.opts(metric), &keys)
        }) else {
            return;
        };

        match family.get_metric_with(&labels(&keys, tags)) {
            Ok(counter) => counter.inc_by(value),
            Err(e) => warn!(metric = name, error = %e, "Dropping counter sample"),
        }
    }

    fn gauge(&self, name: &str, value: f64, tags: &[(&str, &str)]) {
        let names = label_names(tags);
        let keys: Vec<&str> = names.iter().map(String::as_str).collect();
        let Some(family) = self.family(&self.gauges, name, |metric| {
            GaugeVec::new(self.opts(metric), &keys)
        }) else {
            return;
        };

        match family.get_metric_with(&labels(&keys, tags)) {
            Ok(gauge) => gauge.set(value),
            Err(e) => warn!(metric = name, error = %e, "Dropping gauge sample"),
        }
    }

    fn timing(&self, name: &str, value: Duration, tags: &[(&str, &str)]) {
        let names = label_names(tags);
        let keys: Vec<&str> = names.iter().map(String::as_str).collect();
        let Some(family) = self.family(&self.timings, name, |metric| {
            let opts = HistogramOpts::new(metric, format!("{} duration in seconds", metric))
                .namespace(self.namespace.clone());
            HistogramVec::new(opts, &keys)
        }) else {
            return;
        };

        match family.get_metric_with(&labels(&keys, tags)) {
            Ok(histogram) => histogram.observe(value.as_secs_f64()),
            Err(e) => warn!(metric = name, error = %e, "Dropping timing sample"),
        }
    }
}

fn label_names(tags: &[(&str, &str)]) -> Vec<String> {
    tags.iter().map(|(key, _)| sanitize(key)).collect()
}

fn labels<'a>(keys: &[&'a str], tags: &[(&str, &'a str)]) -> HashMap<&'a str, &'a str> {
    keys.iter()
        .copied()
        .zip(tags.iter().map(|(_, value)| *value))
        .collect()
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Map dotted names (`requests.total`) onto the metric name alphabet
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
