//! Prometheus counters for catalog loads, selections and sessions
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub catalog_loads: IntCounter,
    pub catalog_rejections: IntCounter,
    pub risk_selections: IntCounter,
    pub active_sessions: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("findings".to_string()), None)?;

        let catalog_loads = IntCounter::new("catalog_loads_total", "Finding snapshots loaded")?;
        let catalog_rejections =
            IntCounter::new("catalog_rejections_total", "Finding snapshots rejected at load")?;
        let risk_selections = IntCounter::new("risk_selections_total", "Risk detail modals opened")?;
        let active_sessions = IntGauge::new("active_sessions", "Open navigation sessions")?;

        registry.register(Box::new(catalog_loads.clone()))?;
        registry.register(Box::new(catalog_rejections.clone()))?;
        registry.register(Box::new(risk_selections.clone()))?;
        registry.register(Box::new(active_sessions.clone()))?;

        Ok(Self {
            registry,
            catalog_loads,
            catalog_rejections,
            risk_selections,
            active_sessions,
        })
    }

    /// Text exposition of every registered metric
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
