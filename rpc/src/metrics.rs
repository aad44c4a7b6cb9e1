//! Prometheus metrics for the voting service.
//!
//! [`ServiceMetrics`] owns a dedicated [`Registry`]; the `/metrics` route
//! encodes it into the Prometheus text exposition format.

use std::time::Duration;

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct ServiceMetrics {
    pub registry: Registry,

    /// Ballots committed.
    pub votes_cast: IntCounter,
    /// Cast attempts rejected, labelled by reason.
    pub vote_rejections: IntCounterVec,
    pub eligibility_requests: IntCounter,
    /// Audit events lost because the audit queue was full or closed.
    pub audit_events_dropped: IntCounter,
    /// Wall time of a successful cast, storage work included.
    pub cast_latency_ms: Histogram,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let votes_cast = register_int_counter_with_registry!(
            Opts::new("evote_votes_cast_total", "Total ballots recorded"),
            registry
        )?;

        let vote_rejections = register_int_counter_vec_with_registry!(
            Opts::new(
                "evote_vote_rejections_total",
                "Cast attempts rejected, by reason"
            ),
            &["reason"],
            registry
        )?;

        let eligibility_requests = register_int_counter_with_registry!(
            Opts::new(
                "evote_eligibility_requests_total",
                "Eligible-election listings served"
            ),
            registry
        )?;

        let audit_events_dropped = register_int_counter_with_registry!(
            Opts::new(
                "evote_audit_events_dropped_total",
                "Audit events dropped because the audit queue was full or closed"
            ),
            registry
        )?;

        let cast_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "evote_cast_latency_ms",
                "Time to validate and record a ballot, in milliseconds"
            )
            .buckets(vec![1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0]),
            registry
        )?;

        Ok(Self {
            registry,
            votes_cast,
            vote_rejections,
            eligibility_requests,
            audit_events_dropped,
            cast_latency_ms,
        })
    }

    pub fn record_cast(&self, elapsed: Duration) {
        self.votes_cast.inc();
        self.cast_latency_ms.observe(elapsed.as_secs_f64() * 1000.0);
    }

    pub fn record_rejection(&self, reason: &str) {
        self.vote_rejections.with_label_values(&[reason]).inc();
    }

    /// Text exposition of every registered metric.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
