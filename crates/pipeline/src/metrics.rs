// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pipeline profiling metrics.
//!
//! [`RunMetrics`] collects per-step and aggregate timing for a pipeline
//! run, plus the arena footprint the memory plan settled on.

use std::time::Duration;

/// Timing for a single pipeline step.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StepMetrics {
    /// Function name of the step.
    pub function_name: String,
    /// Time spent in the step's `run`.
    pub run_duration: Duration,
}

/// Aggregate metrics for one pipeline run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunMetrics {
    /// Total wall-clock time of the run.
    pub total_duration: Duration,
    /// Per-step timings, in execution order.
    pub step_metrics: Vec<StepMetrics>,
    /// Arena slab size committed by the memory plan.
    pub arena_bytes: usize,
}

impl RunMetrics {
    /// Creates an empty metrics container.
    pub fn new(arena_bytes: usize) -> Self {
        Self {
            total_duration: Duration::ZERO,
            step_metrics: Vec::new(),
            arena_bytes,
        }
    }

    /// Records one step's timing.
    pub fn record_step(&mut self, name: &str, duration: Duration) {
        self.step_metrics.push(StepMetrics {
            function_name: name.to_string(),
            run_duration: duration,
        });
    }

    /// Finalises with the total wall-clock time.
    pub fn finalise(&mut self, total: Duration) {
        self.total_duration = total;
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "run: {:.3} ms total, {} steps, {} B arena\n",
            self.total_duration.as_secs_f64() * 1000.0,
            self.step_metrics.len(),
            self.arena_bytes,
        );
        for step in &self.step_metrics {
            out.push_str(&format!(
                "  {}: {:.3} ms\n",
                step.function_name,
                step.run_duration.as_secs_f64() * 1000.0
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_summarise() {
        let mut metrics = RunMetrics::new(1024);
        metrics.record_step("Conv2d", Duration::from_millis(3));
        metrics.record_step("Activation", Duration::from_millis(1));
        metrics.finalise(Duration::from_millis(5));

        assert_eq!(metrics.step_metrics.len(), 2);
        assert_eq!(metrics.total_duration, Duration::from_millis(5));
        let summary = metrics.summary();
        assert!(summary.contains("2 steps"));
        assert!(summary.contains("Conv2d"));
        assert!(summary.contains("1024 B arena"));
    }

    #[test]
    fn test_serialises_to_json() {
        let mut metrics = RunMetrics::new(0);
        metrics.record_step("ElementwiseAdd", Duration::from_micros(250));
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("ElementwiseAdd"));
    }
}
