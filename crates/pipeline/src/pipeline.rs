// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The pipeline context: functions, memory plan and execution.

use crate::{Function, PipelineConfig, PipelineError, RunMetrics};
use memory_plan::{LiveRange, MemoryGroup};
use std::time::Instant;
use tensor_core::Tensor;

/// An explicit execution context owning a list of configured functions
/// and the memory plan of their intermediates.
///
/// Construction is explicit — there is no process-wide scheduler or
/// singleton; each pipeline instance carries its own [`MemoryGroup`] and
/// metrics. The lifecycle is:
///
/// 1. Configure functions, appending each with
///    [`add_function`](Pipeline::add_function); register intermediates
///    with [`manage`](Pipeline::manage) as they are created.
/// 2. [`prepare`](Pipeline::prepare) finalizes the memory plan (every
///    intermediate gets its arena lease) and forwards `prepare` to each
///    function. Idempotent.
/// 3. [`run`](Pipeline::run) executes the functions in order,
///    synchronously, preparing first if the caller has not. Repeatable.
pub struct Pipeline {
    config: PipelineConfig,
    group: MemoryGroup,
    steps: Vec<Box<dyn Function>>,
    prepared: bool,
    last_metrics: Option<RunMetrics>,
}

impl Pipeline {
    /// Creates a pipeline with the default configuration.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            group: MemoryGroup::new(),
            steps: Vec::new(),
            prepared: false,
            last_metrics: None,
        }
    }

    /// Creates a pipeline with an explicit configuration.
    pub fn with_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let group = MemoryGroup::with_alignment(config.arena_alignment)?;
        Ok(Self {
            config,
            group,
            steps: Vec::new(),
            prepared: false,
            last_metrics: None,
        })
    }

    /// Appends a configured function as the next step.
    pub fn add_function(&mut self, function: Box<dyn Function>) {
        self.steps.push(function);
    }

    /// Registers an intermediate tensor with the pipeline's memory plan.
    ///
    /// `range` spans the step indices (as passed to `add_function`, in
    /// order) during which the tensor is read or written.
    pub fn manage(&mut self, tensor: &Tensor, range: LiveRange) -> Result<(), PipelineError> {
        self.group.manage(tensor, range)?;
        Ok(())
    }

    /// Returns the number of steps added so far.
    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// Finalizes the memory plan and prepares every function.
    ///
    /// Idempotent: later calls return immediately.
    pub fn prepare(&mut self) -> Result<(), PipelineError> {
        if self.prepared {
            return Ok(());
        }
        self.group.finalize()?;
        tracing::info!(
            steps = self.steps.len(),
            arena_bytes = self.group.arena_bytes(),
            "memory plan committed: {}",
            self.group.stats().summary()
        );
        for step in &mut self.steps {
            step.prepare()?;
        }
        self.prepared = true;
        Ok(())
    }

    /// Runs every step in order, preparing first if necessary.
    ///
    /// With profiling enabled, per-step timings are collected and
    /// available from [`last_metrics`](Pipeline::last_metrics) afterwards.
    pub fn run(&mut self) -> Result<(), PipelineError> {
        self.prepare()?;

        let profiling = self.config.enable_profiling;
        let mut metrics = RunMetrics::new(self.group.arena_bytes());
        let started = Instant::now();

        for (index, step) in self.steps.iter_mut().enumerate() {
            let step_started = Instant::now();
            step.run()?;
            if profiling {
                let elapsed = step_started.elapsed();
                tracing::debug!(step = index, name = step.name(), ?elapsed, "step done");
                metrics.record_step(step.name(), elapsed);
            }
        }

        if profiling {
            metrics.finalise(started.elapsed());
            self.last_metrics = Some(metrics);
        }
        Ok(())
    }

    /// Returns the metrics of the most recent profiled run.
    pub fn last_metrics(&self) -> Option<&RunMetrics> {
        self.last_metrics.as_ref()
    }

    /// Returns the committed arena size (0 before `prepare`).
    pub fn arena_bytes(&self) -> usize {
        self.group.arena_bytes()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.steps.len())
            .field("prepared", &self.prepared)
            .field("arena_bytes", &self.group.arena_bytes())
            .finish()
    }
}
