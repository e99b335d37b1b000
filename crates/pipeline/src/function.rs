// Copyright (c) 2026 The tensor-arena Authors
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The function protocol: how operators expose configure, prepare and run.
//!
//! Configuration is a fallible constructor on each concrete operator
//! (`Conv2d::configure(...) -> Result<Conv2d, _>`), so an unconfigured
//! function is unrepresentable. The trait carries the rest of the
//! lifecycle:
//!
//! - [`prepare`](Function::prepare) performs one-time work that only
//!   needs allocated storage (weight reshaping, constant folding). It is
//!   idempotent and must be cheap on the second and later calls.
//! - [`run`](Function::run) executes the operator synchronously against
//!   the tensors captured at configure time. Callers may run repeatedly;
//!   each call sees whatever bytes the input tensors currently hold.
//!
//! There is one function interface. Composite operators (grouped
//! convolution, sequences) implement it by delegating to their children,
//! so a pipeline never distinguishes leaf kernels from compositions.

use crate::PipelineError;

/// A configured, runnable operator.
pub trait Function {
    /// A short name for logging and error reporting.
    fn name(&self) -> &str;

    /// One-time preparation requiring allocated storage. Default: no-op.
    ///
    /// Implementations must be idempotent.
    fn prepare(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Executes the operator against its configured tensors.
    fn run(&mut self) -> Result<(), PipelineError>;
}

/// Runs a fixed list of child functions in order.
///
/// The building block for composite operators: children are configured
/// individually and appended, then the sequence forwards `prepare` and
/// `run` to each in turn.
pub struct FunctionSequence {
    name: String,
    children: Vec<Box<dyn Function>>,
}

impl FunctionSequence {
    /// Creates an empty sequence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Appends a child function.
    pub fn push(&mut self, function: Box<dyn Function>) {
        self.children.push(function);
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the sequence has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Function for FunctionSequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&mut self) -> Result<(), PipelineError> {
        for child in &mut self.children {
            child.prepare()?;
        }
        Ok(())
    }

    fn run(&mut self) -> Result<(), PipelineError> {
        for child in &mut self.children {
            child.run()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FunctionSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionSequence")
            .field("name", &self.name)
            .field("children", &self.children.len())
            .finish()
    }
}
