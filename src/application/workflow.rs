//! Linear workflow runner.
//!
//! A [`Workflow`] is an ordered list of [`Step`]s sharing one mutable state
//! value. Steps run once each, in the order they were added; the first error
//! stops the run and is handed back to the caller unchanged.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, info_span, warn, Instrument};

use crate::domain::error::DomainError;

/// One node of a workflow.
#[async_trait]
pub trait Step<S: Send>: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Read what earlier steps produced and write this step's output into `state`.
    async fn run(&self, state: &mut S) -> Result<(), DomainError>;
}

pub struct Workflow<S: Send> {
    name: &'static str,
    steps: Vec<Box<dyn Step<S>>>,
}

impl<S: Send> Workflow<S> {
    pub fn new(name: &'static str) -> Self {
        Self { name, steps: Vec::new() }
    }

    /// Appends a step after the ones already added.
    pub fn then(mut self, step: impl Step<S> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub async fn invoke(&self, mut state: S) -> Result<S, DomainError> {
        let started = Instant::now();
        for step in &self.steps {
            let span = info_span!("step", workflow = self.name, step = step.name());
            let step_started = Instant::now();
            match step.run(&mut state).instrument(span).await {
                Ok(()) => info!(
                    workflow = self.name,
                    step = step.name(),
                    elapsed_ms = step_started.elapsed().as_millis() as u64,
                    "step complete"
                ),
                Err(e) => {
                    warn!(workflow = self.name, step = step.name(), error = %e, "step failed");
                    return Err(e);
                }
            }
        }
        info!(
            workflow = self.name,
            steps = self.steps.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "workflow complete"
        );
        Ok(state)
    }
}
