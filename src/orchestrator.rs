/* Copyright (C) 2025 Pedro Henrique / phkaiser13
* File: src/orchestrator.rs
*
* This file implements the core of the tool: the scale/hold/revert lifecycle
* for one traffic event.
*
* Architecture:
* 1. Apply phase: services are processed one at a time in catalog order.
*    Each service's current minReplicas is recorded *before* its patch is
*    submitted, so the revert phase can restore ground truth that was only
*    observable at apply time. Any failure here aborts the whole run:
*    continuing past a failure would risk the process dying later with
*    services scaled up that this run never learned how to restore.
* 2. Hold phase: a single uninterruptible sleep. This is the one step
*    expected to dominate wall-clock time, and it bounds how long the
*    elevated minimums stay in effect.
* 3. Revert phase: every recorded service is restored to its observed
*    original, again one at a time and with a fresh read before each patch.
*    Failures here are isolated per service; one unreachable autoscaler must
*    not block restoring the rest.
*
* The recorded originals live only in this struct for the duration of one
* run. Nothing is persisted.
*
* SPDX-License-Identifier: Apache-2.0 */

use std::time::Duration;

use tracing::{error, info};

use crate::catalog::ServiceTarget;
use crate::error::{Error, Result};
use crate::hpa::AutoscalerClient;
use crate::notify::{self, Notifier};

/// (service name, minReplicas observed before the apply-phase patch),
/// in apply order.
type OriginalValues = Vec<(String, i32)>;

pub struct ScaleOrchestrator<C> {
    autoscalers: C,
    notifier: Notifier,
    hold: Duration,
}

impl<C: AutoscalerClient> ScaleOrchestrator<C> {
    pub fn new(autoscalers: C, notifier: Notifier, hold: Duration) -> Self {
        Self {
            autoscalers,
            notifier,
            hold,
        }
    }

    /// Drives one event's full lifecycle. Returns an error only for
    /// apply-phase failures; revert-phase failures are logged and notified
    /// but the run still counts as completed.
    pub async fn run(&self, event_name: &str, targets: &[ServiceTarget]) -> Result<()> {
        self.notifier
            .send(&notify::run_start_message(event_name))
            .await;

        let original_values = self.apply(targets).await?;
        self.hold().await;
        self.revert(&original_values).await;
        Ok(())
    }

    /// Raises each target's minReplicas, recording the observed original
    /// immediately before each patch. Fail-fast: the first invalid target,
    /// failed read, or failed patch aborts the run.
    async fn apply(&self, targets: &[ServiceTarget]) -> Result<OriginalValues> {
        let mut original_values = Vec::with_capacity(targets.len());

        for target in targets {
            let service = target.name.as_str();

            let min_count = match target.min_count {
                Some(count) if count >= 1 => count,
                _ => {
                    error!("Invalid minCount value for service {service}");
                    return Err(Error::InvalidTarget(service.to_string()));
                }
            };

            let state = match self.autoscalers.read(service).await {
                Ok(state) => state,
                Err(e) => {
                    error!("Failed to read autoscaler for service '{service}': {e}");
                    self.notifier
                        .send(&notify::scale_error_message(service, &e.to_string()))
                        .await;
                    return Err(e);
                }
            };

            // The original must be captured before the patch is attempted;
            // it is the only record of what revert should restore.
            let old_min = observed_min(&state);
            original_values.push((service.to_string(), old_min));

            match self
                .autoscalers
                .patch_min_replicas(service, state, min_count)
                .await
            {
                Ok(()) => {
                    info!("Scaled service '{service}' minReplicas {old_min} -> {min_count}");
                    self.notifier
                        .send(&notify::scale_up_message(service, old_min, min_count))
                        .await;
                }
                Err(e) => {
                    error!("Failed to scale service '{service}': {e}");
                    self.notifier
                        .send(&notify::scale_error_message(service, &e.to_string()))
                        .await;
                    return Err(e);
                }
            }
        }

        Ok(original_values)
    }

    async fn hold(&self) {
        info!(
            "Waiting {} seconds before reverting autoscaler changes",
            self.hold.as_secs()
        );
        tokio::time::sleep(self.hold).await;
    }

    /// Restores every recorded service to its observed original, continuing
    /// past individual failures.
    async fn revert(&self, original_values: &OriginalValues) {
        for (service, original_min) in original_values {
            let state = match self.autoscalers.read(service).await {
                Ok(state) => state,
                Err(e) => {
                    error!("Failed to revert autoscaler for service '{service}': {e}");
                    self.notifier
                        .send(&notify::scale_error_message(service, &e.to_string()))
                        .await;
                    continue;
                }
            };

            match self
                .autoscalers
                .patch_min_replicas(service, state, *original_min)
                .await
            {
                Ok(()) => {
                    info!("Reverted service '{service}' minReplicas to {original_min}");
                    self.notifier
                        .send(&notify::revert_message(service, *original_min))
                        .await;
                }
                Err(e) => {
                    error!("Failed to revert autoscaler for service '{service}': {e}");
                    self.notifier
                        .send(&notify::scale_error_message(service, &e.to_string()))
                        .await;
                }
            }
        }
    }
}

// The API server defaults an unset spec.minReplicas to 1, so that is the
// value revert should restore.
fn observed_min(state: &k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler) -> i32 {
    state
        .spec
        .as_ref()
        .and_then(|spec| spec.min_replicas)
        .unwrap_or(1)
}
