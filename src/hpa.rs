/* Copyright (C) 2025 Pedro Henrique / phkaiser13
* File: src/hpa.rs
*
* This file provides a thin capability over namespaced
* HorizontalPodAutoscaler resources: read one by name, and patch its
* spec.minReplicas. The capability is expressed as a trait so the
* orchestrator can be driven against an in-memory implementation in tests.
*
* The patch is a merge patch of the freshly read object with only
* spec.minReplicas changed, so every other field of the resource is left as
* the control plane last reported it. Callers are expected to read
* immediately before patching rather than reusing state across phases.
*
* SPDX-License-Identifier: Apache-2.0 */

use async_trait::async_trait;
use k8s_openapi::api::autoscaling::v2::HorizontalPodAutoscaler;
use kube::api::{Api, Patch, PatchParams};
use kube::Client;

use crate::error::{Error, Result};

/// Read and patch access to the autoscalers of one namespace.
#[async_trait]
pub trait AutoscalerClient {
    /// Fetches the current autoscaler state for `service`.
    async fn read(&self, service: &str) -> Result<HorizontalPodAutoscaler>;

    /// Applies `new_min` onto the previously read `state` and submits it.
    async fn patch_min_replicas(
        &self,
        service: &str,
        state: HorizontalPodAutoscaler,
        new_min: i32,
    ) -> Result<()>;
}

/// Production implementation backed by the cluster API.
pub struct KubeAutoscalers {
    api: Api<HorizontalPodAutoscaler>,
    namespace: String,
}

impl KubeAutoscalers {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

#[async_trait]
impl AutoscalerClient for KubeAutoscalers {
    async fn read(&self, service: &str) -> Result<HorizontalPodAutoscaler> {
        self.api
            .get(service)
            .await
            .map_err(|e| map_api_error(&self.namespace, service, e))
    }

    async fn patch_min_replicas(
        &self,
        service: &str,
        state: HorizontalPodAutoscaler,
        new_min: i32,
    ) -> Result<()> {
        let mut hpa = state;
        hpa.spec.get_or_insert_with(Default::default).min_replicas = Some(new_min);
        self.api
            .patch(service, &PatchParams::default(), &Patch::Merge(&hpa))
            .await
            .map_err(|e| map_api_error(&self.namespace, service, e))?;
        Ok(())
    }
}

/// Distinguishes "the autoscaler does not exist" from every other
/// control-plane failure.
fn map_api_error(namespace: &str, service: &str, err: kube::Error) -> Error {
    match err {
        kube::Error::Api(response) if response.code == 404 => Error::HpaNotFound {
            service: service.to_string(),
            namespace: namespace.to_string(),
        },
        other => Error::Kube(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: "TestReason".to_string(),
            code,
        })
    }

    #[test]
    fn test_404_maps_to_hpa_not_found() {
        let err = map_api_error("nanovest", "checkout", api_error(404));
        assert!(matches!(
            err,
            Error::HpaNotFound { service, namespace }
                if service == "checkout" && namespace == "nanovest"
        ));
    }

    #[test]
    fn test_other_codes_map_to_kube_error() {
        let err = map_api_error("nanovest", "checkout", api_error(503));
        assert!(matches!(err, Error::Kube(_)));
    }
}
