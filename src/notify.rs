/* Copyright (C) 2025 Pedro Henrique / phkaiser13
* File: src/notify.rs
*
* This file implements best-effort Slack notifications via an incoming
* webhook, plus the message formats used across the run. Delivery failures
* are logged and swallowed; a dead webhook must never abort a scaling run.
*
* SPDX-License-Identifier: Apache-2.0 */

use serde::Serialize;
use tracing::{debug, error, info};

#[derive(Serialize)]
struct SlackMessage<'a> {
    text: &'a str,
}

pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
    enabled: bool,
}

impl Notifier {
    pub fn new(webhook_url: &str, enabled: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.to_string(),
            enabled,
        }
    }

    /// Posts `message` to the webhook. Both transport errors and non-2xx
    /// responses are logged only.
    pub async fn send(&self, message: &str) {
        if !self.enabled {
            debug!("Notifications disabled, skipping Slack delivery");
            return;
        }

        let outcome = self
            .client
            .post(&self.webhook_url)
            .json(&SlackMessage { text: message })
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match outcome {
            Ok(_) => info!("Slack notification sent successfully"),
            Err(e) => error!("Error sending Slack notification: {e}"),
        }
    }
}

// Message bodies use Slack's block-quote markdown so a channel full of
// scaling traffic stays scannable.

pub fn run_start_message(event_name: &str) -> String {
    format!(":loading: *Scaling workloads :arrow_right: {event_name}* :loading:")
}

pub fn scale_up_message(service: &str, old_min: i32, new_min: i32) -> String {
    format!(
        "> *Service:* `{service}`\n\
         > *Updated Replica Count:* {old_min} :arrow_right: {new_min}\n\
         > *Scaling Completed!* :white_check_mark:"
    )
}

pub fn scale_error_message(service: &str, error: &str) -> String {
    format!(
        "> *Service:* `{service}`\n\
         > *Failed to Scale service* :x:\n\
         > *Error:* {error}"
    )
}

pub fn revert_message(service: &str, original_min: i32) -> String {
    format!(
        "> *Service:* `{service}`\n\
         > *Scaled Down successfully* :white_check_mark:\n\
         > *Reverted Min Count:* {original_min}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_up_message_shape() {
        let message = scale_up_message("checkout", 2, 10);
        assert!(message.contains("`checkout`"));
        assert!(message.contains("2 :arrow_right: 10"));
        assert!(message.contains(":white_check_mark:"));
    }

    #[test]
    fn test_scale_error_message_shape() {
        let message = scale_error_message("checkout", "autoscaler not found");
        assert!(message.contains("`checkout`"));
        assert!(message.contains(":x:"));
        assert!(message.contains("autoscaler not found"));
    }

    #[test]
    fn test_revert_message_shape() {
        let message = revert_message("checkout", 2);
        assert!(message.contains("`checkout`"));
        assert!(message.contains("Reverted Min Count:* 2"));
    }

    #[test]
    fn test_run_start_message_names_the_event() {
        assert!(run_start_message("flash_sale").contains("flash_sale"));
    }
}
