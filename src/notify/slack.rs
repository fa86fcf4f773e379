use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::{Event, Notifier};

const POST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct Payload<'a> {
    text: &'a str,
}

/// Posts each event as plain text to a Slack incoming webhook
pub(crate) struct SlackNotifier {
    agent: ureq::Agent,
    webhook_url: String,
}

impl SlackNotifier {
    pub(crate) fn new(webhook_url: String) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(POST_TIMEOUT))
            .build()
            .into();
        Self { agent, webhook_url }
    }
}

fn render(event: &Event) -> String {
    match event {
        Event::Error(m) => format!(":warning: {m}"),
        Event::Completed(m) => format!(":white_check_mark: {m}"),
        Event::Started(m) | Event::Progress(m) => m.clone(),
    }
}

impl Notifier for SlackNotifier {
    fn notify(&self, event: &Event) {
        let text = render(event);
        match self.agent.post(&self.webhook_url).send_json(Payload { text: &text }) {
            Ok(_) => debug!("slack notified: {}", event.kind()),
            Err(e) => warn!("Slack notify failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prefixes_errors() {
        assert_eq!(
            render(&Event::Error("boom".to_string())),
            ":warning: boom"
        );
        assert_eq!(render(&Event::Progress("2/5".to_string())), "2/5");
    }

    #[test]
    fn unreachable_webhook_does_not_panic() {
        let notifier = SlackNotifier::new("http://127.0.0.1:9/hook".to_string());
        notifier.notify(&Event::Started("run".to_string()));
    }
}
