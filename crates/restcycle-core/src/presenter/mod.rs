//! Notification delivery.
//!
//! Every transport implements the same trait and the chain tries them in
//! order, degrading to the next one on failure. Delivery is advisory: a
//! transport that cannot deliver is logged and skipped, and nothing here
//! ever surfaces as a scheduler error.

mod console;
mod webhook;

pub use console::ConsolePresenter;
pub use webhook::WebhookPresenter;

use log::{debug, warn};
use thiserror::Error;

use crate::zones::format_duration;

/// Why a transport could not deliver.
#[derive(Error, Debug)]
pub enum PresentError {
    /// The transport cannot currently deliver anything (not configured,
    /// no permission).
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// The transport tried and failed.
    #[error("delivery failed: {0}")]
    Failed(String),
}

/// A single delivery transport.
pub trait Presenter: Send {
    /// Transport identifier (e.g. "console", "webhook").
    fn name(&self) -> &str;

    /// Whether this transport can currently deliver anything.
    fn available(&self) -> bool {
        true
    }

    /// Show an alert. Best-effort; callers never treat failure as fatal.
    fn present(&self, title: &str, body: &str, require_ack: bool) -> Result<(), PresentError>;

    /// Remove any currently visible alert.
    fn clear(&self) {}
}

/// Ordered set of transports: the first one that delivers wins.
///
/// An empty chain is a deliberate no-op (notifications disabled), not a
/// failure.
pub struct PresenterChain {
    transports: Vec<Box<dyn Presenter>>,
}

impl PresenterChain {
    pub fn new(transports: Vec<Box<dyn Presenter>>) -> Self {
        Self { transports }
    }
}

impl Presenter for PresenterChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn available(&self) -> bool {
        self.transports.iter().any(|t| t.available())
    }

    fn present(&self, title: &str, body: &str, require_ack: bool) -> Result<(), PresentError> {
        if self.transports.is_empty() {
            debug!("notifications disabled, dropping alert '{title}'");
            return Ok(());
        }
        for transport in &self.transports {
            if !transport.available() {
                continue;
            }
            match transport.present(title, body, require_ack) {
                Ok(()) => return Ok(()),
                Err(e) => warn!(
                    "presenter '{}' failed, trying next transport: {e}",
                    transport.name()
                ),
            }
        }
        Err(PresentError::Unavailable(
            "no transport delivered the alert".into(),
        ))
    }

    fn clear(&self) {
        for transport in &self.transports {
            transport.clear();
        }
    }
}

/// Alert copy for a fired reminder, mirroring the dashboard modal: the
/// first fire announces the completion, repeats count the nags.
pub fn reminder_copy(reminder_count: u32, rest_minutes: f64) -> (String, String) {
    let rest = format_duration(rest_minutes);
    if reminder_count <= 1 {
        (
            "Work Cycle Complete!".to_string(),
            format!("Your work cycle has ended. Start your {rest} rest cycle now!"),
        )
    } else {
        (
            format!("Reminder #{}: Start Your Rest!", reminder_count - 1),
            format!("You still need to start your {rest} rest cycle."),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct FlakyTransport {
        name: &'static str,
        available: bool,
        fail: bool,
        delivered: Arc<AtomicU32>,
    }

    impl Presenter for FlakyTransport {
        fn name(&self) -> &str {
            self.name
        }
        fn available(&self) -> bool {
            self.available
        }
        fn present(&self, _title: &str, _body: &str, _require_ack: bool) -> Result<(), PresentError> {
            if self.fail {
                return Err(PresentError::Failed("boom".into()));
            }
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn transport(
        name: &'static str,
        available: bool,
        fail: bool,
    ) -> (Box<dyn Presenter>, Arc<AtomicU32>) {
        let delivered = Arc::new(AtomicU32::new(0));
        (
            Box::new(FlakyTransport {
                name,
                available,
                fail,
                delivered: delivered.clone(),
            }),
            delivered,
        )
    }

    #[test]
    fn chain_degrades_to_next_transport() {
        let (unavailable, hits_a) = transport("os", false, false);
        let (failing, hits_b) = transport("push", true, true);
        let (working, hits_c) = transport("banner", true, false);
        let chain = PresenterChain::new(vec![unavailable, failing, working]);

        chain.present("title", "body", true).unwrap();
        assert_eq!(hits_a.load(Ordering::SeqCst), 0);
        assert_eq!(hits_b.load(Ordering::SeqCst), 0);
        assert_eq!(hits_c.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn chain_stops_at_first_success() {
        let (first, hits_a) = transport("first", true, false);
        let (second, hits_b) = transport("second", true, false);
        let chain = PresenterChain::new(vec![first, second]);

        chain.present("title", "body", false).unwrap();
        assert_eq!(hits_a.load(Ordering::SeqCst), 1);
        assert_eq!(hits_b.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_chain_is_a_silent_noop() {
        let chain = PresenterChain::new(vec![]);
        assert!(chain.present("title", "body", true).is_ok());
        assert!(!chain.available());
    }

    #[test]
    fn exhausted_chain_reports_unavailable() {
        let (failing, _) = transport("only", true, true);
        let chain = PresenterChain::new(vec![failing]);
        assert!(matches!(
            chain.present("title", "body", true),
            Err(PresentError::Unavailable(_))
        ));
    }

    #[test]
    fn reminder_copy_names_the_rest_duration() {
        let (title, body) = reminder_copy(1, 10.0 / 60.0);
        assert_eq!(title, "Work Cycle Complete!");
        assert!(body.contains("10 seconds"));

        let (title, body) = reminder_copy(3, 30.0);
        assert_eq!(title, "Reminder #2: Start Your Rest!");
        assert!(body.contains("30 minutes"));
    }
}
