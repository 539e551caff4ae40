//! Listeners for scroll gate transitions.
//!
//! The controller calls every subscribed listener exactly once per
//! enable/disable edge. The UI layer uses this to show a short toast.

use crate::constants::{SCROLL_DISABLED_MESSAGE, SCROLL_ENABLED_MESSAGE};
use log::{debug, info};
use std::sync::mpsc::Sender;

/// Receiver of scroll gate transitions
pub trait EnablementListener: Send {
    /// Called with the new state after every transition
    fn on_enablement_changed(&mut self, enabled: bool);
}

/// Message shown to the user for a gate state
#[must_use]
pub const fn transition_message(enabled: bool) -> &'static str {
    if enabled {
        SCROLL_ENABLED_MESSAGE
    } else {
        SCROLL_DISABLED_MESSAGE
    }
}

/// Logs the transition message in place of an on-screen toast
#[derive(Debug, Default)]
pub struct LogNotifier;

impl EnablementListener for LogNotifier {
    fn on_enablement_changed(&mut self, enabled: bool) {
        info!("{}", transition_message(enabled));
    }
}

/// Forwards transitions to another thread over a channel
#[derive(Debug)]
pub struct ChannelNotifier {
    sender: Sender<bool>,
}

impl ChannelNotifier {
    /// Create a notifier sending on `sender`
    #[must_use]
    pub const fn new(sender: Sender<bool>) -> Self {
        Self { sender }
    }
}

impl EnablementListener for ChannelNotifier {
    fn on_enablement_changed(&mut self, enabled: bool) {
        if self.sender.send(enabled).is_err() {
            debug!("Enablement receiver disconnected, dropping notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_transition_message() {
        assert_eq!(transition_message(true), SCROLL_ENABLED_MESSAGE);
        assert_eq!(transition_message(false), SCROLL_DISABLED_MESSAGE);
    }

    #[test]
    fn test_channel_notifier_forwards() {
        let (tx, rx) = mpsc::channel();
        let mut notifier = ChannelNotifier::new(tx);
        notifier.on_enablement_changed(false);
        notifier.on_enablement_changed(true);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![false, true]);
    }

    #[test]
    fn test_channel_notifier_ignores_disconnected_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut notifier = ChannelNotifier::new(tx);
        notifier.on_enablement_changed(true);
    }
}
