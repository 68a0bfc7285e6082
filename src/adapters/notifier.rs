use crate::domain::model::Notification;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;

/// Posts notifications to the terminal. Stands in for the OS notification
/// channel; output goes to stderr so screen output stays parseable.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            "🔔 [{}#{}] {}",
            notification.channel_id,
            notification.id,
            notification.title
        );
        eprintln!("🔔 {}: {}", notification.title, notification.body);
        Ok(())
    }
}
