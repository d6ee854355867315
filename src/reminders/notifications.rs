use crate::habits::Habit;

/// Delivers reminders. Asked for permission before a habit opts in.
pub trait Notifier {
    fn request_permission(&mut self) -> bool;

    fn notify(&mut self, habit: &Habit);
}

/// Only records reminders in the log.
#[derive(Debug, Default)]
pub struct LogNotifier {
    pub granted: bool,
    pub sent: Vec<i64>,
}

impl LogNotifier {
    pub fn granting() -> Self {
        Self {
            granted: true,
            sent: Vec::new(),
        }
    }
}

impl Notifier for LogNotifier {
    fn request_permission(&mut self) -> bool {
        self.granted
    }

    fn notify(&mut self, habit: &Habit) {
        tracing::info!(
            id = habit.id,
            summary = %summary(habit),
            body = %body(habit),
            "reminder due"
        );
        self.sent.push(habit.id);
    }
}

fn summary(habit: &Habit) -> String {
    format!("Time for {}", habit.name)
}

fn body(habit: &Habit) -> String {
    format!("{} day streak, keep it going", habit.streak)
}

#[cfg(feature = "notifications")]
pub use desktop::DesktopNotifier;

#[cfg(feature = "notifications")]
mod desktop {
    use super::{body, summary, Notifier};
    use crate::habits::Habit;
    use notify_rust::{Hint, Notification, Timeout};

    /// Freedesktop / platform notifications through notify-rust.
    #[derive(Debug, Default)]
    pub struct DesktopNotifier;

    impl Notifier for DesktopNotifier {
        fn request_permission(&mut self) -> bool {
            true
        }

        fn notify(&mut self, habit: &Habit) {
            // https://specifications.freedesktop.org/icon-naming-spec/latest/ar01s04.html
            let shown = Notification::new()
                .appname("habits")
                .summary(&summary(habit))
                .body(&body(habit))
                .icon("appointment-soon")
                .hint(Hint::SoundName("message-new-instant".to_string()))
                .timeout(Timeout::Milliseconds(10_000))
                .show();
            match shown {
                Ok(_) => tracing::info!(id = habit.id, "reminder shown"),
                Err(err) => tracing::warn!(id = habit.id, %err, "could not show reminder"),
            }
        }
    }
}

#[cfg(feature = "notifications")]
pub fn default_notifier() -> Box<dyn Notifier> {
    Box::new(DesktopNotifier)
}

#[cfg(not(feature = "notifications"))]
pub fn default_notifier() -> Box<dyn Notifier> {
    tracing::debug!("built without desktop notifications, reminders go to the log");
    Box::new(LogNotifier::default())
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn request_permission(&mut self) -> bool {
        (**self).request_permission()
    }

    fn notify(&mut self, habit: &Habit) {
        (**self).notify(habit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::Color;

    #[test]
    fn message_mentions_the_habit() {
        let mut habit = Habit::new(1, "Stretch".into(), Color::Red);
        habit.streak = 4;
        assert_eq!(summary(&habit), "Time for Stretch");
        assert_eq!(body(&habit), "4 day streak, keep it going");
    }

    #[test]
    fn log_notifier_records_what_it_sent() {
        let mut notifier = LogNotifier::granting();
        assert!(notifier.request_permission());
        notifier.notify(&Habit::new(7, "Walk".into(), Color::Blue));
        assert_eq!(notifier.sent, vec![7]);
        assert!(!LogNotifier::default().request_permission());
    }
}
