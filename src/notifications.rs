/// Desktop notifications for focus milestones
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

fn display(title: &str, message: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            message.replace('"', "\\\""),
            title.replace('"', "\\\"")
        );

        if let Err(err) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(%err, "osascript notification failed");
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = (title, message);
    }
}

/// Send a notification when a focus task has run its required time
pub fn notify_ready_to_complete(subject: &str) {
    display(
        "Studylock - Time Reached",
        &format!("✅ {} can be marked complete", subject),
    );
}

/// Send a notification when the lock screen is forced
pub fn notify_lock_engaged(subject: &str) {
    display(
        "Studylock - Locked",
        &format!("🔒 Finish {} or enter the password to exit", subject),
    );
}
