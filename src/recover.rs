use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Runs fire-and-forget work, logging a panic instead of letting it unwind
/// into the caller. Returns `false` when the work panicked.
pub fn safely_do<F: FnOnce()>(work: F) -> bool {
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(()) => true,
        Err(payload) => {
            tracing::error!(reason = %panic_message(payload.as_ref()), "work failed");
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "non-string panic payload".to_string()
}

#[cfg(test)]
#[expect(clippy::panic, reason = "exercising panic recovery")]
mod tests {
    use std::cell::Cell;

    use super::{panic_message, safely_do};
    use crate::test_support::capture_logs;

    #[test]
    fn completed_work_reports_success() {
        let ran = Cell::new(false);
        assert!(safely_do(|| ran.set(true)));
        assert!(ran.get());
    }

    #[test]
    fn panics_are_contained() {
        assert!(!safely_do(|| panic!("worker exploded")));
        let code = 7;
        assert!(!safely_do(move || panic!("exit code {code}")));
    }

    #[test]
    fn payload_messages_are_extracted() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "non-string panic payload");
    }

    #[test]
    fn contained_panic_is_logged_as_error() {
        let (ok, logs) = capture_logs(|| safely_do(|| panic!("queue drained twice")));
        assert!(!ok);
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("work failed"), "{logs}");
        assert!(logs.contains("queue drained twice"), "{logs}");
    }
}
