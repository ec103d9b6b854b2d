use std::time::Duration;

use tracker_core::ToastKind;
use tracker_engine::PageSurface;
use tracker_logging::tracker_debug;

/// Renders the page agent's control and toasts as terminal lines.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl PageSurface for TerminalSurface {
    fn inject_control(&mut self, label: &str) {
        println!("[{label}]");
    }

    fn set_control(&mut self, label: &str, enabled: bool) {
        if enabled {
            println!("[{label}]");
        } else {
            println!("[{label}] (disabled)");
        }
    }

    fn show_toast(&mut self, kind: ToastKind, text: &str, dismiss_after: Duration) {
        tracker_debug!("Toast for {:?}: {}", dismiss_after, text);
        match kind {
            ToastKind::Success => println!("{text}"),
            ToastKind::Error => eprintln!("{text}"),
        }
    }
}
