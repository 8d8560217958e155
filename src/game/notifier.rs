use log::trace;
use std::rc::Rc;

use super::settings::Settings;

/// Feedback hooks for sound or haptics. Calls never influence game state.
pub trait Notifier {
    fn on_input(&self);
    fn on_success(&self);
    fn on_failure(&self);
    fn on_win(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn on_input(&self) {}
    fn on_success(&self) {}
    fn on_failure(&self) {}
    fn on_win(&self) {}
}

/// Stand-in for a sound backend; traces each cue under the `feedback` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn on_input(&self) {
        trace!(target: "feedback", "input");
    }

    fn on_success(&self) {
        trace!(target: "feedback", "success");
    }

    fn on_failure(&self) {
        trace!(target: "feedback", "failure");
    }

    fn on_win(&self) {
        trace!(target: "feedback", "win");
    }
}

pub fn notifier_for(settings: &Settings) -> Rc<dyn Notifier> {
    if settings.sound_enabled {
        Rc::new(LogNotifier)
    } else {
        Rc::new(SilentNotifier)
    }
}
