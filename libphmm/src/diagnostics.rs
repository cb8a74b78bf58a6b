//! A passed-in sink for progress and debugging messages.
//!
//! The model builder, the decoder and the batch coordinator all
//! report through a `&dyn Diagnostics` handed to them by the caller.

use std::fmt::Arguments;

pub trait Diagnostics: Sync {
    fn debug(&self, _message: Arguments<'_>) {}
    fn info(&self, _message: Arguments<'_>) {}
}

/// Discards every message.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {}

/// Forwards messages to the `log` facade.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn debug(&self, message: Arguments<'_>) {
        log::debug!("{message}");
    }

    fn info(&self, message: Arguments<'_>) {
        log::info!("{message}");
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingDiagnostics;
    use super::*;

    #[test]
    fn test_recording_diagnostics() {
        let diagnostics = RecordingDiagnostics::default();
        let sink: &dyn Diagnostics = &diagnostics;
        sink.info(format_args!("model length = {}", 10));
        sink.debug(format_args!("worker {} finished", 3));

        assert_eq!(*diagnostics.info.lock().unwrap(), vec!["model length = 10"]);
        assert_eq!(*diagnostics.debug.lock().unwrap(), vec!["worker 3 finished"]);

        // the default sinks accept messages without doing anything
        NoDiagnostics.info(format_args!("dropped"));
        LogDiagnostics.debug(format_args!("forwarded"));
    }
}
