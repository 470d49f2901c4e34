use crossbeam_channel::Sender;

use crate::error::PitchError;

/// Receives the outcome of every completed analysis, on the analysis thread.
///
/// Implemented for closures and for channel senders. A sender moves the
/// results to whichever thread holds the receiving end. With a bounded
/// channel the analysis thread waits for room, so no result is lost.
pub trait PitchObserver: Send + 'static {
    fn on_result(&mut self, result: Result<f32, PitchError>);
}

impl<F> PitchObserver for F
where
    F: FnMut(Result<f32, PitchError>) + Send + 'static,
{
    fn on_result(&mut self, result: Result<f32, PitchError>) {
        self(result)
    }
}

impl PitchObserver for Sender<Result<f32, PitchError>> {
    fn on_result(&mut self, result: Result<f32, PitchError>) {
        // Blocks while a bounded channel is full. The only error is a
        // dropped receiver, which just means nobody is listening anymore.
        let _ = self.send(result);
    }
}
