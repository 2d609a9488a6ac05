//! Span-scoped timing for synthesis passes.
//!
//! A [`SynthesisTimer`] opens a span for one pass, runs the work inside it
//! with [`SynthesisTimer::in_scope`] and logs the elapsed time inside the
//! same span when dropped. Scene assembly reports at `info`; each raster
//! surface reports at `debug`.

use std::time::Instant;

use tracing::{debug, info, Level, Span};

/// Times one synthesis pass and logs the result on drop.
///
/// ```rust
/// use visceral_viz::timing::SynthesisTimer;
///
/// let timer = SynthesisTimer::new("scene");
/// let meshes = timer.in_scope(|| 42);
/// assert_eq!(meshes, 42);
/// assert!(timer.elapsed_ms() >= 0.0);
/// ```
#[must_use = "the elapsed time is logged when the timer is dropped"]
pub struct SynthesisTimer {
    pass: &'static str,
    level: Level,
    start: Instant,
    span: Span,
}

impl SynthesisTimer {
    /// Time a top-level pass such as scene assembly.
    pub fn new(pass: &'static str) -> Self {
        Self::start(pass, Level::INFO, tracing::info_span!("synthesis", pass))
    }

    /// Time the rasterization of one `width` x `height` surface.
    pub fn raster(pass: &'static str, width: u32, height: u32) -> Self {
        Self::start(pass, Level::DEBUG, tracing::debug_span!("raster", pass, width, height))
    }

    fn start(pass: &'static str, level: Level, span: Span) -> Self {
        span.in_scope(|| debug!(target: "visceral_viz::timing", pass, "Starting synthesis"));
        Self {
            pass,
            level,
            start: Instant::now(),
            span,
        }
    }

    /// Run `work` inside the pass span.
    pub fn in_scope<R>(&self, work: impl FnOnce() -> R) -> R {
        self.span.in_scope(work)
    }

    /// Milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for SynthesisTimer {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        let elapsed_ms = format!("{:.2}", self.elapsed_ms());
        if self.level == Level::INFO {
            info!(target: "visceral_viz::timing", pass = self.pass, elapsed_ms, "Synthesis completed");
        } else {
            debug!(target: "visceral_viz::timing", pass = self.pass, elapsed_ms, "Synthesis completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::FmtSubscriber;

    fn current_span_name() -> Option<&'static str> {
        Span::current().metadata().map(|m| m.name())
    }

    #[test]
    fn test_work_runs_inside_pass_span() {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
        tracing::subscriber::with_default(subscriber, || {
            let scene = SynthesisTimer::new("scene");
            assert_eq!(scene.in_scope(current_span_name), Some("synthesis"));

            let raster = SynthesisTimer::raster("color", 4, 4);
            assert_eq!(raster.in_scope(current_span_name), Some("raster"));

            assert_eq!(current_span_name(), None);
        });
    }

    #[test]
    fn test_in_scope_returns_work_result() {
        let timer = SynthesisTimer::raster("normal", 2, 2);
        let sum: u32 = timer.in_scope(|| (1..=4).sum());
        assert_eq!(sum, 10);
        assert!(timer.elapsed_ms() >= 0.0);
    }
}
