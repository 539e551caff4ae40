//! Main application module wiring pose input, controller and scroll output.

use crate::{
    config::Config,
    controller::ScrollController,
    error::Result,
    input::{spawn_reader, InputEvent},
    notify::{EnablementListener, LogNotifier},
    scroll_output::{create_sink, LogScrollSink, ScrollSink, WheelEvent},
};
use log::{info, warn};
use std::{
    io::BufRead,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Outcome of one run of the frame loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Observations passed to the controller
    pub frames_processed: u64,
    /// Scroll commands produced by the controller
    pub commands_emitted: u64,
    /// Commands the output backend failed to post
    pub post_failures: u64,
    /// Scroll gate transitions
    pub transitions: u64,
    /// Observations dropped before reaching the controller
    pub frames_dropped: u64,
    /// Input lines that could not be parsed
    pub lines_rejected: u64,
}

/// Counts gate transitions for the run summary
struct TransitionCounter(Arc<AtomicU64>);

impl EnablementListener for TransitionCounter {
    fn on_enablement_changed(&mut self, _enabled: bool) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Main application struct
pub struct ScrollApp {
    config: Config,
    controller: ScrollController,
    sink: Box<dyn ScrollSink>,
    transitions: Arc<AtomicU64>,
}

impl ScrollApp {
    /// Create the application with the configured output backend
    ///
    /// Falls back to logging scroll events if the backend cannot start.
    pub fn new(config: Config) -> Result<Self> {
        let sink: Box<dyn ScrollSink> = match create_sink(config.output.backend) {
            Ok(sink) => sink,
            Err(e) => {
                warn!("Failed to initialize scroll output: {}. Logging scroll events instead.", e);
                Box::new(LogScrollSink::new())
            }
        };

        let mut app = Self::with_sink(config, sink)?;
        app.subscribe(Box::new(LogNotifier));
        Ok(app)
    }

    /// Create the application with an explicit output backend
    pub fn with_sink(config: Config, sink: Box<dyn ScrollSink>) -> Result<Self> {
        info!("Initializing head scroll application");
        config.validate()?;

        let thresholds = config.thresholds()?;
        info!(
            "Roll gate at ±{:.3} rad, pitch deadzone ±{:.3} rad, sensitivity {}",
            thresholds.roll_enable_threshold, thresholds.pitch_deadzone, config.controller.sensitivity
        );
        info!("Pose provider camera index: {}", config.capture.camera_index);

        let mut controller = ScrollController::new(thresholds, config.controller.sensitivity);
        let transitions = Arc::new(AtomicU64::new(0));
        controller.subscribe(Box::new(TransitionCounter(Arc::clone(&transitions))));

        info!("Scroll output backend: {}", sink.name());

        Ok(Self {
            config,
            controller,
            sink,
            transitions,
        })
    }

    /// Register an extra listener for gate transitions
    pub fn subscribe(&mut self, listener: Box<dyn EnablementListener>) {
        self.controller.subscribe(listener);
    }

    /// The scroll controller driven by this application
    #[must_use]
    pub const fn controller(&self) -> &ScrollController {
        &self.controller
    }

    /// Run the frame loop until `input` is exhausted
    pub fn run<R>(&mut self, input: R) -> Result<RunSummary>
    where
        R: BufRead + Send + 'static,
    {
        info!("Starting frame loop");
        let start_time = Instant::now();
        let transitions_before = self.transitions.load(Ordering::Relaxed);

        let stream = spawn_reader(
            input,
            self.config.input.angle_unit,
            self.config.input.queue_capacity,
            self.config.input.overflow,
        )?;

        let mut summary = RunSummary::default();
        for event in stream.receiver().iter() {
            let observation = match event {
                InputEvent::Pose(observation) => observation,
                InputEvent::Sensitivity(value) => {
                    info!("Sensitivity set to {}", value);
                    self.controller.set_sensitivity(value);
                    continue;
                }
            };
            summary.frames_processed += 1;

            let Some(command) = self.controller.process(observation) else {
                continue;
            };
            summary.commands_emitted += 1;

            let mut wheel = WheelEvent::from(command);
            if self.config.output.invert {
                wheel = wheel.inverted();
            }

            // Injection failures are reported, not retried
            if let Err(e) = self.sink.post(&wheel) {
                summary.post_failures += 1;
                warn!("Failed to post scroll event: {}", e);
            }
        }

        let stats = stream.finish()?;
        summary.frames_dropped = stats.frames_dropped;
        summary.lines_rejected = stats.rejected;
        summary.transitions = self.transitions.load(Ordering::Relaxed) - transitions_before;

        let elapsed = start_time.elapsed().as_secs_f64();
        let fps = if elapsed > 0.0 {
            summary.frames_processed as f64 / elapsed
        } else {
            0.0
        };
        info!(
            "Input finished: {} frames ({:.1} fps), {} scroll commands, {} dropped, {} rejected",
            summary.frames_processed, fps, summary.commands_emitted, summary.frames_dropped, summary.lines_rejected
        );

        Ok(summary)
    }
}
