use std::time::{Duration, Instant};

/// Wall time of one decode step.
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Ordered wall times of the steps of one decode.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f`, recording its wall time under `name`.
    pub fn measure<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.steps.push(StepTiming { name, duration: start.elapsed() });
        value
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Combined time of every step recorded under `name`.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        let mut matching = self.steps.iter().filter(|s| s.name == name).peekable();
        matching.peek()?;
        Some(matching.map(|s| s.duration).sum())
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn print_summary(&self) {
        let total = self.total_duration().as_secs_f64();
        println!("\nDecode Timing Summary:");
        println!("{:-<60}", "");
        for step in &self.steps {
            let millis = step.duration.as_secs_f64() * 1000.0;
            let share = if total > 0.0 { step.duration.as_secs_f64() / total * 100.0 } else { 0.0 };
            println!("{:<30} {:>12.3}ms ({:>5.1}%)", step.name, millis, share);
        }
        println!("{:-<60}", "");
        println!("{:<30} {:>12.3}ms", "Total", total * 1000.0);
    }
}
