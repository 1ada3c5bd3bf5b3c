//! Scheduler submission script rendering.

use std::fmt::Write;
use std::path::Path;

use crate::config::SchedulerDirectives;

/// A scheduler-directive header wrapping the batch invocation.
///
/// The directives are consumed by the batch scheduler; the body forwards
/// the pipeline configuration path and run-name prefix to `pfpipe batch`.
pub struct JobScript {
    directives: SchedulerDirectives,
}

impl JobScript {
    /// Creates a job script from the given directives.
    pub fn new(directives: SchedulerDirectives) -> Self {
        Self { directives }
    }

    /// Renders the full submission script.
    pub fn render(&self, config: &Path, prefix: &str) -> String {
        let d = &self.directives;
        let mut script = String::from("#!/bin/sh\n");

        let _ = writeln!(script, "#SBATCH --time={}", d.walltime);
        let _ = writeln!(script, "#SBATCH --nodes={}", d.nodes);
        let _ = writeln!(script, "#SBATCH --gpus-per-node={}", d.gpus_per_node);
        if let Some(account) = &d.account {
            let _ = writeln!(script, "#SBATCH --account={}", account);
        }
        if let Some(partition) = &d.partition {
            let _ = writeln!(script, "#SBATCH --partition={}", partition);
        }
        if d.exclusive {
            script.push_str("#SBATCH --exclusive\n");
        }
        let _ = writeln!(script, "#SBATCH --output={}", d.output_log.display());
        let _ = writeln!(script, "#SBATCH --error={}", d.error_log.display());

        let _ = writeln!(script, "\npfpipe batch {} {}", config.display(), prefix);

        script
    }
}
