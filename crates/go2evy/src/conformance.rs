use anyhow::Context;
use log::{debug, info};
use std::path::Path;
use std::process::Command;

/// Wrapper around the external conformance executable.
///
/// The verdict is reported to the user and never feeds back into
/// translation decisions.
pub struct EvyRunner {
    pub binary: String,
}

/// Output of a conformance run.
pub struct ConformanceOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Combined stdout and stderr.
    pub all_output: String,
}

impl EvyRunner {
    pub fn run(&self, artifact: &Path) -> anyhow::Result<ConformanceOutput> {
        info!("running conformance check");
        debug!("command line: {} test {}", self.binary, artifact.display());
        let output = Command::new(&self.binary)
            .arg("test")
            .arg(artifact)
            .output()
            .with_context(|| format!("cannot execute `{} test`", self.binary))?;
        let mut all_output = String::from_utf8_lossy(&output.stdout).to_string();
        all_output.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ConformanceOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            all_output,
        })
    }
}
