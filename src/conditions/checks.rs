//! Pre/post-condition verification facade
//!
//! [`Preconditions`] runs a [`ConditionsCollection`] once for the "pre" and
//! once for the "post" phase, labelling each report section, and routes the
//! resulting text to a pluggable [`ChecksOutput`] sink. The default sink
//! appends to a log file when asked to persist and traces to the diagnostics
//! subscriber otherwise.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::conditions::collection::ConditionsCollection;
use crate::conditions::condition::ConditionError;

const PRECONDITIONS_LABEL: &str = "PRE-CONDITIONS: ";
const POSTCONDITIONS_LABEL: &str = "POST-CONDITIONS: ";

/// Destination of condition-test reports.
pub trait ChecksOutput {
    /// Write a test report.
    ///
    /// `save_log` asks the sink to persist the report; `component_name`
    /// identifies the model component that triggered the test.
    fn write(
        &mut self,
        test_result: &str,
        save_log: bool,
        component_name: &str,
    ) -> std::io::Result<()>;
}

/// Default report sink: appends to a log file when `save_log` is set,
/// otherwise emits a diagnostic event.
///
/// The log file is a single shared resource; serialize access when reporting
/// from more than one caller.
#[derive(Debug, Clone)]
pub struct DefaultChecksOutput {
    log_path: PathBuf,
}

impl DefaultChecksOutput {
    /// Create a sink appending to the given log file.
    pub fn new(log_path: impl AsRef<Path>) -> Self {
        Self {
            log_path: log_path.as_ref().to_path_buf(),
        }
    }
}

impl Default for DefaultChecksOutput {
    fn default() -> Self {
        Self::new("condition_checks.log")
    }
}

impl ChecksOutput for DefaultChecksOutput {
    fn write(
        &mut self,
        test_result: &str,
        save_log: bool,
        component_name: &str,
    ) -> std::io::Result<()> {
        if save_log {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)?;
            writeln!(file, "{}\n{}", component_name, test_result)?;
        } else {
            warn!(component = component_name, "{}", test_result);
        }
        Ok(())
    }
}

/// Facade for pre/post-condition verification.
///
/// Verification can be switched off wholesale through
/// [`enabled`](Self::set_enabled), in which case both verify methods report
/// no violations without running any rule.
pub struct Preconditions {
    enabled: bool,
    output: Box<dyn ChecksOutput>,
}

impl Preconditions {
    /// Create a facade with the default output sink.
    pub fn new() -> Self {
        Self {
            enabled: true,
            output: Box::<DefaultChecksOutput>::default(),
        }
    }

    /// Create a facade writing reports to the given sink.
    pub fn with_output(output: impl ChecksOutput + 'static) -> Self {
        Self {
            enabled: true,
            output: Box::new(output),
        }
    }

    /// Whether verification is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable verification.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Verify a collection of pre-conditions.
    ///
    /// Returns an empty string when every condition is satisfied, otherwise
    /// the concatenated violation lines prefixed with the pre-conditions
    /// section label. The `call_id` tag traces the caller in every line.
    pub fn verify_preconditions(
        &self,
        collection: &ConditionsCollection<'_>,
        call_id: &str,
    ) -> Result<String, ConditionError> {
        self.verify(collection, call_id, PRECONDITIONS_LABEL)
    }

    /// Verify a collection of post-conditions; the report carries the
    /// post-conditions section label.
    pub fn verify_postconditions(
        &self,
        collection: &ConditionsCollection<'_>,
        call_id: &str,
    ) -> Result<String, ConditionError> {
        self.verify(collection, call_id, POSTCONDITIONS_LABEL)
    }

    fn verify(
        &self,
        collection: &ConditionsCollection<'_>,
        call_id: &str,
        label: &str,
    ) -> Result<String, ConditionError> {
        if !self.enabled {
            return Ok(String::new());
        }
        let report = collection.verify(call_id)?;
        if report.is_empty() {
            Ok(report)
        } else {
            Ok(format!("{}{}", label, report))
        }
    }

    /// Route a test report to the configured output sink.
    pub fn report(
        &mut self,
        test_result: &str,
        save_log: bool,
        component_name: &str,
    ) -> std::io::Result<()> {
        self.output.write(test_result, save_log, component_name)
    }
}

impl Default for Preconditions {
    fn default() -> Self {
        Self::new()
    }
}
