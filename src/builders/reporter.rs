use anyhow::Result;
use colored::Colorize;
use tracing::debug;

use crate::core::edits::Insertion;
use crate::core::engine::ScanResult;

/// Receives the outcome of a scan once its edits have been handled.
pub trait Notifier {
    /// Reports the counters of one scan.
    ///
    /// # Arguments
    /// * `result`: The `ScanResult` returned by the engine.
    fn notify(&self, result: &ScanResult) -> Result<()>;
}

/// The summary line shown to the user, e.g. `3 YUIDoc comments generated`.
pub fn summary_message(result: &ScanResult) -> String {
    let mut message = format!("{} YUIDoc comments generated", result.generated);
    if result.normalized > 0 {
        message.push_str(&format!(", {} existing comments normalized", result.normalized));
    }
    message
}

/// Prints scan summaries to the console.
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Lists planned edits as pretty JSON, for `--json`.
    pub fn print_plan(&self, insertions: &[Insertion]) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(insertions)?);
        Ok(())
    }
}

impl Notifier for ConsoleReporter {
    fn notify(&self, result: &ScanResult) -> Result<()> {
        debug!(
            generated = result.generated,
            normalized = result.normalized,
            unterminated = result.unterminated,
            skipped = result.skipped_documented,
            "scan finished"
        );

        let message = summary_message(result);
        if result.generated > 0 {
            println!("✓ {}", message.green().bold());
        } else {
            println!("✓ {}", message.bright_blue());
        }

        if result.unterminated > 0 {
            println!(
                "{}",
                format!(
                    "⚠️  {} comment block(s) were not closed inside the range and were left untouched",
                    result.unterminated
                )
                .yellow()
            );
        }

        if self.verbose && result.skipped_documented > 0 {
            println!(
                "  └─ {} declaration(s) already documented",
                result.skipped_documented
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_message() {
        let result = ScanResult {
            generated: 3,
            ..ScanResult::default()
        };
        assert_eq!(summary_message(&result), "3 YUIDoc comments generated");

        let with_existing = ScanResult {
            generated: 0,
            normalized: 2,
            ..ScanResult::default()
        };
        assert_eq!(
            summary_message(&with_existing),
            "0 YUIDoc comments generated, 2 existing comments normalized"
        );
    }
}
