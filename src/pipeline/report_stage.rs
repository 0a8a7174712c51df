//! Report output stage.
//!
//! Resolves where a report goes and in which format, renders it with the
//! matching reporter and writes it to the file or stdout.

use crate::analysis::AnalysisResult;
use crate::config::AppConfig;
use crate::lifecycle::Lifecycle;
use crate::model::VersionInfo;
use crate::reports::{
    create_reporter_with_options, ReportConfig, ReportError, ReportFormat, ReportGenerator,
};
use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

use super::PipelineError;

/// Output an analysis report to the configured destination.
pub fn output_analysis(config: &AppConfig, result: &AnalysisResult) -> Result<()> {
    emit(config, None, |reporter, report_config| {
        reporter.generate_analysis_report(result, report_config)
    })
}

/// Output an analysis report that was loaded from `input_path`.
pub fn output_loaded_analysis(
    config: &AppConfig,
    result: &AnalysisResult,
    input_path: &str,
) -> Result<()> {
    emit(config, Some(input_path), |reporter, report_config| {
        reporter.generate_analysis_report(result, report_config)
    })
}

/// Output the answer to a lifecycle query.
pub fn output_lifecycle(config: &AppConfig, lifecycle: &Lifecycle) -> Result<()> {
    emit(config, None, |reporter, report_config| {
        reporter.generate_lifecycle_report(lifecycle, report_config)
    })
}

/// Output a package's release catalog.
pub fn output_versions(config: &AppConfig, package: &str, versions: &[VersionInfo]) -> Result<()> {
    emit(config, None, |reporter, report_config| {
        reporter.generate_versions_report(package, versions, report_config)
    })
}

fn emit<F>(config: &AppConfig, input_path: Option<&str>, render: F) -> Result<()>
where
    F: FnOnce(&dyn ReportGenerator, &ReportConfig) -> Result<String, ReportError>,
{
    let destination = Destination::resolve(config);

    let mut report_config = config
        .report_config()
        .context("Invalid report filter")?;
    report_config.metadata.input_path = input_path.map(str::to_string);

    let reporter = create_reporter_with_options(destination.format, destination.color);
    tracing::debug!(format = %destination.format, color = destination.color, "Rendering report");
    let report = render(reporter.as_ref(), &report_config).map_err(|e| {
        PipelineError::ReportFailed {
            source: anyhow::Error::new(e).context(format!("{} rendering", destination.format)),
        }
    })?;

    destination.write(&report, config.behavior.quiet)
}

/// Where a report is written and how it is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Destination {
    /// `None` writes to stdout
    file: Option<PathBuf>,
    /// Never `Auto`
    format: ReportFormat,
    color: bool,
}

impl Destination {
    fn resolve(config: &AppConfig) -> Self {
        let no_color_env = std::env::var_os("NO_COLOR").is_some();
        Self::for_terminal(config, std::io::stdout().is_terminal(), no_color_env)
    }

    /// `Auto` becomes the summary on an interactive stdout and JSON for
    /// pipes and files, so saved output stays loadable. Color is only used
    /// on an interactive stdout.
    fn for_terminal(config: &AppConfig, stdout_tty: bool, no_color_env: bool) -> Self {
        let file = config.output.file.clone();
        let interactive = file.is_none() && stdout_tty;
        let format = match config.output.format {
            ReportFormat::Auto if interactive => ReportFormat::Summary,
            ReportFormat::Auto => ReportFormat::Json,
            explicit => explicit,
        };
        Self {
            file,
            format,
            color: interactive && !config.output.no_color && !no_color_env,
        }
    }

    fn write(&self, report: &str, quiet: bool) -> Result<()> {
        let Some(path) = &self.file else {
            println!("{report}");
            return Ok(());
        };
        std::fs::write(path, report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        if !quiet {
            tracing::info!(path = %path.display(), "Report written");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(format: ReportFormat, file: Option<PathBuf>) -> AppConfig {
        AppConfig::builder()
            .output_format(format)
            .output_file(file)
            .quiet(true)
            .build()
    }

    #[test]
    fn test_auto_format_follows_terminal() {
        let stdout = config(ReportFormat::Auto, None);
        let on_tty = Destination::for_terminal(&stdout, true, false);
        assert_eq!(on_tty.format, ReportFormat::Summary);
        assert!(on_tty.color);

        let piped = Destination::for_terminal(&stdout, false, false);
        assert_eq!(piped.format, ReportFormat::Json);
        assert!(!piped.color);

        let to_file = config(ReportFormat::Auto, Some(PathBuf::from("out.json")));
        let destination = Destination::for_terminal(&to_file, true, false);
        assert_eq!(destination.format, ReportFormat::Json);
        assert!(!destination.color);
    }

    #[test]
    fn test_explicit_format_and_color_opt_outs() {
        let markdown = config(ReportFormat::Markdown, None);
        assert_eq!(
            Destination::for_terminal(&markdown, true, false).format,
            ReportFormat::Markdown
        );
        assert!(!Destination::for_terminal(&markdown, true, true).color);

        let mut no_color = config(ReportFormat::Summary, None);
        no_color.output.no_color = true;
        assert!(!Destination::for_terminal(&no_color, true, false).color);
    }

    #[test]
    fn test_versions_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.csv");
        let config = config(ReportFormat::Csv, Some(path.clone()));

        output_versions(&config, "demo", &[VersionInfo::new("1.0")]).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("Version,Released,Yanked"));
        assert!(written.contains("\"1.0\""));
    }

    #[test]
    fn test_unwritable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("no-such-dir").join("report.json");
        let config = config(ReportFormat::Json, Some(missing_dir));

        let err = output_versions(&config, "demo", &[]).unwrap_err();
        assert!(err.to_string().contains("Failed to write report"));
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let config = AppConfig::builder()
            .name_pattern(Some("[unclosed".into()))
            .quiet(true)
            .build();
        let err = output_versions(&config, "demo", &[]).unwrap_err();
        assert!(err.to_string().contains("Invalid report filter"));
    }
}
