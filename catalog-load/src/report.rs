use catalog_load_core::{ScenarioConfig, ScenarioReport};
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};
use std::time::SystemTime;

const BANNER_WIDTH: usize = 60;

/// Receives progress from a sequence run. Reports are advisory; nothing reads them back.
pub trait ReportSink {
    fn run_started(&mut self, _target: &str, _at: SystemTime) {}
    fn scenario_started(&mut self, _config: &ScenarioConfig) {}
    fn scenario_finished(&mut self, report: &ScenarioReport);
    fn run_finished(&mut self, _at: SystemTime) {}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes human-readable banners and reports, or one JSON object per line.
pub struct ConsoleSink<W = io::Stdout> {
    format: OutputFormat,
    out: W,
}

impl ConsoleSink {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn text(&mut self, text: &str) {
        if self.format == OutputFormat::Text {
            self.write(text);
        }
    }

    fn json<T: Serialize>(&mut self, event: &str, value: &T) {
        if self.format != OutputFormat::Json {
            return;
        }
        let line = serde_json::json!({ "event": event, "data": value });
        self.write(&format!("{line}\n"));
    }

    fn write(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write report: {err}");
        }
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn run_started(&mut self, target: &str, at: SystemTime) {
        let rule = "=".repeat(BANNER_WIDTH);
        let started = humantime::format_rfc3339_seconds(at).to_string();
        self.text(&format!(
            "{rule}\nProduct Service Load Test\nTarget: {target}\nStarted at: {started}\n{rule}\n"
        ));
        self.json("run_started", &serde_json::json!({ "target": target, "at": started }));
    }

    fn scenario_started(&mut self, config: &ScenarioConfig) {
        let rule = "=".repeat(BANNER_WIDTH);
        self.text(&format!(
            "\n{rule}\nRunning: {}\nRequests: {}, Concurrency: {}\n{rule}\n\n",
            config.name, config.num_requests, config.concurrency
        ));
        self.json("scenario_started", config);
    }

    fn scenario_finished(&mut self, report: &ScenarioReport) {
        self.text(&report.to_string());
        self.json("scenario_finished", report);
    }

    fn run_finished(&mut self, at: SystemTime) {
        let rule = "=".repeat(BANNER_WIDTH);
        let finished = humantime::format_rfc3339_seconds(at).to_string();
        self.text(&format!(
            "\n{rule}\nAll tests completed!\nFinished at: {finished}\n{rule}\n"
        ));
        self.json("run_finished", &serde_json::json!({ "at": finished }));
    }
}
