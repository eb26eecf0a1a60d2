use clap::ValueEnum;
use mflix_models::{Notification, Severity};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Human output that is allowed to print right now.
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human && !self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "type": "success",
                    "message": msg.as_ref()
                });
                self.print_json(&json);
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors should always be shown, even in quiet mode
        match self.format {
            OutputFormat::Human => {
                eprintln!("{} {}", "✗".red(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "type": "error",
                    "message": msg.as_ref()
                });
                self.print_json(&json);
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "type": "info",
                    "message": msg.as_ref()
                });
                self.print_json(&json);
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let json = json!({
                    "type": "warning",
                    "message": msg.as_ref()
                });
                self.print_json(&json);
            }
        }
    }

    /// Plain line for human output; JSON consumers get structured data instead.
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.is_human() {
            println!("{}", msg.as_ref());
        }
    }

    /// Render a toast raised by the session.
    pub fn toast(&self, notification: &Notification) {
        match notification.severity {
            Severity::Success => self.success(&notification.message),
            Severity::Error => self.error(&notification.message),
            Severity::Warning => self.warn(&notification.message),
            Severity::Info => {
                if self.is_human() {
                    println!("{} {}", "ℹ".bright_blue(), notification.message);
                } else if !self.quiet {
                    self.print_json(&json!({
                        "type": "notification",
                        "severity": notification.severity,
                        "message": notification.message
                    }));
                }
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }
}
