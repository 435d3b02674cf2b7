//! Output formatting for module results.
//!
//! JSON output is the module result object an orchestration engine reads
//! from stdout. Text output is a short human summary.

use colored::Colorize;
use serde_json::{Map, Value, json};
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::error::SnipeError;
use crate::planner::{ActionType, ResourceKind};
use crate::reconciler::ReconciliationResult;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Field change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Desired")]
    desired: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a reconciliation result.
    #[must_use]
    pub fn format_result(&self, result: &ReconciliationResult) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string(&Self::result_json(result)).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_result_text(result),
        }
    }

    /// Formats a failed run.
    #[must_use]
    pub fn format_failure(&self, error: &SnipeError) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = json!({ "changed": false, "failed": true, "msg": error.to_string() });
                serde_json::to_string(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {error}", "✗".red()),
        }
    }

    /// Builds the module result object.
    fn result_json(result: &ReconciliationResult) -> Value {
        let mut object = Map::new();
        object.insert(String::from("changed"), Value::Bool(result.changed));
        object.insert(String::from("failed"), Value::Bool(false));
        object.insert(String::from("msg"), Value::String(Self::message(result)));
        object.insert(
            String::from("action"),
            serde_json::to_value(result.action).unwrap_or(Value::Null),
        );
        object.insert(String::from("kind"), Value::String(result.kind.to_string()));
        object.insert(String::from("key"), Value::String(result.key.clone()));
        object.insert(
            String::from(result.kind.id_field()),
            result.id.map_or(Value::Null, Value::from),
        );
        object.insert(
            String::from("diff"),
            serde_json::to_value(&result.changes).unwrap_or_else(|_| Value::Array(Vec::new())),
        );
        object.insert(String::from("check_mode"), Value::Bool(result.check_mode));
        object.insert(
            String::from("completed_at"),
            Value::String(result.completed_at.to_rfc3339()),
        );
        Value::Object(object)
    }

    /// One-line description of what happened.
    fn message(result: &ReconciliationResult) -> String {
        let noun = match result.kind {
            ResourceKind::Category => "Category",
            ResourceKind::Model => "Model",
            ResourceKind::Entry => "Entry",
        };
        let verb = match result.action {
            ActionType::Create => "created",
            ActionType::Update => "updated",
            ActionType::Delete => "deleted",
            ActionType::NoChange => return format!("{noun} {} already in desired state", result.key),
        };

        if result.check_mode {
            format!("{noun} {} would be {verb}", result.key)
        } else {
            format!("{noun} {} {verb}", result.key)
        }
    }

    /// Formats a result as text.
    fn format_result_text(result: &ReconciliationResult) -> String {
        let marker = if result.changed {
            "~".yellow().to_string()
        } else {
            "✓".green().to_string()
        };

        let mut output = format!("{marker} {}\n", Self::message(result));
        let _ = writeln!(output, "   {result}");

        if !result.changes.is_empty() {
            let rows: Vec<ChangeRow> = result
                .changes
                .iter()
                .map(|c| ChangeRow {
                    field: c.field.clone(),
                    current: render_value(&c.current),
                    desired: render_value(&c.desired),
                })
                .collect();

            output.push('\n');
            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        output
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
