//! Human-readable text output

use super::PreviewReport;
use crate::config::PlanConfig;
use std::fmt::Write as _;

const CALLER_HEADER: &str = "Caller";
const INVOCATION_HEADER: &str = "#";

/// Render the preview table
///
/// One row per invocation, one column per parameter in declaration order.
/// Failed invocations show the error in place of their values.
pub fn render_preview(report: &PreviewReport) -> String {
    let mut headers: Vec<String> = vec![CALLER_HEADER.to_string(), INVOCATION_HEADER.to_string()];
    headers.extend(report.parameters.iter().cloned());

    let cells: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.caller.to_string(), row.invocation.to_string()];
            match &row.error {
                Some(error) => cells.push(format!("ERROR: {}", error)),
                None => {
                    for name in &report.parameters {
                        let value = row
                            .values
                            .iter()
                            .find(|arg| &arg.name == name)
                            .map(|arg| arg.value.to_string())
                            .unwrap_or_default();
                        cells.push(value);
                    }
                }
            }
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        // Error text spans the remaining columns and does not widen them
        if row.len() == headers.len() {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match widths.get(i) {
            Some(&width) if i + 1 < cells.len() => format!("{:<width$}", cell, width = width),
            _ => cell.clone(),
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// Print the preview table followed by a short summary
pub fn print_preview(report: &PreviewReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                   PARAMETER PREVIEW");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    print!("{}", render_preview(report));
    println!();

    println!("Callers:     {}", report.callers);
    println!("Invocations: {} per caller", report.invocations);
    println!("Distinct values:");
    for (name, count) in report.distinct_values() {
        println!("  {}: {}", name, count);
    }
    if report.errors() > 0 {
        println!("Errors:      {}", report.errors());
    }
}

/// Print a summary of every parameter in a plan
pub fn print_plan(plan: &PlanConfig) {
    println!("Parameters ({}):", plan.parameters.len());
    for provider in &plan.parameters {
        println!("  {:<20} {:<10} {}", provider.name(), provider.kind(), provider.level());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PreviewRow;
    use crate::value::{ArgumentValue, CallerId};

    #[test]
    fn test_render_preview() {
        let mut report = PreviewReport::new(vec!["user".to_string(), "file".to_string()], 1, 2);
        report.rows.push(PreviewRow {
            caller: CallerId(1),
            invocation: 0,
            values: vec![ArgumentValue::new("user", "alice"), ArgumentValue::new("file", "alice_1.txt")],
            error: None,
        });
        report.rows.push(PreviewRow {
            caller: CallerId(1),
            invocation: 1,
            values: Vec::new(),
            error: Some("boom".to_string()),
        });

        let text = render_preview(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Caller"));
        assert!(lines[0].ends_with("file"));
        assert!(lines[2].contains("alice_1.txt"));
        assert!(lines[3].ends_with("ERROR: boom"));
    }
}
