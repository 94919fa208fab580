//! Prometheus text exposition format rendering.

use std::collections::HashMap;
use std::io::Write;

use crate::descriptor::{MetricKind, build_fq_name};
use crate::registry::ScrapeReport;
use crate::sink::MetricSample;

/// Render a scrape report in Prometheus text format (version 0.0.4).
///
/// Samples are grouped into one family per descriptor, in descriptor order.
/// Descriptors without samples are omitted. Per-collector duration and
/// success gauges follow, named under `namespace`.
pub fn render(report: &ScrapeReport<'_>, namespace: &str) -> String {
    let mut output = Vec::with_capacity(report.samples.len() * 100);

    let mut by_name: HashMap<&str, Vec<&MetricSample<'_>>> = HashMap::new();
    for sample in &report.samples {
        by_name
            .entry(sample.descriptor.name.as_str())
            .or_default()
            .push(sample);
    }

    for descriptor in &report.descriptors {
        let Some(samples) = by_name.get(descriptor.name.as_str()) else {
            continue;
        };

        writeln!(
            output,
            "# HELP {} {}",
            descriptor.name,
            escape_help(&descriptor.help)
        )
        .ok();
        writeln!(
            output,
            "# TYPE {} {}",
            descriptor.name,
            descriptor.kind.as_str()
        )
        .ok();

        for sample in samples {
            let labels: Vec<(&str, &str)> = sample.labels().collect();
            writeln!(
                output,
                "{}{} {}",
                descriptor.name,
                format_labels(&labels),
                format_value(sample.value)
            )
            .ok();
        }
    }

    let duration_name = build_fq_name(namespace, "exporter", "collector_duration_seconds");
    let success_name = build_fq_name(namespace, "exporter", "collector_success");

    writeln!(
        output,
        "# HELP {} Duration of a collection.",
        duration_name
    )
    .ok();
    writeln!(output, "# TYPE {} {}", duration_name, MetricKind::Gauge.as_str()).ok();
    for outcome in &report.outcomes {
        writeln!(
            output,
            "{}{} {}",
            duration_name,
            format_labels(&[("collector", outcome.collector)]),
            format_value(outcome.duration.as_secs_f64())
        )
        .ok();
    }

    writeln!(
        output,
        "# HELP {} Whether the collector was successful.",
        success_name
    )
    .ok();
    writeln!(output, "# TYPE {} {}", success_name, MetricKind::Gauge.as_str()).ok();
    for outcome in &report.outcomes {
        writeln!(
            output,
            "{}{} {}",
            success_name,
            format_labels(&[("collector", outcome.collector)]),
            if outcome.success() { 1 } else { 0 }
        )
        .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

/// Escape special characters in label values.
fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape special characters in HELP text.
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format a floating point value for Prometheus.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Format labels for Prometheus exposition format.
fn format_labels(labels: &[(&str, &str)]) -> String {
    if labels.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect();

    format!("{{{}}}", parts.join(","))
}
