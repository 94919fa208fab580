//! Instance filter for RemoteFX counter objects.

/// Instance names (lower-cased) that never carry remote-session telemetry.
const EXCLUDED_INSTANCES: &[&str] = &["", "services", "console"];

/// Decide whether an instance should produce samples.
///
/// The empty name, the services session and the local console session are
/// excluded, case-insensitively. Everything else passes verbatim.
pub fn include(instance_name: &str) -> bool {
    let name = instance_name.to_lowercase();
    !EXCLUDED_INSTANCES.contains(&name.as_str())
}
