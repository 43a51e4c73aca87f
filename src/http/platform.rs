//! Operating system description for the `User-Agent` comment token.

use std::fs;

/// Provider of a human readable OS description.
pub trait PlatformInfo: Send + Sync {
    fn os_description(&self) -> String;
}

/// Describes the host the process is running on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl PlatformInfo for SystemPlatform {
    fn os_description(&self) -> String {
        let mut parts = vec![os_name()];
        if let Some(release) = kernel_release() {
            parts.push(release);
        }
        parts.push(std::env::consts::ARCH.to_string());
        parts.join(" ")
    }
}

/// A fixed description, for tests and for hosts that want to hide details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPlatform(pub String);

impl PlatformInfo for StaticPlatform {
    fn os_description(&self) -> String {
        self.0.clone()
    }
}

fn os_name() -> String {
    pretty_name().unwrap_or_else(|| match std::env::consts::OS {
        "linux" => "Linux".to_string(),
        "macos" => "macOS".to_string(),
        "windows" => "Windows".to_string(),
        other => other.to_string(),
    })
}

/// `PRETTY_NAME` from `/etc/os-release`, if present.
fn pretty_name() -> Option<String> {
    let content = fs::read_to_string("/etc/os-release").ok()?;
    parse_pretty_name(&content)
}

fn parse_pretty_name(os_release: &str) -> Option<String> {
    os_release
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn kernel_release() -> Option<String> {
    fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pretty_name() {
        let content = "NAME=\"Ubuntu\"\nPRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\nID=ubuntu\n";
        assert_eq!(parse_pretty_name(content).as_deref(), Some("Ubuntu 22.04.4 LTS"));
        assert_eq!(parse_pretty_name("ID=alpine\n"), None);
        assert_eq!(parse_pretty_name("PRETTY_NAME=\"\"\n"), None);
    }

    #[test]
    fn test_system_description_is_not_empty() {
        let description = SystemPlatform.os_description();
        assert!(description.contains(std::env::consts::ARCH));
    }
}
