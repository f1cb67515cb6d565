use sysinfo::System;

/// One human-readable line describing the host OS, with explicit
/// placeholders for anything sysinfo cannot determine.
pub fn os_description() -> String {
    let name = System::name().unwrap_or_else(|| "unknown".to_string());
    let version = System::os_version().unwrap_or_else(|| "unknown".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "unknown".to_string());
    format!("{} {} (kernel {})", name, version, kernel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_never_empty() {
        let description = os_description();
        assert!(!description.is_empty());
        assert!(description.contains("kernel"));
    }
}
