//! Formatting helpers shared by listing commands.

use chrono::{DateTime, Utc};

use crate::ports::{AppId, LicenseInfo};

/// Licenses that grant access to `app`, in license order.
pub fn licenses_for_app(licenses: &[LicenseInfo], app: AppId) -> Vec<&LicenseInfo> {
    licenses
        .iter()
        .filter(|license| license.apps.contains(&app))
        .collect()
}

/// Render minutes of playtime as `12h 34m`; zero is just `0m`.
pub fn format_playtime(minutes: u32) -> String {
    if minutes < 60 {
        format!("{minutes}m")
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render a byte count with a binary unit suffix.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PackageId;
    use chrono::TimeZone;

    fn license(package: u32, apps: Vec<u32>) -> LicenseInfo {
        LicenseInfo {
            package_id: PackageId(package),
            apps: apps.into_iter().map(AppId).collect(),
            purchased: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            payment_method: None,
        }
    }

    #[test]
    fn test_licenses_for_app_filters_by_app() {
        let licenses = vec![license(1, vec![440, 441]), license(2, vec![570]), license(3, vec![440])];
        let matched = licenses_for_app(&licenses, AppId(440));
        let packages: Vec<u32> = matched.iter().map(|license| license.package_id.0).collect();
        assert_eq!(packages, vec![1, 3]);
    }

    #[test]
    fn test_format_playtime() {
        assert_eq!(format_playtime(0), "0m");
        assert_eq!(format_playtime(59), "59m");
        assert_eq!(format_playtime(60), "1h 0m");
        assert_eq!(format_playtime(754), "12h 34m");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
