use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_bandwidth(mbps: f64) -> String {
    if mbps >= 1000.0 {
        format!("{:.1} Gbps", mbps / 1000.0)
    } else {
        format!("{mbps:.0} Mbps")
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value.clamp(0.0, 100.0))
}

/// Deterministic pseudo-random pair in [-1, 1] derived from an id, so initial
/// layouts are reproducible across runs for the same topology.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let a = stable_pair("core-router-1");
        let b = stable_pair("core-router-1");
        assert_eq!(a, b);
        assert!(a.0.abs() <= 1.0 && a.1.abs() <= 1.0);
        assert_ne!(stable_pair("core-router-1"), stable_pair("core-router-2"));
    }

    #[test]
    fn bandwidth_formatting_switches_units() {
        assert_eq!(format_bandwidth(100.0), "100 Mbps");
        assert_eq!(format_bandwidth(10_000.0), "10.0 Gbps");
    }
}
