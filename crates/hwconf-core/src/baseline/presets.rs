//! Static lookup tables for the baseline engine
//!
//! Rows are indexed by the discriminant of the keying enum, so the order of
//! each table must follow the `ALL` order of that enum.

use crate::requirements::{PerformancePriority, Quantity, UsageType};

/// Component strings for one usage type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsagePreset {
    pub usage: UsageType,
    pub cpu: &'static str,
    pub gpu: &'static str,
    pub ram: &'static str,
    pub storage: &'static str,
    pub networking: &'static str,
    pub display: Option<&'static str>,
}

pub const USAGE_PRESETS: [UsagePreset; 9] = [
    UsagePreset {
        usage: UsageType::Office,
        cpu: "Intel Core i5 14500T / AMD Ryzen 5 Pro 8650HS",
        gpu: "Integrated Intel UHD 770 / Radeon 780M",
        ram: "16 GB DDR5",
        storage: "512 GB NVMe PCIe Gen4 SSD",
        networking: "Dual-band Wi-Fi 6E, 1x RJ45 2.5GbE",
        display: Some("14-15.6\" FHD IPS, low blue-light"),
    },
    UsagePreset {
        usage: UsageType::Web,
        cpu: "Intel Core i5 13500H / Ryzen 5 7640U",
        gpu: "Integrated Intel Iris Xe",
        ram: "16 GB DDR5",
        storage: "512 GB NVMe SSD",
        networking: "Wi-Fi 6E, 1x RJ45",
        display: Some("13-15\" FHD IPS"),
    },
    UsagePreset {
        usage: UsageType::Editing,
        cpu: "Intel Core i7 14700K / Ryzen 9 7900",
        gpu: "NVIDIA RTX 4060 / RTX A2000",
        ram: "32 GB DDR5",
        storage: "1 TB NVMe + 2 TB SATA SSD",
        networking: "Wi-Fi 7, Dual 2.5GbE",
        display: Some("27\" QHD wide-gamut (external)"),
    },
    UsagePreset {
        usage: UsageType::Rendering,
        cpu: "AMD Threadripper Pro 7965WX / Intel Xeon W-2400",
        gpu: "NVIDIA RTX 5000 Ada / RTX 4500",
        ram: "64 GB DDR5 ECC",
        storage: "2 TB NVMe Gen4 + 4 TB NVMe scratch",
        networking: "Dual 10GbE, Wi-Fi 7",
        display: Some("Dual 27\" 4K HDR"),
    },
    UsagePreset {
        usage: UsageType::Coding,
        cpu: "Intel Core Ultra 7 165H / Ryzen 7 Pro 8845HS",
        gpu: "Integrated Intel Arc / Radeon 780M",
        ram: "32 GB LPDDR5x",
        storage: "1 TB NVMe SSD",
        networking: "Wi-Fi 7, 1x RJ45 (dock)",
        display: Some("14-16\" 2.5K 120Hz"),
    },
    UsagePreset {
        usage: UsageType::DataAnalysis,
        cpu: "Intel Xeon Gold 5515+ / AMD EPYC 8324P",
        gpu: "NVIDIA L40S / Tesla T4 (depends on budget)",
        ram: "64 GB DDR5 ECC",
        storage: "2 TB NVMe + 4 TB NVMe scratch + 8 TB HDD",
        networking: "Dual 10GbE, optional Fibre Channel",
        display: Some("Rack/remote console"),
    },
    UsagePreset {
        usage: UsageType::Gaming,
        cpu: "Intel Core i7 14700KF / Ryzen 7 7800X3D",
        gpu: "NVIDIA RTX 4070 Super / Radeon RX 7900 GRE",
        ram: "32 GB DDR5 6000MHz",
        storage: "1 TB NVMe + 2 TB NVMe",
        networking: "Wi-Fi 7, 2.5GbE",
        display: Some("27\" 1440p 165Hz"),
    },
    UsagePreset {
        usage: UsageType::Server,
        cpu: "Dual Intel Xeon Silver 4514Y+ / Dual AMD EPYC 9334",
        gpu: "Optional NVIDIA L4 (virtualization)",
        ram: "128 GB DDR5 ECC (expandable)",
        storage: "4x 1.92 TB NVMe U.2 + 8x 4 TB SAS",
        networking: "4x 10GbE SFP+ + OCP 3.0 slot",
        display: Some("Remote (iDRAC/ILO)"),
    },
    UsagePreset {
        usage: UsageType::Mixed,
        cpu: "Intel Core i7 14700 / Ryzen 9 7900",
        gpu: "NVIDIA RTX 4060 Ti",
        ram: "32 GB DDR5",
        storage: "1 TB NVMe + 2 TB SATA SSD",
        networking: "Wi-Fi 6E, 2.5GbE",
        display: Some("24\" QHD IPS"),
    },
];

pub const PERFORMANCE_NOTES: [&str; 4] = [
    "Prioritize higher-core-count CPUs and sustained boost clocks.",
    "Allocate more budget toward discrete GPUs with ample VRAM.",
    "Ensure higher capacity (>=32 GB) and faster DDR5 modules.",
    "Distribute budget across CPU, GPU, and memory for all-rounder builds.",
];

pub const QUANTITY_NOTES: [&str; 5] = [
    "Single-unit procurement\u{2014}focus on best possible fit.",
    "Small batch\u{2014}standard warranty uplift and imaging support.",
    "Department rollout\u{2014}consider vendor-managed inventory.",
    "Campus/site refresh\u{2014}negotiate volume discounts and staging.",
    "Enterprise-wide deployment\u{2014}engage OEM bid teams and logistic SLAs.",
];

/// Price tiers grouped by usage type
pub const PRICE_BANDS: [(&[UsageType], &str); 5] = [
    (&[UsageType::Office, UsageType::Web], "$800 - $1,100"),
    (&[UsageType::Coding, UsageType::Mixed], "$1,300 - $1,700"),
    (&[UsageType::Editing, UsageType::Gaming], "$1,800 - $2,400"),
    (&[UsageType::Rendering, UsageType::DataAnalysis], "$4,000 - $6,500"),
    (&[UsageType::Server], "$6,000+"),
];

/// Returned for a usage type missing from [`PRICE_BANDS`]
pub const UNLISTED_PRICE_BAND: &str = "Request quote";

pub const DEFAULT_VENDORS: [&str; 3] = ["Dell", "HP", "Lenovo"];

pub const DOCK_ACCESSORY: &str = "USB-C dock with RJ45 + DP/HDMI";
pub const IMAGING_ACCESSORY: &str = "Imaging + asset tagging kit";

pub fn usage_preset(usage: UsageType) -> &'static UsagePreset {
    &USAGE_PRESETS[usage as usize]
}

pub fn performance_note(priority: PerformancePriority) -> &'static str {
    PERFORMANCE_NOTES[priority as usize]
}

pub fn quantity_note(quantity: Quantity) -> &'static str {
    QUANTITY_NOTES[quantity as usize]
}

pub fn price_band(usage: UsageType) -> &'static str {
    PRICE_BANDS
        .iter()
        .find(|(group, _)| group.contains(&usage))
        .map(|(_, band)| *band)
        .unwrap_or(UNLISTED_PRICE_BAND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_follow_enum_order() {
        for (index, usage) in UsageType::ALL.iter().enumerate() {
            assert_eq!(*usage as usize, index);
            assert_eq!(USAGE_PRESETS[index].usage, *usage);
        }
        for (index, priority) in PerformancePriority::ALL.iter().enumerate() {
            assert_eq!(*priority as usize, index);
        }
        for (index, quantity) in Quantity::ALL.iter().enumerate() {
            assert_eq!(*quantity as usize, index);
        }
    }

    #[test]
    fn test_every_usage_type_has_a_price_band() {
        for usage in UsageType::ALL {
            assert_ne!(price_band(usage), UNLISTED_PRICE_BAND, "{}", usage);
        }
    }

    #[test]
    fn test_note_lookup() {
        assert!(performance_note(PerformancePriority::Gpu).contains("GPUs"));
        assert!(quantity_note(Quantity::Enterprise).starts_with("Enterprise-wide"));
    }
}
