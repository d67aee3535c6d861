//! Baseline configuration engine
//!
//! Maps validated [`Requirements`] to a concrete [`BaselineSpec`] without any
//! I/O. The output depends only on the input: no clock, no randomness, no
//! shared state.
//!
//! # Derivation order
//!
//! ```text
//! usageType ──► preset row (cpu, gpu, ram, storage, networking, display)
//! formFactor, quantity, networkingNeeds ──► accessories
//! usageType ──► price band
//! performancePriority, quantity, optional notes ──► notes
//! storageRequirements / networkingNeeds ──► override preset storage / networking
//! brandConstraints ──► recommended vendors
//! ```

pub mod presets;

use serde::{Deserialize, Serialize};

use crate::requirements::{Quantity, Requirements};
use presets::{
    performance_note, price_band, quantity_note, usage_preset, DEFAULT_VENDORS, DOCK_ACCESSORY,
    IMAGING_ACCESSORY,
};

pub use presets::UsagePreset;

/// Deterministic hardware recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSpec {
    pub cpu: String,
    pub gpu: String,
    pub ram: String,
    pub storage: String,
    pub networking: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub accessories: Vec<String>,
    pub recommended_vendors: Vec<String>,
    pub estimated_unit_price: String,
    pub notes: Vec<String>,
}

/// Derive the baseline specification for a set of requirements
pub fn derive_baseline_spec(requirements: &Requirements) -> BaselineSpec {
    let preset = usage_preset(requirements.usage_type);

    BaselineSpec {
        cpu: preset.cpu.to_string(),
        gpu: preset.gpu.to_string(),
        ram: preset.ram.to_string(),
        storage: override_or(&requirements.storage_requirements, preset.storage),
        networking: override_or(&requirements.networking_needs, preset.networking),
        display: preset.display.map(str::to_string),
        accessories: accessories(requirements),
        recommended_vendors: recommended_vendors(&requirements.brand_constraints),
        estimated_unit_price: price_band(requirements.usage_type).to_string(),
        notes: notes(requirements),
    }
}

fn override_or(value: &str, preset: &str) -> String {
    if value.is_empty() {
        preset.to_string()
    } else {
        value.to_string()
    }
}

fn accessories(requirements: &Requirements) -> Vec<String> {
    let mut accessories = Vec::new();

    if requirements.form_factor.is_portable() {
        accessories.push(DOCK_ACCESSORY.to_string());
    }
    if requirements.quantity != Quantity::Single {
        accessories.push(IMAGING_ACCESSORY.to_string());
    }
    if !requirements.networking_needs.is_empty() {
        accessories.push(format!(
            "Networking add-ons: {}",
            requirements.networking_needs
        ));
    }

    accessories
}

fn notes(requirements: &Requirements) -> Vec<String> {
    let mut notes = vec![
        performance_note(requirements.performance_priority).to_string(),
        quantity_note(requirements.quantity).to_string(),
    ];

    let optional = [
        ("Durability", &requirements.durability_needs),
        ("Warranty", &requirements.warranty_preferences),
        ("Power targets", &requirements.power_preferences),
        ("Compliance", &requirements.compliance_notes),
    ];
    for (label, value) in optional {
        if !value.is_empty() {
            notes.push(format!("{}: {}", label, value));
        }
    }

    notes
}

/// Empty tokens are kept so each comma still yields a vendor slot
fn recommended_vendors(brand_constraints: &str) -> Vec<String> {
    if brand_constraints.trim().is_empty() {
        return DEFAULT_VENDORS.iter().map(|v| v.to_string()).collect();
    }
    brand_constraints
        .split(',')
        .map(|vendor| vendor.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::{FormFactor, PerformancePriority, UsageType};
    use proptest::prelude::*;

    fn requirements(usage_type: UsageType) -> Requirements {
        Requirements {
            usage_type,
            budget_range: "1000-2000".to_string(),
            quantity: Quantity::Single,
            form_factor: FormFactor::Desktop,
            required_software: vec!["Microsoft Office".to_string()],
            brand_constraints: String::new(),
            performance_priority: PerformancePriority::Balanced,
            storage_requirements: String::new(),
            networking_needs: String::new(),
            durability_needs: String::new(),
            warranty_preferences: String::new(),
            power_preferences: String::new(),
            compliance_notes: String::new(),
        }
    }

    #[test]
    fn test_presets_pass_through() {
        for usage in UsageType::ALL {
            let spec = derive_baseline_spec(&requirements(usage));
            let preset = usage_preset(usage);

            assert_eq!(spec.cpu, preset.cpu);
            assert_eq!(spec.gpu, preset.gpu);
            assert_eq!(spec.ram, preset.ram);
            assert_eq!(spec.storage, preset.storage);
            assert_eq!(spec.networking, preset.networking);
            assert_eq!(spec.display.as_deref(), preset.display);
        }
    }

    #[test]
    fn test_storage_and_networking_overrides() {
        let mut req = requirements(UsageType::Editing);
        req.storage_requirements = "4 TB RAID 1".to_string();
        req.networking_needs = "10GbE SFP+".to_string();

        let spec = derive_baseline_spec(&req);
        assert_eq!(spec.storage, "4 TB RAID 1");
        assert_eq!(spec.networking, "10GbE SFP+");
        // display is never overridden
        assert_eq!(spec.display.as_deref(), usage_preset(UsageType::Editing).display);
    }

    #[test]
    fn test_vendor_resolution() {
        let mut req = requirements(UsageType::Office);
        req.brand_constraints = "Dell, HP".to_string();
        assert_eq!(
            derive_baseline_spec(&req).recommended_vendors,
            vec!["Dell", "HP"]
        );

        req.brand_constraints = String::new();
        assert_eq!(
            derive_baseline_spec(&req).recommended_vendors,
            vec!["Dell", "HP", "Lenovo"]
        );

        req.brand_constraints = "   ".to_string();
        assert_eq!(derive_baseline_spec(&req).recommended_vendors.len(), 3);

        req.brand_constraints = "Framework,  Apple ".to_string();
        assert_eq!(
            derive_baseline_spec(&req).recommended_vendors,
            vec!["Framework", "Apple"]
        );
    }

    #[test]
    fn test_vendor_split_keeps_empty_tokens() {
        let mut req = requirements(UsageType::Office);
        req.brand_constraints = "Dell,,HP".to_string();
        assert_eq!(
            derive_baseline_spec(&req).recommended_vendors,
            vec!["Dell", "", "HP"]
        );

        // separators only
        req.brand_constraints = " , ,".to_string();
        assert_eq!(
            derive_baseline_spec(&req).recommended_vendors,
            vec!["", "", ""]
        );
    }

    #[test]
    fn test_desktop_single_unit_has_no_accessories() {
        let spec = derive_baseline_spec(&requirements(UsageType::Office));
        assert!(spec.accessories.is_empty());
    }

    #[test]
    fn test_laptop_batch_accessory_order() {
        let mut req = requirements(UsageType::Coding);
        req.form_factor = FormFactor::Laptop;
        req.quantity = Quantity::SmallBatch;

        let spec = derive_baseline_spec(&req);
        assert_eq!(spec.accessories, vec![DOCK_ACCESSORY, IMAGING_ACCESSORY]);
    }

    #[test]
    fn test_networking_needs_add_accessory() {
        let mut req = requirements(UsageType::Web);
        req.form_factor = FormFactor::Ultrabook;
        req.networking_needs = "LTE modem".to_string();

        let spec = derive_baseline_spec(&req);
        assert_eq!(
            spec.accessories,
            vec![DOCK_ACCESSORY, "Networking add-ons: LTE modem"]
        );
    }

    #[test]
    fn test_notes_ordering() {
        let mut req = requirements(UsageType::Mixed);
        req.durability_needs = "MIL-STD-810H".to_string();
        req.warranty_preferences = "3Y onsite NBD".to_string();
        req.power_preferences = "Energy Star".to_string();
        req.compliance_notes = "TAA".to_string();

        let spec = derive_baseline_spec(&req);
        assert_eq!(
            spec.notes,
            vec![
                performance_note(PerformancePriority::Balanced).to_string(),
                quantity_note(Quantity::Single).to_string(),
                "Durability: MIL-STD-810H".to_string(),
                "Warranty: 3Y onsite NBD".to_string(),
                "Power targets: Energy Star".to_string(),
                "Compliance: TAA".to_string(),
            ]
        );
    }

    #[test]
    fn test_skipped_optional_notes_keep_order() {
        let mut req = requirements(UsageType::Mixed);
        req.compliance_notes = "FIPS 140-3".to_string();
        req.warranty_preferences = "5Y".to_string();

        let spec = derive_baseline_spec(&req);
        assert_eq!(&spec.notes[2..], ["Warranty: 5Y", "Compliance: FIPS 140-3"]);
    }

    #[test]
    fn test_price_bands() {
        assert_eq!(
            derive_baseline_spec(&requirements(UsageType::Server)).estimated_unit_price,
            "$6,000+"
        );
        assert_eq!(
            derive_baseline_spec(&requirements(UsageType::Office)).estimated_unit_price,
            "$800 - $1,100"
        );
        assert_eq!(
            derive_baseline_spec(&requirements(UsageType::DataAnalysis)).estimated_unit_price,
            "$4,000 - $6,500"
        );
    }

    #[test]
    fn test_gaming_batch_scenario() {
        let mut req = requirements(UsageType::Gaming);
        req.quantity = Quantity::SmallBatch;
        req.required_software = vec!["Games".to_string()];
        req.performance_priority = PerformancePriority::Gpu;

        let spec = derive_baseline_spec(&req);
        assert_eq!(spec.gpu, "NVIDIA RTX 4070 Super / Radeon RX 7900 GRE");
        assert_eq!(spec.estimated_unit_price, "$1,800 - $2,400");
        assert_eq!(spec.recommended_vendors, vec!["Dell", "HP", "Lenovo"]);
        assert_eq!(spec.accessories, vec!["Imaging + asset tagging kit"]);
    }

    #[test]
    fn test_spec_serializes_camel_case() {
        let value = serde_json::to_value(derive_baseline_spec(&requirements(UsageType::Web)))
            .unwrap();
        assert!(value.get("recommendedVendors").is_some());
        assert!(value.get("estimatedUnitPrice").is_some());
        assert_eq!(value["display"], "13-15\" FHD IPS");
    }

    fn text() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[A-Za-z0-9 ,]{1,24}"]
    }

    prop_compose! {
        fn arb_requirements()(
            usage in prop::sample::select(UsageType::ALL.to_vec()),
            quantity in prop::sample::select(Quantity::ALL.to_vec()),
            form_factor in prop::sample::select(FormFactor::ALL.to_vec()),
            priority in prop::sample::select(PerformancePriority::ALL.to_vec()),
            brands in text(),
            storage in text(),
            networking in text(),
            durability in text(),
            warranty in text(),
        ) -> Requirements {
            Requirements {
                usage_type: usage,
                budget_range: "any".to_string(),
                quantity,
                form_factor,
                required_software: vec!["Office".to_string()],
                brand_constraints: brands,
                performance_priority: priority,
                storage_requirements: storage,
                networking_needs: networking,
                durability_needs: durability,
                warranty_preferences: warranty,
                power_preferences: String::new(),
                compliance_notes: String::new(),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_derivation_is_deterministic(req in arb_requirements()) {
            prop_assert_eq!(derive_baseline_spec(&req), derive_baseline_spec(&req.clone()));
        }

        #[test]
        fn prop_override_law(req in arb_requirements()) {
            let spec = derive_baseline_spec(&req);
            let preset = usage_preset(req.usage_type);

            if req.storage_requirements.is_empty() {
                prop_assert_eq!(spec.storage.as_str(), preset.storage);
            } else {
                prop_assert_eq!(&spec.storage, &req.storage_requirements);
            }
            if req.networking_needs.is_empty() {
                prop_assert_eq!(spec.networking.as_str(), preset.networking);
            } else {
                prop_assert_eq!(&spec.networking, &req.networking_needs);
            }
        }

        #[test]
        fn prop_notes_start_with_fixed_entries(req in arb_requirements()) {
            let spec = derive_baseline_spec(&req);
            prop_assert!(spec.notes.len() >= 2);
            prop_assert_eq!(spec.notes[0].as_str(), performance_note(req.performance_priority));
            prop_assert_eq!(spec.notes[1].as_str(), quantity_note(req.quantity));
        }
    }
}
