//! Capability tier classification and the recommended-parameter table.

use frameflow_core::{PipelineParameters, ScalingAlgorithm, SynthesisModel};
use serde::{Deserialize, Serialize};

/// GPU vendor, derived from the PCI vendor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GpuVendor {
    #[default]
    Unknown,
    Nvidia,
    Amd,
    Intel,
    Apple,
}

impl GpuVendor {
    /// Map a PCI vendor id to a vendor.
    pub fn from_pci_id(id: u32) -> Self {
        match id {
            0x10DE => Self::Nvidia,
            0x1002 => Self::Amd,
            0x8086 => Self::Intel,
            0x106B => Self::Apple,
            _ => Self::Unknown,
        }
    }
}

/// Coarse capability tier used to pick default processing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GpuTier {
    /// No recognized accelerator. Interpolation still runs, at the
    /// lightest settings.
    #[default]
    Unsupported,
    /// RTX 2060-class, GTX 16 series.
    Entry,
    /// RTX 3060/3050, RTX 4060/4050.
    Mid,
    /// RTX 3070 and up, RTX 40 series and up.
    High,
}

/// Classify a device name into a tier.
///
/// Fixed substring lookup; unrecognized devices classify as `Unsupported`.
pub fn classify_tier(device_name: &str) -> GpuTier {
    let name = device_name.to_uppercase();

    const HIGH: [&str; 6] = [
        "RTX 50", "RTX 40", "RTX 3090", "RTX 3080", "RTX 3070", "RTX 3070 TI",
    ];
    const MID: [&str; 2] = ["RTX 3060", "RTX 3050"];
    const ENTRY: [&str; 2] = ["RTX 20", "GTX 16"];

    // Mid-range 40-series parts would match the generic "RTX 40" rule,
    // so they are checked first.
    if name.contains("RTX 4060") || name.contains("RTX 4050") {
        return GpuTier::Mid;
    }
    if HIGH.iter().any(|m| name.contains(m)) {
        return GpuTier::High;
    }
    if MID.iter().any(|m| name.contains(m)) {
        return GpuTier::Mid;
    }
    if ENTRY.iter().any(|m| name.contains(m)) {
        return GpuTier::Entry;
    }
    GpuTier::Unsupported
}

/// Default pipeline parameters for a capability tier.
///
/// Pure function: the same tier always yields identical parameters. Lower
/// tiers get a smaller processing height, a less sensitive scene threshold,
/// the lite model, and a cheaper kernel.
pub fn recommended_parameters(tier: GpuTier) -> PipelineParameters {
    match tier {
        GpuTier::Entry | GpuTier::Unsupported => PipelineParameters {
            target_height: 540,
            scene_threshold: 0.20,
            model: SynthesisModel::RifeV4Lite,
            uhd_mode: false,
            scaling: ScalingAlgorithm::Bilinear,
        },
        GpuTier::Mid => PipelineParameters {
            target_height: 720,
            scene_threshold: 0.15,
            model: SynthesisModel::RifeV4,
            uhd_mode: false,
            scaling: ScalingAlgorithm::Spline36,
        },
        GpuTier::High => PipelineParameters {
            target_height: 1080,
            scene_threshold: 0.10,
            model: SynthesisModel::RifeV4,
            uhd_mode: false,
            scaling: ScalingAlgorithm::Lanczos,
        },
    }
}
