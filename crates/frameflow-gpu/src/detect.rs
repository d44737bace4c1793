//! Hardware probing via wgpu adapter enumeration.

use crate::tier::{classify_tier, GpuTier, GpuVendor};
use frameflow_core::{FlowError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the probe found, classified. Immutable once built; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareProfile {
    /// Device name as the driver reports it.
    pub name: String,
    pub vendor: GpuVendor,
    pub tier: GpuTier,
    /// Dedicated video memory in MB; 0 when the API does not report it.
    pub vram_mb: u64,
    /// Whether a hardware accelerator API (Vulkan/Metal/DX12) is reachable.
    pub accelerator_api_available: bool,
}

impl HardwareProfile {
    /// Profile used when detection fails: lowest tier, nothing assumed.
    pub fn unsupported() -> Self {
        Self {
            name: "Unknown".into(),
            vendor: GpuVendor::Unknown,
            tier: GpuTier::Unsupported,
            vram_mb: 0,
            accelerator_api_available: false,
        }
    }
}

/// Explicit probe configuration.
///
/// Passed in at construction time; nothing is discovered through ambient
/// environment state.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Backends to enumerate.
    pub backends: wgpu::Backends,
    /// Pin the probe to a specific adapter instead of preferring the first
    /// discrete device.
    pub adapter_index: Option<usize>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::PRIMARY,
            adapter_index: None,
        }
    }
}

/// Probes the system for accelerator capabilities.
pub struct HardwareDetector {
    config: DetectorConfig,
}

impl HardwareDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Run the probe. Read-only; safe to call more than once.
    ///
    /// Fails with [`FlowError::Detection`] when no adapter can be
    /// enumerated. Callers fall back to [`HardwareProfile::unsupported`]
    /// and keep playback running.
    pub fn detect(&self) -> Result<HardwareProfile> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: self.config.backends,
            ..Default::default()
        });

        let adapters = instance.enumerate_adapters(self.config.backends);
        if adapters.is_empty() {
            return Err(FlowError::Detection(
                "no GPU adapters enumerated; accelerator APIs unreachable".into(),
            ));
        }

        let adapter = match self.config.adapter_index {
            Some(index) => adapters.get(index).ok_or_else(|| {
                FlowError::Detection(format!(
                    "configured adapter index {index} out of range ({} found)",
                    adapters.len()
                ))
            })?,
            None => adapters
                .iter()
                .find(|a| a.get_info().device_type == wgpu::DeviceType::DiscreteGpu)
                .unwrap_or(&adapters[0]),
        };

        let info = adapter.get_info();
        let tier = classify_tier(&info.name);
        if tier == GpuTier::Unsupported {
            warn!(device = %info.name, "Device not in the capability table; treating as unsupported");
        }

        let accelerator_api_available = matches!(
            info.backend,
            wgpu::Backend::Vulkan | wgpu::Backend::Metal | wgpu::Backend::Dx12
        ) && info.device_type != wgpu::DeviceType::Cpu;

        let profile = HardwareProfile {
            name: info.name.clone(),
            vendor: GpuVendor::from_pci_id(info.vendor),
            tier,
            // wgpu does not report adapter memory; tiering relies on the
            // name table instead.
            vram_mb: 0,
            accelerator_api_available,
        };

        info!(
            device = %profile.name,
            vendor = ?profile.vendor,
            tier = ?profile.tier,
            backend = ?info.backend,
            "Hardware probe complete"
        );
        Ok(profile)
    }

    /// Probe, degrading to the unsupported profile instead of failing.
    pub fn detect_or_unsupported(&self) -> HardwareProfile {
        match self.detect() {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Hardware detection failed; using unsupported profile");
                HardwareProfile::unsupported()
            }
        }
    }
}
