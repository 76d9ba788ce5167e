use std::fmt;

use crate::config::ModelConfig;

/// Inference device for the translation model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda => write!(f, "cuda"),
        }
    }
}

/// Hardware facts the selection policy decides on. Probing is an external
/// concern; the profile is supplied through configuration.
#[derive(Debug, Clone)]
pub struct HardwareProfile {
    pub has_accelerator: bool,
    pub memory_mb: u64,
}

impl HardwareProfile {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            has_accelerator: config.has_accelerator,
            memory_mb: config.accelerator_memory_mb,
        }
    }
}

/// Selected model and the device it should run on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    pub model: String,
    pub device: Device,
}

/// Policy deciding which translation model to load for a hardware profile
pub trait ModelSelectionPolicy {
    fn select(&self, profile: &HardwareProfile) -> ModelChoice;
}

/// Default policy: the accelerated model requires an accelerator with at
/// least `min_memory_mb` of memory, everything else gets the smaller
/// distilled model.
pub struct MemoryThresholdPolicy {
    accelerated_model: String,
    fallback_model: String,
    min_memory_mb: u64,
}

impl MemoryThresholdPolicy {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            accelerated_model: config.accelerated_model.clone(),
            fallback_model: config.fallback_model.clone(),
            min_memory_mb: config.min_accelerator_memory_mb,
        }
    }
}

impl ModelSelectionPolicy for MemoryThresholdPolicy {
    fn select(&self, profile: &HardwareProfile) -> ModelChoice {
        if profile.has_accelerator && profile.memory_mb >= self.min_memory_mb {
            ModelChoice {
                model: self.accelerated_model.clone(),
                device: Device::Cuda,
            }
        } else if profile.has_accelerator {
            ModelChoice {
                model: self.fallback_model.clone(),
                device: Device::Cuda,
            }
        } else {
            ModelChoice {
                model: self.fallback_model.clone(),
                device: Device::Cpu,
            }
        }
    }
}
