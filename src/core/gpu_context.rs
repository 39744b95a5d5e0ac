use std::sync::Arc;
use wgpu::{Adapter, Device, DeviceDescriptor, Features, Instance, Limits, Queue, Surface};

/// Device and queue used to present software frames
///
/// Cheap to clone (Arc); the surface keeps one and hands out references.
#[derive(Clone)]
pub struct GpuContext {
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a context whose adapter can present to `surface`
    pub async fn for_surface(instance: &Instance, surface: &Surface<'_>) -> anyhow::Result<Self> {
        let adapter = Self::request_adapter(instance, surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;
        log::info!("presenting through {:?}", adapter.get_info().name);

        Ok(Self {
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Request adapter with surface compatibility
    async fn request_adapter(instance: &Instance, surface: &Surface<'_>) -> anyhow::Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow::anyhow!("Failed to find appropriate adapter: {:?}", e))
    }

    /// Request device and queue. A texture upload and one fullscreen draw
    /// per frame need nothing beyond the downlevel defaults.
    async fn request_device(adapter: &Adapter) -> anyhow::Result<(Device, Queue)> {
        adapter
            .request_device(&DeviceDescriptor {
                label: Some("softgl present device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create device: {:?}", e))
    }
}
