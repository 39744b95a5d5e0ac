/// Rendering toggles understood by the software pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Blend,
    CullFace,
    DepthClamp,
    DepthTest,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Blend,
        Capability::CullFace,
        Capability::DepthClamp,
        Capability::DepthTest,
    ];

    fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Bitset of enabled capabilities, all disabled by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, capability: Capability, enabled: bool) {
        if enabled {
            self.bits |= capability.bit();
        } else {
            self.bits &= !capability.bit();
        }
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.bits & capability.bit() != 0
    }
}
