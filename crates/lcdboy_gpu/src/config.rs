use typed_builder::TypedBuilder;

use crate::GameBoyModel;

/// Power-on configuration for a [`Gpu`](crate::Gpu).
///
/// Register defaults match the state the DMG boot ROM leaves behind at
/// PC=0x0100 (see Pandocs "Power Up Sequence"), so a freshly constructed
/// controller is already displaying with the background enabled.
#[derive(Clone, Debug, TypedBuilder)]
pub struct GpuConfig {
    #[builder(default)]
    pub model: GameBoyModel,
    /// LCDC (FF40). Bit 7 decides whether the controller starts ticking.
    #[builder(default = 0x91)]
    pub lcdc: u8,
    #[builder(default = 0x00)]
    pub lyc: u8,
    /// BGP (FF47).
    #[builder(default = 0xFC)]
    pub bgp: u8,
    /// OBP0/OBP1 are officially uninitialised; the bus reads them as 0xFF.
    #[builder(default = 0xFF)]
    pub obp0: u8,
    #[builder(default = 0xFF)]
    pub obp1: u8,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
