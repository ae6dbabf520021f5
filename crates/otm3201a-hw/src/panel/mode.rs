//! Video timing and DSI link description for the framebuffer core.

use crate::{LCD_HEIGHT, LCD_WIDTH};

/// Frame rate from the panel vendor's settings.
pub const REFRESH: u32 = 53;

const LEFT_MARGIN: u32 = 42;
const RIGHT_MARGIN: u32 = 26;
const UPPER_MARGIN: u32 = 10;
const LOWER_MARGIN: u32 = 2;
const HSYNC_LEN: u32 = 10;
const VSYNC_LEN: u32 = 2;

/// Number of DSI data lanes wired to the panel.
pub const DATA_LANES: u8 = 1;

/// Maximum D-PHY clock in MHz.
pub const MAX_PHY_CLK_MHZ: u32 = 800;

/// Pixel clock period in picoseconds for the given timings.
pub const fn pixclock_ps(htotal: u32, vtotal: u32, refresh: u32) -> u32 {
    (1_000_000_000_000u64 / (htotal as u64 * vtotal as u64 * refresh as u64)) as u32
}

/// Sync signal flags, as understood by the mxc framebuffer core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncFlags(u32);

impl SyncFlags {
    /// Output enable is active low.
    pub const OE_LOW_ACT: SyncFlags = SyncFlags(0x8000_0000);

    /// Returns the raw flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if all bits of `other` are set.
    pub const fn contains(self, other: SyncFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Scan mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum VMode {
    #[default]
    NonInterlaced = 0,
}

impl std::fmt::Display for VMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VMode::NonInterlaced => write!(f, "non-interlaced"),
        }
    }
}

/// One display timing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMode {
    pub name: &'static str,
    pub refresh: u32,
    pub xres: u32,
    pub yres: u32,
    /// Pixel clock period in picoseconds.
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: SyncFlags,
    pub vmode: VMode,
    pub flag: u32,
}

impl VideoMode {
    /// Total line length in pixel clocks.
    pub const fn htotal(&self) -> u32 {
        self.xres + self.left_margin + self.right_margin + self.hsync_len
    }

    /// Total frame height in lines.
    pub const fn vtotal(&self) -> u32 {
        self.yres + self.upper_margin + self.lower_margin + self.vsync_len
    }

    /// Pixel clock frequency in Hz, derived from the period.
    pub fn pixel_clock_hz(&self) -> u64 {
        if self.pixclock == 0 {
            return 0;
        }
        1_000_000_000_000 / self.pixclock as u64
    }
}

/// Pixel stream format on the DPI side of the DSI host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpiFormat {
    Rgb565Packed,
}

impl DpiFormat {
    /// Bits per pixel on the wire.
    pub fn bits_per_pixel(&self) -> u32 {
        match self {
            DpiFormat::Rgb565Packed => 16,
        }
    }
}

impl std::fmt::Display for DpiFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DpiFormat::Rgb565Packed => write!(f, "rgb565-packed"),
        }
    }
}

/// DSI link parameters for the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdConfig {
    pub virtual_channel: u8,
    pub data_lanes: u8,
    pub max_phy_clk_mhz: u32,
    pub dpi_format: DpiFormat,
}

static VIDEO_MODES: [VideoMode; 1] = [VideoMode {
    name: "TRULY-WVGA",
    refresh: REFRESH,
    xres: LCD_WIDTH,
    yres: LCD_HEIGHT,
    pixclock: pixclock_ps(
        LCD_WIDTH + LEFT_MARGIN + RIGHT_MARGIN + HSYNC_LEN,
        LCD_HEIGHT + UPPER_MARGIN + LOWER_MARGIN + VSYNC_LEN,
        REFRESH,
    ),
    left_margin: LEFT_MARGIN,
    right_margin: RIGHT_MARGIN,
    upper_margin: UPPER_MARGIN,
    lower_margin: LOWER_MARGIN,
    hsync_len: HSYNC_LEN,
    vsync_len: VSYNC_LEN,
    sync: SyncFlags::OE_LOW_ACT,
    vmode: VMode::NonInterlaced,
    flag: 0,
}];

static LCD_CONFIG: LcdConfig = LcdConfig {
    virtual_channel: 0,
    data_lanes: DATA_LANES,
    max_phy_clk_mhz: MAX_PHY_CLK_MHZ,
    dpi_format: DpiFormat::Rgb565Packed,
};

/// Returns the supported video modes (exactly one).
pub fn video_modes() -> &'static [VideoMode] {
    &VIDEO_MODES
}

/// Returns the DSI link configuration.
pub fn lcd_config() -> &'static LcdConfig {
    &LCD_CONFIG
}

/// Returns the mode table together with the link configuration.
pub fn lcd_videomode() -> (&'static [VideoMode], &'static LcdConfig) {
    (video_modes(), lcd_config())
}
