//! Rendering configuration.

use serde::Deserialize;

use crate::error::{RenderError, RenderResult};

/// QR error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrLevel {
    /// ~7% recovery, largest capacity.
    #[default]
    Low,
    Medium,
    Quartile,
    High,
}

impl QrLevel {
    pub fn parse(s: &str) -> RenderResult<Self> {
        match s {
            "low" | "l" => Ok(Self::Low),
            "medium" | "m" => Ok(Self::Medium),
            "quartile" | "q" => Ok(Self::Quartile),
            "high" | "h" => Ok(Self::High),
            _ => Err(RenderError::Config(format!("unknown qr level: {s}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Quartile => "quartile",
            Self::High => "high",
        }
    }

    pub(crate) fn ec_level(&self) -> qrcode::EcLevel {
        match self {
            Self::Low => qrcode::EcLevel::L,
            Self::Medium => qrcode::EcLevel::M,
            Self::Quartile => qrcode::EcLevel::Q,
            Self::High => qrcode::EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    pub level: QrLevel,
    /// Minimum edge length of the standalone QR image, in pixels.
    pub size_px: u32,
    pub quiet_zone: bool,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            level: QrLevel::Low,
            size_px: 512,
            quiet_zone: false,
        }
    }
}

/// Page geometry in millimetres. Defaults to A6 portrait.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width_mm: 105.0,
            height_mm: 148.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub qr: QrConfig,
    pub page: PageConfig,
}

impl LabelConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if self.qr.size_px == 0 {
            return Err(RenderError::Config("qr.size_px must be greater than zero".into()));
        }
        // Text rows start at 110mm; the page must be tall enough to hold the sender block.
        if self.page.width_mm < 60.0 || self.page.height_mm < 140.0 {
            return Err(RenderError::Config(format!(
                "page {}x{}mm is too small for the label layout",
                self.page.width_mm, self.page.height_mm
            )));
        }
        Ok(())
    }
}
