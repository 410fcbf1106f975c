//! labelseal-label
//!
//! Rendering collaborators for signed envelopes:
//! - `qr`: envelope text to a QR code (SVG)
//! - `layout`: printable A6 label with the QR code and recipient/sender fields
//!
//! Both take finished envelope text; neither signs or verifies anything.

pub mod config;
pub mod error;
pub mod layout;
pub mod qr;

pub use crate::config::{LabelConfig, PageConfig, QrConfig, QrLevel};
pub use crate::error::{RenderError, RenderResult};
pub use crate::layout::render_label_svg;
pub use crate::qr::{encode_qr, render_qr_svg};
