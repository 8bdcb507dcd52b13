mod qr;

pub use qr::QrRenderer;

use crate::upload::ShareResult;
use thiserror::Error;
use tracing::debug;

/// Edge length, in pixels, every optical code is rendered at.
pub const QR_CODE_SIZE: u32 = 128;

/// Modules of blank border around the code, on each side.
const QUIET_ZONE: usize = 4;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to generate QR code: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

/// Turns a string into a scannable image.
pub trait CodeRenderer {
    fn render(&self, text: &str, size: u32) -> Result<RenderedCode, RenderError>;
}

/// A square module grid plus the pixel size it should be drawn at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCode {
    size: u32,
    width: usize,
    dark: Vec<bool>,
}

impl RenderedCode {
    /// `dark` holds `width * width` modules in row-major order.
    pub fn new(size: u32, width: usize, dark: Vec<bool>) -> Self {
        debug_assert_eq!(dark.len(), width * width);
        Self { size, width, dark }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Modules per side, without the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }

    /// Rasterises the code, quiet zone included, into `size * size` pixels
    /// (row-major, `true` for dark).
    pub fn pixels(&self) -> Vec<bool> {
        let size = self.size as usize;
        let span = self.width + 2 * QUIET_ZONE;
        let module_at = |px: usize| (px * span / size.max(1)).checked_sub(QUIET_ZONE);

        let mut pixels = Vec::with_capacity(size * size);
        for py in 0..size {
            for px in 0..size {
                let dark = match (module_at(px), module_at(py)) {
                    (Some(x), Some(y)) => self.is_dark(x, y),
                    _ => false,
                };
                pixels.push(dark);
            }
        }
        pixels
    }
}

/// What the result panel shows for an active share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub text: String,
    pub code: RenderedCode,
}

/// Derives the locator to show for a [`ShareResult`] and asks the renderer
/// for its optical code.
pub struct LinkPresenter<R = QrRenderer> {
    renderer: R,
    size: u32,
}

impl Default for LinkPresenter<QrRenderer> {
    fn default() -> Self {
        Self::new(QrRenderer::default())
    }
}

impl<R: CodeRenderer> LinkPresenter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            size: QR_CODE_SIZE,
        }
    }

    /// Returns `None` when there is nothing to present.
    pub fn present(&self, result: &ShareResult) -> Result<Option<Presentation>, RenderError> {
        let Some(locator) = result.locator_url() else {
            return Ok(None);
        };

        debug!(%locator, "Rendering share code");
        let code = self.renderer.render(locator, self.size)?;
        Ok(Some(Presentation {
            text: locator.to_string(),
            code,
        }))
    }
}
