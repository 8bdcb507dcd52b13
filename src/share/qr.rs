use super::{CodeRenderer, RenderError, RenderedCode};
use qrcode::{Color, EcLevel, QrCode};

/// [`CodeRenderer`] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    ec_level: EcLevel,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::L,
        }
    }
}

impl CodeRenderer for QrRenderer {
    fn render(&self, text: &str, size: u32) -> Result<RenderedCode, RenderError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level)?;
        let dark = code
            .to_colors()
            .into_iter()
            .map(|color| color == Color::Dark)
            .collect();

        Ok(RenderedCode::new(size, code.width(), dark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::QR_CODE_SIZE;

    #[test]
    fn renders_a_square_grid() {
        let code = QrRenderer::default()
            .render("http://localhost:3000/upload/download-all/XYZ", QR_CODE_SIZE)
            .unwrap();

        assert_eq!(code.size(), QR_CODE_SIZE);
        assert!(code.width() >= 21);
        // Finder pattern corners are always dark.
        assert!(code.is_dark(0, 0));
        assert!(code.is_dark(code.width() - 1, 0));
        assert!(code.is_dark(0, code.width() - 1));
        assert_eq!(code.pixels().len(), (QR_CODE_SIZE * QR_CODE_SIZE) as usize);
    }

    #[test]
    fn oversized_input_is_an_error() {
        let text = "x".repeat(8_000);
        assert!(QrRenderer::default().render(&text, QR_CODE_SIZE).is_err());
    }
}
