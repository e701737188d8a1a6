// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Verification QR codes.
//
// Every certificate carries a QR code pointing at the public verify page,
// `<origin>/verify?id=<certificateId>`. Symbols are built with `qrcodegen` and
// rasterised into an `image::RgbImage` so the PDF writer can embed them like
// any other picture.

use std::io::Cursor;

use faro_core::error::{FaroError, Result};
use image::{ImageFormat, Rgb, RgbImage};
use qrcodegen::{QrCode, QrCodeEcc};
use tracing::{debug, instrument};
use url::Url;

/// Dark module colour (`#000000`).
const DARK: Rgb<u8> = Rgb([0, 0, 0]);
/// Light module colour (`#FFFFFF`).
const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// Build the verification URL for `certificate_id` under `origin`.
///
/// `origin` must be an absolute URL with a host; any path, query or fragment
/// on it is replaced.
pub fn verification_url(origin: &str, certificate_id: &str) -> Result<String> {
    let mut url = Url::parse(origin.trim())
        .map_err(|e| FaroError::QrCode(format!("invalid origin '{origin}': {e}")))?;

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(FaroError::QrCode(format!(
            "origin '{origin}' has no host"
        )));
    }

    url.set_path("/verify");
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut().append_pair("id", certificate_id);

    Ok(url.into())
}

/// Turns a text payload into a QR bitmap.
///
/// Implementations run on the blocking thread pool, so they may do CPU work
/// freely.
pub trait QrEncoder: Send + Sync {
    fn encode(&self, payload: &str) -> Result<RgbImage>;
}

/// Default encoder backed by `qrcodegen`.
#[derive(Clone, Copy)]
pub struct QrCodeGenEncoder {
    /// Target bitmap width in pixels (the result may be slightly smaller so
    /// that every module is a whole number of pixels).
    pub width_px: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin_modules: u32,
    pub ecc: QrCodeEcc,
}

impl Default for QrCodeGenEncoder {
    fn default() -> Self {
        Self {
            width_px: 256,
            margin_modules: 1,
            ecc: QrCodeEcc::Medium,
        }
    }
}

impl QrEncoder for QrCodeGenEncoder {
    #[instrument(skip(self), fields(width_px = self.width_px))]
    fn encode(&self, payload: &str) -> Result<RgbImage> {
        let code = QrCode::encode_text(payload, self.ecc)
            .map_err(|e| FaroError::QrCode(format!("payload does not fit a QR code: {e:?}")))?;

        let image = rasterise(&code, self.width_px, self.margin_modules);
        debug!(
            version = code.version().value(),
            modules = code.size(),
            px = image.width(),
            "QR code rasterised"
        );
        Ok(image)
    }
}

/// Draw `code` into a square bitmap no wider than `width_px` (but at least one
/// pixel per module).
fn rasterise(code: &QrCode, width_px: u32, margin: u32) -> RgbImage {
    let modules = code.size() as u32;
    let total = modules + 2 * margin;
    let scale = (width_px / total).max(1);
    let side = total * scale;

    RgbImage::from_fn(side, side, |px, py| {
        let mx = (px / scale) as i32 - margin as i32;
        let my = (py / scale) as i32 - margin as i32;
        // get_module is false outside the symbol, which gives us the quiet zone.
        if code.get_module(mx, my) { DARK } else { LIGHT }
    })
}

/// PNG encoding of a QR bitmap.
pub fn to_png_bytes(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| FaroError::ImageError(format!("failed to encode QR code as PNG: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_has_verify_path_and_id() {
        let url = verification_url("https://faro.example", "abc123").expect("url");
        assert_eq!(url, "https://faro.example/verify?id=abc123");
    }

    #[test]
    fn trailing_slash_and_port_are_kept_clean() {
        let url = verification_url("http://localhost:3000/", "abc123").expect("url");
        assert_eq!(url, "http://localhost:3000/verify?id=abc123");
    }

    #[test]
    fn id_is_query_encoded() {
        let url = verification_url("https://faro.example", "a&b").expect("url");
        assert_eq!(url, "https://faro.example/verify?id=a%26b");
    }

    #[test]
    fn malformed_origin_is_rejected() {
        assert!(matches!(
            verification_url("not a url", "abc123"),
            Err(FaroError::QrCode(_))
        ));
        assert!(verification_url("mailto:someone@example.com", "abc123").is_err());
    }

    #[test]
    fn bitmap_is_square_black_and_white() {
        let image = QrCodeGenEncoder::default()
            .encode("https://faro.example/verify?id=abc123")
            .expect("encode");
        assert_eq!(image.width(), image.height());
        assert!(image.width() <= 256);
        assert!(image.pixels().all(|p| *p == DARK || *p == LIGHT));
        // Top-left pixel sits in the quiet zone.
        assert_eq!(*image.get_pixel(0, 0), LIGHT);
        assert!(image.pixels().any(|p| *p == DARK));
    }

    #[test]
    fn oversized_payload_fails() {
        let payload = "x".repeat(8000);
        assert!(matches!(
            QrCodeGenEncoder::default().encode(&payload),
            Err(FaroError::QrCode(_))
        ));
    }

    #[test]
    fn png_has_signature() {
        let image = QrCodeGenEncoder::default().encode("hello").expect("encode");
        let png = to_png_bytes(&image).expect("png");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
