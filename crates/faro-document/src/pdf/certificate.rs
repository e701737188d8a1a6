// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Certificate renderer: one landscape A4 page per certificate, built with
// `printpdf` 0.8's data-oriented API.
//
// The page carries a double border, the title, student and course, an
// optional grade, a two-column detail block, the blockchain anchoring hashes,
// a verification QR code and a footer disclaimer. Missing request fields are
// replaced by placeholder text; only the QR step can fail, and when it does
// the page is produced without the code.

use std::sync::Arc;

use faro_core::error::{FaroError, Result};
use faro_core::types::CertificateRenderRequest;
use image::RgbImage;
use printpdf::{
    Mm, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, RawImageData, RawImageFormat,
};
use tracing::{debug, info, instrument, warn};

use super::layout::{Align, CertificateLayout, Face, QrPlacement, Rgb8, Stroke};
use crate::format::{short_date, truncate_chars};
use crate::qr::{QrCodeGenEncoder, QrEncoder, verification_url};

/// A4 landscape.
pub const PAGE_WIDTH_MM: f32 = 297.0;
pub const PAGE_HEIGHT_MM: f32 = 210.0;

const PRIMARY: Rgb8 = Rgb8(102, 126, 234);
const SECONDARY: Rgb8 = Rgb8(118, 75, 162);
const BLACK: Rgb8 = Rgb8(0, 0, 0);
const MUTED: Rgb8 = Rgb8(100, 100, 100);
const BODY: Rgb8 = Rgb8(80, 80, 80);
const FOOTER: Rgb8 = Rgb8(120, 120, 120);

/// Characters of the certificate id shown in the detail block.
const ID_PREVIEW_CHARS: usize = 24;
/// Characters of each hash shown in the verification block.
const HASH_PREVIEW_CHARS: usize = 40;

const QR_SIZE_MM: f32 = 25.0;
const QR_X_MM: f32 = 20.0;

/// A finished certificate.
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    /// The serialised PDF.
    pub bytes: Vec<u8>,
    /// What was drawn, in page coordinates.
    pub layout: CertificateLayout,
    /// Payload of the embedded QR code; `None` when no code was drawn.
    pub qr_payload: Option<String>,
}

/// QR bitmap that made it through encoding, with its payload.
struct QrImage {
    payload: String,
    bitmap: RgbImage,
}

/// Renders certificates for one public origin.
///
/// Cheap to clone; each `render` call builds its own document, so concurrent
/// renders need no coordination.
#[derive(Clone)]
pub struct CertificateRenderer {
    /// Origin of the verify page the QR codes point at.
    origin: String,
    encoder: Arc<dyn QrEncoder>,
}

impl CertificateRenderer {
    /// Renderer whose QR codes point at `<origin>/verify?id=…`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            encoder: Arc::new(QrCodeGenEncoder::default()),
        }
    }

    /// Swap the QR encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn QrEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Render `request` into a PDF.
    ///
    /// QR generation is guarded: any failure is logged and the certificate is
    /// produced without the code.
    #[instrument(skip(self, request), fields(certificate_id = request.certificate_id()))]
    pub async fn render(&self, request: &CertificateRenderRequest) -> Result<RenderedCertificate> {
        let qr = match request.certificate_id() {
            Some(id) => match self.qr_image(id).await {
                Ok(qr) => Some(qr),
                Err(e) => {
                    warn!(error = %e, "QR code generation failed, rendering without it");
                    None
                }
            },
            None => None,
        };

        let layout = self.layout(request, qr.is_some());

        let mut doc = PdfDocument::new("Certificate of Achievement");
        let qr_xobject = qr.as_ref().map(|qr| {
            let width = qr.bitmap.width();
            let raw = RawImage {
                pixels: RawImageData::U8(qr.bitmap.as_raw().clone()),
                width: width as usize,
                height: qr.bitmap.height() as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            (doc.add_image(&raw), width)
        });

        let ops = layout.to_ops(qr_xobject);
        doc.with_pages(vec![PdfPage::new(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            ops,
        )]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if bytes.is_empty() {
            return Err(FaroError::PdfError("printpdf produced an empty document".into()));
        }

        info!(
            bytes = bytes.len(),
            qr = qr.is_some(),
            warnings = warnings.len(),
            "certificate rendered"
        );

        Ok(RenderedCertificate {
            bytes,
            layout,
            qr_payload: qr.map(|qr| qr.payload),
        })
    }

    /// Encode the verification URL for `certificate_id` on the blocking pool.
    async fn qr_image(&self, certificate_id: &str) -> Result<QrImage> {
        let payload = verification_url(&self.origin, certificate_id)?;
        let encoder = Arc::clone(&self.encoder);
        let job_payload = payload.clone();

        let bitmap = tokio::task::spawn_blocking(move || encoder.encode(&job_payload))
            .await
            .map_err(|e| FaroError::QrCode(format!("QR encoder task failed: {e}")))??;

        debug!(%payload, px = bitmap.width(), "QR code ready");
        Ok(QrImage { payload, bitmap })
    }

    /// Lay out the page for `request`. `with_qr` reserves the QR slot and its
    /// caption.
    pub fn layout(&self, request: &CertificateRenderRequest, with_qr: bool) -> CertificateLayout {
        let (w, h) = (PAGE_WIDTH_MM, PAGE_HEIGHT_MM);
        let centre = w / 2.0;
        let mut page = CertificateLayout::new(w, h);

        let certificate = request.certificate.clone().unwrap_or_default();
        let student = request.student.clone().unwrap_or_default();
        let issuer = request.issuer.clone().unwrap_or_default();

        // Frame.
        page.strokes.push(Stroke::Rect {
            x_mm: 10.0,
            y_mm: 10.0,
            w_mm: w - 20.0,
            h_mm: h - 20.0,
            width_mm: 3.0,
            color: PRIMARY,
        });
        page.strokes.push(Stroke::Rect {
            x_mm: 12.0,
            y_mm: 12.0,
            w_mm: w - 24.0,
            h_mm: h - 24.0,
            width_mm: 1.0,
            color: SECONDARY,
        });

        // Header.
        page.push_text(
            "CERTIFICATE OF ACHIEVEMENT",
            Face::HelveticaBold,
            32.0,
            PRIMARY,
            (centre, 35.0),
            Align::Center,
        );
        page.strokes.push(Stroke::Rule {
            x1_mm: 50.0,
            x2_mm: w - 50.0,
            y_mm: 42.0,
            width_mm: 0.5,
            color: PRIMARY,
        });

        // Recipient.
        page.push_text(
            "This is to certify that",
            Face::Helvetica,
            12.0,
            MUTED,
            (centre, 55.0),
            Align::Center,
        );
        page.push_text(
            present(&student.name).unwrap_or("Student Name"),
            Face::TimesBold,
            28.0,
            BLACK,
            (centre, 68.0),
            Align::Center,
        );
        page.strokes.push(Stroke::Rule {
            x1_mm: 80.0,
            x2_mm: w - 80.0,
            y_mm: 72.0,
            width_mm: 0.3,
            color: BLACK,
        });

        // Course.
        page.push_text(
            "has successfully completed the course",
            Face::Helvetica,
            12.0,
            MUTED,
            (centre, 85.0),
            Align::Center,
        );
        page.push_text(
            present(&certificate.course_name).unwrap_or("Course Name"),
            Face::HelveticaBold,
            22.0,
            SECONDARY,
            (centre, 98.0),
            Align::Center,
        );
        if let Some(grade) = present(&certificate.grade) {
            page.push_text(
                format!("Grade: {grade}"),
                Face::HelveticaBold,
                14.0,
                PRIMARY,
                (centre, 110.0),
                Align::Center,
            );
        }

        // Details, left column.
        let details_y = 125.0;
        let left_x = 40.0;
        page.push_text("Issue Date:", Face::Helvetica, 10.0, BODY, (left_x, details_y), Align::Left);
        page.push_text(
            present(&certificate.issue_date)
                .map(short_date)
                .unwrap_or_else(|| "N/A".into()),
            Face::HelveticaBold,
            10.0,
            BODY,
            (left_x, details_y + 5.0),
            Align::Left,
        );
        page.push_text(
            "Certificate ID:",
            Face::Helvetica,
            10.0,
            BODY,
            (left_x, details_y + 15.0),
            Align::Left,
        );
        page.push_text(
            present(&certificate.id)
                .map(|id| truncate_chars(id, ID_PREVIEW_CHARS))
                .unwrap_or("N/A"),
            Face::HelveticaBold,
            8.0,
            BODY,
            (left_x, details_y + 20.0),
            Align::Left,
        );

        // Details, right column.
        let right_x = w - 100.0;
        page.push_text("Issued By:", Face::Helvetica, 10.0, BODY, (right_x, details_y), Align::Left);
        page.push_text(
            present(&issuer.name).unwrap_or("Institution Name"),
            Face::HelveticaBold,
            10.0,
            BODY,
            (right_x, details_y + 5.0),
            Align::Left,
        );
        page.push_text(
            issuer.email.as_deref().unwrap_or(""),
            Face::Helvetica,
            9.0,
            BODY,
            (right_x, details_y + 10.0),
            Align::Left,
        );

        // Blockchain anchoring.
        let chain_y = 155.0;
        page.push_text(
            "BLOCKCHAIN VERIFIED",
            Face::HelveticaBold,
            9.0,
            PRIMARY,
            (centre, chain_y),
            Align::Center,
        );
        if let Some(tx) = certificate.transaction().filter(|tx| !tx.is_empty()) {
            page.push_text(
                format!("Transaction: {}...", truncate_chars(tx, HASH_PREVIEW_CHARS)),
                Face::Helvetica,
                8.0,
                MUTED,
                (centre, chain_y + 5.0),
                Align::Center,
            );
        }
        if let Some(hash) = present(&certificate.certificate_hash) {
            page.push_text(
                format!("Certificate Hash: {}...", truncate_chars(hash, HASH_PREVIEW_CHARS)),
                Face::Helvetica,
                8.0,
                MUTED,
                (centre, chain_y + 10.0),
                Align::Center,
            );
        }

        // Verification QR, bottom-left.
        if with_qr {
            let qr_y = h - 35.0;
            page.qr = Some(QrPlacement {
                x_mm: QR_X_MM,
                y_mm: qr_y,
                size_mm: QR_SIZE_MM,
            });
            page.push_text(
                "Scan to verify",
                Face::Helvetica,
                7.0,
                BODY,
                (QR_X_MM + QR_SIZE_MM / 2.0, qr_y + QR_SIZE_MM + 3.0),
                Align::Center,
            );
        }

        // Footer.
        let footer_y = h - 25.0;
        page.push_text(
            "This certificate is cryptographically secured and can be verified on the blockchain",
            Face::Helvetica,
            8.0,
            FOOTER,
            (centre, footer_y),
            Align::Center,
        );
        page.push_text(
            "FARO Certificate Registry - Powered by Polygon Blockchain",
            Face::Helvetica,
            8.0,
            FOOTER,
            (centre, footer_y + 4.0),
            Align::Center,
        );

        page
    }
}

/// The field's value unless it is missing or empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}
