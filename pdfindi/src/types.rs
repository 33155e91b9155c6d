//! Common type definitions for the conversion tools.
//!
//! This module defines:
//! - [`FileKind`]: the upload families a route accepts, with their allow-lists
//! - [`VendorOperation`]: the single-call operations the vendor API exposes
//! - [`Tool`]: the client-facing tools, each mapped to a file kind and an output format
//!
//! # Allow-lists
//!
//! A file is accepted by a [`FileKind`] when either its declared content type or its
//! filename extension is in the kind's allow-list. Content types are compared
//! case-insensitively with parameters stripped, so `Application/PDF; charset=binary`
//! is still a PDF.

use std::fmt;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Upload families accepted by the conversion routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Image,
}

impl FileKind {
    pub fn mime_types(self) -> &'static [&'static str] {
        match self {
            FileKind::Pdf => &[PDF_MIME],
            FileKind::Word => &[
                "application/msword",
                DOCX_MIME,
                "application/rtf",
                "text/rtf",
                "application/vnd.oasis.opendocument.text",
            ],
            FileKind::Image => &[
                "image/jpeg",
                "image/jpg",
                "image/png",
                "image/gif",
                "image/bmp",
                "image/tiff",
                "image/webp",
            ],
        }
    }

    /// Extensions (lowercase, without the dot) accepted for this kind
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Pdf => &["pdf"],
            FileKind::Word => &["doc", "docx", "rtf", "odt"],
            FileKind::Image => &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"],
        }
    }

    /// Message returned to the client when an upload is rejected for this kind
    pub fn rejection_message(self) -> &'static str {
        match self {
            FileKind::Pdf => "File must be a PDF",
            FileKind::Word => "File must be a Word document (DOC, DOCX, RTF or ODT)",
            FileKind::Image => "File must be an image (JPEG, PNG, GIF, BMP, TIFF, WebP)",
        }
    }

    pub fn accepts(self, content_type: &str, filename: &str) -> bool {
        let essence = mime_essence(content_type);
        if self.mime_types().contains(&essence.as_str()) {
            return true;
        }

        match extension(filename) {
            Some(ext) => self.extensions().contains(&ext.to_ascii_lowercase().as_str()),
            None => false,
        }
    }
}

/// Strip parameters from a content type and lowercase it: `Image/PNG; q=1` -> `image/png`
pub fn mime_essence(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

/// Final extension of a filename, without the dot. `None` when there is no dot.
pub fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// One call against the vendor API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorOperation {
    PdfToDocx,
    DocxToPdf,
    PdfToPng,
    ImageToPdf,
    ImageToText,
}

impl VendorOperation {
    /// Path relative to the vendor base URL
    pub fn path(self) -> &'static str {
        match self {
            VendorOperation::PdfToDocx => "convert/pdf/to/docx",
            VendorOperation::DocxToPdf => "convert/docx/to/pdf",
            VendorOperation::PdfToPng => "convert/pdf/to/png",
            VendorOperation::ImageToPdf => "convert/image/to/pdf",
            VendorOperation::ImageToText => "ocr/image/toText",
        }
    }

    /// Whether the vendor answers with a file; OCR answers with JSON instead
    pub fn returns_file(self) -> bool {
        !matches!(self, VendorOperation::ImageToText)
    }
}

impl fmt::Display for VendorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VendorOperation::PdfToDocx => "pdf-to-docx",
            VendorOperation::DocxToPdf => "docx-to-pdf",
            VendorOperation::PdfToPng => "pdf-to-png",
            VendorOperation::ImageToPdf => "image-to-pdf",
            VendorOperation::ImageToText => "image-to-text",
        };
        f.write_str(name)
    }
}

/// Client-facing tools, one per conversion route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    PdfToWord,
    WordToPdf,
    CompressPdf,
    ImageToPdf,
    PdfToImage,
    OcrText,
}

impl Tool {
    pub fn input_kind(self) -> FileKind {
        match self {
            Tool::PdfToWord | Tool::CompressPdf | Tool::PdfToImage => FileKind::Pdf,
            Tool::WordToPdf => FileKind::Word,
            Tool::ImageToPdf | Tool::OcrText => FileKind::Image,
        }
    }

    /// Extension of the produced file, or `None` when the original filename is kept
    pub fn output_extension(self) -> Option<&'static str> {
        match self {
            Tool::PdfToWord => Some("docx"),
            Tool::WordToPdf | Tool::ImageToPdf => Some("pdf"),
            Tool::PdfToImage => Some("png"),
            Tool::CompressPdf | Tool::OcrText => None,
        }
    }

    /// Vendor operation for the single-call file tools. Compression is a composite and OCR
    /// goes through `recognize_text`, so neither has one.
    pub fn operation(self) -> Option<VendorOperation> {
        match self {
            Tool::PdfToWord => Some(VendorOperation::PdfToDocx),
            Tool::WordToPdf => Some(VendorOperation::DocxToPdf),
            Tool::ImageToPdf => Some(VendorOperation::ImageToPdf),
            Tool::PdfToImage => Some(VendorOperation::PdfToPng),
            Tool::OcrText | Tool::CompressPdf => None,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Tool::PdfToWord => "PDF successfully converted to Word document",
            Tool::WordToPdf => "Word document successfully converted to PDF",
            Tool::CompressPdf => "PDF compressed successfully",
            Tool::ImageToPdf => "Image successfully converted to PDF",
            Tool::PdfToImage => "PDF successfully converted to image",
            Tool::OcrText => "Text successfully extracted from image",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tool::PdfToWord => "pdf-to-word",
            Tool::WordToPdf => "word-to-pdf",
            Tool::CompressPdf => "compress-pdf",
            Tool::ImageToPdf => "image-to-pdf",
            Tool::PdfToImage => "pdf-to-jpg",
            Tool::OcrText => "ocr-text",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_accepts_mime_or_extension() {
        assert!(FileKind::Pdf.accepts("application/pdf", "scan"));
        assert!(FileKind::Pdf.accepts("Application/PDF; charset=binary", "scan"));
        assert!(FileKind::Pdf.accepts("application/octet-stream", "report.PDF"));
        assert!(!FileKind::Pdf.accepts("image/png", "report.png"));
        assert!(!FileKind::Pdf.accepts("", "noext"));
    }

    #[test]
    fn test_word_allow_list() {
        assert!(FileKind::Word.accepts("application/msword", "a.bin"));
        assert!(FileKind::Word.accepts(DOCX_MIME, "a"));
        assert!(FileKind::Word.accepts("application/octet-stream", "letter.odt"));
        assert!(FileKind::Word.accepts("text/rtf", "letter"));
        assert!(!FileKind::Word.accepts(PDF_MIME, "letter.pdf"));
    }

    #[test]
    fn test_image_allow_list() {
        for mime in FileKind::Image.mime_types() {
            assert!(FileKind::Image.accepts(mime, "upload"));
        }
        assert!(FileKind::Image.accepts("", "holiday.JPEG"));
        assert!(!FileKind::Image.accepts("image/svg+xml", "logo.svg"));
    }

    #[test]
    fn test_tool_mapping() {
        assert_eq!(Tool::PdfToImage.operation(), Some(VendorOperation::PdfToPng));
        assert_eq!(Tool::PdfToImage.output_extension(), Some("png"));
        assert_eq!(Tool::CompressPdf.operation(), None);
        assert_eq!(Tool::OcrText.operation(), None);
        assert!(!VendorOperation::ImageToText.returns_file());
        assert!(VendorOperation::PdfToPng.returns_file());
        assert_eq!(Tool::ImageToPdf.operation(), Some(VendorOperation::ImageToPdf));
        assert_eq!(Tool::OcrText.input_kind(), FileKind::Image);
        assert_eq!(Tool::WordToPdf.to_string(), "word-to-pdf");
    }
}
