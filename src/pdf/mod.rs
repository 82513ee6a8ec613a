//! # PDF Serializer
//!
//! Writes a drawn [`Canvas`] out as a PDF 1.7 file.
//!
//! We write the raw bytes ourselves. The planner only needs a small subset
//! of PDF: Type1 standard fonts, text and stroked lines in content streams,
//! and `/Link` annotations that jump to other pages.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, pages, annotations
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```
//!
//! Object ids are assigned up front so a link annotation can reference its
//! target page object even when that page is written after it.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::canvas::{Canvas, DrawOp, PageSurface};
use crate::font::StandardFont;
use crate::model::Metadata;

#[derive(Debug, Default)]
pub struct PdfWriter;

/// Object ids for one page: its content stream, the page object, and the
/// first of its annotation objects.
#[derive(Debug, Clone, Copy)]
struct PageObjects {
    content: usize,
    page: usize,
    first_annotation: usize,
}

struct PdfBuilder {
    objects: Vec<Vec<u8>>,
}

impl PdfBuilder {
    fn push(&mut self, data: Vec<u8>) -> usize {
        self.objects.push(data);
        self.objects.len() - 1
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize every page surface of `canvas`, in order.
    pub fn write(&self, canvas: &Canvas, metadata: &Metadata) -> Vec<u8> {
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then per page (content, page), then annotations
        let mut builder = PdfBuilder {
            objects: vec![Vec::new(), Vec::new(), Vec::new()],
        };

        let mut fonts: Vec<StandardFont> = canvas.fonts().to_vec();
        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }
        for font in &fonts {
            builder.push(
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                     /Encoding /WinAnsiEncoding >>",
                    font.pdf_name()
                )
                .into_bytes(),
            );
        }
        let font_resources = Self::build_font_resource_dict(fonts.len(), 3);

        let layout = Self::allocate(canvas.pages(), builder.objects.len());

        for (page, ids) in canvas.pages().iter().zip(&layout) {
            let content = Self::build_content_stream(page);
            let compressed = compress_to_vec_zlib(&content, 6);
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            let content_id = builder.push(content_data);
            debug_assert_eq!(content_id, ids.content);

            let mut page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >>",
                page.width, page.height, ids.content, font_resources
            );
            if !page.links.is_empty() {
                let annots: Vec<String> = (0..page.links.len())
                    .map(|i| format!("{} 0 R", ids.first_annotation + i))
                    .collect();
                let _ = write!(page_dict, " /Annots [{}]", annots.join(" "));
            }
            page_dict.push_str(" >>");
            let page_id = builder.push(page_dict.into_bytes());
            debug_assert_eq!(page_id, ids.page);
        }

        for page in canvas.pages() {
            for link in &page.links {
                let target = canvas
                    .destination_target(link.destination)
                    .and_then(|surface| layout.get(surface.0));
                let dest = match target {
                    Some(ids) => format!(" /Dest [{} 0 R /Fit]", ids.page),
                    None => {
                        log::warn!(
                            "link annotation points at unknown destination {}",
                            link.destination.0
                        );
                        String::new()
                    }
                };
                let r = link.rect;
                builder.push(
                    format!(
                        "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] \
                         /Border [0 0 0]{} >>",
                        r.x_start, r.y_start, r.x_stop, r.y_stop, dest
                    )
                    .into_bytes(),
                );
            }
        }

        builder.objects[1] = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = layout
            .iter()
            .map(|ids| format!("{} 0 R", ids.page))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2] = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            layout.len()
        )
        .into_bytes();

        let info_obj_id = Self::build_info(metadata).map(|info| builder.push(info));

        log::debug!(
            "writing {} page(s) as {} PDF objects",
            layout.len(),
            builder.objects.len() - 1
        );
        Self::serialize(&builder, info_obj_id)
    }

    /// Assign object ids: content and page objects interleaved, followed by
    /// every annotation in page order.
    fn allocate(pages: &[PageSurface], first_id: usize) -> Vec<PageObjects> {
        let mut next_annotation = first_id + 2 * pages.len();
        pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let ids = PageObjects {
                    content: first_id + 2 * i,
                    page: first_id + 2 * i + 1,
                    first_annotation: next_annotation,
                };
                next_annotation += page.links.len();
                ids
            })
            .collect()
    }

    /// Build the content stream for a single page. Coordinates are already
    /// in PDF space.
    fn build_content_stream(page: &PageSurface) -> Vec<u8> {
        let mut stream: Vec<u8> = Vec::new();
        let mut line_width: Option<f64> = None;

        for op in &page.ops {
            match op {
                DrawOp::Text(run) => {
                    let _ = write!(
                        stream,
                        "BT\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n(",
                        run.font.0, run.size, run.origin.x, run.origin.y
                    );
                    stream.extend_from_slice(&Self::encode_text(&run.text));
                    stream.extend_from_slice(b") Tj\nET\n");
                }
                DrawOp::Line(segment) => {
                    if line_width != Some(segment.width) {
                        let _ = writeln!(stream, "{:.2} w", segment.width);
                        line_width = Some(segment.width);
                    }
                    let _ = write!(
                        stream,
                        "{:.2} {:.2} m\n{:.2} {:.2} l\nS\n",
                        segment.from.x, segment.from.y, segment.to.x, segment.to.y
                    );
                }
            }
        }

        stream
    }

    fn build_font_resource_dict(count: usize, first_id: usize) -> String {
        (0..count)
            .map(|i| format!("/F{} {} 0 R", i, first_id + i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn build_info(metadata: &Metadata) -> Option<Vec<u8>> {
        if metadata.title.is_none() && metadata.author.is_none() && metadata.subject.is_none() {
            return None;
        }
        let mut info: Vec<u8> = b"<< ".to_vec();
        for (key, value) in [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
        ] {
            if let Some(value) = value {
                let _ = write!(info, "/{} (", key);
                info.extend_from_slice(&Self::encode_text(value));
                info.extend_from_slice(b") ");
            }
        }
        info.extend_from_slice(b"/Producer (Almanac 0.1) /Creator (Almanac) >>");
        Some(info)
    }

    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Escape `s` and encode it as WinAnsi. Characters outside Latin-1 (and
    /// the C1 control range) become `?`.
    fn encode_text(s: &str) -> Vec<u8> {
        Self::escape_pdf_string(s)
            .chars()
            .map(|ch| match ch as u32 {
                code @ 0x20..=0x7E | code @ 0xA0..=0xFF => code as u8,
                _ => b'?',
            })
            .collect()
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, data) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = writeln!(output, "{} 0 obj", i);
            output.extend_from_slice(data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", builder.objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}
