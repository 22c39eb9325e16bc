//! XFA form-data extraction.
//!
//! Structured-form PDFs keep their filled values in an XML packet hung
//! off the interactive-form dictionary rather than in a renderable text
//! layer. The walk goes catalog → /AcroForm → /XFA: a single stream is
//! taken whole; the name/stream pair array is searched for the
//! "datasets" packet (the one holding filled values — template, config
//! and locale packets are skipped). When the dictionary walk gets
//! nowhere, a brute-force pass inflates every raw stream byte-range in
//! the file and keeps the largest payload that looks like form XML.

use std::collections::BTreeMap;
use std::io::Read;

use flate2::read::ZlibDecoder;
use lopdf::{Document, Object, Stream};

use crate::pipeline::container::xml;

/// XFA packet holding the filled field values.
const DATASETS_PACKET: &[u8] = b"datasets";

/// Substrings that mark an inflated stream as field-bearing form XML.
const FORM_XML_MARKERS: &[&str] = &["<xfa:datasets", "<form", "_TextField", "_Dropdown", "_Check"];

/// Best-effort extraction of form-data XML from a PDF. `None` means the
/// document has no walkable XFA structure and no recognizable form
/// stream — the caller moves on to OCR.
pub fn extract_xfa_text(pdf_bytes: &[u8]) -> Option<String> {
    if let Some(xml) = walk_acroform(pdf_bytes) {
        tracing::debug!(chars = xml.len(), "XFA datasets found via form dictionary");
        return Some(xml);
    }
    let scanned = scan_raw_streams(pdf_bytes);
    if let Some(xml) = &scanned {
        tracing::debug!(chars = xml.len(), "XFA datasets found via raw stream scan");
    }
    scanned
}

/// Flatten form-data XML into field-name → text-value, keyed by leaf
/// local tag name. Falls back to regex extraction for malformed XML.
pub fn parse_field_map(xml_text: &str) -> BTreeMap<String, String> {
    let map = xml::leaf_text_map(xml_text);
    if map.is_empty() {
        xml::leaf_text_map_fallback(xml_text)
    } else {
        map
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

fn stream_text(stream: &Stream) -> Option<String> {
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let text = String::from_utf8_lossy(&content).into_owned();
    (!text.trim().is_empty()).then_some(text)
}

/// Catalog → /AcroForm → /XFA. Single stream or name/stream pair array.
fn walk_acroform(pdf_bytes: &[u8]) -> Option<String> {
    let doc = Document::load_mem(pdf_bytes).ok()?;
    let catalog = doc.catalog().ok()?;
    let acroform = resolve(&doc, catalog.get(b"AcroForm").ok()?);
    let form_dict = acroform.as_dict().ok()?;
    let xfa = resolve(&doc, form_dict.get(b"XFA").ok()?);

    match xfa {
        Object::Stream(stream) => stream_text(stream),
        Object::Array(items) => {
            // Alternating (packet name, stream) pairs.
            for pair in items.chunks(2) {
                let [name_obj, stream_obj] = pair else { continue };
                let is_datasets = matches!(
                    name_obj,
                    Object::String(name, _) if name.as_slice() == DATASETS_PACKET
                );
                if !is_datasets {
                    continue;
                }
                if let Object::Stream(stream) = resolve(&doc, stream_obj) {
                    return stream_text(stream);
                }
            }
            None
        }
        _ => None,
    }
}

/// Iterate every byte range between a `stream` marker and the next
/// `endstream`, zlib-inflate each, and keep the largest payload carrying
/// form-XML markers. Works even when the PDF structure itself is
/// unparseable.
fn scan_raw_streams(pdf_bytes: &[u8]) -> Option<String> {
    let mut best: Option<String> = None;
    let mut pos = 0usize;

    while let Some(found) = find_bytes(&pdf_bytes[pos..], b"stream") {
        let marker = pos + found;
        let after = marker + b"stream".len();
        pos = after;

        // Skip matches that are the tail of "endstream".
        if marker >= 3 && &pdf_bytes[marker - 3..marker] == b"end" {
            continue;
        }

        // Stream data starts after the EOL following the keyword.
        let data_start = after
            + pdf_bytes[after..]
                .iter()
                .take_while(|&&b| b == b'\r' || b == b'\n')
                .count();
        let Some(end_rel) = find_bytes(&pdf_bytes[data_start..], b"endstream") else {
            break;
        };
        let candidate = &pdf_bytes[data_start..data_start + end_rel];

        let mut inflated = Vec::new();
        if ZlibDecoder::new(candidate).read_to_end(&mut inflated).is_err() {
            continue;
        }
        let text = String::from_utf8_lossy(&inflated).into_owned();
        if !FORM_XML_MARKERS.iter().any(|m| text.contains(m)) {
            continue;
        }
        if best.as_ref().map_or(true, |b| text.len() > b.len()) {
            best = Some(text);
        }
    }

    best
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use lopdf::dictionary;

    use super::*;

    pub(crate) const SAMPLE_DATASETS: &str = concat!(
        r#"<xfa:datasets xmlns:xfa="http://www.xfa.org/schema/xfa-data/1.0/">"#,
        "<xfa:data><form1>",
        "<Q5_TextField>history of self-harm</Q5_TextField>",
        "<Q2_TextField>settled on the ward</Q2_TextField>",
        "</form1></xfa:data></xfa:datasets>"
    );

    /// PDF whose AcroForm XFA entry is an alternating name/stream array,
    /// with the usual "Please wait" shell as its only visible page.
    pub(crate) fn make_xfa_pdf(datasets_xml: &str) -> Vec<u8> {
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.7");

        let template_id = doc.add_object(Stream::new(
            dictionary! {},
            b"<template>layout only</template>".to_vec(),
        ));
        let datasets_id = doc.add_object(Stream::new(
            dictionary! {},
            datasets_xml.as_bytes().to_vec(),
        ));

        let acroform_id = doc.add_object(dictionary! {
            "XFA" => Object::Array(vec![
                Object::string_literal("template"),
                Object::Reference(template_id),
                Object::string_literal("datasets"),
                Object::Reference(datasets_id),
            ]),
        });

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let shell = "BT /F1 12 Tf 100 700 Td (Please wait... If this message is not \
                     eventually replaced by the proper contents of the document, your \
                     PDF viewer may not be able to display this type of document.) Tj ET";
        let content_id = doc.add_object(Stream::new(dictionary! {}, shell.as_bytes().to_vec()));

        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => Object::Reference(acroform_id),
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn walks_acroform_to_datasets_packet() {
        let pdf = make_xfa_pdf(SAMPLE_DATASETS);
        let xml = extract_xfa_text(&pdf).unwrap();
        assert!(xml.contains("history of self-harm"));
        assert!(!xml.contains("layout only"), "template packet must be skipped");
    }

    #[test]
    fn brute_force_scan_finds_compressed_form_stream() {
        let mut raw = b"%PDF-1.7 not really walkable\n".to_vec();
        // Decoy stream with no form markers.
        raw.extend_from_slice(b"stream\n");
        raw.extend_from_slice(&zlib(b"just some page content"));
        raw.extend_from_slice(b"\nendstream\n");
        // The real datasets stream.
        raw.extend_from_slice(b"stream\n");
        raw.extend_from_slice(&zlib(SAMPLE_DATASETS.as_bytes()));
        raw.extend_from_slice(b"\nendstream\n");

        let xml = extract_xfa_text(&raw).unwrap();
        assert!(xml.contains("Q5_TextField"));
    }

    #[test]
    fn keeps_largest_matching_stream() {
        let small = "<form><Q1_TextField>a</Q1_TextField></form>";
        let mut raw = Vec::new();
        for xml in [small, SAMPLE_DATASETS] {
            raw.extend_from_slice(b"stream\n");
            raw.extend_from_slice(&zlib(xml.as_bytes()));
            raw.extend_from_slice(b"\nendstream\n");
        }
        let found = scan_raw_streams(&raw).unwrap();
        assert!(found.contains("Q5_TextField"));
    }

    #[test]
    fn no_form_data_returns_none() {
        assert!(extract_xfa_text(b"%PDF-1.4 nothing here").is_none());
        let pdf = crate::pipeline::extraction::pdf::tests::make_test_pdf(&["plain page"]);
        assert!(extract_xfa_text(&pdf).is_none());
    }

    #[test]
    fn field_map_from_datasets() {
        let map = parse_field_map(SAMPLE_DATASETS);
        assert_eq!(map.get("Q5_TextField").unwrap(), "history of self-harm");
        assert_eq!(map.get("Q2_TextField").unwrap(), "settled on the ward");
    }

    #[test]
    fn field_map_falls_back_on_malformed_xml() {
        let broken = "<form1><Q5_TextField>history of self-harm</Q5_TextField><unclosed";
        let map = parse_field_map(broken);
        assert_eq!(map.get("Q5_TextField").unwrap(), "history of self-harm");
    }
}
