use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

#[derive(Debug, Clone, Copy)]
pub(crate) struct FixtureOptions {
    /// Write Info directly into the trailer instead of as an indirect object
    pub inline_info: bool,
    /// Font resource name selected by `Tf`; only `F1` is defined
    pub content_font: &'static str,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            inline_info: false,
            content_font: "F1",
        }
    }
}

/// Builds a small Helvetica PDF, one text line per entry, plus an optional Info dictionary.
pub(crate) fn build_pdf(pages: &[&[&str]], info: &[(&str, &str)]) -> Vec<u8> {
    build_pdf_with(pages, info, FixtureOptions::default())
}

pub(crate) fn build_pdf_with(
    pages: &[&[&str]],
    info: &[(&str, &str)],
    options: FixtureOptions,
) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![options.content_font.into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for line in lines.iter() {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("Td", vec![0.into(), (-18).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if !info.is_empty() {
        let mut dict = Dictionary::new();
        for (key, value) in info {
            dict.set(*key, Object::string_literal(*value));
        }
        if options.inline_info {
            doc.trailer.set("Info", dict);
        } else {
            let info_id = doc.add_object(dict);
            doc.trailer.set("Info", info_id);
        }
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
