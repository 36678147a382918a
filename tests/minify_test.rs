//! End-to-end minification tests, plus a corpus walk over `tests/corpus`.

use std::fs;
use std::path::Path;

use ignore::WalkBuilder;
use quick_xml::Reader;
use quick_xml::events::Event;
use svgpress::{Minify, Options, Params, Registry, SvgError, minify, minify_str};

fn min(svg: &str) -> String {
    minify_str(svg).unwrap()
}

/// Minify without any sub-minifiers registered.
fn min_bare(svg: &str) -> String {
    let mut out = Vec::new();
    minify(&Registry::new(), &mut out, svg.as_bytes(), &Options::default()).unwrap();
    String::from_utf8(out).unwrap()
}

/// Whether `xml` reads to the end without a parse error.
fn is_well_formed(xml: &str) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    loop {
        if let Event::Eof = reader.read_event()? {
            return Ok(());
        }
    }
}

#[test]
fn test_degenerate_rect_is_dropped() {
    assert_eq!(min(r#"<rect x="0" y="0" width="0" height="0"></rect>"#), "");
    assert_eq!(min(r#"<svg><rect width="10"/></svg>"#), "<svg/>");
}

#[test]
fn test_dropped_content_empties_parent_in_one_pass() {
    let svg = r#"<svg><g><rect width="0" height="0"/></g><text><metadata/></text></svg>"#;
    let once = min(svg);
    assert_eq!(once, "<svg><text/></svg>");
    assert_eq!(min(&once), once);
}

#[test]
fn test_shapes_become_paths() {
    assert_eq!(
        min(r#"<line x1="0" y1="0" x2="10" y2="10"/>"#),
        r#"<path d="M0 0 10 10z"/>"#
    );
    assert_eq!(
        min(r#"<rect width="10" height="5" fill="blue"></rect>"#),
        r#"<path d="M0 0h10v5H0z" fill="blue"/>"#
    );
    assert_eq!(
        min(r#"<polygon points="0,0 10,0 10,10" stroke="red"/>"#),
        r#"<path d="M0 0 10 0 10 10z" stroke="red"/>"#
    );
    // Rounded corners have no shorter path form.
    assert_eq!(
        min(r#"<rect width="10" height="5" rx="1"/>"#),
        r#"<rect width="10" height="5" rx="1"/>"#
    );
}

#[test]
fn test_empty_containers_are_dropped() {
    assert_eq!(min("<g></g>"), "");
    assert_eq!(min("<g> </g>"), "");
    assert_eq!(min(r#"<defs class="x"/>"#), "");
    assert_eq!(min(r#"<g id="layer"> </g>"#), r#"<g id="layer"/>"#);
    assert_eq!(min("<g><path/></g>"), "<g><path/></g>");
}

#[test]
fn test_colors() {
    assert_eq!(min(r##"<path fill="#ff0000"/>"##), r#"<path fill="red"/>"#);
    assert_eq!(min(r##"<path fill="#AABBCC"/>"##), r##"<path fill="#abc"/>"##);
    assert_eq!(min(r##"<path fill="#112234"/>"##), r##"<path fill="#112234"/>"##);
    assert_eq!(min(r#"<path stroke="White"/>"#), r##"<path stroke="#fff"/>"##);
    assert_eq!(
        min(r#"<stop stop-color="rgb(255, 0, 0)"/>"#),
        r#"<stop stop-color="rgb(255, 0, 0)"/>"#
    );
    assert_eq!(
        min(r#"<path fill="url(#Grad)"/>"#),
        r#"<path fill="url(#Grad)"/>"#
    );
}

#[test]
fn test_dimensions() {
    assert_eq!(
        min(r#"<svg width="10.0px" height="0.50em"/>"#),
        r#"<svg width="10" height=".5em"/>"#
    );
    assert_eq!(
        min(r#"<text x="0.0%" y="-0.0" font-size="12PT"/>"#),
        r#"<text x="0" y="0" font-size="12pt"/>"#
    );
    // A dot without digits after it is not part of the number.
    assert_eq!(
        min(r#"<image href="1.png" id="2.a"/>"#),
        r#"<image href="1.png" id="2.a"/>"#
    );
    // Lists of numbers are not dimensions.
    assert_eq!(
        min(r#"<path stroke-dasharray="1.0 2.0"/>"#),
        r#"<path stroke-dasharray="1.0 2.0"/>"#
    );
}

#[test]
fn test_view_box() {
    assert_eq!(
        min(r#"<svg viewBox="0 0 100.0 100.0"/>"#),
        r#"<svg viewBox="0 0 100 100"/>"#
    );
}

#[test]
fn test_attribute_quoting() {
    assert_eq!(
        min(r#"<text font-family='"Open Sans", serif'/>"#),
        r#"<text font-family='"Open Sans", serif'/>"#
    );
    assert_eq!(
        min(r#"<text aria-label="it's"/>"#),
        r#"<text aria-label="it's"/>"#
    );
    assert_eq!(
        min(r#"<text title="  a   b  "/>"#),
        r#"<text title="a b"/>"#
    );
}

#[test]
fn test_path_data() {
    assert_eq!(
        min(r#"<path d="M 10 20 L 30 40 Z"/>"#),
        r#"<path d="M10 20 30 40z"/>"#
    );
    // Unparsable data is kept.
    assert_eq!(
        min(r#"<path d="M 10 foo"/>"#),
        r#"<path d="M 10 foo"/>"#
    );
}

#[test]
fn test_precision() {
    let mut out = Vec::new();
    let options = Options { precision: Some(1) };
    let svg = r#"<path d="M 1.234 5.678 L 10 10"/>"#;
    minify(&Registry::with_defaults(), &mut out, svg.as_bytes(), &options).unwrap();
    assert_eq!(out, br#"<path d="M1.2 5.7 10 10"/>"#);
}

#[test]
fn test_markup_declarations_are_dropped() {
    let svg = r#"<?xml version="1.0" encoding="UTF-8"?><!DOCTYPE svg><!-- made by hand --><svg version="1.1"><metadata><rdf:RDF/></metadata><path/></svg>"#;
    assert_eq!(min(svg), "<svg><path/></svg>");
}

#[test]
fn test_text_whitespace() {
    assert_eq!(
        min("<svg>\n  <text>\n  Hello   world\n  </text>\n</svg>"),
        "<svg><text>Hello world</text></svg>"
    );
    assert_eq!(min("<text> </text>"), "<text/>");
}

#[test]
fn test_cdata() {
    assert_eq!(min("<text><![CDATA[a<b]]></text>"), "<text>a&lt;b</text>");
    assert_eq!(
        min("<text><![CDATA[&&&&]]></text>"),
        "<text><![CDATA[&&&&]]></text>"
    );
}

#[test]
fn test_style_element() {
    let svg = "<svg><style>\n  .a { fill : red ; }\n</style></svg>";
    assert_eq!(min(svg), "<svg><style>.a{fill:red}</style></svg>");
    // Without a CSS minifier the stylesheet only loses surrounding whitespace.
    assert_eq!(min_bare(svg), "<svg><style>.a { fill : red ; }</style></svg>");

    assert_eq!(
        min("<style><![CDATA[ .a > .b { fill: red } ]]></style>"),
        "<style>.a>.b{fill:red}</style>"
    );
}

#[test]
fn test_style_attribute() {
    let svg = r##"<path style="fill: #FF0000 ; stroke : none;"/>"##;
    assert_eq!(min(svg), r#"<path style="fill:red;stroke:none"/>"#);
    assert_eq!(min_bare(svg), r##"<path style="fill: #FF0000 ; stroke : none;"/>"##);
}

/// A CSS minifier that rejects everything.
struct Rejecting;

impl Minify for Rejecting {
    fn minify(
        &self,
        _registry: &Registry,
        _out: &mut dyn std::io::Write,
        _input: &mut dyn std::io::BufRead,
        _params: &Params,
    ) -> Result<(), SvgError> {
        Err(SvgError::Minifier("rejected".into()))
    }
}

#[test]
fn test_failing_style_minifier() {
    let mut registry = Registry::new();
    registry.add("text/css", Rejecting);

    let mut out = Vec::new();
    let svg = "<svg><style>a{}</style></svg>";
    let err = minify(&registry, &mut out, svg.as_bytes(), &Options::default()).unwrap_err();
    assert!(matches!(err, SvgError::Minifier(_)));

    // Attributes keep their value instead.
    let mut out = Vec::new();
    let svg = r#"<path style="fill: red"/>"#;
    minify(&registry, &mut out, svg.as_bytes(), &Options::default()).unwrap();
    assert_eq!(out, br#"<path style="fill: red"/>"#);
}

#[test]
fn test_content_style_type() {
    // Nothing is registered for text/plain, so the stylesheet passes through.
    assert_eq!(
        min(r#"<svg contentStyleType="Text/Plain"><style>a  { b: c }</style></svg>"#),
        r#"<svg contentStyleType="text/plain"><style>a { b: c }</style></svg>"#
    );
}

#[test]
fn test_malformed_input_is_an_error() {
    let err = minify_str("<svg><path d=\"M0 0/></svg>").unwrap_err();
    assert!(matches!(err, SvgError::XmlParse(_)));
}

#[test]
fn test_write_errors_abort() {
    struct Broken;

    impl std::io::Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let err =
        minify(&Registry::new(), Broken, &b"<svg/>"[..], &Options::default()).unwrap_err();
    assert!(matches!(err, SvgError::Io(_)));
}

/// Minify every SVG in the corpus and check that the output is well-formed and
/// does not change when minified again.
#[test]
fn test_corpus() {
    let corpus_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus");

    if !corpus_dir.exists() {
        println!("Corpus directory not found, skipping");
        return;
    }

    let mut total = 0;
    let mut failed = 0;
    let mut total_original = 0usize;
    let mut total_minified = 0usize;

    for entry in WalkBuilder::new(&corpus_dir).git_ignore(false).build() {
        let entry = entry.unwrap();
        let path = entry.path();
        if !path.extension().is_some_and(|e| e == "svg") {
            continue;
        }

        let rel_path = path.strip_prefix(&corpus_dir).unwrap_or(path);
        let content = fs::read_to_string(path).unwrap();
        total += 1;

        let minified = match minify_str(&content) {
            Ok(minified) => minified,
            Err(e) => {
                eprintln!("  FAIL {}: {}", rel_path.display(), e);
                failed += 1;
                continue;
            }
        };
        if let Err(e) = is_well_formed(&minified) {
            eprintln!("  FAIL {}: minified output invalid: {}", rel_path.display(), e);
            failed += 1;
            continue;
        }
        let again = minify_str(&minified).unwrap();
        if again != minified {
            eprintln!(
                "  FAIL {}: not idempotent\n    first:  {}\n    second: {}",
                rel_path.display(),
                minified,
                again
            );
            failed += 1;
            continue;
        }

        total_original += content.len();
        total_minified += minified.len();
    }

    if total_original > 0 {
        let savings = (total_original - total_minified) as f64 / total_original as f64 * 100.0;
        println!("\nCorpus: {}/{} passed", total - failed, total);
        println!(
            "Size: {} -> {} bytes ({:.1}% smaller)",
            total_original, total_minified, savings
        );
    }

    assert_eq!(failed, 0, "{} SVG files failed", failed);
}
