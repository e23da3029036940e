//! Properties of composite document assembly
use live_preview_playground::core::{Defaults, FileName, FileStore};
use live_preview_playground::preview::{assemble, assemble_store};
use std::sync::Arc;

fn default_store() -> FileStore {
    FileStore::new(Arc::new(Defaults::builtin()))
}

#[test]
fn test_script_text_appears_once_inside_script_block() {
    let scripts = [
        "",
        "console.log('hi');",
        "const markup = '<p>not html</p>';\nlet x = 1 < 2 && 3 > 2;",
        "// ünïcödé ✓",
        "document.body.innerHTML = '</head>';",
    ];

    for script in scripts {
        let mut store = default_store();
        store.set(FileName::Script, script);

        let doc = assemble_store(&store);
        let wrapped = format!("<script>\n{}\n</script>", script);

        assert_eq!(doc.matches(&wrapped).count(), 1, "script: {script:?}");
        if !script.is_empty() {
            assert_eq!(doc.matches(script).count(), 1, "script: {script:?}");
        }
    }
}

#[test]
fn test_assembly_is_idempotent() {
    let mut store = default_store();
    store.set(FileName::Stylesheet, "h1 { color: tomato; }");

    let first = assemble_store(&store);
    let second = assemble_store(&store);

    assert_eq!(first, second);
}

#[test]
fn test_default_files_assemble_into_one_document() {
    let doc = assemble_store(&default_store());

    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert_eq!(doc.matches("<!DOCTYPE html>").count(), 1);

    let style = doc.find("<style>").expect("style block");
    let head_close = doc.find("</head>").expect("head close");
    let paragraph = doc.find("<p>Hello, World!</p>").expect("body content");
    let script = doc.find("<script>").expect("script block");
    let body_close = doc.find("</body>").expect("body close");

    assert!(style < head_close);
    assert!(head_close < paragraph);
    assert!(paragraph < script);
    assert!(script < body_close);
}

#[test]
fn test_fragment_without_head_or_body_gets_both_blocks() {
    let doc = assemble("<!DOCTYPE html><h1>Bare</h1>", "h1 { margin: 0; }", "init();");

    assert!(doc.starts_with("<style>\nh1 { margin: 0; }\n</style>\n"));
    assert!(doc.ends_with("<script>\ninit();\n</script>\n"));
    assert!(doc.contains("<h1>Bare</h1>"));
}

#[test]
fn test_closing_tags_inside_css_do_not_capture_script() {
    let doc = assemble(
        "<!DOCTYPE html><body><p>x</p>",
        "a::after{content:'</body>'}",
        "go();",
    );
    assert_eq!(
        doc,
        "<style>\na::after{content:'</body>'}\n</style>\n\
         <!DOCTYPE html><body><p>x</p><script>\ngo();\n</script>\n"
    );

    let doc = assemble(
        "<!DOCTYPE html><p>no closers</p>",
        "/* </body> */ p{margin:0}",
        "init();",
    );
    assert!(doc.starts_with("<style>\n/* </body> */ p{margin:0}\n</style>\n"));
    assert!(doc.ends_with("<p>no closers</p><script>\ninit();\n</script>\n"));
}

#[test]
fn test_closing_tags_inside_js_do_not_capture_style() {
    let doc = assemble(
        "<!DOCTYPE html><p>no closers</p>",
        "p{}",
        "const s = '</head></body>';",
    );
    assert_eq!(
        doc,
        "<style>\np{}\n</style>\n<!DOCTYPE html><p>no closers</p>\
         <script>\nconst s = '</head></body>';\n</script>\n"
    );
}

#[test]
fn test_head_close_after_body_close() {
    let doc = assemble("<!DOCTYPE html></body></head>", "s", "j");
    assert_eq!(
        doc,
        "<!DOCTYPE html><script>\nj\n</script>\n</body><style>\ns\n</style>\n</head>"
    );
}

#[test]
fn test_doctype_less_document_is_wrapped_even_with_head_and_body() {
    let html = "<html><head><title>x</title></head><body><p>y</p></body></html>";
    let doc = assemble(html, "p{}", "z();");

    // The original markup ends up inside the shell's body
    assert!(doc.starts_with("<!DOCTYPE html>\n<html>\n<head>\n"));
    assert!(doc.contains(&format!("<body>\n{html}")));
    // Style lands in the shell's head, ahead of the nested markup
    let style = doc.find("<style>\np{}\n</style>\n</head>").expect("style in shell head");
    assert!(style < doc.find(html).expect("nested markup"));
    assert!(doc.ends_with("<script>\nz();\n</script>\n</body>\n</html>\n"));
}

#[test]
fn test_malformed_markup_is_accepted() {
    let doc = assemble("<div><span", "}}}{{{", "(((");

    assert!(doc.contains("<div><span"));
    assert!(doc.contains("<style>\n}}}{{{\n</style>"));
    assert!(doc.contains("<script>\n(((\n</script>"));
}
