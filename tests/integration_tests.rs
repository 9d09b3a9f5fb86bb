//! Integration tests for the scan, compile and render pipeline

use pretty_assertions::assert_eq;

use slotted::{
    compile, compile_str, error_handler, reader, render, render_str, scan, CompileError,
    ConfigError, Context, Error, Options, Position, RenderError, RenderUnit, ScanConfig, Segment,
    SlotSegment, Template,
};

fn at(row: usize, col: usize, pos: usize) -> Position {
    Position { row, col, pos }
}

#[test]
fn test_plain_text_scenario() {
    let segments: Vec<_> = scan("foo bar", ScanConfig::default()).collect();
    assert_eq!(
        segments,
        vec![Segment::Static {
            content: "foo bar".to_string(),
            start: at(1, 1, 1),
        }]
    );
    assert_eq!(render_str("foo bar", &Context::new()).unwrap(), "foo bar");
}

#[test]
fn test_slot_scenario() {
    let template = Template::named("scenario", "foo <% num %> bar");
    let parsed = template.parse(&ScanConfig::default());
    let contents: Vec<_> = parsed.segments.iter().map(|s| s.content()).collect();
    assert_eq!(contents, vec!["foo ", "num", " bar"]);
    assert!(parsed.segments[1].is_slot());

    let compiled = template.compile(reader::lookup, &Options::default()).unwrap();
    let ctx = Context::new().with_model_str("num = 45").unwrap();
    insta::assert_snapshot!(compiled.render(&ctx).unwrap(), @"foo 45 bar");
}

#[test]
fn test_escaped_opener_scenario() {
    let segments: Vec<_> = scan(r"foo \<% bar", ScanConfig::default()).collect();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].content(), "foo <% bar");
    assert!(segments.iter().all(|s| !s.is_slot()));
}

#[test]
fn test_unterminated_scenario() {
    let segments: Vec<_> = scan("foo <% unterminated", ScanConfig::default()).collect();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].content(), "foo ");
    assert!(segments[1].is_error());
    assert!(segments[1].content().contains("incomplete"));
    assert_eq!(segments[1].start(), at(1, 5, 5));
    assert!(segments[2].is_static());
    assert_eq!(segments[2].content(), "");
}

#[test]
fn test_escaped_escape_scenario() {
    assert_eq!(render_str(r"a \\ b", &Context::new()).unwrap(), r"a \ b");
}

#[test]
fn test_custom_reader_closure() {
    let reader = |slot: &SlotSegment| -> slotted::Result<RenderUnit> {
        let name = slot.content.clone();
        Ok(RenderUnit::new(move |ctx| {
            Ok(ctx
                .lookup(&name)
                .map(slotted::renderer::display_value)
                .unwrap_or_else(|| format!("<{}?>", name)))
        }))
    };
    let units = compile(reader, scan("<% a %>/<% b %>", ScanConfig::default())).unwrap();
    let ctx = Context::new().with_value("a", "x");
    assert_eq!(render(&units, &ctx).unwrap(), "x/<b?>");
}

#[test]
fn test_compile_error_surfaces_before_render() {
    let err = compile_str("ok <% fine %> then <% 1 2 %>", &Options::default()).unwrap_err();
    match err {
        Error::Compile(CompileError::Syntax { start, .. }) => assert_eq!(start, at(1, 20, 20)),
        other => panic!("expected compile error, got {:?}", other),
    }
}

#[test]
fn test_render_error_propagates() {
    let compiled = compile_str("<% user.name %>", &Options::default()).unwrap();
    let ctx = Context::new().with_value("user", "plain");
    let err = compiled.render(&ctx).unwrap_err();
    assert!(matches!(err, Error::Render(RenderError::NotIndexable { .. })));
}

#[test]
fn test_error_segment_rendered_literally_by_default() {
    let out = render_str("a <% b", &Context::new()).unwrap();
    assert_eq!(out, "a incomplete slot: missing closing `%>` after \" b\"");
}

#[test]
fn test_error_handler_raises() {
    let options = Options::new()
        .with_template_name("page.tmpl")
        .with_error_handler(error_handler::raise());
    let err = compile_str("line one\nline <% two", &options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "page.tmpl:2:6: incomplete slot: missing closing `%>` after \" two\""
    );
}

#[test]
fn test_scan_after_error_is_never_resumed() {
    let options = Options::default();
    let compiled = compile_str("<% a <% b %> <% c", &options).unwrap();
    // "<% a <% b %>" is one slot; "<% c" is the malformed one.
    assert_eq!(compiled.units.len(), 5);
}

#[test]
fn test_handlers_and_model_precedence() {
    let ctx = Context::new()
        .with_model_str("[site]\ntitle = \"Home\"\ntags = [\"a\", \"b\"]")
        .unwrap()
        .with_handler("shout", |args| {
            Ok(slotted::Value::String(format!(
                "{}!",
                args.first()
                    .map(slotted::renderer::display_value)
                    .unwrap_or_default()
            )))
        })
        .with_handler("upper", |_| Ok(slotted::Value::String("shadowed".into())));

    let out = render_str(
        r#"<% shout(site.title) %> <% join(site.tags, "+") %> <% upper("x") %> <% lower("Q") %>"#,
        &ctx,
    )
    .unwrap();
    assert_eq!(out, "Home! a+b shadowed q");
}

#[test]
fn test_multiline_template() {
    let source = "Dear <% name %>,\n\nYour order <% order.id %> ships <% order.date %>.\n";
    let ctx = Context::new()
        .with_model_str("name = \"Ada\"\n[order]\nid = 1042\ndate = \"Monday\"")
        .unwrap();
    assert_eq!(
        render_str(source, &ctx).unwrap(),
        "Dear Ada,\n\nYour order 1042 ships Monday.\n"
    );
}

#[test]
fn test_concurrent_compiles_do_not_interfere() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let escape = ['\\', '~', '^', '!'][i];
                let source = format!("{}<% x %> <% x %>", escape);
                let options = Options::new().with_escape_char(escape).unwrap();
                let compiled = compile_str(&source, &options).unwrap();
                compiled.render(&Context::new().with_value("x", i as i64)).unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("<% x %> {}", i));
    }
}

#[test]
fn test_float_literals_render() {
    let ctx = Context::new().with_model_str("ratio = 0.75").unwrap();
    assert_eq!(render_str("<% 1.5 %> / <% ratio %>", &ctx).unwrap(), "1.5 / 0.75");
}

#[test]
fn test_index_paths_still_resolve() {
    let ctx = Context::new()
        .with_model_str("[[items]]\nname = \"first\"\n[[items]]\nname = \"second\"")
        .unwrap();
    assert_eq!(render_str("<% items.1.name %>", &ctx).unwrap(), "second");
}

#[test]
fn test_delimiter_escape_chars_are_rejected() {
    for c in ['<', '%', '>'] {
        assert!(matches!(
            ScanConfig::default().with_escape_char(c),
            Err(ConfigError::InvalidEscapeChar(_))
        ));
        assert!(matches!(
            Options::new().with_escape_char(c),
            Err(ConfigError::InvalidEscapeChar(_))
        ));
    }
    let err = ScanConfig::from_toml_str("escape-char = \"<\"").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEscapeChar('<')));
}
