use std::path::PathBuf;

use pdpatch::{KnownDefs, NoSearchPath, Patch, PdError, Predicate, Resolver, SearchIndex, SearchPath};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn parse(name: &str, search: &dyn SearchPath) -> Result<Patch, PdError> {
    let defs = KnownDefs::vanilla()?;
    let mut resolver = Resolver::new(&defs);
    Patch::parse_file(&fixture(name), &mut resolver, search)
}

fn tree_dump(patch: &Patch) -> String {
    patch
        .iter()
        .map(|e| {
            let id = e.obj_id.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
            format!("{:indent$}{} [{}]", "", e.node.name(), id, indent = e.depth * 4)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_simple_patch() {
    let patch = parse("simple.pd", &NoSearchPath).unwrap();

    assert_eq!(patch.path(), Some(fixture("simple.pd").as_path()));
    assert_eq!(patch.len(), 6);
    assert!(patch.structs().is_empty());
    assert_eq!(patch.select(&[Predicate::element("obj")]).len(), 3);
    assert_eq!(patch.select(&[Predicate::element("connect")]).len(), 3);
    assert!(patch.select(&[Predicate::Vanilla(false)]).is_empty());
}

#[test]
fn test_subpatch_tree() {
    let patch = parse("subpatches.pd", &NoSearchPath).unwrap();

    assert_eq!(patch.len(), 18);
    assert_eq!(patch.structs().len(), 1);
    assert_eq!(patch.structs()[0].attr("name"), Some("point"));

    insta::assert_snapshot!(tree_dump(&patch), @r"
    canvas [-]
        osc~ [0]
        msg [1]
        canvas voice [-]
            inlet~ [0]
            *~ [1]
            outlet~ [2]
            connect [-]
            connect [-]
            restore voice [3]
        canvas (subpatch) [-]
            array [0]
            array-data [1]
            coords [2]
            restore (graph-on-parent subpatch) [3]
        text [2]
        dac~ [3]
        connect [-]
        connect [-]
    ");
}

#[test]
fn test_multi_line_text() {
    let patch = parse("subpatches.pd", &NoSearchPath).unwrap();

    let text = patch.select(&[Predicate::element("text")]);
    assert_eq!(text.len(), 1);

    let node = text[0].node;
    assert_eq!(node.line_num(), 16);
    assert_eq!(node.to_string(), "#X text 30 200 a comment \\; spanning two lines");
    assert_eq!(patch.get(3).map(|n| n.line_num()), Some(18));
}

#[test]
fn test_array_data() {
    let patch = parse("subpatches.pd", &NoSearchPath).unwrap();

    let data = patch.select(&[Predicate::element("array-data")]);
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].node.attr("index"), Some("0"));
    assert_eq!(data[0].node.extra_params(), ["0.1", "0.2", "0.3", "0.4"]);
    assert_eq!(data[0].depth, 2);
}

#[test]
fn test_abstractions_without_search_path() {
    let patch = parse("abstractions.pd", &NoSearchPath).unwrap();

    let mut missing: Vec<String> = patch
        .select(&[Predicate::Known(false)])
        .iter()
        .map(|e| e.node.name())
        .collect();
    missing.sort();

    assert_eq!(missing, vec!["cyclone/abs~", "my-env~", "nowhere-to-be-found"]);
}

#[test]
fn test_abstractions_on_search_path() {
    let extra = fixture("extra");
    let index = SearchIndex::build(&[extra.clone()], false);

    let patch = parse("abstractions.pd", &index).unwrap();

    let vanilla_missing = patch.select(&[Predicate::Vanilla(false)]);
    assert_eq!(vanilla_missing.len(), 3);

    let missing = patch.select(&[Predicate::Known(false)]);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].node.name(), "nowhere-to-be-found");

    let env = patch.select(&[Predicate::name("my-env~")]);
    assert_eq!(env[0].node.search_dirs(), [extra.join("mine")]);
    let abs = patch.select(&[Predicate::name("cyclone/abs~")]);
    assert_eq!(abs[0].node.search_dirs(), [extra.join("cyclone")]);
}

#[test]
fn test_constants_are_recognized() {
    let patch = parse("abstractions.pd", &NoSearchPath).unwrap();

    assert!(patch.select(&[Predicate::name("\\$1")])[0].node.vanilla());
    assert!(patch.select(&[Predicate::name("0.25")])[0].node.vanilla());
}

#[test]
fn test_no_canvas() {
    let err = parse("no_canvas.pd", &NoSearchPath).unwrap_err();

    assert!(matches!(err, PdError::InvalidPatch { .. }));
}

#[test]
fn test_missing_file() {
    let err = parse("does-not-exist.pd", &NoSearchPath).unwrap_err();

    assert!(matches!(err, PdError::Io { .. } | PdError::IoError(_)));
}

#[test]
fn test_display_reproduces_lines() {
    let patch = parse("simple.pd", &NoSearchPath).unwrap();
    let source = std::fs::read_to_string(fixture("simple.pd")).unwrap();

    let expected: Vec<&str> = source.lines().map(|l| l.trim_end_matches(';')).collect();
    let rendered = patch.to_string();
    let actual: Vec<&str> = rendered.lines().map(|l| l.trim_end_matches(';')).collect();

    assert_eq!(actual, expected);
}

