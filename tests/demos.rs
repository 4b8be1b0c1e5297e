use lattice::{builtins::Builtins, compile, source::SourceFile};
use pretty_assertions::assert_eq;

static FODO: &str = include_str!("../demos/fodo.ll");

fn main_statements(code: &str) -> Vec<&str> {
    let start = code.find("int main(void) {\n").expect("has main") + "int main(void) {\n".len();
    let end = code.rfind("\n\treturn 0;").expect("returns from main");
    code[start..end].lines().map(str::trim).collect()
}

#[test]
fn fodo_ring() {
    let source = SourceFile::new("fodo.ll", FODO);
    let code = compile(&source, &Builtins::standard()).unwrap();

    assert!(code.contains("#include \"acc_elements.h\"\n"));

    let cell_ref = "ARG_LINE, cell, ".repeat(8);
    let ring = format!(
        "Line ring = create_line_with_elements({cell_ref}ARG_ELEMENT, rf, ARG_ELEMENT, d, ARG_ELEMENT, d, -1);"
    );
    let expected = vec![
        "int cells = 8;",
        "double angle = (6.283185307179586 / (cells * 2));",
        "Element qf = make_quad(0.3, 1.2);",
        "Element qd = make_quad(0.3, (-1 * 1.2));",
        "Element d = make_drift(0.5);",
        "Element b = make_sbend(1.0, angle, 0.0);",
        "Element bpm = make_marker();",
        "Line half = create_line_with_elements(ARG_ELEMENT, qf, ARG_ELEMENT, d, ARG_ELEMENT, b, ARG_ELEMENT, d, -1);",
        "Line cell = append_element(append_element(append_element(append_element(half, qd), d), reverse_element(b)), bpm);",
        "Element rf = make_cavity(0.2, 1e6, 400, 0.0);",
        ring.as_str(),
        r#"printf("%s %d %s %f\n", "cells:", cells, "bend angle:", angle);"#,
    ];
    assert_eq!(main_statements(&code), expected);
}

#[test]
fn fodo_errors_point_into_the_file() {
    let broken = FODO.replace("Line(qf, d, b, d)", "Line(qf, d, b, dd)");
    let source = SourceFile::new("fodo.ll", broken);
    let error = compile(&source, &Builtins::standard()).unwrap_err();
    assert_eq!(
        error.to_string(),
        "fodo.ll:13:33: name error: undefined variable `dd`"
    );
}
