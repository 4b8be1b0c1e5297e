use crate::util::test_utils::tree_tests;

tree_tests!(
    use codegen;

    fn test_empty_program() {
        let program = "// nothing here";
        let code_ok = "";
    }

    fn test_numeric_statements() {
        let program = r#"
            let x: int = 1 + 2;
            let y: float = x * 2.5;
            println(x, y, "done");
        "#;
        let code_ok = r#"
            int x = (1 + 2);
            double y = (x * 2.5);
            printf("%d %f %s\n", x, y, "done");
        "#;
    }

    fn test_unary_minus() {
        let program = "let y: float = -1.5 * 2;";
        let code_ok = "double y = ((-1 * 1.5) * 2);";
    }

    fn test_forward_declaration() {
        let program = "let l: Line;";
        let code_ok = "Line l;";
    }

    fn test_concatenation() {
        let program = "
            let d: Drift = Drift(L = 0.5);
            let q: Quad = Quad(L = 0.2, K1 = 1.1);
            let a: Line = d + q;
            let b: Line = a + d;
            let c: Line = d + a;
            let e: Line = a + b;
        ";
        let code_ok = "
            Element d = make_drift(0.5);
            Element q = make_quad(0.2, 1.1);
            Line a = concatenate(d, q);
            Line b = append_element(a, d);
            Line c = prepend_element(d, a);
            Line e = append_line(a, b);
        ";
    }

    fn test_reversed_concatenation() {
        let program = "
            let d: Drift = Drift(L = 1);
            let q: Quad = Quad(L = 1, K1 = 2);
            let l: Line = d + q;
            let a: Line = d - l;
            let b: Line = l - l;
            let c: Line = d - q;
            let e: Line = l - q;
        ";
        let code_ok = "
            Element d = make_drift(1);
            Element q = make_quad(1, 2);
            Line l = concatenate(d, q);
            Line a = append_reversed_to_element(d, l);
            Line b = append_reversed_to_line(l, l);
            Line c = concatenate(d, reverse_element(q));
            Line e = append_element(l, reverse_element(q));
        ";
    }

    fn test_repetition() {
        let program = "
            let d: Drift = Drift(L = 1);
            let l: Line = Line(d);
            let r: Line = 3 * l;
            let s: Line = l * 3;
            let t: Line = 2 * d;
            let u: Line = d * 2;
        ";
        let code_ok = "
            Element d = make_drift(1);
            Line l = create_line_with_elements(ARG_ELEMENT, d, -1);
            Line r = repeat_line(l, 3);
            Line s = repeat_line(l, 3);
            Line t = repeat_element(d, 2);
            Line u = repeat_element(d, 2);
        ";
    }

    fn test_line_expands_repetitions() {
        let program = "
            let a: Marker = Marker();
            let b: Drift = Drift(L = 1);
            let c: Quad = Quad(L = 1);
            let l: Line = Line(a, 2 * b, c);
        ";
        let code_ok = "
            Element a = make_marker();
            Element b = make_drift(1);
            Element c = make_quad(1, 0.0);
            Line l = create_line_with_elements(ARG_ELEMENT, a, ARG_ELEMENT, b, ARG_ELEMENT, b, ARG_ELEMENT, c, -1);
        ";
    }

    fn test_line_constant_and_negative_counts() {
        let program = "
            let n: int = 2;
            let d: Drift = Drift(L = 1);
            let cell: Line = Line(d);
            let ring: Line = Line(cell * (n + 1), (-2) * d, -1 * cell, 0 * d);
        ";
        let code_ok = "
            int n = 2;
            Element d = make_drift(1);
            Line cell = create_line_with_elements(ARG_ELEMENT, d, -1);
            Line ring = create_line_with_elements(ARG_LINE, cell, ARG_LINE, cell, ARG_LINE, cell, ARG_ELEMENT, reverse_element(d), ARG_ELEMENT, reverse_element(d), ARG_LINE, reverse_line(cell), -1);
        ";
    }

    fn test_line_of_expressions() {
        let program = "
            let d: Drift = Drift(L = 1);
            let q: Quad = Quad(L = 1);
            Line(d + q, 2 * (d + q));
            Line();
        ";
        let code_ok = "
            Element d = make_drift(1);
            Element q = make_quad(1, 0.0);
            create_line_with_elements(ARG_LINE, concatenate(d, q), ARG_LINE, concatenate(d, q), ARG_LINE, concatenate(d, q), -1);
            create_line_with_elements(-1);
        ";
    }

    fn test_constructor_defaults() {
        let program = "
            let c: Cavity = Cavity(L = 0.1, Voltage = 1e6, Phi = 0.5);
            let b: Bend = Bend(1, 0.1);
            let s: Sextupole = Sextupole(K2 = 3, L = 0.2);
            let o: Octupole = Octupole(0.3);
        ";
        let code_ok = "
            Element c = make_cavity(0.1, 1e6, 0.0, 0.5);
            Element b = make_sbend(1, 0.1, 0.0);
            Element s = make_sext(0.2, 3);
            Element o = make_oct(0.3, 0.0);
        ";
    }

    fn test_redeclaration_and_reserved_names() {
        let program = "
            let int: int = 1;
            let x: int = int;
            let x: float = x + 0.5;
            println(x);
        ";
        let code_ok = r#"
            int ll_int = 1;
            int x = ll_int;
            double x__1 = (x + 0.5);
            printf("%f\n", x__1);
        "#;
    }

    fn test_redeclaration_skips_written_names() {
        let program = "
            let x: int = 1;
            let x: int = 2;
            let x__1: int = 3;
            let int: int = 4;
            let ll_int: int = 5;
            println(x, x__1, int, ll_int);
        ";
        let code_ok = r#"
            int x = 1;
            int x__1 = 2;
            int x__1__1 = 3;
            int ll_int = 4;
            int ll_int__1 = 5;
            printf("%d %d %d %d\n", x__1, x__1__1, ll_int, ll_int__1);
        "#;
    }

    fn test_written_name_before_redeclaration() {
        let program = "
            let x__1: int = 1;
            let x: int = 2;
            let x: int = 3;
            println(x__1, x);
        ";
        let code_ok = r#"
            int x__1 = 1;
            int x = 2;
            int x__2 = 3;
            printf("%d %d\n", x__1, x__2);
        "#;
    }

    fn test_double_reversal() {
        let program = "
            let d: Drift = Drift(L = 1);
            let q: Quad = Quad(L = 1);
            let cell: Line = Line(d, q);
            let a: Line = Line(-1 * (-1 * cell));
            let b: Line = (d - cell) - cell;
            let c: Line = (d - q) - q;
            let e: Line = Line(-1 * (d - q));
        ";
        let code_ok = "
            Element d = make_drift(1);
            Element q = make_quad(1, 0.0);
            Line cell = create_line_with_elements(ARG_ELEMENT, d, ARG_ELEMENT, q, -1);
            Line a = create_line_with_elements(ARG_LINE, reverse_line(repeat_line(cell, (-1 * 1))), -1);
            Line b = append_reversed_to_line(append_reversed_to_element(d, cell), cell);
            Line c = append_element(concatenate(d, reverse_element(q)), reverse_element(q));
            Line e = create_line_with_elements(ARG_LINE, reverse_line(concatenate(d, reverse_element(q))), -1);
        ";
    }

    fn test_println() {
        let program = r#"
            println();
            println("a\b");
        "#;
        let code_ok = r#"
            printf("\n");
            printf("%s\n", "a\\b");
        "#;
    }

    fn test_error_unprintable() {
        let program = "let d: Drift = Drift(L = 1);\nprintln(1, d);";
        let expected_errors = &["40..41: don't know how to print a value of type Element"];
    }

    fn test_error_invalid_line_argument() {
        let program = "Line(1);";
        let expected_errors = &["5..6: Line arguments must be Element or Line, but got Int"];
    }

    fn test_error_non_constant_count() {
        let program = "let n: int;\nlet d: Drift = Drift(L = 1);\nLine(n * d);";
        let expected_errors = &["46..47: repetition count is not a compile-time integer constant"];
    }

    fn test_error_division_by_zero_in_count() {
        let program = "let d: Drift = Drift(L = 1);\nLine(d * (2 / 0));";
        let expected_errors = &["38..45: division by zero in constant expression"];
    }

    fn test_error_missing_required_parameter() {
        let program = "Drift();";
        let expected_errors = &["0..7: missing required parameter `L` of Drift"];
    }

    fn test_error_too_many_repetitions() {
        let program = "let d: Drift = Drift(L = 1);\nLine(1025 * d);";
        let expected_errors = &["34..38: repetition count 1025 exceeds the limit of 1024"];
    }

    fn test_error_too_many_reversed_repetitions() {
        let program = "let d: Drift = Drift(L = 1);\nLine(d * -2000);";
        let expected_errors = &["38..43: repetition count -2000 exceeds the limit of 1024"];
    }

    fn test_error_count_out_of_int_range() {
        let program = "let d: Drift = Drift(L = 1);\nLine(1000000000000 * d);";
        let expected_errors = &["34..47: integer overflow in constant expression"];
    }

    fn test_error_missing_required_named_parameter() {
        let program = "let m: Marker = Marker(); Quad(K1 = 1);";
        let expected_errors = &["26..38: missing required parameter `L` of Quad"];
    }
);
