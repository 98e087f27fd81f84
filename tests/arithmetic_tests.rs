use csubset::{run_captured, ErrorKind};

fn output_of(source: &str) -> String {
    run_captured(source, "").expect("Execution failed")
}

#[test]
fn test_integer_division_truncates() {
    let source = r#"
        void main() {
            print(7 / 2);
            print(-7 / 2);
            print(-7 % 3);
            print(7 % -3);
        }
    "#;

    assert_eq!(output_of(source), "3\n-3\n-1\n1\n");
}

#[test]
fn test_mixed_arithmetic_promotes_to_float() {
    let source = r#"
        void main() {
            print(7.0 / 2);
            print(1 + 0.5);
            print(2 * 1.5);
            print(3 > 2.5);
            print(2 == 2.0);
        }
    "#;

    assert_eq!(output_of(source), "3.5\n1.5\n3.0\n1\n1\n");
}

#[test]
fn test_assignment_coercion() {
    let source = r#"
        float half(int n) {
            return n / 2;
        }

        int truncate(float x) {
            return x;
        }

        void main() {
            int x = 3.9;
            float y = 2;
            print(x);
            print(y);
            print(half(5));
            print(truncate(-2.7));
            x = y * 2.6;
            print(x);
        }
    "#;

    assert_eq!(output_of(source), "3\n2.0\n2.0\n-2\n5\n");
}

#[test]
fn test_float_division_by_zero_is_ieee() {
    let source = r#"
        void main() {
            float zero = 0.0;
            print(1.0 / zero > 1000000.0);
            print(-1.0 / zero < 0);
        }
    "#;

    assert_eq!(output_of(source), "1\n1\n");
}

#[test]
fn test_integer_division_by_zero() {
    let err = run_captured("void main() { int z = 0; print(5 / z); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DivisionByZero);

    let err = run_captured("void main() { int z = 0; print(5 % z); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DivisionByZero);
}

#[test]
fn test_integer_overflow_is_detected() {
    let err = run_captured("void main() { int x = 2147483647; print(x + 1); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IntegerOverflow);

    let err = run_captured("void main() { int x = 65536; print(x * x); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IntegerOverflow);

    let err = run_captured("void main() { int x = 10000000000.0; }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IntegerOverflow);
}

#[test]
fn test_int_min_literal() {
    let source = r#"
        void main() {
            int x = -2147483648;
            print(x);
            print(x + 1);
            switch (x) {
                case -2147483648:
                    puts("min");
            }
        }
    "#;
    assert_eq!(output_of(source), "-2147483648\n-2147483647\nmin\n");

    let err = run_captured("void main() { int x = -2147483648; print(x - 1); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IntegerOverflow);

    let err = run_captured("void main() { int x = 2147483648; }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SyntaxError);

    let err = run_captured("void main() { int x = -2147483649; }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LexicalError);
}

#[test]
fn test_float_modulo_is_type_error() {
    let err = run_captured("void main() { print(5.5 % 2); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn test_string_arithmetic_is_type_error() {
    let err = run_captured("void main() { print(\"a\" - \"b\"); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);

    let err = run_captured("void main() { print(\"a\" + 1); }", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn test_float_printing() {
    let source = r#"
        void main() {
            print(13.0);
            print(3.14159);
            print(0.1 + 0.2 > 0.3);
            printf("%f %.3f %.0f\n", 2.5, 3.14159, 7.6);
        }
    "#;

    assert_eq!(output_of(source), "13.0\n3.14159\n1\n2.500000 3.142 8\n");
}
