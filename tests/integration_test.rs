// Integration tests for the CSubset interpreter

use csubset::interpreter::engine::{Interpreter, InterpreterConfig};
use csubset::parser::lexer::tokenize;
use csubset::parser::parse::Parser;
use csubset::{Error, ErrorKind, Terminal, Value};
use std::io::Cursor;

fn run_with(
    source: &str,
    input: &str,
    config: InterpreterConfig,
) -> Result<(Value, String), Error> {
    let tokens = tokenize(source)?;
    let program = Parser::new(tokens).parse_program()?;

    let terminal = Terminal::captured(Cursor::new(input.to_string()));
    let mut interpreter = Interpreter::new(program, config, terminal);
    let result = interpreter.run()?;

    let output = interpreter
        .terminal()
        .captured_output()
        .unwrap_or_default()
        .to_string();
    Ok((result, output))
}

fn output_of(source: &str) -> String {
    run_with(source, "", InterpreterConfig::default())
        .expect("Execution failed")
        .1
}

fn output_with_input(source: &str, input: &str) -> String {
    run_with(source, input, InterpreterConfig::default())
        .expect("Execution failed")
        .1
}

fn error_of(source: &str) -> Error {
    match run_with(source, "", InterpreterConfig::default()) {
        Ok((_, output)) => panic!("Expected an error, program printed:\n{}", output),
        Err(err) => err,
    }
}

#[test]
fn test_simple_arithmetic() {
    let source = r#"
        int main() {
            int x = 5;
            int y = 10;
            int z = x + y;
            return z;
        }
    "#;

    let (result, _) = run_with(source, "", InterpreterConfig::default()).expect("Execution failed");
    assert_eq!(result, Value::Int(15));
}

#[test]
fn test_void_main_returns_void() {
    let (result, output) =
        run_with("void main() { puts(\"hi\"); }", "", InterpreterConfig::default())
            .expect("Execution failed");
    assert_eq!(result, Value::Void);
    assert_eq!(output, "hi\n");
}

#[test]
fn test_function_call() {
    let source = r#"
        int add(int a, int b) {
            return a + b;
        }

        void main() {
            print(add(3, 4));
        }
    "#;

    assert_eq!(output_of(source), "7\n");
}

#[test]
fn test_recursion() {
    let source = r#"
        int fib(int n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }

        void main() {
            for (int i = 0; i < 8; i = i + 1) {
                printf("%d ", fib(i));
            }
            puts("");
        }
    "#;

    assert_eq!(output_of(source), "0 1 1 2 3 5 8 13 \n");
}

#[test]
fn test_precedence() {
    let source = r#"
        void main() {
            print(2 + 3 * 4);
            print((2 + 3) * 4);
            print(10 - 4 - 3);
            print(20 / 2 / 5);
            print(-2 * 3 + 10 % 4);
            print(1 + 2 == 3 && 4 > 3);
            print(!0 + !5);
        }
    "#;

    assert_eq!(output_of(source), "14\n20\n3\n2\n-4\n1\n1\n");
}

#[test]
fn test_short_circuit_skips_erroring_operand() {
    let source = r#"
        void main() {
            int t = 1;
            int f = 0;
            print(t || f && f);
            print(t || 1 / f);
            print(f && 1 / f);
            print(f || t);
        }
    "#;

    assert_eq!(output_of(source), "1\n1\n0\n1\n");
}

#[test]
fn test_if_else_chain() {
    let source = r#"
        void classify(int n) {
            if (n < 0) {
                puts("negative");
            } else if (n == 0) {
                puts("zero");
            } else {
                puts("positive");
            }
        }

        void main() {
            classify(-3);
            classify(0);
            classify(8);
        }
    "#;

    assert_eq!(output_of(source), "negative\nzero\npositive\n");
}

#[test]
fn test_loops_and_break() {
    let source = r#"
        void main() {
            int i = 0;
            while (1) {
                if (i == 3) break;
                i = i + 1;
            }
            print(i);

            int n = 10;
            do {
                n = n + 1;
            } while (n < 5);
            print(n);

            int total = 0;
            for (int k = 1; k <= 100; k = k + 1) {
                if (k > 4) {
                    break;
                }
                total = total + k;
            }
            print(total);
        }
    "#;

    assert_eq!(output_of(source), "3\n11\n10\n");
}

#[test]
fn test_return_from_inside_loop() {
    let source = r#"
        int find(int target) {
            int arr[5] = {4, 8, 15, 16, 23};
            for (int i = 0; i < 5; i = i + 1) {
                while (1) {
                    if (arr[i] == target) return i;
                    break;
                }
            }
            return -1;
        }

        void main() {
            print(find(15));
            print(find(42));
        }
    "#;

    assert_eq!(output_of(source), "2\n-1\n");
}

#[test]
fn test_switch_fallthrough() {
    let source = r#"
        void describe(int x) {
            switch (x) {
                case 1:
                    puts("one");
                case 2:
                    puts("two");
                    break;
                case 3:
                    puts("three");
            }
        }

        void main() {
            describe(1);
            puts("--");
            describe(2);
            puts("--");
            describe(3);
            puts("--");
            describe(4);
        }
    "#;

    assert_eq!(output_of(source), "one\ntwo\n--\ntwo\n--\nthree\n--\n");
}

#[test]
fn test_switch_default_position_and_fallthrough() {
    let source = r#"
        #define TWO 2

        void pick(int x) {
            switch (x) {
                case 1:
                    puts("one");
                    break;
                default:
                    puts("default");
                case TWO:
                    puts("two");
                    break;
                case -1:
                    puts("minus one");
            }
        }

        void main() {
            pick(7);
            pick(2);
            pick(-1);
        }
    "#;

    assert_eq!(output_of(source), "default\ntwo\ntwo\nminus one\n");
}

#[test]
fn test_switch_inside_loop_break_only_leaves_switch() {
    let source = r#"
        void main() {
            for (int i = 0; i < 3; i = i + 1) {
                switch (i) {
                    case 1:
                        break;
                    default:
                        print(i);
                }
            }
        }
    "#;

    assert_eq!(output_of(source), "0\n2\n");
}

#[test]
fn test_string_switch() {
    let source = r#"
        void main() {
            string cmd = "stop";
            switch (cmd) {
                case "go":
                    puts("going");
                    break;
                case "stop":
                    puts("stopping");
                    break;
            }
        }
    "#;

    assert_eq!(output_of(source), "stopping\n");
}

#[test]
fn test_block_scopes_and_shadowing() {
    let source = r#"
        void main() {
            int x = 1;
            {
                int x = 2;
                print(x);
            }
            print(x);

            for (int k = 0; k < 1; k = k + 1) {}
            int k = 5;
            print(k);
        }
    "#;

    assert_eq!(output_of(source), "2\n1\n5\n");
}

#[test]
fn test_redeclaration_in_same_scope() {
    let err = error_of(
        r#"
        void main() {
            int x = 1;
            int x = 2;
        }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::Redeclaration);
    assert_eq!(err.line(), Some(4));
}

#[test]
fn test_globals() {
    let source = r#"
        int counter = 0;
        string label = "count";

        void bump() {
            counter = counter + 1;
        }

        void main() {
            bump();
            bump();
            printf("%s=%d\n", label, counter);
        }
    "#;

    assert_eq!(output_of(source), "count=2\n");
}

#[test]
fn test_callee_cannot_see_caller_locals() {
    let err = error_of(
        r#"
        void peek() {
            print(secret);
        }

        void main() {
            int secret = 42;
            peek();
        }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::UndefinedReferenceError);
}

#[test]
fn test_array_initialization_and_zero_fill() {
    let source = r#"
        void main() {
            int arr[5] = {1, 2};
            float weights[2];
            string names[2] = {"a"};
            print(arr);
            print(weights);
            print(names[1] == "");
        }
    "#;

    assert_eq!(output_of(source), "[1, 2, 0, 0, 0]\n[0.0, 0.0]\n1\n");
}

#[test]
fn test_array_index_out_of_bounds() {
    let source = "void main() {\n  int arr[3] = {1, 2, 3};\n  print(arr[3]);\n}\n";
    let err = error_of(source);
    assert_eq!(err.kind(), ErrorKind::IndexOutOfBoundsError);
    assert_eq!(err.line(), Some(3));

    let err = error_of("void main() { int arr[3]; arr[-1] = 4; }");
    assert_eq!(err.kind(), ErrorKind::IndexOutOfBoundsError);
}

#[test]
fn test_multidimensional_arrays() {
    let source = r#"
        void main() {
            int m[2][3] = {{1, 2, 3}, {4, 5, 6}};
            print(m[1][2]);
            m[0][1] = 9;
            print(m[0]);

            int sum = 0;
            for (int r = 0; r < 2; r = r + 1) {
                for (int c = 0; c < 3; c = c + 1) {
                    sum = sum + m[r][c];
                }
            }
            print(sum);
        }
    "#;

    assert_eq!(output_of(source), "6\n[1, 9, 3]\n28\n");
}

#[test]
fn test_structs() {
    let source = r#"
        struct Point {
            int x;
            int y;
        };

        struct Line {
            struct Point from;
            struct Point to;
            string label;
        };

        struct Point make_point(int x, int y) {
            struct Point p;
            p.x = x;
            p.y = y;
            return p;
        }

        void main() {
            struct Line l;
            l.from = make_point(1, 2);
            l.to.x = 10;
            l.label = "diag";
            printf("%s: (%d,%d) -> (%d,%d)\n", l.label, l.from.x, l.from.y, l.to.x, l.to.y);
            print(make_point(3, 4).y);
            print(l.from);
        }
    "#;

    assert_eq!(
        output_of(source),
        "diag: (1,2) -> (10,0)\n4\nPoint { x: 1, y: 2 }\n"
    );
}

#[test]
fn test_struct_copy_semantics() {
    let source = r#"
        struct Point {
            int x;
            int y;
        };

        void move_right(struct Point p) {
            p.x = p.x + 100;
        }

        void main() {
            struct Point a;
            a.x = 1;
            struct Point b = a;
            b.x = 2;
            move_right(a);
            print(a.x);
            print(b.x);
        }
    "#;

    assert_eq!(output_of(source), "1\n2\n");
}

#[test]
fn test_arrays_of_structs() {
    let source = r#"
        struct Item {
            string name;
            int qty;
        };

        void main() {
            struct Item items[2];
            items[0].name = "apple";
            items[0].qty = 3;
            items[1].name = "pear";
            int total = 0;
            for (int i = 0; i < 2; i = i + 1) {
                total = total + items[i].qty;
            }
            printf("%s %s %d\n", items[0].name, items[1].name, total);
        }
    "#;

    assert_eq!(output_of(source), "apple pear 3\n");
}

#[test]
fn test_unions_track_active_field() {
    let source = r#"
        union Data {
            int i;
            float f;
        };

        void main() {
            union Data d;
            d.i = 42;
            print(d.i);
            d.f = 3.75;
            print(d.f);
            print(d.i);
            print(d);
        }
    "#;

    assert_eq!(output_of(source), "42\n3.75\n3\nData { f: 3.75 }\n");
}

#[test]
fn test_unknown_field_is_undefined_reference() {
    let err = error_of(
        r#"
        struct Point { int x; int y; };
        void main() {
            struct Point p;
            p.z = 1;
        }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::UndefinedReferenceError);
}

#[test]
fn test_strings() {
    let source = r#"
        void main() {
            string a = "foo";
            string b = a + "bar";
            puts(b);
            print(a < b);
            print(a == "foo");
            print(b != "foobar");
        }
    "#;

    assert_eq!(output_of(source), "foobar\n1\n1\n0\n");
}

#[test]
fn test_argument_type_and_arity_errors() {
    let err = error_of(
        r#"
        void greet(string name) { puts(name); }
        void main() { greet(123); }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::TypeError);

    let err = error_of(
        r#"
        int add(int a, int b) { return a + b; }
        void main() { add(1); }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::ArityError);

    let err = error_of("void main() { print(1, 2); }");
    assert_eq!(err.kind(), ErrorKind::ArityError);
}

#[test]
fn test_arity_checked_before_arguments_run() {
    let err = error_of(
        r#"
        int one(int a) { return a; }
        void main() { one(1, 1 / 0); }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::ArityError);
}

#[test]
fn test_return_type_checks() {
    let err = error_of(
        r#"
        void f() { return 1; }
        void main() { f(); }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::TypeError);

    let err = error_of(
        r#"
        string f() { return 1; }
        void main() { f(); }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::TypeError);

    let err = error_of(
        r#"
        int f(int n) {
            if (n > 0) return 1;
        }
        void main() { f(0); }
    "#,
    );
    assert_eq!(err.kind(), ErrorKind::MissingReturn);
}

#[test]
fn test_puts_requires_string() {
    let err = error_of("void main() { puts(5); }");
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn test_undefined_references() {
    assert_eq!(
        error_of("void main() { print(y); }").kind(),
        ErrorKind::UndefinedReferenceError
    );
    assert_eq!(
        error_of("void main() { missing(); }").kind(),
        ErrorKind::UndefinedReferenceError
    );
}

#[test]
fn test_stack_overflow_is_reported() {
    let source = r#"
        int down(int n) {
            return down(n + 1);
        }

        void main() {
            down(0);
        }
    "#;

    let config = InterpreterConfig {
        max_call_depth: 32,
        ..InterpreterConfig::default()
    };
    let err = run_with(source, "", config).expect_err("Expected stack overflow");
    assert_eq!(err.kind(), ErrorKind::StackOverflow);
}

#[test]
fn test_deep_recursion_within_limit() {
    let source = r#"
        int depth(int n) {
            if (n == 0) return 0;
            return 1 + depth(n - 1);
        }

        void main() {
            print(depth(25));
        }
    "#;

    let config = InterpreterConfig {
        max_call_depth: 32,
        ..InterpreterConfig::default()
    };
    let (_, output) = run_with(source, "", config).expect("Execution failed");
    assert_eq!(output, "25\n");
}

#[test]
fn test_factorial_base_cases() {
    let source = r#"
        int factorial(int n) {
            if (n <= 1) return 1;
            return n * factorial(n - 1);
        }

        void main() {
            print(factorial(0));
            print(factorial(1));
            print(factorial(5));
        }
    "#;

    assert_eq!(output_of(source), "1\n1\n120\n");
}

#[test]
fn test_default_limit_allows_depth_250() {
    let source = r#"
        int depth(int n) {
            if (n <= 0) return 0;
            return 1 + depth(n - 1);
        }

        void main() {
            print(depth(250));
        }
    "#;

    assert_eq!(output_of(source), "250\n");
}

#[test]
fn test_default_limit_reports_unbounded_recursion() {
    let err = error_of("int d(int n) { return 1 + d(n - 1); } void main() { print(d(0)); }");
    assert_eq!(err.kind(), ErrorKind::StackOverflow);
}

#[test]
fn test_default_limit_on_worker_thread() {
    let handle = std::thread::Builder::new()
        .stack_size(512 * 1024)
        .spawn(|| {
            csubset::run_captured("int d(int n) { return d(n + 1); } void main() { d(0); }", "")
                .map_err(|err| err.kind())
        })
        .expect("spawn failed");

    assert_eq!(handle.join().unwrap(), Err(ErrorKind::StackOverflow));
}

#[test]
fn test_conversions() {
    let source = r#"
        void main() {
            printf("%d\n", stoi("123") + 1);
            print(stof("12.5") + 0.5);
            print(stoi("  -7 apples"));
        }
    "#;
    assert_eq!(output_of(source), "124\n13.0\n-7\n");

    let err = error_of("void main() { stoi(\"abc\"); }");
    assert_eq!(err.kind(), ErrorKind::ConversionError);

    let err = error_of("void main() { stof(\"\"); }");
    assert_eq!(err.kind(), ErrorKind::ConversionError);
}

#[test]
fn test_printf_returns_characters_written() {
    let source = r#"
        void main() {
            int n = printf("abc\n");
            print(n);
            printf("%.1f%% of %s\t|\n", 99.5, "runs");
        }
    "#;

    assert_eq!(output_of(source), "abc\n4\n99.5% of runs\t|\n");
}

#[test]
fn test_printf_format_errors() {
    assert_eq!(
        error_of("void main() { printf(\"%d\\n\", 2.5); }").kind(),
        ErrorKind::FormatError
    );
    assert_eq!(
        error_of("void main() { printf(\"%d %d\", 1); }").kind(),
        ErrorKind::FormatError
    );
    assert_eq!(
        error_of("void main() { printf(\"%s\", \"a\", \"b\"); }").kind(),
        ErrorKind::FormatError
    );
}

#[test]
fn test_scanf_reads_typed_tokens() {
    let source = r#"
        void main() {
            int a;
            float b;
            string c;
            int n = scanf("%d %f %s", a, b, c);
            print(n);
            print(a);
            print(b);
            puts(c);
        }
    "#;

    assert_eq!(
        output_with_input(source, "42 3.5\nhello\n"),
        "3\n42\n3.5\nhello\n"
    );
}

#[test]
fn test_scanf_into_elements_and_fields() {
    let source = r#"
        struct Pair { int left; int right; };

        void main() {
            int arr[3];
            struct Pair p;
            scanf("%d %d", arr[1], p.right);
            print(arr);
            print(p.right);
        }
    "#;

    assert_eq!(output_with_input(source, "5 6"), "[0, 5, 0]\n6\n");
}

#[test]
fn test_scanf_end_of_input_and_bad_token() {
    let source = r#"
        void main() {
            int a = 0;
            int b = 0;
            print(scanf("%d %d", a, b));
            print(a);
        }
    "#;

    assert_eq!(output_with_input(source, ""), "-1\n0\n");
    assert_eq!(output_with_input(source, "7 x"), "1\n7\n");
    assert_eq!(output_with_input(source, "8"), "1\n8\n");
}

#[test]
fn test_scanf_leaves_unmatched_token_for_next_read() {
    let source = r#"
        void main() {
            int a = 0;
            string word;
            print(scanf("%d", a));
            print(scanf("%s", word));
            puts(word);
        }
    "#;

    assert_eq!(output_with_input(source, "abc"), "0\n1\nabc\n");
}

#[test]
fn test_scanf_loop_until_end_of_input() {
    let source = r#"
        void main() {
            int x;
            int total = 0;
            while (scanf("%d", x) == 1) {
                total = total + x;
            }
            print(total);
        }
    "#;

    assert_eq!(output_with_input(source, "1 2 3\n4\n"), "10\n");
}

#[test]
fn test_scanf_target_type_mismatch() {
    let err = error_of("void main() { float x; scanf(\"%d\", x); }");
    assert_eq!(err.kind(), ErrorKind::FormatError);

    let err = error_of("void main() { int x; scanf(\"%d %d\", x); }");
    assert_eq!(err.kind(), ErrorKind::FormatError);
}

#[test]
fn test_builtins_cannot_be_shadowed() {
    let err = error_of("void print(int x) { } void main() { }");
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
}

#[test]
fn test_lexical_and_syntax_errors_carry_lines() {
    let err = error_of("void main() {\n  int x = 5 @ 3;\n}");
    assert_eq!(err.kind(), ErrorKind::LexicalError);
    assert_eq!(err.line(), Some(2));

    let err = error_of("void main() {\n  int x = 5\n  print(x);\n}");
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
    assert_eq!(err.line(), Some(3));
    assert!(err.to_string().contains("Expected ';'"));
}

#[test]
fn test_missing_entry_point() {
    let err = error_of("int helper() { return 1; }");
    assert_eq!(err.kind(), ErrorKind::NoEntryPoint);
    assert_eq!(err.line(), None);
}

#[test]
fn test_custom_entry_point() {
    let config = InterpreterConfig {
        entry_point: "start".to_string(),
        ..InterpreterConfig::default()
    };
    let (result, output) = run_with(
        "int start() { puts(\"started\"); return 3; }",
        "",
        config,
    )
    .expect("Execution failed");
    assert_eq!(result, Value::Int(3));
    assert_eq!(output, "started\n");
}

#[test]
fn test_runs_are_deterministic() {
    let source = r#"
        int counter = 0;

        void main() {
            counter = counter + 1;
            printf("run %d\n", counter);
        }
    "#;

    let tokens = tokenize(source).expect("Lexing failed");
    let program = Parser::new(tokens).parse_program().expect("Parsing failed");
    let terminal = Terminal::captured(Cursor::new(String::new()));
    let mut interpreter = Interpreter::new(program, InterpreterConfig::default(), terminal);

    interpreter.run().expect("First run failed");
    interpreter.run().expect("Second run failed");

    assert_eq!(
        interpreter.terminal().captured_output(),
        Some("run 1\nrun 1\n")
    );
    assert_eq!(
        csubset::run_captured(source, "").expect("Execution failed"),
        "run 1\n"
    );
}
