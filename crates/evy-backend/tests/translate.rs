//! End-to-end translation tests: parse, check, translate, compare.

use evy_backend::{translate, Translation};

fn pipeline(src: &str) -> Translation {
    let file = go_model::parse(src).expect("parse failed");
    let info = go_model::check(&file).expect("check failed");
    translate(&file, &info)
}

fn evy(src: &str) -> String {
    let translation = pipeline(src);
    assert!(
        !translation.has_errors(),
        "unexpected errors: {:?}",
        translation.diagnostics
    );
    translation.output
}

#[test]
fn counted_loop_golden() {
    let output = evy(
        "package main\n\nfunc main() {\n\tfor i := 0; i < 5; i++ {\n\t\tprint(\"for\", i)\n\t}\n}\n",
    );
    assert_eq!(
        output,
        "func main\n    for 0 5 1\n        print \"for\" i\n    end\nend\n\nmain\n"
    );
}

#[test]
fn condition_only_loop_renders_as_while() {
    let output = evy(
        "package main\n\nfunc main() {\n\tx := 0\n\tfor x < 3 {\n\t\tx++\n\t}\n\tprint(x)\n}\n",
    );
    assert_eq!(
        output,
        "func main\n    x := 0\n    while x < 3\n        x = x + 1\n    end\n    print x\nend\n\nmain\n"
    );
}

#[test]
fn generic_loop_fallback_hoists_init_and_appends_post() {
    let output = evy(
        "package main\n\nfunc main() {\n\tfor i := 10; i > 0; i-- {\n\t\tprint(i)\n\t}\n}\n",
    );
    assert_eq!(
        output,
        "func main\n    i := 10\n    while i > 0\n        print i\n        i = i - 1\n    end\nend\n\nmain\n"
    );
}

#[test]
fn else_if_chain_emits_one_terminator() {
    let output = evy(
        "package main\n\nfunc main() {\n\tx := 5\n\tif x < 3 {\n\t\tprint(\"small\")\n\t} else if x < 10 {\n\t\tprint(\"medium\")\n\t} else {\n\t\tprint(\"big\")\n\t}\n}\n",
    );
    assert!(output.contains("else if x < 10\n"));
    // One `end` for the whole chain, one for the function.
    assert_eq!(output.matches("end").count(), 2);
}

#[test]
fn composite_literals_dispatch_on_resolved_type() {
    let output = evy(
        "package main\n\nfunc main() {\n\tnums := []int{1, 2, 3}\n\tages := map[string]int{\"bob\": 39, \"ann\": 42}\n\tprint(nums, ages)\n}\n",
    );
    assert!(output.contains("nums := [1 2 3]\n"));
    assert!(output.contains("ages := {\"bob\": 39 \"ann\": 42}\n"));
    assert!(output.contains("print nums ages\n"));
}

#[test]
fn struct_literal_renders_braced_with_bare_field_names() {
    let output = evy(
        "package main\n\ntype point struct {\n\tx, y int\n}\n\nfunc main() {\n\tp := point{x: 1, y: 2}\n\tprint(p.x)\n}\n",
    );
    // The type declaration is erased; the literal renders structurally.
    assert_eq!(
        output,
        "func main\n    p := {x: 1 y: 2}\n    print p.x\nend\n\nmain\n"
    );
}

#[test]
fn value_switch_folds_into_case_end_structure() {
    let output = evy(
        "package main\n\nfunc main() {\n\tx := 2\n\tswitch x {\n\tcase 1, 2:\n\t\tprint(\"small\")\n\tdefault:\n\t\tprint(\"big\")\n\t}\n}\n",
    );
    assert!(output.contains(
        "switch x\n    case 1, 2\n        print \"small\"\n    default\n        print \"big\"\n    end"
    ));
}

#[test]
fn type_switch_renders_true_discriminant_and_type_labels() {
    let output = evy(
        "package main\n\nfunc main() {\n\tvar v any = 1\n\tswitch v.(type) {\n\tcase int:\n\t\tprint(\"int\")\n\tcase string:\n\t\tprint(\"string\")\n\t}\n}\n",
    );
    assert!(output.contains("switch true\n"));
    assert!(output.contains("case int\n"));
    assert!(output.contains("case string\n"));
}

#[test]
fn inc_dec_and_compound_assign_desugar() {
    let output = evy(
        "package main\n\nfunc main() {\n\tx := 1\n\tx++\n\tx--\n\tx += 2\n}\n",
    );
    assert!(output.contains("x = x + 1\n"));
    assert!(output.contains("x = x - 1\n"));
    assert!(output.contains("x = x + 2\n"));
}

#[test]
fn functions_map_signatures_through_the_type_mapper() {
    let output = evy(
        "package main\n\nfunc add(a int, b int) int {\n\treturn a + b\n}\n\nfunc main() {\n\tprint(add(1, 2))\n}\n",
    );
    assert_eq!(
        output,
        "func add:num a:num b:num\n    return a + b\nend\n\nfunc main\n    print add 1 2\nend\n\nmain\n"
    );
}

#[test]
fn range_loops_keep_the_range_form() {
    let output = evy(
        "package main\n\nfunc main() {\n\txs := []int{1, 2}\n\tfor i, v := range xs {\n\t\tprint(i, v)\n\t}\n\tfor range xs {\n\t\tprint(\"tick\")\n\t}\n}\n",
    );
    assert!(output.contains("for i, v := range xs\n        print i v\n    end"));
    assert!(output.contains("for range xs\n        print \"tick\"\n    end"));
}

#[test]
fn entry_invocation_appears_only_for_main() {
    let output = evy("package main\n\nfunc helper() {\n\tprint(1)\n}\n");
    assert_eq!(output, "func helper\n    print 1\nend\n");
}

#[test]
fn unknown_operator_degrades_with_a_warning() {
    let translation = pipeline(
        "package main\n\nfunc main() {\n\tx := 1 << 2\n\tprint(x)\n}\n",
    );
    assert!(!translation.has_errors());
    assert_eq!(translation.warnings().count(), 1);
    assert!(translation.output.contains("x := 1 ILLEGAL 2"));
}

#[test]
fn goroutines_are_an_error_diagnostic_with_partial_output() {
    let translation = pipeline(
        "package main\n\nfunc f() {\n\tprint(1)\n}\n\nfunc main() {\n\tgo f()\n}\n",
    );
    assert!(translation.has_errors());
    assert!(translation.output.contains("/* unsupported statement: go statement */"));
}

#[test]
fn nested_operands_are_parenthesized() {
    let output = evy(
        "package main\n\nfunc main() {\n\tx := (1 + 2) * 3\n\ty := 1 + 2*3\n\tprint(x, y)\n}\n",
    );
    assert!(output.contains("x := (1 + 2) * 3\n"));
    assert!(output.contains("y := 1 + (2 * 3)\n"));
}

#[test]
fn translation_is_deterministic() {
    let src =
        "package main\n\nfunc main() {\n\tm := map[string]int{\"a\": 1}\n\tfor k, v := range m {\n\t\tprint(k, v)\n\t}\n}\n";
    assert_eq!(evy(src), evy(src));
}

#[test]
fn whole_program_snapshot() {
    let output = evy(
        r#"package main

import "fmt"

var greeting = "hello"

func scale(a int, factor int) int {
	return a*factor + 1
}

func main() {
	nums := []int{1, 2, 3}
	total := 0
	for i := 0; i < 3; i++ {
		total += scale(nums[i], 2)
	}
	if total > 10 {
		fmt.Println(greeting, total)
	} else {
		fmt.Println("small", total)
	}
}
"#,
    );
    insta::assert_snapshot!(output.trim_end(), @r###"
greeting := "hello"

func scale:num a:num factor:num
    return (a * factor) + 1
end

func main
    nums := [1 2 3]
    total := 0
    for 0 3 1
        total = total + scale nums[i] 2
    end
    if total > 10
        fmt.print greeting total
    else
        fmt.print "small" total
    end
end

main"###);
}
