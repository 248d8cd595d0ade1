//! End-to-end tests over the Go fixtures in the workspace `tests/go`
//! directory.

use gofold_config::GofoldConfig;
use gofold_consteval::{ConstType, ConstValue, UntypedKind};
use gofold_driver::Driver;
use gofold_hir::BasicType;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/go")
        .join(name)
}

fn driver_with(toml: &str) -> Driver {
    Driver::with_config(GofoldConfig::from_toml(toml).unwrap())
}

#[test]
fn test_const_declarations_table() {
    let driver = Driver::new();
    let evaluation = driver
        .evaluate_files(&[fixture("const_declarations.go")])
        .unwrap();
    assert!(!evaluation.has_errors());

    let text = driver.render(&evaluation).unwrap();
    let row = |name: &str| -> Vec<String> {
        text.lines()
            .map(|l| l.split_whitespace().map(String::from).collect::<Vec<_>>())
            .filter(|cols| cols.get(1).map(String::as_str) == Some(name))
            .last()
            .unwrap()
    };

    assert_eq!(row("added"), ["15", "added", "float64", "1027.14159265358979323846"]);
    assert_eq!(row("eof"), ["8", "eof", "untyped", "int", "-1"]);
    assert_eq!(row("c"), ["10", "c", "untyped", "string", "\"foo\""]);
    assert_eq!(row("v"), ["11", "v", "float64", "3.0"]);
    assert_eq!(row("zero"), ["12", "zero", "untyped", "int", "0"]);
}

#[test]
fn test_const_declarations_json() {
    let driver = driver_with("[output]\nformat = \"json\"\n");
    let evaluation = driver
        .evaluate_files(&[fixture("const_declarations.go")])
        .unwrap();
    let json = driver.render(&evaluation).unwrap();
    assert!(json.contains("\"name\": \"added\""));
    assert!(json.contains("\"value\": \"1027.14159265358979323846\""));
}

#[test]
fn test_const_declarations_strict() {
    let driver = driver_with("[evaluator]\nmode = \"go\"\n");
    let evaluation = driver
        .evaluate_files(&[fixture("const_declarations.go")])
        .unwrap();
    let errors: Vec<_> = evaluation.errors().map(|d| d.message.clone()).collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[1].contains("mismatched types float64 and int"));

    let rendered = format!("{:?}", driver.report(evaluation.errors().nth(1).unwrap()));
    assert!(rendered.contains("Pi + size"));

    let text = driver.render(&evaluation).unwrap();
    assert!(text.contains("3.141592653589793"));
    assert!(!text.contains("3.14159265358979323846"));
}

#[test]
fn test_iota_fixture() {
    let driver = Driver::new();
    let evaluation = driver.evaluate_files(&[fixture("iota.go")]).unwrap();
    assert!(evaluation.diagnostics.is_empty(), "{:?}", evaluation.diagnostics);

    let table = &evaluation.table;
    let gb = table.value_of("GB").unwrap();
    assert_eq!(gb.ty, ConstType::Typed(BasicType::Float64));
    assert_eq!(gb.value.to_integer(), Some((1i64 << 30).into()));
    assert_eq!(table.value_of("Tuesday").unwrap().value, ConstValue::Int(2.into()));
    assert_eq!(table.value_of("mask").unwrap().value, ConstValue::Int(255.into()));
    assert_eq!(table.value_of("flags").unwrap().value, ConstValue::Int(240.into()));
    assert_eq!(
        table.value_of("half").unwrap().ty,
        ConstType::Untyped(UntypedKind::Float)
    );
    assert_eq!(table.value_of("greetingLen").unwrap().value, ConstValue::Int(12.into()));
    assert!(table.get("MB").unwrap().implicit);
}

#[test]
fn test_errors_fixture() {
    let driver = Driver::new();
    let evaluation = driver.evaluate_files(&[fixture("errors.go")]).unwrap();
    let errors: Vec<_> = evaluation.errors().map(|d| d.message.as_str()).collect();
    assert_eq!(
        errors,
        [
            "constant 200 overflows int8",
            "cannot use 7.5 (untyped float) as int value (truncated)",
            "initialization cycle: loopA refers to itself",
            "undefined: notDeclared",
            "invalid operation: division by zero",
        ]
    );
    assert!(evaluation.table.iter().all(|e| e.constant.is_none()));
}

#[test]
fn test_files_share_package_scope() {
    let driver = Driver::new();
    let evaluation = driver
        .evaluate_files(&[fixture("split_a.go"), fixture("split_b.go")])
        .unwrap();
    assert!(evaluation.diagnostics.is_empty());
    assert_eq!(
        evaluation.table.value_of("Total").unwrap().value,
        ConstValue::Int(36.into())
    );
}

#[test]
fn test_check_uses_package_scope() {
    let driver = Driver::new();
    let alone = driver.check_files(&[fixture("split_a.go")]);
    assert_eq!(alone.failed(), 1);

    let driver = Driver::new();
    let paths = [
        fixture("split_a.go"),
        fixture("split_b.go"),
        fixture("errors.go"),
        fixture("missing.go"),
    ];
    let report = driver.check_files(&paths);
    let ok: Vec<bool> = report.files.iter().map(|f| f.ok).collect();
    assert_eq!(ok, [true, true, false, false]);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.evaluation.table.value_of("Total").unwrap().value,
        ConstValue::Int(36.into())
    );
}

#[test]
fn test_tac_listings() {
    let driver = Driver::new();
    let tac = driver.tac(fixture("const_declarations.go")).unwrap();
    let text = tac.to_string();
    assert!(text.contains("t4 = Pi + size\nadded = t4\n"));

    let (folded, _) = driver.tac_folded(fixture("const_declarations.go")).unwrap();
    assert!(folded
        .to_string()
        .ends_with("added = 1027.14159265358979323846\n"));
}
