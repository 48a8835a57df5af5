use dsir_ast::{parse_document, ModuleDecl};
use dsir_common::{Arithmetic, Interner};
use dsir_elaborate::{elaborate, ElabErrorKind, ElabOptions};
use dsir_ir::{verify_module, ParamExpr};
use serde_json::{json, Value};

fn decl(doc: Value) -> ModuleDecl {
    parse_document(&doc.to_string()).unwrap().into_modules().remove(0)
}

fn wire(name: &str, io: Value, width: Value) -> Value {
    json!({"Wire": {"name": name, "io": io, "width": width, "init": null}})
}

fn range(start: Value, end: Value) -> Value {
    json!({"start": start, "end": end})
}

fn int(v: i64) -> Value {
    json!({"ConstantInt": v})
}

fn ident(n: &str) -> Value {
    json!({"Identifier": n})
}

fn add(l: Value, r: Value) -> Value {
    json!({"BinaryArithmeticOperation": [l, "Add", r]})
}

fn sub(l: Value, r: Value) -> Value {
    json!({"BinaryArithmeticOperation": [l, "Sub", r]})
}

fn for_loop(genvar: &str, init: Value, op: &str, end: Value) -> Value {
    json!({"For": {
        "name": null,
        "genvar": genvar,
        "init": init,
        "cond": {"RelationalOperation": [ident(genvar), op, end]},
        "step": {"target": genvar, "value": add(ident(genvar), int(1))},
        "body": []
    }})
}

fn module(body: Vec<Value>) -> ModuleDecl {
    decl(json!({"name": "m", "params": [{"name": "N", "value": null}], "body": body}))
}

fn options() -> ElabOptions {
    ElabOptions::default()
}

#[test]
fn scalar_input_is_one_bit() {
    let names = Interner::new();
    let m = elaborate(&module(vec![wire("a", json!("Input"), Value::Null)]), &names, &options()).unwrap();
    let a = &m.inputs[&names.get_or_intern("a")];
    assert_eq!(a.rank(), 1);
    assert_eq!(m.exprs.get(a.shape()[0]), &ParamExpr::Constant(1));
}

#[test]
fn ranged_output_keeps_upper_index() {
    let names = Interner::new();
    let body = vec![wire("b", json!("Output"), range(int(7), int(0)))];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    let b = &m.outputs[&names.get_or_intern("b")];
    assert_eq!(m.exprs.get(b.shape()[0]), &ParamExpr::Constant(7));
}

#[test]
fn parametric_width_shares_nodes() {
    let names = Interner::new();
    let w = range(sub(ident("N"), int(1)), int(0));
    let body = vec![
        wire("a", json!("Input"), w.clone()),
        wire("y", json!("Output"), w),
    ];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    let a = m.inputs[&names.get_or_intern("a")].shape()[0];
    let y = m.outputs[&names.get_or_intern("y")].shape()[0];
    assert_eq!(a, y);
    let n = m.params[0].expr;
    let one = m.exprs.lookup(&ParamExpr::Constant(1)).unwrap();
    assert_eq!(m.exprs.get(a), &ParamExpr::Sub(n, one));
}

#[test]
fn invalid_width_rejected() {
    let names = Interner::new();
    let body = vec![wire("b", json!("Output"), range(int(7), int(1)))];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert!(matches!(err.kind, ElabErrorKind::InvalidWidth(_)));
    assert_eq!(err.location.path.to_string(), "body[0].Wire.width.end");
}

#[test]
fn unknown_io_kind_rejected() {
    let names = Interner::new();
    let body = vec![wire("b", json!("Tristate"), Value::Null)];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert_eq!(err.kind, ElabErrorKind::UnknownIoKind("Tristate".into()));
}

#[test]
fn inout_spellings_are_inputs() {
    let names = Interner::new();
    let body = vec![
        wire("p", json!("InOut"), Value::Null),
        wire("q", json!("Inout"), Value::Null),
    ];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    assert_eq!(m.inputs.len(), 2);
    assert!(m.outputs.is_empty());
}

#[test]
fn for_loop_happy_path() {
    let names = Interner::new();
    let body = vec![
        json!({"Genvar": "i"}),
        json!({"Generate": [for_loop("i", int(0), "Lt", ident("N"))]}),
    ];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    assert_eq!(m.loops.len(), 1);
    let lp = m.loops[0];
    assert_eq!(m.exprs.get(lp.start), &ParamExpr::Constant(0));
    assert_eq!(m.exprs.get(lp.end), &ParamExpr::Parameter(names.get_or_intern("N")));
    assert_eq!(m.exprs.get(lp.step), &ParamExpr::Constant(1));
    assert_eq!(m.genvars[&names.get_or_intern("i")], Some(lp.start));
}

#[test]
fn bare_for_in_body_is_a_generate_loop() {
    let names = Interner::new();
    let body = vec![json!({"Genvar": "i"}), for_loop("i", int(2), "Lt", int(8))];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    assert_eq!(m.exprs.constant_value(m.loops[0].start), Some(2));
    assert_eq!(m.exprs.constant_value(m.loops[0].end), Some(8));
}

#[test]
fn le_condition_rejected() {
    let names = Interner::new();
    let body = vec![
        json!({"Genvar": "i"}),
        json!({"Generate": [for_loop("i", int(0), "Le", ident("N"))]}),
    ];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert!(matches!(err.kind, ElabErrorKind::UnsupportedCondition(_)));
    assert_eq!(err.location.path.to_string(), "body[1].Generate[0].For.cond");
}

#[test]
fn genvar_on_right_rejected() {
    let names = Interner::new();
    let mut lp = for_loop("i", int(0), "Lt", ident("N"));
    lp["For"]["cond"] = json!({"RelationalOperation": [ident("N"), "Lt", ident("i")]});
    let body = vec![json!({"Genvar": "i"}), json!({"Generate": [lp]})];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert!(matches!(err.kind, ElabErrorKind::UnsupportedCondition(_)));
}

#[test]
fn duplicate_genvar_rejected() {
    let names = Interner::new();
    let body = vec![json!({"Genvar": "i"}), json!({"Genvar": "i"})];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert_eq!(err.kind, ElabErrorKind::DuplicateGenvar("i".into()));
    assert_eq!(err.location.path.to_string(), "body[1]");
}

#[test]
fn unknown_genvar_rejected() {
    let names = Interner::new();
    let body = vec![json!({"Generate": [for_loop("k", int(0), "Lt", ident("N"))]})];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert_eq!(err.kind, ElabErrorKind::UnknownGenvar("k".into()));
}

#[test]
fn uninitialized_genvar_rejected() {
    let names = Interner::new();
    let body = vec![
        json!({"Genvar": "i"}),
        json!({"Generate": [for_loop("i", Value::Null, "Lt", ident("N"))]}),
    ];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert_eq!(err.kind, ElabErrorKind::UninitializedGenvar("i".into()));
}

#[test]
fn genvar_in_port_width_before_assignment() {
    let names = Interner::new();
    let body = vec![
        json!({"Genvar": "i"}),
        wire("a", json!("Input"), range(ident("i"), int(0))),
    ];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert_eq!(err.kind, ElabErrorKind::UninitializedGenvar("i".into()));
}

#[test]
fn loop_value_not_visible_after_loop() {
    let names = Interner::new();
    let body = vec![
        json!({"Genvar": "i"}),
        json!({"Generate": [for_loop("i", int(0), "Lt", ident("N"))]}),
        wire("x", json!("Input"), range(ident("i"), int(0))),
    ];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert_eq!(err.kind, ElabErrorKind::UninitializedGenvar("i".into()));
    assert_eq!(err.location.path.to_string(), "body[2].Wire.width.start");
}

#[test]
fn followup_loop_without_initializer_reuses_start() {
    let names = Interner::new();
    let body = vec![
        json!({"Genvar": "i"}),
        for_loop("i", int(4), "Lt", ident("N")),
        for_loop("i", Value::Null, "Lt", int(16)),
    ];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    assert_eq!(m.loops.len(), 2);
    assert_eq!(m.loops[1].start, m.loops[0].start);
    assert_eq!(m.exprs.constant_value(m.loops[1].start), Some(4));
}

#[test]
fn instance_in_loop_not_implemented() {
    let names = Interner::new();
    let mut lp = for_loop("i", int(0), "Lt", ident("N"));
    lp["For"]["body"] = json!([{"Instance": {"name": "u", "module": "leaf", "params_set": [], "ports_set": []}}]);
    let body = vec![json!({"Genvar": "i"}), json!({"Generate": [lp]})];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert!(matches!(err.kind, ElabErrorKind::NotImplemented(_)));
}

#[test]
fn non_loop_in_generate_rejected() {
    let names = Interner::new();
    let body = vec![json!({"Generate": [wire("w", Value::Null, Value::Null)]})];
    let err = elaborate(&module(body), &names, &options()).unwrap_err();
    assert_eq!(err.kind, ElabErrorKind::UnsupportedGenerateStatement("Wire"));
}

#[test]
fn module_level_assign_and_instance_skipped() {
    let names = Interner::new();
    let body = vec![
        json!({"Assign": {"lhs": ident("y"), "rhs": {"String": "ignored"}}}),
        json!({"Instance": {"name": "u", "module": "leaf", "params_set": [], "ports_set": []}}),
        wire("y", json!("Output"), Value::Null),
    ];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    assert_eq!(m.outputs.len(), 1);
}

#[test]
fn parameters_and_defaults_recorded() {
    let names = Interner::new();
    let d = decl(json!({
        "name": "m",
        "params": [
            {"name": "W", "value": int(8)},
            {"name": "D", "value": sub(ident("W"), int(1))}
        ],
        "body": []
    }));
    let m = elaborate(&d, &names, &options()).unwrap();
    assert_eq!(m.params.len(), 2);
    let w = m.params[0];
    assert_eq!(m.exprs.get(w.expr), &ParamExpr::Parameter(names.get_or_intern("W")));
    assert_eq!(m.exprs.constant_value(w.default.unwrap()), Some(8));
    let one = m.exprs.lookup(&ParamExpr::Constant(1)).unwrap();
    assert_eq!(
        m.exprs.get(m.params[1].default.unwrap()),
        &ParamExpr::Sub(w.expr, one)
    );
}

#[test]
fn unsupported_default_is_dropped() {
    let names = Interner::new();
    let d = decl(json!({
        "name": "m",
        "params": [
            {"name": "W", "value": int(8)},
            {"name": "H", "value": {"BinaryArithmeticOperation": [ident("W"), "Div", int(2)]}},
            {"name": "S", "value": {"String": "wide"}}
        ],
        "body": [wire("a", json!("Input"), Value::Null)]
    }));
    let m = elaborate(&d, &names, &options()).unwrap();
    assert_eq!(m.params.len(), 3);
    assert_eq!(m.exprs.constant_value(m.params[0].default.unwrap()), Some(8));
    assert_eq!(m.params[1].default, None);
    assert_eq!(m.params[2].default, None);
    assert_eq!(
        m.exprs.get(m.params[1].expr),
        &ParamExpr::Parameter(names.get_or_intern("H"))
    );
    assert_eq!(m.inputs.len(), 1);
}

#[test]
fn checked_overflow_fails_elaboration() {
    let names = Interner::new();
    let body = vec![wire(
        "a",
        json!("Input"),
        range(add(int(i64::MAX), int(1)), int(0)),
    )];
    let opts = ElabOptions {
        arithmetic: Arithmetic::Checked,
        ..ElabOptions::default()
    };
    let err = elaborate(&module(body.clone()), &names, &opts).unwrap_err();
    assert!(matches!(err.kind, ElabErrorKind::ArithmeticOverflow(_)));

    let m = elaborate(&module(body), &names, &options()).unwrap();
    let a = m.inputs[&names.get_or_intern("a")].shape()[0];
    assert_eq!(m.exprs.constant_value(a), Some(i64::MIN));
}

#[test]
fn identical_declarations_elaborate_identically() {
    let names = Interner::new();
    let body = || {
        vec![
            json!({"Genvar": "i"}),
            wire("a", json!("Input"), range(sub(ident("N"), int(1)), int(0))),
            json!({"Generate": [for_loop("i", int(0), "Lt", ident("N"))]}),
        ]
    };
    let a = elaborate(&module(body()), &names, &options()).unwrap();
    let b = elaborate(&module(body()), &names, &options()).unwrap();
    assert_eq!(a.content_hash, b.content_hash);
    let nodes_a: Vec<_> = a.exprs.iter().map(|(id, n)| (id, *n)).collect();
    let nodes_b: Vec<_> = b.exprs.iter().map(|(id, n)| (id, *n)).collect();
    assert_eq!(nodes_a, nodes_b);
    assert_eq!(a.loops, b.loops);
}

#[test]
fn elaborated_modules_verify() {
    let names = Interner::new();
    let body = vec![
        json!({"Genvar": "i"}),
        wire("a", json!("Input"), range(sub(ident("N"), int(1)), int(0))),
        wire("y", json!("Output"), Value::Null),
        json!({"Generate": [for_loop("i", int(0), "Lt", ident("N"))]}),
    ];
    let m = elaborate(&module(body), &names, &options()).unwrap();
    assert_eq!(verify_module(&m), Ok(()));
}
