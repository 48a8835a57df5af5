//! Human-readable and JSON renderings of elaborated modules.

use crate::design::Design;
use crate::expr::ParamExpr;
use crate::ids::ExprId;
use crate::module::{Module, PortDirection};
use crate::store::ExprStore;
use dsir_common::Interner;
use serde::Serialize;
use std::fmt::Write;

/// Renders an expression as infix text, e.g. `(N - 1) * W`.
///
/// Ids missing from `store` render as their raw id.
pub fn render_expr(store: &ExprStore, id: ExprId, names: &Interner) -> String {
    let mut out = String::new();
    write_expr(&mut out, store, id, names, false);
    out
}

fn write_expr(out: &mut String, store: &ExprStore, id: ExprId, names: &Interner, nested: bool) {
    let Some(node) = store.try_get(id) else {
        let _ = write!(out, "{id}");
        return;
    };
    match *node {
        ParamExpr::Constant(v) => {
            let _ = write!(out, "{v}");
        }
        ParamExpr::Parameter(name) => out.push_str(names.resolve(name)),
        ParamExpr::Add(l, r) | ParamExpr::Sub(l, r) | ParamExpr::Mul(l, r) => {
            let op = node.as_binary().map(|(op, _, _)| op.symbol()).unwrap_or("?");
            if nested {
                out.push('(');
            }
            write_expr(out, store, l, names, true);
            let _ = write!(out, " {op} ");
            write_expr(out, store, r, names, true);
            if nested {
                out.push(')');
            }
        }
    }
}

/// Describes one stored node in canonical form, e.g. `Sub(%0, %1)`.
fn describe(node: &ParamExpr, names: &Interner) -> String {
    match *node {
        ParamExpr::Constant(v) => format!("Constant({v})"),
        ParamExpr::Parameter(name) => format!("Parameter({})", names.resolve(name)),
        ParamExpr::Add(l, r) | ParamExpr::Sub(l, r) | ParamExpr::Mul(l, r) => {
            format!("{}({l}, {r})", node.kind())
        }
    }
}

fn render_shape(module: &Module, shape: &[ExprId], names: &Interner) -> String {
    shape
        .iter()
        .map(|d| format!("[{}]", render_expr(&module.exprs, *d, names)))
        .collect()
}

/// Renders a module as text.
///
/// ```text
/// module adder_chain (hash 3f1c..)
///   param N = 4
///   input a [W]
///   output y [1]
///   genvar i = 0
///   loop stage: for i = 0; i < N; i += 1
///   exprs:
///     %0 = Parameter(N)
///     ...
/// ```
pub fn render_module(module: &Module, names: &Interner) -> String {
    let mut out = String::new();
    let store = &module.exprs;
    let _ = writeln!(
        out,
        "module {} (hash {})",
        names.resolve(module.name),
        module.content_hash
    );
    for param in &module.params {
        let _ = write!(out, "  param {}", names.resolve(param.name));
        if let Some(default) = param.default {
            let _ = write!(out, " = {}", render_expr(store, default, names));
        }
        out.push('\n');
    }
    for (name, dir, tensor) in module.ports() {
        let dir = match dir {
            PortDirection::Input => "input",
            PortDirection::Output => "output",
        };
        let _ = writeln!(
            out,
            "  {dir} {} {}",
            names.resolve(name),
            render_shape(module, tensor.shape(), names)
        );
    }
    for (name, value) in &module.genvars {
        match value {
            Some(id) => {
                let _ = writeln!(
                    out,
                    "  genvar {} = {}",
                    names.resolve(*name),
                    render_expr(store, *id, names)
                );
            }
            None => {
                let _ = writeln!(out, "  genvar {}", names.resolve(*name));
            }
        }
    }
    for lp in &module.loops {
        let g = names.resolve(lp.genvar);
        let label = lp.label.map(|l| names.resolve(l)).unwrap_or("<anon>");
        let _ = writeln!(
            out,
            "  loop {label}: for {g} = {}; {g} < {}; {g} += {}",
            render_expr(store, lp.start, names),
            render_expr(store, lp.end, names),
            render_expr(store, lp.step, names)
        );
    }
    if !store.is_empty() {
        out.push_str("  exprs:\n");
        for (id, node) in store.iter() {
            let _ = writeln!(out, "    {id} = {}", describe(node, names));
        }
    }
    out
}

/// A JSON-serializable snapshot of a module with names resolved.
#[derive(Debug, Serialize)]
pub struct ModuleDump {
    /// Module name.
    pub name: String,
    /// Hex content hash of the source AST.
    pub content_hash: String,
    /// Parameters.
    pub params: Vec<ParamDump>,
    /// Input ports.
    pub inputs: Vec<PortDump>,
    /// Output ports.
    pub outputs: Vec<PortDump>,
    /// Genvars and their final value, if resolved.
    pub genvars: Vec<GenvarDump>,
    /// Generate loop headers.
    pub loops: Vec<LoopDump>,
    /// Every stored expression, indexed by raw id.
    pub exprs: Vec<ExprDump>,
}

/// A parameter entry in a [`ModuleDump`].
#[derive(Debug, Serialize)]
pub struct ParamDump {
    /// Parameter name.
    pub name: String,
    /// Raw id of the `Parameter` node.
    pub expr: u32,
    /// Raw id of the default value.
    pub default: Option<u32>,
}

/// A port entry in a [`ModuleDump`].
#[derive(Debug, Serialize)]
pub struct PortDump {
    /// Port name.
    pub name: String,
    /// Raw dimension ids.
    pub shape: Vec<u32>,
    /// Dimensions rendered as infix text.
    pub dims: Vec<String>,
}

/// A genvar entry in a [`ModuleDump`].
#[derive(Debug, Serialize)]
pub struct GenvarDump {
    /// Genvar name.
    pub name: String,
    /// Raw id of its value.
    pub value: Option<u32>,
}

/// A loop entry in a [`ModuleDump`].
#[derive(Debug, Serialize)]
pub struct LoopDump {
    /// Block label.
    pub label: Option<String>,
    /// Loop variable.
    pub genvar: String,
    /// Raw id of the start value.
    pub start: u32,
    /// Raw id of the exclusive bound.
    pub end: u32,
    /// Raw id of the increment.
    pub step: u32,
}

/// A stored expression in a [`ModuleDump`].
#[derive(Debug, Serialize)]
#[serde(tag = "kind")]
pub enum ExprDump {
    /// `Constant`
    Constant {
        /// Value.
        value: i64,
    },
    /// `Parameter`
    Parameter {
        /// Parameter name.
        name: String,
    },
    /// `Add`
    Add {
        /// Raw id of the left operand.
        lhs: u32,
        /// Raw id of the right operand.
        rhs: u32,
    },
    /// `Sub`
    Sub {
        /// Raw id of the left operand.
        lhs: u32,
        /// Raw id of the right operand.
        rhs: u32,
    },
    /// `Mul`
    Mul {
        /// Raw id of the left operand.
        lhs: u32,
        /// Raw id of the right operand.
        rhs: u32,
    },
}

impl ModuleDump {
    /// Snapshots `module`, resolving names through `names`.
    pub fn new(module: &Module, names: &Interner) -> Self {
        let resolve = |i| names.resolve(i).to_string();
        let port = |(name, tensor): (&dsir_common::Ident, &crate::tensor::BitTensor)| PortDump {
            name: resolve(*name),
            shape: tensor.shape().iter().map(|d| d.as_raw()).collect(),
            dims: tensor
                .shape()
                .iter()
                .map(|d| render_expr(&module.exprs, *d, names))
                .collect(),
        };
        Self {
            name: resolve(module.name),
            content_hash: module.content_hash.to_string(),
            params: module
                .params
                .iter()
                .map(|p| ParamDump {
                    name: resolve(p.name),
                    expr: p.expr.as_raw(),
                    default: p.default.map(ExprId::as_raw),
                })
                .collect(),
            inputs: module.inputs.iter().map(port).collect(),
            outputs: module.outputs.iter().map(port).collect(),
            genvars: module
                .genvars
                .iter()
                .map(|(name, value)| GenvarDump {
                    name: resolve(*name),
                    value: value.map(ExprId::as_raw),
                })
                .collect(),
            loops: module
                .loops
                .iter()
                .map(|l| LoopDump {
                    label: l.label.map(resolve),
                    genvar: resolve(l.genvar),
                    start: l.start.as_raw(),
                    end: l.end.as_raw(),
                    step: l.step.as_raw(),
                })
                .collect(),
            exprs: module
                .exprs
                .iter()
                .map(|(_, node)| match *node {
                    ParamExpr::Constant(value) => ExprDump::Constant { value },
                    ParamExpr::Parameter(name) => ExprDump::Parameter { name: resolve(name) },
                    ParamExpr::Add(l, r) => ExprDump::Add { lhs: l.as_raw(), rhs: r.as_raw() },
                    ParamExpr::Sub(l, r) => ExprDump::Sub { lhs: l.as_raw(), rhs: r.as_raw() },
                    ParamExpr::Mul(l, r) => ExprDump::Mul { lhs: l.as_raw(), rhs: r.as_raw() },
                })
                .collect(),
        }
    }
}

/// A JSON-serializable snapshot of a whole design.
#[derive(Debug, Serialize)]
pub struct DesignDump {
    /// Modules in design order.
    pub modules: Vec<ModuleDump>,
}

impl DesignDump {
    /// Snapshots every module of `design`.
    pub fn new(design: &Design, names: &Interner) -> Self {
        Self {
            modules: design
                .iter()
                .map(|(_, m)| ModuleDump::new(m, names))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{GenerateLoop, ModuleParam};
    use crate::tensor::BitTensor;
    use dsir_common::{Arithmetic, ContentHash};

    fn sample(names: &Interner) -> Module {
        let mut m = Module::new(
            names.get_or_intern("chain"),
            Arithmetic::Wrapping,
            ContentHash::from_bytes(b"chain"),
        );
        let n_name = names.get_or_intern("N");
        let n = m.exprs.parameter(n_name);
        let one = m.exprs.constant(1);
        let zero = m.exprs.constant(0);
        let w = m.exprs.parameter(names.get_or_intern("W"));
        let n1 = m.exprs.sub(n, one).unwrap();
        let bits = m.exprs.mul(n1, w).unwrap();
        m.params.push(ModuleParam { name: n_name, expr: n, default: None });
        m.inputs.insert(names.get_or_intern("a"), BitTensor::vector(bits));
        m.outputs.insert(names.get_or_intern("y"), BitTensor::vector(one));
        let i = names.get_or_intern("i");
        m.genvars.insert(i, Some(zero));
        m.loops.push(GenerateLoop {
            label: Some(names.get_or_intern("stage")),
            genvar: i,
            start: zero,
            end: n,
            step: one,
        });
        m
    }

    #[test]
    fn infix_rendering_parenthesizes_nested() {
        let names = Interner::new();
        let m = sample(&names);
        let a = m.inputs[&names.get_or_intern("a")].shape()[0];
        assert_eq!(render_expr(&m.exprs, a, &names), "(N - 1) * W");
        assert_eq!(render_expr(&m.exprs, ExprId::from_raw(99), &names), "%99");
    }

    #[test]
    fn text_dump() {
        let names = Interner::new();
        let text = render_module(&sample(&names), &names);
        assert!(text.starts_with("module chain (hash "));
        assert!(text.contains("  param N\n"));
        assert!(text.contains("  input a [(N - 1) * W]\n"));
        assert!(text.contains("  output y [1]\n"));
        assert!(text.contains("  genvar i = 0\n"));
        assert!(text.contains("  loop stage: for i = 0; i < N; i += 1\n"));
        assert!(text.contains("    %0 = Parameter(N)\n"));
        assert!(text.contains("    %4 = Sub(%0, %1)\n"));
    }

    #[test]
    fn json_dump() {
        let names = Interner::new();
        let dump = ModuleDump::new(&sample(&names), &names);
        let value = serde_json::to_value(&dump).unwrap();
        assert_eq!(value["name"], "chain");
        assert_eq!(value["inputs"][0]["dims"][0], "(N - 1) * W");
        assert_eq!(value["exprs"][0]["kind"], "Parameter");
        assert_eq!(value["exprs"][4]["kind"], "Sub");
        assert_eq!(value["loops"][0]["label"], "stage");
        assert_eq!(value["genvars"][0]["value"], 2);
    }
}
