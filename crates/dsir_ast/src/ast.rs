//! AST node types, mirroring the JSON emitted by the front-end.
//!
//! Enums use serde's default external tagging, so `Statement::Genvar("i")`
//! is `{"Genvar": "i"}` and an addition is
//! `{"BinaryArithmeticOperation": [lhs, "Add", rhs]}`.

use dsir_common::ContentHash;
use serde::{Deserialize, Serialize};

// ============================================================================
// Top-level
// ============================================================================

/// Several modules delivered in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// The modules, in declaration order.
    pub modules: Vec<ModuleDecl>,
}

/// A module declaration. Ports are `Wire` statements in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDecl {
    /// The module name.
    pub name: String,
    /// Declared parameters.
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Body statements, in source order.
    #[serde(default)]
    pub body: Vec<Statement>,
}

impl ModuleDecl {
    /// Hashes the canonical JSON form of this module.
    ///
    /// Two declarations hash equally iff they are structurally identical,
    /// regardless of whitespace or key order in the source text.
    pub fn content_hash(&self) -> ContentHash {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        ContentHash::from_bytes(&canonical)
    }
}

/// A module parameter with an optional default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// The parameter name.
    pub name: String,
    /// The default value, if one was written.
    #[serde(default)]
    pub value: Option<Expr>,
}

// ============================================================================
// Statements
// ============================================================================

/// A statement in a module body, generate region, or loop body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A wire, which is a port when `io` is set.
    Wire(WireDecl),
    /// `genvar i;`
    Genvar(String),
    /// A `generate ... endgenerate` region.
    Generate(Vec<Statement>),
    /// A generate `for` loop.
    For(ForBlock),
    /// A continuous assignment.
    Assign(AssignDecl),
    /// A module instantiation.
    Instance(InstanceDecl),
}

impl Statement {
    /// The variant name, as it appears in the JSON tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Wire(_) => "Wire",
            Statement::Genvar(_) => "Genvar",
            Statement::Generate(_) => "Generate",
            Statement::For(_) => "For",
            Statement::Assign(_) => "Assign",
            Statement::Instance(_) => "Instance",
        }
    }
}

/// A wire declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDecl {
    /// The wire name.
    pub name: String,
    /// Port direction; `None` for internal wires.
    #[serde(default)]
    pub io: Option<Direction>,
    /// Bit range; `None` for a 1-bit wire.
    #[serde(default)]
    pub width: Option<Range>,
    /// Initial value expression.
    #[serde(default)]
    pub init: Option<Expr>,
}

/// A port direction as written by the front-end.
///
/// Any string is accepted so that the elaborator, not the reader, decides
/// what an unrecognized direction means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`, spelled `InOut` or `Inout`.
    InOut,
    /// Anything else.
    Other(String),
}

impl From<String> for Direction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Input" => Direction::Input,
            "Output" => Direction::Output,
            "InOut" | "Inout" => Direction::InOut,
            _ => Direction::Other(s),
        }
    }
}

impl From<Direction> for String {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Input => "Input".to_string(),
            Direction::Output => "Output".to_string(),
            Direction::InOut => "InOut".to_string(),
            Direction::Other(s) => s,
        }
    }
}

/// A `[start:end]` bit range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// The upper index.
    pub start: Expr,
    /// The lower index.
    #[serde(default)]
    pub end: Option<Expr>,
}

/// `lhs = rhs;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignDecl {
    /// Assignment target.
    pub lhs: Expr,
    /// Assigned value.
    pub rhs: Expr,
}

/// `module_name #(params) instance_name (ports);`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceDecl {
    /// The instance name.
    pub name: String,
    /// The instantiated module's name.
    pub module: String,
    /// Parameter overrides.
    #[serde(default)]
    pub params_set: Vec<Bind>,
    /// Port connections.
    #[serde(default)]
    pub ports_set: Vec<Bind>,
}

/// A named binding in an instantiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bind {
    /// The bound parameter or port.
    pub name: String,
    /// The bound value.
    pub value: Expr,
}

/// `for (genvar = init; cond; target = value) begin : name ... end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForBlock {
    /// The generate-block label.
    #[serde(default)]
    pub name: Option<String>,
    /// The loop variable.
    pub genvar: String,
    /// Initial value; `None` continues from the genvar's current value.
    #[serde(default)]
    pub init: Option<Expr>,
    /// Loop condition.
    pub cond: Expr,
    /// Step assignment.
    pub step: StepAssign,
    /// Loop body.
    #[serde(default)]
    pub body: Vec<Statement>,
}

/// The step clause of a generate loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAssign {
    /// The assigned name.
    pub target: String,
    /// The assigned value.
    pub value: Expr,
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// A name: parameter, genvar, or wire.
    Identifier(String),
    /// An integer literal.
    ConstantInt(i64),
    /// A string literal.
    String(String),
    /// `lhs op rhs` over bits.
    BinaryBitOperation(Box<Expr>, BinBitOp, Box<Expr>),
    /// `~operand`
    UnaryBitOperation(UnBitOp, Box<Expr>),
    /// `lhs op rhs` over integers.
    BinaryArithmeticOperation(Box<Expr>, BinArithOp, Box<Expr>),
    /// `-operand`
    UnaryArithmeticOperation(UnArithOp, Box<Expr>),
    /// `lhs op rhs` comparison.
    RelationalOperation(Box<Expr>, RelOp, Box<Expr>),
}

impl Expr {
    /// `Identifier(name)`
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    /// `ConstantInt(value)`
    pub fn int(value: i64) -> Self {
        Expr::ConstantInt(value)
    }

    /// `BinaryArithmeticOperation(lhs, op, rhs)`
    pub fn arith(lhs: Expr, op: BinArithOp, rhs: Expr) -> Self {
        Expr::BinaryArithmeticOperation(Box::new(lhs), op, Box::new(rhs))
    }

    /// `RelationalOperation(lhs, op, rhs)`
    pub fn rel(lhs: Expr, op: RelOp, rhs: Expr) -> Self {
        Expr::RelationalOperation(Box::new(lhs), op, Box::new(rhs))
    }

    /// The variant name, as it appears in the JSON tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Identifier(_) => "Identifier",
            Expr::ConstantInt(_) => "ConstantInt",
            Expr::String(_) => "String",
            Expr::BinaryBitOperation(..) => "BinaryBitOperation",
            Expr::UnaryBitOperation(..) => "UnaryBitOperation",
            Expr::BinaryArithmeticOperation(..) => "BinaryArithmeticOperation",
            Expr::UnaryArithmeticOperation(..) => "UnaryArithmeticOperation",
            Expr::RelationalOperation(..) => "RelationalOperation",
        }
    }
}

/// Binary bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinBitOp {
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `~^`
    Xnor,
}

/// Unary bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnBitOp {
    /// `~`
    Not,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinArithOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
}

/// Unary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnArithOp {
    /// `-`
    Neg,
}

/// Relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_from_json() {
        let stmt: Statement = serde_json::from_value(json!({
            "Wire": {"name": "b", "io": "Output", "width": {"start": {"ConstantInt": 7}, "end": {"ConstantInt": 0}}, "init": null}
        }))
        .unwrap();
        let Statement::Wire(wire) = stmt else {
            panic!("expected wire");
        };
        assert_eq!(wire.io, Some(Direction::Output));
        let width = wire.width.unwrap();
        assert_eq!(width.start, Expr::int(7));
        assert_eq!(width.end, Some(Expr::int(0)));
    }

    #[test]
    fn direction_spellings() {
        let parse = |s: &str| serde_json::from_value::<Direction>(json!(s)).unwrap();
        assert_eq!(parse("Input"), Direction::Input);
        assert_eq!(parse("InOut"), Direction::InOut);
        assert_eq!(parse("Inout"), Direction::InOut);
        assert_eq!(parse("Buffer"), Direction::Other("Buffer".to_string()));
        assert_eq!(serde_json::to_value(Direction::InOut).unwrap(), json!("InOut"));
    }

    #[test]
    fn nested_expression_from_json() {
        let expr: Expr = serde_json::from_value(json!({
            "BinaryArithmeticOperation": [{"Identifier": "i"}, "Add", {"ConstantInt": 1}]
        }))
        .unwrap();
        assert_eq!(expr, Expr::arith(Expr::ident("i"), BinArithOp::Add, Expr::int(1)));
        assert_eq!(expr.kind(), "BinaryArithmeticOperation");
    }

    #[test]
    fn unary_operand_order() {
        let expr: Expr = serde_json::from_value(json!({"UnaryBitOperation": ["Not", {"Identifier": "a"}]})).unwrap();
        assert_eq!(expr, Expr::UnaryBitOperation(UnBitOp::Not, Box::new(Expr::ident("a"))));
    }

    #[test]
    fn for_block_defaults() {
        let stmt: Statement = serde_json::from_value(json!({
            "For": {
                "genvar": "i",
                "cond": {"RelationalOperation": [{"Identifier": "i"}, "Lt", {"Identifier": "N"}]},
                "step": {"target": "i", "value": {"ConstantInt": 1}}
            }
        }))
        .unwrap();
        let Statement::For(block) = stmt else {
            panic!("expected for");
        };
        assert!(block.name.is_none());
        assert!(block.init.is_none());
        assert!(block.body.is_empty());
        assert_eq!(Statement::For(block).kind(), "For");
    }

    #[test]
    fn content_hash_ignores_formatting() {
        let a: ModuleDecl = serde_json::from_str(r#"{"name":"m","params":[],"body":[]}"#).unwrap();
        let b: ModuleDecl =
            serde_json::from_str("{\n  \"body\": [],\n  \"name\": \"m\"\n}").unwrap();
        assert_eq!(a.content_hash(), b.content_hash());

        let c: ModuleDecl = serde_json::from_str(r#"{"name":"n"}"#).unwrap();
        assert_ne!(a.content_hash(), c.content_hash());
    }
}
