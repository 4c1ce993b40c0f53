use std::fmt;

use super::Value;

/// Prefix that decorates a variable reference in expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// `#{name}`: program rule variable.
    ProgramRule,
    /// `A{name}`: tracked entity attribute.
    Attribute,
    /// `V{name}`: environment variable.
    Environment,
    /// `C{name}`: constant.
    Constant,
}

impl VariableKind {
    fn sigil(self) -> char {
        match self {
            VariableKind::ProgramRule => '#',
            VariableKind::Attribute => 'A',
            VariableKind::Environment => 'V',
            VariableKind::Constant => 'C',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Literal(Value),
    Variable {
        kind: VariableKind,
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<ExprNode>,
    },
    Binary {
        op: BinaryOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    Function {
        name: String,
        args: Vec<ExprNode>,
    },
}

impl ExprNode {
    pub(crate) fn unary(op: UnaryOp, operand: ExprNode) -> Self {
        ExprNode::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub(crate) fn binary(op: BinaryOp, left: ExprNode, right: ExprNode) -> Self {
        ExprNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Height of the tree; a literal or variable has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match node {
                ExprNode::Literal(_) | ExprNode::Variable { .. } => {}
                ExprNode::Unary { operand, .. } => pending.push((&**operand, depth + 1)),
                ExprNode::Binary { left, right, .. } => {
                    pending.push((&**left, depth + 1));
                    pending.push((&**right, depth + 1));
                }
                ExprNode::Function { args, .. } => {
                    pending.extend(args.iter().map(|arg| (arg, depth + 1)));
                }
            }
        }
        deepest
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Negate => write!(f, "-"),
            UnaryOp::Plus => write!(f, "+"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Literal(Value::Text(s)) => write!(f, "'{s}'"),
            ExprNode::Literal(v) => write!(f, "{v}"),
            ExprNode::Variable { kind, name } => write!(f, "{}{{{name}}}", kind.sigil()),
            ExprNode::Unary { op, operand } => write!(f, "({op}{operand})"),
            ExprNode::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            ExprNode::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Strip a `#{..}`, `A{..}`, `V{..}` or `C{..}` decoration from a variable
/// reference. Undecorated names are returned unchanged.
#[must_use]
pub fn unwrap_variable_name(reference: &str) -> &str {
    let trimmed = reference.trim();
    for prefix in ["#{", "A{", "V{", "C{"] {
        if let Some(inner) = trimmed
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix('}'))
        {
            return inner.trim();
        }
    }
    trimmed
}
