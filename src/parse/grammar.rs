use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, fail, not, opt, separated, terminated};
use winnow::error::{ContextError, ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::types::{BinaryOp, ExprNode, UnaryOp, Value, VariableKind};

/// Deepest nesting of parentheses, unary operators and function calls.
pub(crate) const MAX_NESTING: usize = 64;

/// Tallest expression tree the evaluator is handed.
pub(crate) const MAX_DEPTH: usize = 256;

/// Parsing mode threaded through every precedence level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mode {
    legacy: bool,
    nesting: usize,
}

impl Mode {
    pub(crate) fn new(legacy: bool) -> Self {
        Self { legacy, nesting: 0 }
    }

    /// One level deeper, or a cut error once [`MAX_NESTING`] is reached.
    fn nested(self, input: &mut &str) -> ModalResult<Mode> {
        if self.nesting >= MAX_NESTING {
            return too_deep(input);
        }
        Ok(Mode {
            nesting: self.nesting + 1,
            ..self
        })
    }
}

fn too_deep<O>(input: &mut &str) -> ModalResult<O> {
    cut_err(fail)
        .context(StrContext::Expected(StrContextValue::Description(
            "shallower nesting",
        )))
        .parse_next(input)
}

// -- Whitespace & keywords --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A word that must not run into a following identifier character.
fn keyword<'i>(word: &'static str) -> impl Parser<&'i str, (), ErrMode<ContextError>> {
    terminated(word, not(one_of(is_ident_char))).void()
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = alt(('"', '\'')).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any)
            .context(StrContext::Expected(StrContextValue::Description(
                "closing quote",
            )))
            .parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                match esc {
                    '"' | '\'' | '\\' => s.push(esc),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number(input: &mut &str) -> ModalResult<f64> {
    (
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

// -- Variables & function calls ---------------------------------------------

fn variable(input: &mut &str) -> ModalResult<ExprNode> {
    let kind = alt((
        "#{".value(VariableKind::ProgramRule),
        "A{".value(VariableKind::Attribute),
        "V{".value(VariableKind::Environment),
        "C{".value(VariableKind::Constant),
    ))
    .parse_next(input)?;
    let name = cut_err(terminated(take_while(1.., |c: char| c != '}'), '}'))
        .context(StrContext::Expected(StrContextValue::Description(
            "variable name",
        )))
        .parse_next(input)?;
    Ok(ExprNode::Variable {
        kind,
        name: name.trim().to_owned(),
    })
}

fn function_call(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    let name = ("d2:", take_while(1.., is_ident_char))
        .take()
        .parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('(').parse_next(input)?;
    let inner = mode.nested(input)?;
    let args: Vec<ExprNode> =
        separated(0.., |i: &mut &str| expr(i, inner), (ws, ',')).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(')')
        .context(StrContext::Expected(StrContextValue::Description(
            "closing parenthesis",
        )))
        .parse_next(input)?;
    Ok(ExprNode::Function {
        name: name.to_owned(),
        args,
    })
}

// -- Expressions (precedence: OR < AND < equality < comparison < additive
//    < multiplicative < unary < primary) ------------------------------------

fn parenthesized(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    '('.parse_next(input)?;
    let inner = mode.nested(input)?;
    terminated(move |i: &mut &str| expr(i, inner), (ws, cut_err(')'))).parse_next(input)
}

fn primary(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    ws.parse_next(input)?;
    alt((
        |i: &mut &str| parenthesized(i, mode),
        |i: &mut &str| function_call(i, mode),
        variable,
        string_literal.map(|s| ExprNode::Literal(Value::Text(s))),
        number.map(|n| ExprNode::Literal(Value::Number(n))),
        keyword("true").value(ExprNode::Literal(Value::Bool(true))),
        keyword("false").value(ExprNode::Literal(Value::Bool(false))),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn unary(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    ws.parse_next(input)?;
    let op = if mode.legacy {
        opt(alt((
            "!".value(UnaryOp::Not),
            "-".value(UnaryOp::Negate),
            "+".value(UnaryOp::Plus),
        )))
        .parse_next(input)?
    } else {
        opt(alt((
            "!".value(UnaryOp::Not),
            keyword("not").value(UnaryOp::Not),
            "-".value(UnaryOp::Negate),
            "+".value(UnaryOp::Plus),
        )))
        .parse_next(input)?
    };
    match op {
        Some(op) => {
            let inner = mode.nested(input)?;
            let operand = cut_err(|i: &mut &str| unary(i, inner)).parse_next(input)?;
            Ok(ExprNode::unary(op, operand))
        }
        None => primary(input, mode),
    }
}

fn multiplicative_op(input: &mut &str, _mode: Mode) -> ModalResult<Option<BinaryOp>> {
    opt(alt((
        "*".value(BinaryOp::Mul),
        "/".value(BinaryOp::Div),
        "%".value(BinaryOp::Mod),
    )))
    .parse_next(input)
}

fn additive_op(input: &mut &str, _mode: Mode) -> ModalResult<Option<BinaryOp>> {
    opt(alt(("+".value(BinaryOp::Add), "-".value(BinaryOp::Sub)))).parse_next(input)
}

fn comparison_op(input: &mut &str, _mode: Mode) -> ModalResult<Option<BinaryOp>> {
    opt(alt((
        "<=".value(BinaryOp::Lte),
        ">=".value(BinaryOp::Gte),
        "<".value(BinaryOp::Lt),
        ">".value(BinaryOp::Gt),
    )))
    .parse_next(input)
}

fn equality_op(input: &mut &str, _mode: Mode) -> ModalResult<Option<BinaryOp>> {
    opt(alt(("==".value(BinaryOp::Eq), "!=".value(BinaryOp::Neq)))).parse_next(input)
}

fn and_op(input: &mut &str, mode: Mode) -> ModalResult<Option<BinaryOp>> {
    if mode.legacy {
        opt("&&".value(BinaryOp::And)).parse_next(input)
    } else {
        opt(alt((
            "&&".value(BinaryOp::And),
            keyword("and").value(BinaryOp::And),
        )))
        .parse_next(input)
    }
}

fn or_op(input: &mut &str, mode: Mode) -> ModalResult<Option<BinaryOp>> {
    if mode.legacy {
        opt("||".value(BinaryOp::Or)).parse_next(input)
    } else {
        opt(alt((
            "||".value(BinaryOp::Or),
            keyword("or").value(BinaryOp::Or),
        )))
        .parse_next(input)
    }
}

type Level = fn(&mut &str, Mode) -> ModalResult<ExprNode>;
type Operator = fn(&mut &str, Mode) -> ModalResult<Option<BinaryOp>>;

/// Left-associative chain of `operand (operator operand)*`. The chain may
/// not grow the tree past [`MAX_DEPTH`].
fn fold_binary(
    input: &mut &str,
    mode: Mode,
    operand: Level,
    operator: Operator,
) -> ModalResult<ExprNode> {
    let mut node = operand(input, mode)?;
    let mut depth = None;
    loop {
        let checkpoint = input.checkpoint();
        ws.parse_next(input)?;
        let Some(op) = operator(input, mode)? else {
            input.reset(&checkpoint);
            return Ok(node);
        };
        let right = cut_err(|i: &mut &str| operand(i, mode)).parse_next(input)?;
        let left_depth = depth.unwrap_or_else(|| node.depth());
        let height = 1 + left_depth.max(right.depth());
        if height > MAX_DEPTH {
            return too_deep(input);
        }
        depth = Some(height);
        node = ExprNode::binary(op, node, right);
    }
}

fn multiplicative(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    fold_binary(input, mode, unary, multiplicative_op)
}

fn additive(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    fold_binary(input, mode, multiplicative, additive_op)
}

fn comparison(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    fold_binary(input, mode, additive, comparison_op)
}

fn equality(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    fold_binary(input, mode, comparison, equality_op)
}

fn and_expr(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    fold_binary(input, mode, equality, and_op)
}

fn or_expr(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    fold_binary(input, mode, and_expr, or_op)
}

// -- Top-level parser -------------------------------------------------------

pub(crate) fn expr(input: &mut &str, mode: Mode) -> ModalResult<ExprNode> {
    ws.parse_next(input)?;
    let node = or_expr(input, mode)?;
    ws.parse_next(input)?;
    Ok(node)
}
