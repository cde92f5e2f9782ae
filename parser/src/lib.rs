use logic::{FormulaId, Store};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct FormulaParser;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("malformed parse tree at `{0}`")]
    Malformed(String),
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum BinOperator {
    Equivalence,
    Implication,
    Xor,
    Disjunction,
    Conjunction,
    Until,
    Release,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum UnaryOperator {
    Negation,
    PropNegation,
    StrongNext,
    WeakNext,
    Eventually,
    Globally,
}

#[derive(PartialEq, Debug, Clone)]
pub enum AstNode {
    BinOp {
        operator: BinOperator,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
    UnOp {
        operator: UnaryOperator,
        operand: Box<AstNode>,
    },
    Atom {
        name: String,
    },
    Constant {
        value: String,
    },
}

/// Parses an LTLf formula into its syntax tree.
pub fn parse(source: &str) -> Result<AstNode, ParseError> {
    let mut pairs = FormulaParser::parse(Rule::formula, source).map_err(Box::new)?;
    let formula = next_pair(&mut pairs, source)?;
    let mut inner = formula.into_inner();
    build_ast_from_binary(next_pair(&mut inner, source)?)
}

/// Parses `source` and interns the result in `store`.
pub fn parse_formula(store: &mut Store, source: &str) -> Result<FormulaId, ParseError> {
    let ast = parse(source)?;
    Ok(to_formula(store, &ast))
}

fn next_pair<'a>(pairs: &mut Pairs<'a, Rule>, context: &str) -> Result<Pair<'a, Rule>, ParseError> {
    pairs.next().ok_or_else(|| ParseError::Malformed(context.to_string()))
}

fn binary_operator(rule: Rule) -> Option<BinOperator> {
    match rule {
        Rule::equivalence => Some(BinOperator::Equivalence),
        Rule::implication => Some(BinOperator::Implication),
        Rule::xor => Some(BinOperator::Xor),
        Rule::disjunction => Some(BinOperator::Disjunction),
        Rule::conjunction => Some(BinOperator::Conjunction),
        Rule::until => Some(BinOperator::Until),
        Rule::release => Some(BinOperator::Release),
        _ => None,
    }
}

/// Every binary level has the shape `lower (op same)?`.
fn build_ast_from_binary(pair: Pair<Rule>) -> Result<AstNode, ParseError> {
    let Some(operator) = binary_operator(pair.as_rule()) else {
        return build_ast_from_factor(pair);
    };
    let text = pair.as_str().to_string();
    let mut pairs = pair.into_inner();

    match pairs.len() {
        1 => build_ast_from_binary(next_pair(&mut pairs, &text)?),
        2 => {
            let lhs = build_ast_from_binary(next_pair(&mut pairs, &text)?)?;
            let rhs = build_ast_from_binary(next_pair(&mut pairs, &text)?)?;
            Ok(AstNode::BinOp {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        }
        _ => Err(ParseError::Malformed(text)),
    }
}

fn build_ast_from_factor(pair: Pair<Rule>) -> Result<AstNode, ParseError> {
    let text = pair.as_str().to_string();
    match pair.as_rule() {
        Rule::factor => {
            let mut pairs = pair.into_inner();
            match pairs.len() {
                1 => build_ast_from_factor(next_pair(&mut pairs, &text)?),
                2 => {
                    let operator = match next_pair(&mut pairs, &text)?.as_rule() {
                        Rule::strong_next => UnaryOperator::StrongNext,
                        Rule::weak_next => UnaryOperator::WeakNext,
                        Rule::negation => UnaryOperator::Negation,
                        Rule::prop_negation => UnaryOperator::PropNegation,
                        Rule::eventually => UnaryOperator::Eventually,
                        Rule::always => UnaryOperator::Globally,
                        _ => unreachable!(),
                    };
                    let operand = build_ast_from_factor(next_pair(&mut pairs, &text)?)?;
                    Ok(AstNode::UnOp {
                        operator,
                        operand: Box::new(operand),
                    })
                }
                _ => Err(ParseError::Malformed(text)),
            }
        }
        Rule::primary => {
            let mut pairs = pair.into_inner();
            let inner = next_pair(&mut pairs, &text)?;
            match inner.as_rule() {
                Rule::constant => Ok(AstNode::Constant {
                    value: inner.as_str().to_string(),
                }),
                Rule::ident => Ok(AstNode::Atom {
                    name: inner.as_str().to_string(),
                }),
                Rule::equivalence => build_ast_from_binary(inner),
                _ => unreachable!(),
            }
        }
        _ => Err(ParseError::Malformed(text)),
    }
}

/// Lowers a syntax tree into the store. `!` applied directly to an atom is the
/// propositional negation; anywhere else it is read as `~`.
pub fn to_formula(store: &mut Store, ast: &AstNode) -> FormulaId {
    match ast {
        AstNode::Constant { value } => match value.as_str() {
            "tt" => store.make_tt(),
            "ff" => store.make_ff(),
            "true" => store.make_prop_true(),
            _ => store.make_prop_false(),
        },
        AstNode::Atom { name } => store.make_atom(name),
        AstNode::UnOp { operator, operand } => {
            if let (UnaryOperator::PropNegation, AstNode::Atom { name }) = (operator, operand.as_ref()) {
                let atom = store.make_atom(name);
                return store.make_prop_not(atom);
            }
            let arg = to_formula(store, operand);
            match operator {
                UnaryOperator::Negation | UnaryOperator::PropNegation => store.make_not(arg),
                UnaryOperator::StrongNext => store.make_next(arg),
                UnaryOperator::WeakNext => store.make_weak_next(arg),
                UnaryOperator::Eventually => store.make_eventually(arg),
                UnaryOperator::Globally => store.make_always(arg),
            }
        }
        AstNode::BinOp { operator, lhs, rhs } => {
            let lhs = to_formula(store, lhs);
            let rhs = to_formula(store, rhs);
            let args = vec![lhs, rhs];
            match operator {
                BinOperator::Equivalence => store.make_equivalent(args),
                BinOperator::Implication => store.make_implies(args),
                BinOperator::Xor => store.make_xor(args),
                BinOperator::Disjunction => store.make_or(args),
                BinOperator::Conjunction => store.make_and(args),
                BinOperator::Until => store.make_until(args),
                BinOperator::Release => store.make_release(args),
            }
        }
    }
}
