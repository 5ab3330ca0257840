//! Left-to-right Boolean query evaluation.
//!
//! A query is split on whitespace into operators (`AND`, `OR`, `NOT`) and operands
//! (`term` or `field:term`). Evaluation keeps an operator stack and a running result;
//! each operand drains the pending operators against it, so there is no precedence:
//! `a OR b AND c` is `(a OR b) AND c`. `NOT` applies to the operand that follows it.

use std::fmt;

use crate::error::QueryError;
use crate::fields::{self, DEFAULT_FIELD};
use crate::index::{NewsIndex, PostingList};
use crate::postings::{complement, intersect, union};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            _ => None,
        }
    }

    fn is_binary(self) -> bool {
        !matches!(self, Operator::Not)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        };
        f.write_str(s)
    }
}

/// A term lookup, `field:term` split at the last colon or a bare term on the default field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand<'q> {
    pub field: &'q str,
    pub term: &'q str,
}

impl<'q> Operand<'q> {
    pub fn parse(token: &'q str, position: usize) -> Result<Self, QueryError> {
        let (field, term) = token.rsplit_once(':').unwrap_or((DEFAULT_FIELD, token));
        if field.is_empty() || term.is_empty() {
            return Err(QueryError::EmptyOperand { operand: token.to_string(), position });
        }
        Ok(Self { field, term })
    }

    /// Posting list of the operand; unknown fields or terms resolve to an empty list.
    pub fn resolve(&self, index: &NewsIndex) -> PostingList {
        match fields::field(self.field) {
            Some(field) => index.postings(field.name, &field.query_term(self.term)).to_vec(),
            None => Vec::new(),
        }
    }
}

/// Evaluate `query` against `index`. A blank query yields an empty list without
/// touching the index.
pub fn solve_query(index: &NewsIndex, query: &str) -> Result<PostingList, QueryError> {
    let mut tokens: Vec<&str> = query.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let total = tokens.len();
    tokens.reverse();

    let universe = index.universe();
    let mut operators: Vec<Operator> = Vec::new();
    let mut first: Option<PostingList> = None;

    while let Some(token) = tokens.pop() {
        let position = total - tokens.len();

        if let Some(op) = Operator::parse(token) {
            if op.is_binary() {
                if first.is_none() {
                    return Err(QueryError::MissingLeftOperand { operator: op, position });
                }
                if let Some(&pending) = operators.last() {
                    return Err(QueryError::UnexpectedOperator { operator: op, pending, position });
                }
            }
            operators.push(op);
            continue;
        }

        if first.is_some() && !operators.iter().any(|op| op.is_binary()) {
            return Err(QueryError::MissingOperator { operand: token.to_string(), position });
        }

        let mut second = Operand::parse(token, position)?.resolve(index);
        let left = first.take().unwrap_or_default();
        while let Some(op) = operators.pop() {
            second = match op {
                Operator::Not => complement(&second, universe),
                Operator::And => intersect(&left, &second),
                Operator::Or => union(&left, &second),
            };
        }
        first = Some(second);
    }

    if let Some(&operator) = operators.last() {
        return Err(QueryError::DanglingOperator { operator });
    }
    Ok(first.unwrap_or_default())
}

/// Number of news items matching `query`.
pub fn solve_and_count(index: &NewsIndex, query: &str) -> Result<usize, QueryError> {
    solve_query(index, query).map(|r| r.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_splits_at_last_colon() {
        assert_eq!(Operand::parse("gato", 1).unwrap(), Operand { field: "article", term: "gato" });
        assert_eq!(Operand::parse("title:gato", 1).unwrap(), Operand { field: "title", term: "gato" });
        assert_eq!(Operand::parse("date:12:30", 1).unwrap(), Operand { field: "date:12", term: "30" });
        assert!(matches!(Operand::parse(":gato", 2), Err(QueryError::EmptyOperand { position: 2, .. })));
        assert!(Operand::parse("title:", 1).is_err());
    }

    #[test]
    fn operators_are_case_sensitive() {
        assert_eq!(Operator::parse("AND"), Some(Operator::And));
        assert_eq!(Operator::parse("and"), None);
        assert_eq!(Operator::Not.to_string(), "NOT");
    }
}
