use std::fmt;

use itertools::Itertools;
use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use super::{PlannerError, StatementContext};
use crate::session::ConfigurationError;

pub const SET_VAR_HINT_NAME: &str = "set_var";

/// A per-statement directive attached to the query text.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectHint {
    SetVar(SetVarHint),
}

impl fmt::Display for SelectHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectHint::SetVar(hint) => write!(f, "{}", hint),
        }
    }
}

/// select hint overriding session variables for one statement.
/// e.g. set_var(query_timeout='1800', exec_mem_limit='2147483648')
#[derive(Debug, Clone, PartialEq)]
pub struct SetVarHint {
    name: String,
    /// ordered key/value pairs; a key without a value is the boolean-shorthand
    /// form, recorded for display only
    parameters: Vec<(String, Option<String>)>,
}

impl SetVarHint {
    pub fn new(parameters: Vec<(String, Option<String>)>) -> Self {
        Self {
            name: SET_VAR_HINT_NAME.to_string(),
            parameters,
        }
    }

    pub fn parameters(&self) -> &[(String, Option<String>)] {
        &self.parameters
    }

    /// Parse the rendered directive form, e.g.
    /// `set_var(query_timeout='1800', dry_run)`.
    pub fn parse(text: &str) -> Result<Self, PlannerError> {
        let dialect = GenericDialect {};
        let tokens = Tokenizer::new(&dialect, text)
            .tokenize()
            .map_err(|e| PlannerError::InvalidHint(format!("{:?}", e)))?;
        let mut tokens = tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace(_)))
            .peekable();

        match tokens.next() {
            Some(Token::Word(w)) if w.value.eq_ignore_ascii_case(SET_VAR_HINT_NAME) => {}
            _ => {
                return Err(PlannerError::InvalidHint(format!(
                    "expected '{}' directive: {}",
                    SET_VAR_HINT_NAME, text
                )))
            }
        }
        if !matches!(tokens.next(), Some(Token::LParen)) {
            return Err(PlannerError::InvalidHint(format!(
                "expected '(' after directive name: {}",
                text
            )));
        }

        let mut parameters = vec![];
        loop {
            match tokens.next() {
                Some(Token::RParen) => break,
                Some(Token::Word(key)) => {
                    let key = key.value.to_lowercase();
                    if matches!(tokens.peek(), Some(Token::Eq)) {
                        tokens.next();
                        let value = match tokens.next() {
                            Some(Token::SingleQuotedString(s)) => s,
                            Some(Token::Number(n, _)) => n,
                            Some(Token::Word(w)) => w.value,
                            other => {
                                return Err(PlannerError::InvalidHint(format!(
                                    "expected a value for key '{}', got {:?}",
                                    key, other
                                )))
                            }
                        };
                        parameters.push((key, Some(value)));
                    } else {
                        parameters.push((key, None));
                    }
                    if matches!(tokens.peek(), Some(Token::Comma)) {
                        tokens.next();
                    }
                }
                other => {
                    return Err(PlannerError::InvalidHint(format!(
                        "unexpected {:?} in directive: {}",
                        other, text
                    )))
                }
            }
        }
        if tokens.next().is_some() {
            return Err(PlannerError::InvalidHint(format!(
                "trailing input after directive: {}",
                text
            )));
        }
        Ok(Self::new(parameters))
    }

    /// set session variable in sql level
    ///
    /// Every key with a present value is applied in order through the
    /// context's override ledger, so the pre-statement value is restored when
    /// the statement ends. The batch is best-effort: a failing key aborts
    /// here, keys already applied stay applied and are still restored later.
    pub fn set_var_once_in_sql(
        &self,
        context: &mut StatementContext,
    ) -> Result<(), ConfigurationError> {
        for (key, value) in &self.parameters {
            if let Some(value) = value {
                context.set_var_once(key, value)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SetVarHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kv_string = self
            .parameters
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("{}='{}'", key, value),
                None => key.clone(),
            })
            .join(", ");
        write!(f, "{}({})", self.name, kv_string)
    }
}
