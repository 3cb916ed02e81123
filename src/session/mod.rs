mod errors;

use std::collections::HashMap;
use std::fmt;

pub use errors::*;

pub const QUERY_TIMEOUT: &str = "query_timeout";
pub const EXEC_MEM_LIMIT: &str = "exec_mem_limit";
pub const BATCH_SIZE: &str = "batch_size";
pub const ENABLE_EXTERNAL_SINK: &str = "enable_external_sink";
pub const TIME_ZONE: &str = "time_zone";

/// The value of one session variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl VariableValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            VariableValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            VariableValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Int(v) => write!(f, "{}", v),
            VariableValue::Bool(v) => write!(f, "{}", v),
            VariableValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Definition of one known variable: its default decides the type, integer
/// variables additionally carry a closed value range.
struct VariableDef {
    name: &'static str,
    default: fn() -> VariableValue,
    range: Option<(i64, i64)>,
}

static VARIABLE_DEFS: &[VariableDef] = &[
    VariableDef {
        name: QUERY_TIMEOUT,
        default: || VariableValue::Int(600),
        range: Some((1, 259200)),
    },
    VariableDef {
        name: EXEC_MEM_LIMIT,
        default: || VariableValue::Int(2147483648),
        range: Some((2097152, i64::MAX)),
    },
    VariableDef {
        name: BATCH_SIZE,
        default: || VariableValue::Int(1024),
        range: Some((1, 65535)),
    },
    VariableDef {
        name: ENABLE_EXTERNAL_SINK,
        default: || VariableValue::Bool(true),
        range: None,
    },
    VariableDef {
        name: TIME_ZONE,
        default: || VariableValue::Text("UTC".to_string()),
        range: None,
    },
];

fn variable_def(key: &str) -> Option<&'static VariableDef> {
    VARIABLE_DEFS.iter().find(|def| def.name == key)
}

/// Session-owned configuration store, shared by every statement issued
/// sequentially on the same session. Statements mutate it only through the
/// override ledger in `StatementContext`, which restores it on exit.
pub struct SessionVariables {
    values: HashMap<String, VariableValue>,
}

impl Default for SessionVariables {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionVariables {
    pub fn new() -> Self {
        Self {
            values: VARIABLE_DEFS
                .iter()
                .map(|def| (def.name.to_string(), (def.default)()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Result<VariableValue, ConfigurationError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownVariable(key.to_string()))
    }

    /// Parse, validate and install a new value, returning the previous one.
    pub fn set(&mut self, key: &str, value: &str) -> Result<VariableValue, ConfigurationError> {
        let def = variable_def(key)
            .ok_or_else(|| ConfigurationError::UnknownVariable(key.to_string()))?;
        let parsed = Self::parse_value(def, key, value)?;
        let previous = self.values.insert(key.to_string(), parsed);
        // defs seed every key in new(), so previous is always present
        Ok(previous.unwrap_or_else(|| (def.default)()))
    }

    /// Re-install a value previously returned by `set`. Used only for ledger
    /// replay, so no validation runs again.
    pub(crate) fn restore(&mut self, key: &str, value: VariableValue) {
        self.values.insert(key.to_string(), value);
    }

    fn parse_value(
        def: &VariableDef,
        key: &str,
        value: &str,
    ) -> Result<VariableValue, ConfigurationError> {
        match (def.default)() {
            VariableValue::Int(_) => {
                let parsed: i64 =
                    value
                        .parse()
                        .map_err(|_| ConfigurationError::InvalidValue {
                            key: key.to_string(),
                            value: value.to_string(),
                            reason: "expected an integer".to_string(),
                        })?;
                if let Some((min, max)) = def.range {
                    if parsed < min || parsed > max {
                        return Err(ConfigurationError::OutOfRange {
                            key: key.to_string(),
                            value: value.to_string(),
                            min,
                            max,
                        });
                    }
                }
                Ok(VariableValue::Int(parsed))
            }
            VariableValue::Bool(_) => match value {
                "true" | "1" => Ok(VariableValue::Bool(true)),
                "false" | "0" => Ok(VariableValue::Bool(false)),
                _ => Err(ConfigurationError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "expected a boolean".to_string(),
                }),
            },
            VariableValue::Text(_) => Ok(VariableValue::Text(value.to_string())),
        }
    }
}
