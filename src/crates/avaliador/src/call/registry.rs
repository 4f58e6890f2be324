//! The closed set of functions a reply may call.

use super::parser::CallExpression;
use super::value::Value;
use super::CallError;

/// Functions the evaluator can dispatch to. Nothing else is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisteredFunction {
    FetchRestaurantData,
    CalculateOverallScore,
}

/// Arguments of `fetch_restaurant_data`, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchArgs {
    pub restaurant_name: String,
}

/// Arguments of `calculate_overall_score`, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreArgs {
    pub restaurant_name: String,
    pub food_scores: Vec<i64>,
    pub customer_service_scores: Vec<i64>,
}

/// A resolved function with its bound arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundCall {
    Fetch(FetchArgs),
    Score(ScoreArgs),
}

impl RegisteredFunction {
    pub const ALL: [RegisteredFunction; 2] = [
        RegisteredFunction::FetchRestaurantData,
        RegisteredFunction::CalculateOverallScore,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RegisteredFunction::FetchRestaurantData => "fetch_restaurant_data",
            RegisteredFunction::CalculateOverallScore => "calculate_overall_score",
        }
    }

    /// Parameter names in positional order.
    pub fn params(&self) -> &'static [&'static str] {
        match self {
            RegisteredFunction::FetchRestaurantData => &["restaurant_name"],
            RegisteredFunction::CalculateOverallScore => {
                &["restaurant_name", "food_scores", "customer_service_scores"]
            }
        }
    }

    pub fn resolve(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Bind and validate the arguments of `call` against this function.
    pub fn bind(&self, call: &CallExpression) -> Result<BoundCall, CallError> {
        let mut args = bind_params(self, call)?.into_iter();
        let mut next = || args.next().unwrap_or(Value::List(Vec::new()));

        match self {
            RegisteredFunction::FetchRestaurantData => Ok(BoundCall::Fetch(FetchArgs {
                restaurant_name: expect_str(self, "restaurant_name", next())?,
            })),
            RegisteredFunction::CalculateOverallScore => Ok(BoundCall::Score(ScoreArgs {
                restaurant_name: expect_str(self, "restaurant_name", next())?,
                food_scores: expect_int_list(self, "food_scores", next())?,
                customer_service_scores: expect_int_list(
                    self,
                    "customer_service_scores",
                    next(),
                )?,
            })),
        }
    }
}

fn invalid(function: &RegisteredFunction, message: impl Into<String>) -> CallError {
    CallError::InvalidArguments {
        function: function.name(),
        message: message.into(),
    }
}

/// Order positional and keyword arguments by parameter. Every parameter
/// must be given exactly once.
fn bind_params(function: &RegisteredFunction, call: &CallExpression) -> Result<Vec<Value>, CallError> {
    let params = function.params();

    if call.args.len() > params.len() {
        return Err(invalid(
            function,
            format!(
                "takes {} positional argument(s) but {} were given",
                params.len(),
                call.args.len()
            ),
        ));
    }

    let mut slots: Vec<Option<Value>> = call.args.iter().cloned().map(Some).collect();
    slots.resize(params.len(), None);

    for (key, value) in &call.kwargs {
        let Some(index) = params.iter().position(|p| p == key) else {
            return Err(invalid(function, format!("unexpected keyword argument '{}'", key)));
        };
        if slots[index].is_some() {
            return Err(invalid(function, format!("got multiple values for argument '{}'", key)));
        }
        slots[index] = Some(value.clone());
    }

    params
        .iter()
        .zip(slots)
        .map(|(param, slot)| {
            slot.ok_or_else(|| invalid(function, format!("missing required argument '{}'", param)))
        })
        .collect()
}

fn expect_str(function: &RegisteredFunction, param: &str, value: Value) -> Result<String, CallError> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(invalid(
            function,
            format!("'{}' must be a str, got {}", param, other.type_name()),
        )),
    }
}

fn expect_int_list(function: &RegisteredFunction, param: &str, value: Value) -> Result<Vec<i64>, CallError> {
    let Some(items) = value.as_list() else {
        return Err(invalid(
            function,
            format!("'{}' must be a list of int, got {}", param, value.type_name()),
        ));
    };

    items
        .iter()
        .map(|item| {
            item.as_int().ok_or_else(|| {
                invalid(
                    function,
                    format!("'{}' must contain only int, found {} {}", param, item.type_name(), item),
                )
            })
        })
        .collect()
}
