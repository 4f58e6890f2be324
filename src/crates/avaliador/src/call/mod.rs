//! Function-call evaluator.
//!
//! Turns a textual call such as
//! `fetch_restaurant_data(restaurant_name='Foo')` into a local invocation.
//! Only literal arguments are accepted and only the functions in
//! [`RegisteredFunction`] can be reached; the text is never executed as
//! code.
//!
//! ```rust
//! use avaliador::call::{CallEvaluator, CallOutput};
//! use avaliador::ReviewStore;
//!
//! let store = ReviewStore::from_text("Foo. Comida ótima.");
//! let evaluator = CallEvaluator::new(&store);
//!
//! let output = evaluator.evaluate("fetch_restaurant_data(restaurant_name='foo')").unwrap();
//! assert_eq!(output.to_string(), "{'foo': ['Comida ótima.']}");
//! assert!(matches!(output, CallOutput::Reviews(_)));
//!
//! assert!(evaluator.evaluate("os.system('rm -rf /')").is_err());
//! ```

pub mod locate;
pub mod parser;
pub mod registry;
pub mod value;

pub use locate::locate_call;
pub use parser::{parse_call, CallExpression};
pub use registry::{BoundCall, FetchArgs, RegisteredFunction, ScoreArgs};
pub use value::Value;

use crate::reviews::{ReviewSet, ReviewStore};
use crate::scoring::{self, ScoreResult};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Why a call expression was not executed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// Not a single call with literal arguments
    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// Well-formed call to a name outside the registry
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Registered function, but not the one this stage asked for
    #[error("expected a call to {expected}, found {found}")]
    UnexpectedFunction {
        expected: &'static str,
        found: String,
    },

    /// Registered function, but arguments do not fit its signature
    #[error("invalid arguments for {function}: {message}")]
    InvalidArguments {
        function: &'static str,
        message: String,
    },
}

/// Typed return value of a registered function.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
    Reviews(ReviewSet),
    Score(ScoreResult),
}

impl CallOutput {
    pub fn to_value(&self) -> Value {
        match self {
            CallOutput::Reviews(set) => set.to_value(),
            CallOutput::Score(result) => result.to_value(),
        }
    }
}

impl fmt::Display for CallOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// Evaluates call expressions against the review store and scoring engine.
#[derive(Debug, Clone, Copy)]
pub struct CallEvaluator<'a> {
    reviews: &'a ReviewStore,
}

impl<'a> CallEvaluator<'a> {
    pub fn new(reviews: &'a ReviewStore) -> Self {
        Self { reviews }
    }

    /// Parse `text` as exactly one call, resolve it and run it.
    pub fn evaluate(&self, text: &str) -> Result<CallOutput, CallError> {
        let (function, bound) = Self::prepare(text)?;
        debug!(function = function.name(), "Evaluating call");
        Ok(self.invoke(bound))
    }

    /// Like [`evaluate`](Self::evaluate), but only runs `expected`.
    pub fn evaluate_as(&self, text: &str, expected: RegisteredFunction) -> Result<CallOutput, CallError> {
        let (function, bound) = Self::prepare(text)?;
        if function != expected {
            return Err(CallError::UnexpectedFunction {
                expected: expected.name(),
                found: function.name().to_string(),
            });
        }
        debug!(function = function.name(), "Evaluating call");
        Ok(self.invoke(bound))
    }

    fn prepare(text: &str) -> Result<(RegisteredFunction, BoundCall), CallError> {
        let call = parse_call(text)?;
        let function = RegisteredFunction::resolve(&call.function)
            .ok_or_else(|| CallError::UnknownFunction(call.function.clone()))?;
        let bound = function.bind(&call)?;
        Ok((function, bound))
    }

    /// Run an already bound call.
    pub fn invoke(&self, call: BoundCall) -> CallOutput {
        match call {
            BoundCall::Fetch(args) => CallOutput::Reviews(self.reviews.fetch(&args.restaurant_name)),
            BoundCall::Score(args) => CallOutput::Score(ScoreResult {
                score: scoring::score(&args.food_scores, &args.customer_service_scores),
                restaurant_name: args.restaurant_name,
            }),
        }
    }
}

/// Pick the call to `function` out of a reasoning-service reply.
///
/// `None` when the reply never mentions `function`. When it does but no
/// complete call can be isolated, the trimmed reply is returned so the
/// evaluator reports why it does not parse.
pub fn extract_call<'r>(reply: &'r str, function: RegisteredFunction) -> Option<&'r str> {
    if !reply.contains(function.name()) {
        return None;
    }
    Some(locate_call(reply, function.name()).unwrap_or_else(|| reply.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ReviewStore {
        ReviewStore::from_text("Foo. Boa comida.\nFoo. Atendimento ruim.\nBar. Nada demais.")
    }

    #[test]
    fn test_fetch_by_keyword() {
        let store = store();
        let output = CallEvaluator::new(&store)
            .evaluate("fetch_restaurant_data(restaurant_name='Foo')")
            .unwrap();

        let CallOutput::Reviews(set) = output else {
            panic!("expected reviews");
        };
        assert_eq!(set.restaurant_name, "Foo");
        assert_eq!(set.reviews, vec!["Boa comida.", "Atendimento ruim."]);
    }

    #[test]
    fn test_score_renders_three_decimals() {
        let store = store();
        let output = CallEvaluator::new(&store)
            .evaluate("calculate_overall_score(restaurant_name=\"Applebee's\", food_scores=[1, 2, 3, 4, 5], customer_service_scores=[1, 2, 3, 4, 5])")
            .unwrap();
        assert_eq!(output.to_string(), r"{'Applebee\'s': 5.045}");
    }

    #[test]
    fn test_rejects_attribute_call() {
        let store = store();
        let err = CallEvaluator::new(&store)
            .evaluate("os.system('rm -rf /')")
            .unwrap_err();
        assert!(matches!(err, CallError::Parse { .. }));
    }

    #[test]
    fn test_rejects_unknown_function() {
        let store = store();
        let err = CallEvaluator::new(&store)
            .evaluate("system('rm -rf /')")
            .unwrap_err();
        assert_eq!(err, CallError::UnknownFunction("system".into()));
    }

    #[test]
    fn test_rejects_before_binding_when_unparseable() {
        let store = store();
        let evaluator = CallEvaluator::new(&store);
        assert!(matches!(
            evaluator.evaluate("fetch_restaurant_data(restaurant_name=__import__('os'))"),
            Err(CallError::Parse { .. })
        ));
        assert!(matches!(
            evaluator.evaluate("fetch_restaurant_data(restaurant_name='Foo') + 1"),
            Err(CallError::Parse { .. })
        ));
    }

    #[test]
    fn test_evaluate_as_refuses_other_function() {
        let store = store();
        let err = CallEvaluator::new(&store)
            .evaluate_as(
                "calculate_overall_score('fetch_restaurant_data', [1], [1])",
                RegisteredFunction::FetchRestaurantData,
            )
            .unwrap_err();
        assert_eq!(
            err,
            CallError::UnexpectedFunction {
                expected: "fetch_restaurant_data",
                found: "calculate_overall_score".into(),
            }
        );
    }

    #[test]
    fn test_extract_call() {
        let fetch = RegisteredFunction::FetchRestaurantData;
        assert_eq!(extract_call("Não sei.", fetch), None);
        assert_eq!(
            extract_call("Sugestão: fetch_restaurant_data(restaurant_name='Foo').", fetch),
            Some("fetch_restaurant_data(restaurant_name='Foo')")
        );
        assert_eq!(
            extract_call("  fetch_restaurant_data(restaurant_name='Foo'  ", fetch),
            Some("fetch_restaurant_data(restaurant_name='Foo'")
        );
    }
}
