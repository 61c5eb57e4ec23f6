use crate::rules::RuleParamError;
use crate::template::{LexingError, UnexpectedTokenError};

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Lexing(#[from] LexingError),

    #[error(transparent)]
    UnexpectedToken(#[from] UnexpectedTokenError),

    #[error("invalid syntax tree: {0}")]
    InvalidAst(String),

    #[error("segment pattern {pattern:?} does not compile: {source}")]
    SegmentPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown rule {0:?}")]
    UnknownRule(String),

    #[error("invalid parameters for rule {rule:?}: {source}")]
    InvalidRuleParameters {
        rule: String,
        #[source]
        source: RuleParamError,
    },

    #[error("template {template:?}: {source}")]
    Template {
        template: String,
        #[source]
        source: Box<RouterError>,
    },

    #[error("template expands to more than {max} alternatives")]
    TooManyAlternatives { max: usize },

    #[error("template has more than {max} segments")]
    TooManySegments { max: usize },

    #[error("route name {0:?} is already taken")]
    DuplicateRouteName(String),

    #[error("no route named {0:?}")]
    UnknownRoute(String),

    #[error("route {route:?} requires variable {variable:?}")]
    MissingVariable { route: String, variable: String },
}

impl RouterError {
    pub(crate) fn in_template(self, template: &str) -> Self {
        match self {
            e @ Self::Template { .. } => e,
            e => Self::Template {
                template: template.to_owned(),
                source: Box::new(e),
            },
        }
    }
}
