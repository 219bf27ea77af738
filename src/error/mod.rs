use thiserror::Error;

/// Top-level errors for the carneades crate
#[derive(Debug, Error)]
pub enum CaesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),
}

/// Case-file and parameter validation errors, raised eagerly at build time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("weight for '{arg_id}' ({weight}) is not in [0, 1]")]
    WeightOutOfRange { arg_id: String, weight: f64 },

    #[error("{name} must be within [0, 1], {value} given")]
    ThresholdOutOfRange { name: String, value: f64 },

    #[error("'{name}' is not a valid proof standard")]
    UnknownStandard { name: String },

    #[error("proposition '{name}' is referenced but never declared")]
    UndeclaredProposition { name: String },

    #[error("proposition '{name}' must be declared without a polarity prefix")]
    InvalidPropositionName { name: String },

    #[error("argument id '{arg_id}' is declared more than once")]
    DuplicateArgumentId { arg_id: String },

    #[error("failed to read case file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed case file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Argument graph errors
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("proposition '{proposition}' is not in the graph")]
    PropositionNotFound { proposition: String },

    #[error("argument '{arg_id}' is already in the graph")]
    DuplicateArgument { arg_id: String },
}

/// Acceptability evaluation errors
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no weight assigned to argument '{arg_id}'")]
    MissingWeight { arg_id: String },

    #[error("support cycle detected while evaluating '{proposition}'")]
    CycleDetected { proposition: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Dialogue engine errors
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type alias for top-level operations
pub type CaesResult<T> = Result<T, CaesError>;

/// Result type alias for case-file loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for argument graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for acceptability evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Result type alias for dialogue runs
pub type DialogueResult<T> = Result<T, DialogueError>;
