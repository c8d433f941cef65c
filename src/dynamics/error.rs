use thiserror::Error;

/// Failures inside the prediction engine.
///
/// None of these reach `predict` callers: coordinate errors are replaced by the
/// reference centre and the others switch the predictor to the heuristic path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Coordinate parse error: {input:?} is not a \"lat,lon\" pair")]
    CoordinateParse { input: String },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Response shape error: {0}")]
    ResponseShape(String),

    #[error("Reasoning service reported zero monthly revenue")]
    ZeroRevenue,
}

impl PredictionError {
    pub fn coordinate_parse<S: Into<String>>(input: S) -> Self {
        Self::CoordinateParse {
            input: input.into(),
        }
    }

    pub fn external<S: Into<String>>(message: S) -> Self {
        Self::ExternalService(message.into())
    }

    pub fn shape<S: Into<String>>(message: S) -> Self {
        Self::ResponseShape(message.into())
    }
}

impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PredictionError::ResponseShape(err.to_string())
        } else {
            PredictionError::ExternalService(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PredictionError {
    fn from(err: serde_json::Error) -> Self {
        PredictionError::ResponseShape(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PredictionError>;
