pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("async result already consumed")]
    AlreadyConsumed,

    #[error("config error: {0}")]
    Config(String),

    #[error("pool error: {0}")]
    Pool(String),

    #[cfg(feature = "telemetry")]
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn pool<S: Into<String>>(msg: S) -> Self {
        Error::Pool(msg.into())
    }

    #[cfg(feature = "telemetry")]
    pub fn telemetry<S: Into<String>>(msg: S) -> Self {
        Error::Telemetry(msg.into())
    }
}
