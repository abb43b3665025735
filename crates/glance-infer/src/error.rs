use std::fmt;

#[derive(Debug)]
pub enum ClassifyError {
    Shape(String),
    ModelLoad(String),
    Session(String),
    Unavailable(String),
    Io(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::Shape(msg) => write!(f, "shape error: {msg}"),
            ClassifyError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            ClassifyError::Session(msg) => write!(f, "session error: {msg}"),
            ClassifyError::Unavailable(msg) => write!(f, "engine unavailable: {msg}"),
            ClassifyError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for ClassifyError {}

impl From<std::io::Error> for ClassifyError {
    fn from(err: std::io::Error) -> Self {
        ClassifyError::Io(err.to_string())
    }
}

impl From<glance_base::FrameError> for ClassifyError {
    fn from(err: glance_base::FrameError) -> Self {
        ClassifyError::Shape(err.to_string())
    }
}

impl From<glance_image::ImageError> for ClassifyError {
    fn from(err: glance_image::ImageError) -> Self {
        ClassifyError::Shape(err.to_string())
    }
}
