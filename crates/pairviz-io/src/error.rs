/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] pairviz_image::ImageError),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),

    /// Error to decode the PNG image.
    #[error("Failed to decode the png image. {0}")]
    PngDecodeError(String),

    /// The decoded color type cannot be converted to rgba8.
    #[error("Unsupported png color type: {0}")]
    UnsupportedColorType(String),
}

/// An error type for loading a pair dataset.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// Error when the dataset file does not exist.
    #[error("Dataset file does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to read the dataset file.
    #[error("Failed to read the dataset file. {0}")]
    Io(#[from] std::io::Error),

    /// The dataset is not a valid JSON object.
    #[error("Failed to parse the dataset. {0}")]
    Parse(#[from] serde_json::Error),

    /// The dataset root is not an object of named arrays.
    #[error("Dataset root must be an object of named arrays")]
    NotAnObject,

    /// A required array is absent.
    #[error("Dataset is missing the array `{0}`")]
    MissingArray(&'static str),

    /// An array exists but has the wrong shape or element type.
    #[error("Dataset array `{name}` has an invalid shape. {source}")]
    InvalidArray {
        /// Name of the array.
        name: &'static str,
        /// Underlying conversion error.
        source: serde_json::Error,
    },
}
