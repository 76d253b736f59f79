#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Panel not initialised for {required} refresh")]
    NotInitialized { required: &'static str },

    #[error(
        "Image is {actual_width}x{actual_height}, panel expects {width}x{height} (or {height}x{width})"
    )]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Frame buffer is {actual_width}x{actual_height}, panel is {width}x{height}")]
    BufferMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Region {width}x{height} at ({x}, {y}) exceeds panel bounds")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("{operation} failed: {message}")]
    Operation {
        operation: &'static str,
        message: String,
    },

    #[error("Image error: {source}")]
    Image {
        #[from]
        source: image::ImageError,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("Display model '{model}' not found. Supported models: {supported}")]
    UnknownModel { model: String, supported: String },

    #[error("Cannot open display model '{model}': {source}")]
    BackendFailed {
        model: String,
        #[source]
        source: DriverError,
    },
}
