//! Display driver capability interface.
//!
//! The orchestration code only ever talks to [`EpdDriver`] and
//! [`DriverFactory`]; concrete hardware backends live behind them.

pub mod buffer;
pub mod emulator;
pub mod errors;
pub mod models;
pub mod registry;

#[cfg(test)]
pub(crate) mod mock;

use image::DynamicImage;

pub use buffer::FrameBuffer;
pub use emulator::EmulatedPanel;
pub use errors::{AcquisitionError, DriverError};
pub use models::{PANELS, PanelSpec};
pub use registry::PanelRegistry;

/// Operations every e-paper driver must provide. All of them may fail.
pub trait EpdDriver: Send {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Wake the panel for a full refresh.
    fn init(&mut self) -> Result<(), DriverError>;

    /// Wake the panel for a partial refresh.
    fn init_part(&mut self) -> Result<(), DriverError>;

    /// Convert a decoded image into the panel's native buffer layout.
    fn get_buffer(&self, image: &DynamicImage) -> Result<FrameBuffer, DriverError> {
        FrameBuffer::from_image(image, self.width(), self.height())
    }

    /// Full-frame refresh.
    fn display(&mut self, buffer: &FrameBuffer) -> Result<(), DriverError>;

    /// Refresh only the given window of the panel.
    fn display_partial(
        &mut self,
        buffer: &FrameBuffer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), DriverError>;

    /// Blank the panel to white.
    fn clear(&mut self) -> Result<(), DriverError>;

    /// Put the panel into deep sleep.
    fn sleep(&mut self) -> Result<(), DriverError>;
}

/// Produces a driver handle for a model specifier such as `"epd7in5_V2"`.
pub trait DriverFactory {
    fn acquire(&self, model: &str) -> Result<Box<dyn EpdDriver>, AcquisitionError>;
}
