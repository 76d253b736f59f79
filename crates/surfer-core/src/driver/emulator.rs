//! Software panel that behaves like the controller and writes PNG snapshots.
//!
//! Enforces the same power rules as the hardware: a full refresh needs `init`,
//! a partial refresh needs `init_part`, and nothing is drawn while asleep.

use image::GrayImage;
use std::path::{Path, PathBuf};

use super::buffer::FrameBuffer;
use super::errors::DriverError;
use super::models::PanelSpec;
use super::EpdDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Power {
    Asleep,
    Full,
    Partial,
}

#[derive(Debug)]
pub struct EmulatedPanel {
    spec: PanelSpec,
    frame: GrayImage,
    power: Power,
    snapshot_path: PathBuf,
    full_refreshes: u64,
    partial_refreshes: u64,
}

impl EmulatedPanel {
    /// Create a panel that starts asleep with white contents.
    pub fn new(spec: PanelSpec, snapshot_path: PathBuf) -> Self {
        Self {
            frame: GrayImage::from_pixel(spec.width, spec.height, image::Luma([255])),
            spec,
            power: Power::Asleep,
            snapshot_path,
            full_refreshes: 0,
            partial_refreshes: 0,
        }
    }

    pub fn spec(&self) -> &PanelSpec {
        &self.spec
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Current panel contents.
    pub fn frame(&self) -> &GrayImage {
        &self.frame
    }

    pub fn is_asleep(&self) -> bool {
        self.power == Power::Asleep
    }

    pub fn full_refreshes(&self) -> u64 {
        self.full_refreshes
    }

    pub fn partial_refreshes(&self) -> u64 {
        self.partial_refreshes
    }

    fn require(&self, power: Power, required: &'static str) -> Result<(), DriverError> {
        if self.power == power {
            Ok(())
        } else {
            Err(DriverError::NotInitialized { required })
        }
    }

    fn check_buffer(&self, buffer: &FrameBuffer) -> Result<(), DriverError> {
        if buffer.width() != self.spec.width || buffer.height() != self.spec.height {
            return Err(DriverError::BufferMismatch {
                width: self.spec.width,
                height: self.spec.height,
                actual_width: buffer.width(),
                actual_height: buffer.height(),
            });
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<(), DriverError> {
        self.frame.save(&self.snapshot_path)?;
        tracing::debug!(
            event = "core.emulator.snapshot_written",
            model = self.spec.model,
            path = %self.snapshot_path.display()
        );
        Ok(())
    }
}

impl EpdDriver for EmulatedPanel {
    fn width(&self) -> u32 {
        self.spec.width
    }

    fn height(&self) -> u32 {
        self.spec.height
    }

    fn init(&mut self) -> Result<(), DriverError> {
        self.power = Power::Full;
        Ok(())
    }

    fn init_part(&mut self) -> Result<(), DriverError> {
        self.power = Power::Partial;
        Ok(())
    }

    fn display(&mut self, buffer: &FrameBuffer) -> Result<(), DriverError> {
        self.require(Power::Full, "full")?;
        self.check_buffer(buffer)?;
        self.frame = buffer.to_gray();
        self.full_refreshes += 1;
        self.snapshot()
    }

    fn display_partial(
        &mut self,
        buffer: &FrameBuffer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), DriverError> {
        self.require(Power::Partial, "partial")?;
        self.check_buffer(buffer)?;

        let in_bounds = x
            .checked_add(width)
            .is_some_and(|right| right <= self.spec.width)
            && y
                .checked_add(height)
                .is_some_and(|bottom| bottom <= self.spec.height);
        if !in_bounds {
            return Err(DriverError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }

        for py in y..y + height {
            for px in x..x + width {
                let value = if buffer.is_white(px, py) { 255 } else { 0 };
                self.frame.put_pixel(px, py, image::Luma([value]));
            }
        }
        self.partial_refreshes += 1;
        self.snapshot()
    }

    fn clear(&mut self) -> Result<(), DriverError> {
        if self.power == Power::Asleep {
            return Err(DriverError::NotInitialized { required: "clear" });
        }
        self.frame = GrayImage::from_pixel(self.spec.width, self.spec.height, image::Luma([255]));
        self.snapshot()
    }

    fn sleep(&mut self) -> Result<(), DriverError> {
        self.power = Power::Asleep;
        Ok(())
    }
}
