//! Recording driver for tests.

use image::{DynamicImage, GrayImage, Luma};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use super::buffer::FrameBuffer;
use super::errors::{AcquisitionError, DriverError};
use super::{DriverFactory, EpdDriver};

pub const MOCK_WIDTH: u32 = 16;
pub const MOCK_HEIGHT: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Init,
    InitPart,
    GetBuffer,
    Display,
    DisplayPartial {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    Clear,
    Sleep,
}

/// Which operations should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub init: bool,
    pub init_part: bool,
    pub get_buffer: bool,
    pub display: bool,
    pub display_partial: bool,
    pub clear: bool,
    pub sleep: bool,
}

/// Shared view into a mock driver after it has been moved into a session.
#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    calls: Arc<Mutex<Vec<Call>>>,
    failures: Arc<Mutex<Failures>>,
    interrupt: Arc<Mutex<Option<(Call, CancellationToken)>>>,
}

impl MockHandle {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail(&self, update: impl FnOnce(&mut Failures)) {
        let mut failures = self.failures.lock().unwrap();
        update(&mut *failures);
    }

    /// Cancel `token` when the driver receives `call`, as a Ctrl-C mid-draw would.
    pub fn cancel_on(&self, call: Call, token: CancellationToken) {
        *self.interrupt.lock().unwrap() = Some((call, token));
    }

    pub fn driver(&self) -> MockDriver {
        MockDriver {
            handle: self.clone(),
        }
    }
}

#[derive(Debug)]
pub struct MockDriver {
    handle: MockHandle,
}

impl MockDriver {
    fn step(
        &self,
        call: Call,
        operation: &'static str,
        fails: impl Fn(&Failures) -> bool,
    ) -> Result<(), DriverError> {
        self.handle.calls.lock().unwrap().push(call);
        if let Some((trigger, token)) = &*self.handle.interrupt.lock().unwrap()
            && *trigger == call
        {
            token.cancel();
        }
        let failures = *self.handle.failures.lock().unwrap();
        if fails(&failures) {
            return Err(DriverError::Operation {
                operation,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl EpdDriver for MockDriver {
    fn width(&self) -> u32 {
        MOCK_WIDTH
    }

    fn height(&self) -> u32 {
        MOCK_HEIGHT
    }

    fn init(&mut self) -> Result<(), DriverError> {
        self.step(Call::Init, "init", |f| f.init)
    }

    fn init_part(&mut self) -> Result<(), DriverError> {
        self.step(Call::InitPart, "init_part", |f| f.init_part)
    }

    fn get_buffer(&self, image: &DynamicImage) -> Result<FrameBuffer, DriverError> {
        self.step(Call::GetBuffer, "get_buffer", |f| f.get_buffer)?;
        FrameBuffer::from_image(image, MOCK_WIDTH, MOCK_HEIGHT)
    }

    fn display(&mut self, _buffer: &FrameBuffer) -> Result<(), DriverError> {
        self.step(Call::Display, "display", |f| f.display)
    }

    fn display_partial(
        &mut self,
        _buffer: &FrameBuffer,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<(), DriverError> {
        self.step(
            Call::DisplayPartial {
                x,
                y,
                width,
                height,
            },
            "display_partial",
            |f| f.display_partial,
        )
    }

    fn clear(&mut self) -> Result<(), DriverError> {
        self.step(Call::Clear, "clear", |f| f.clear)
    }

    fn sleep(&mut self) -> Result<(), DriverError> {
        self.step(Call::Sleep, "sleep", |f| f.sleep)
    }
}

/// Factory handing out mock drivers that share one handle.
#[derive(Debug, Clone, Default)]
pub struct MockFactory {
    pub handle: MockHandle,
    acquired: Arc<Mutex<Vec<String>>>,
}

impl MockFactory {
    pub fn acquired(&self) -> Vec<String> {
        self.acquired.lock().unwrap().clone()
    }
}

impl DriverFactory for MockFactory {
    fn acquire(&self, model: &str) -> Result<Box<dyn EpdDriver>, AcquisitionError> {
        self.acquired.lock().unwrap().push(model.to_string());
        if model != "mock" {
            return Err(AcquisitionError::UnknownModel {
                model: model.to_string(),
                supported: "mock".to_string(),
            });
        }
        Ok(Box::new(self.handle.driver()))
    }
}

/// Write a white PNG of the mock panel size.
pub fn write_image(dir: &Path, name: &str) -> PathBuf {
    write_image_sized(dir, name, MOCK_WIDTH, MOCK_HEIGHT)
}

pub fn write_image_sized(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    GrayImage::from_pixel(width, height, Luma([255]))
        .save(&path)
        .unwrap();
    path
}
