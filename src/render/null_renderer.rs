use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{ChartSpec, SeriesData, StyleOptions};
use crate::error::{ChartError, ChartResult};
use crate::render::{ChartBackend, LiveChart};

/// 1x1 transparent PNG returned by headless rasterization.
pub const BLANK_PNG: [u8; 67] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Where a `NullBackend` should fail, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NullFailure {
    #[default]
    Never,
    Construct(String),
    Paint(String),
    Update(String),
}

/// Everything the headless backend observed, shared with its live charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullBackendLog {
    pub constructed: usize,
    pub paints: usize,
    pub destroyed: usize,
    pub last_series: Option<SeriesData>,
    pub last_style: Option<StyleOptions>,
    pub hidden_series: Vec<String>,
    pub zoom: Option<(f64, f64)>,
}

/// Headless primary renderer used by tests and server-side hosts.
///
/// It performs no drawing but validates inputs the way a real library
/// would reject them, and records every call in a shared log.
#[derive(Debug, Default)]
pub struct NullBackend {
    failure: NullFailure,
    log: Rc<RefCell<NullBackendLog>>,
}

impl NullBackend {
    #[must_use]
    pub fn failing(failure: NullFailure) -> Self {
        Self {
            failure,
            log: Rc::default(),
        }
    }

    #[must_use]
    pub fn log(&self) -> NullBackendLog {
        self.log.borrow().clone()
    }
}

impl ChartBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn create(
        &self,
        spec: &ChartSpec,
        series: &SeriesData,
        _categories: Option<&[String]>,
    ) -> ChartResult<Box<dyn LiveChart>> {
        if let NullFailure::Construct(message) = &self.failure {
            return Err(ChartError::RendererFailed(message.clone()));
        }
        if spec.height == 0 {
            return Err(ChartError::RendererFailed(
                "chart height must be > 0".to_owned(),
            ));
        }
        {
            let mut log = self.log.borrow_mut();
            log.constructed += 1;
            log.last_series = Some(series.clone());
            log.last_style = Some(spec.style_options.clone());
        }
        Ok(Box::new(NullChart {
            failure: self.failure.clone(),
            log: Rc::clone(&self.log),
        }))
    }
}

#[derive(Debug)]
pub struct NullChart {
    failure: NullFailure,
    log: Rc<RefCell<NullBackendLog>>,
}

impl LiveChart for NullChart {
    fn render(&mut self) -> ChartResult<()> {
        if let NullFailure::Paint(message) = &self.failure {
            return Err(ChartError::RendererFailed(message.clone()));
        }
        self.log.borrow_mut().paints += 1;
        Ok(())
    }

    fn update_series(
        &mut self,
        series: &SeriesData,
        _categories: Option<&[String]>,
    ) -> ChartResult<()> {
        if let NullFailure::Update(message) = &self.failure {
            return Err(ChartError::RendererFailed(message.clone()));
        }
        self.log.borrow_mut().last_series = Some(series.clone());
        Ok(())
    }

    fn update_options(&mut self, style: &StyleOptions) -> ChartResult<()> {
        if let NullFailure::Update(message) = &self.failure {
            return Err(ChartError::RendererFailed(message.clone()));
        }
        self.log.borrow_mut().last_style = Some(style.clone());
        Ok(())
    }

    fn toggle_series(&mut self, series_name: &str) -> ChartResult<()> {
        let mut log = self.log.borrow_mut();
        if let Some(position) = log.hidden_series.iter().position(|name| name == series_name) {
            log.hidden_series.remove(position);
        } else {
            log.hidden_series.push(series_name.to_owned());
        }
        Ok(())
    }

    fn zoom(&mut self, start: f64, end: f64) -> ChartResult<()> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(ChartError::InvalidData(
                "zoom range must be finite with start < end".to_owned(),
            ));
        }
        self.log.borrow_mut().zoom = Some((start, end));
        Ok(())
    }

    fn rasterize_png(&self) -> ChartResult<Vec<u8>> {
        Ok(BLANK_PNG.to_vec())
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().destroyed += 1;
    }
}
