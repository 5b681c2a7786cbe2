use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One drawable shape of a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(RectPrimitive),
    Path(PathPrimitive),
    Circle(CirclePrimitive),
    Line(LinePrimitive),
}

impl Shape {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Rect(rect) => rect.validate(),
            Self::Path(path) => path.validate(),
            Self::Circle(circle) => circle.validate(),
            Self::Line(line) => line.validate(),
        }
    }
}

/// Backend-agnostic static scene.
///
/// Shapes paint in the order they were pushed, so backdrops and gridlines
/// go in first. Texts paint above every shape. `title` and `description`
/// become the accessible name of the graphic.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub title: String,
    pub description: String,
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, title: impl Into<String>) -> Self {
        Self {
            viewport,
            title: title.into(),
            description: String::new(),
            shapes: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.shapes.push(Shape::Line(line));
    }

    pub fn push_rect(&mut self, rect: RectPrimitive) {
        self.shapes.push(Shape::Rect(rect));
    }

    pub fn push_path(&mut self, path: PathPrimitive) {
        self.shapes.push(Shape::Path(path));
    }

    pub fn push_circle(&mut self, circle: CirclePrimitive) {
        self.shapes.push(Shape::Circle(circle));
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.texts.push(text);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidData(format!(
                "invalid viewport size: width={}, height={}",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.title.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "frame title must not be empty".to_owned(),
            ));
        }

        for shape in &self.shapes {
            shape.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.texts.is_empty()
    }
}
