use std::fmt;

use brickdat_scene::Point3;

/// The "current colour" placeholder used for filled primitives.
pub const MAIN_COLOR: u32 = 16;
/// The "edge colour" placeholder used for every line primitive.
pub const EDGE_COLOR: u32 = 24;

/// One line of an LDraw file. Geometric variants hold points already in LDU.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Comment(String),
    Line([Point3; 2]),
    Triangle([Point3; 3]),
    Quad([Point3; 4]),
    OptionalLine {
        line: [Point3; 2],
        controls: [Point3; 2],
    },
}

impl Primitive {
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    pub fn line_type(&self) -> u8 {
        match self {
            Self::Comment(_) => 0,
            Self::Line(_) => 2,
            Self::Triangle(_) => 3,
            Self::Quad(_) => 4,
            Self::OptionalLine { .. } => 5,
        }
    }

    pub fn color(&self) -> Option<u32> {
        match self {
            Self::Comment(_) => None,
            Self::Triangle(_) | Self::Quad(_) => Some(MAIN_COLOR),
            Self::Line(_) | Self::OptionalLine { .. } => Some(EDGE_COLOR),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Every referenced point in output order, control points last.
    pub fn points(&self) -> Vec<Point3> {
        match self {
            Self::Comment(_) => Vec::new(),
            Self::Line(points) => points.to_vec(),
            Self::Triangle(points) => points.to_vec(),
            Self::Quad(points) => points.to_vec(),
            Self::OptionalLine { line, controls } => line.iter().chain(controls).copied().collect(),
        }
    }

    pub fn coordinates(&self) -> Vec<f64> {
        self.points().iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::Comment(text) = self {
            return write!(f, "0 // {text}");
        }

        write!(f, "{}", self.line_type())?;
        if let Some(color) = self.color() {
            write!(f, " {color}")?;
        }
        for value in self.coordinates() {
            write!(f, " {value:8.4}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_fixed_width() {
        let line = Primitive::Line([Point3::new(20.0, -1.5, 0.0), Point3::new(123.456789, 0.0, 1000.0)]);
        assert_eq!(
            line.to_string(),
            "2 24  20.0000  -1.5000   0.0000 123.4568   0.0000 1000.0000"
        );
    }

    #[test]
    fn comment_has_no_coordinates() {
        let comment = Primitive::comment("Faces");
        assert_eq!(comment.to_string(), "0 // Faces");
        assert!(comment.coordinates().is_empty());
        assert_eq!(comment.line_type(), 0);
    }

    #[test]
    fn optional_line_lists_controls_last() {
        let p = |v: f64| Point3::new(v, v, v);
        let primitive = Primitive::OptionalLine {
            line: [p(1.0), p(2.0)],
            controls: [p(3.0), p(4.0)],
        };
        assert_eq!(primitive.coordinates().len(), 12);
        assert_eq!(primitive.coordinates()[9..], [4.0, 4.0, 4.0]);
        assert!(primitive.to_string().starts_with("5 24 "));
    }
}
