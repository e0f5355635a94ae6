use crate::color::{Color, SvgColor};
use crate::error::FigureError;
use std::f32::consts::{FRAC_PI_2, PI};
use svg::Document;
use svg::node::element::{Circle, Path};

/// Arcs are laid out on a circle of radius 0.5 centered in a
/// 1.4 x 1.4 unit viewBox; the document render size maps the unit
/// frame to pixels.
const RADIUS: f32 = 0.5;
const VIEWBOX: &str = "-0.7 -0.7 1.4 1.4";
const DEFAULT_RENDER_SIZE: f32 = 400.0;

fn pos2xy(pos: f32, circumference: f32, radius: f32) -> (f32, f32) {
    // Position 0 sits at the top of the circle, angles grow clockwise.
    let angle = 2.0 * PI * (pos / circumference) - FRAC_PI_2;
    (radius * angle.cos(), radius * angle.sin())
}

fn arc_path(from: f32, to: f32, circumference: f32, radius: f32) -> String {
    let delta = if to >= from {
        to - from
    } else {
        (circumference - from) + to
    };
    let large_arc = if delta > circumference / 2.0 { 1 } else { 0 };
    let (x1, y1) = pos2xy(from, circumference, radius);
    let (x2, y2) = pos2xy(to, circumference, radius);
    format!("M {x1:.4} {y1:.4} A {radius:.4} {radius:.4} 0 {large_arc} 1 {x2:.4} {y2:.4}")
}

/// An arc of a circular sequence. `end < start` wraps through the
/// origin.
#[derive(Debug)]
pub struct Region {
    start: f32,
    end: f32,
    color: Color,
}

impl Region {
    pub fn new(start: f32, end: f32) -> Self {
        Self {
            start,
            end,
            color: SvgColor::Lightgrey.into(),
        }
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Renders the arc for a sequence of the given total length.
    pub fn render(&self, circumference: f32) -> Result<Path, FigureError> {
        if circumference <= 0.0 {
            return Err(FigureError::ZeroCircumference);
        }
        Ok(Path::new()
            .set("d", arc_path(self.start, self.end, circumference, RADIUS))
            .set("fill", "none")
            .set("stroke", self.color.to_string())
            .set("stroke-width", 0.04))
    }
}

/// A circular sequence map: a backbone circle with region arcs at
/// angular positions derived from fractional sequence position.
#[derive(Debug)]
pub struct Plasmid {
    length: f32,
    regions: Vec<Region>,
    size: f32,
    color: Color,
}

impl Plasmid {
    pub fn new(length: f32) -> Result<Self, FigureError> {
        if length <= 0.0 {
            return Err(FigureError::ZeroCircumference);
        }
        Ok(Self {
            length,
            regions: vec![],
            size: DEFAULT_RENDER_SIZE,
            color: SvgColor::Lightgrey.into(),
        })
    }

    pub fn add_region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    pub fn with_render_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn show(&self) -> Result<Document, FigureError> {
        let mut document = Document::new()
            .set("viewBox", VIEWBOX)
            .set("width", self.size)
            .set("height", self.size)
            .add(
                Circle::new()
                    .set("cx", 0)
                    .set("cy", 0)
                    .set("r", RADIUS)
                    .set("fill", "none")
                    .set("stroke", self.color.to_string())
                    .set("stroke-width", 0.005),
            );
        for region in &self.regions {
            document = document.add(region.render(self.length)?);
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_circumference_rejected() {
        assert_eq!(
            Plasmid::new(0.0).unwrap_err(),
            FigureError::ZeroCircumference
        );
        assert_eq!(
            Region::new(0.0, 10.0).render(0.0).unwrap_err(),
            FigureError::ZeroCircumference
        );
    }

    #[test]
    fn test_large_arc_flag() {
        assert!(arc_path(0.0, 270.0, 360.0, RADIUS).contains(" 0 1 1 "));
        assert!(arc_path(0.0, 90.0, 360.0, RADIUS).contains(" 0 0 1 "));
        // A wrapping region spans 60 units, not 300.
        assert!(arc_path(320.0, 20.0, 360.0, RADIUS).contains(" 0 0 1 "));
    }

    #[test]
    fn test_quarter_turn_endpoints() {
        let (x, y) = pos2xy(90.0, 360.0, RADIUS);
        // A quarter of the way around lands on the positive x axis.
        assert!((x - RADIUS).abs() < 1e-4);
        assert!(y.abs() < 1e-4);
    }

    #[test]
    fn test_show_draws_backbone_and_regions() {
        let plasmid = Plasmid::new(360.0)
            .unwrap()
            .add_region(Region::new(110.0, 280.0).with_color(SvgColor::Salmon))
            .add_region(Region::new(320.0, 20.0).with_color(SvgColor::Lightblue));
        let markup = plasmid.show().unwrap().to_string();
        assert!(markup.contains(r#"viewBox="-0.7 -0.7 1.4 1.4""#));
        assert!(markup.contains(r#"r="0.5""#));
        assert!(markup.contains("salmon"));
        assert_eq!(markup.matches("<path").count(), 2);
    }
}
