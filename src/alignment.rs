use crate::color::{Color, SvgColor};
use crate::error::FigureError;
use crate::track::Track;
use svg::node::element::{Group, Line};

pub const DEFAULT_ALIGNMENT_GAP: f32 = 30.0;

/// Two tracks linked by connector ribbons.
///
/// The alignment owns its tracks, so every element's lane handle
/// stays live; connector coordinates are looked up against the same
/// lanes the tracks render with. Each connection `(x1, x2)` becomes
/// three line segments: a stub through the upper track at `x1`, a
/// diagonal across the gap, and a stub through the lower track at
/// `x2`.
#[derive(Debug)]
pub struct Alignment {
    track1: Track,
    track2: Track,
    connections: Vec<(f32, f32)>,
    gap: f32,
    color: Color,
}

impl Alignment {
    pub fn new(track1: Track, track2: Track, connections: Vec<(f32, f32)>) -> Self {
        Self {
            track1,
            track2,
            connections,
            gap: DEFAULT_ALIGNMENT_GAP,
            color: SvgColor::Black.into(),
        }
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn height(&self) -> f32 {
        self.track1.height() + self.track2.height() + self.gap
    }

    pub fn width(&self) -> f32 {
        self.track1.width().max(self.track2.width())
    }

    /// Renders both tracks and the connector ribbons. One `xscale`
    /// applies to the connector endpoints and to both sub-renders;
    /// anything else detaches the ribbons from their tracks.
    pub fn render(&self, x: f32, y: f32, xscale: f32) -> Result<Group, FigureError> {
        let h1 = self.track1.height();
        let h2 = self.track2.height();
        let mut group = Group::new().set("transform", format!("translate({} {})", x * xscale, y));
        group = group.add(self.track1.render(0.0, 0.0, xscale)?);
        group = group.add(self.track2.render(0.0, h1 + self.gap, xscale)?);

        for (upper, lower) in &self.connections {
            let x1 = upper * xscale;
            let x2 = lower * xscale;
            group = group
                .add(
                    Line::new()
                        .set("x1", x1)
                        .set("y1", 0)
                        .set("x2", x1)
                        .set("y2", h1)
                        .set("stroke", self.color.to_string())
                        .set("stroke-width", 1),
                )
                .add(
                    Line::new()
                        .set("x1", x1)
                        .set("y1", h1)
                        .set("x2", x2)
                        .set("y2", h1 + self.gap)
                        .set("stroke", self.color.to_string())
                        .set("stroke-width", 1),
                )
                .add(
                    Line::new()
                        .set("x1", x2)
                        .set("y1", h1 + self.gap)
                        .set("x2", x2)
                        .set("y2", h1 + self.gap + h2)
                        .set("stroke", self.color.to_string())
                        .set("stroke-width", 1),
                );
        }
        Ok(group)
    }
}
