use crate::color::{Color, SvgColor};
use crate::error::FigureError;
use crate::track::Lane;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::sync::{OnceLock, Weak};
use svg::node::element::{Group, Line, Polygon, Rectangle, Text};

/// Horizontal overflow of a direction arrowhead, in sequence
/// coordinates before scaling.
pub const ARROWHEAD: f32 = 5.0;

const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Reading direction of a segment. Directed segments are drawn as
/// chevron polygons instead of plain rectangles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
    Both,
}

#[derive(Debug)]
enum ElementKind {
    Segment {
        direction: Option<Direction>,
    },
    Tick,
    Label {
        text: String,
        font_size: f32,
    },
    Coverage {
        samples: Vec<f32>,
        height: f32,
        opacity: f32,
    },
}

/// An element occupying the span `[start, end)` on a track.
///
/// Elements own their child elements; children share the parent's
/// coordinate space (they are not re-based) and draw on top of it.
/// The handle to the enclosing track's lane is set once at attach
/// time and only ever used to look up the lane height.
#[derive(Debug)]
pub struct TrackElement {
    start: f32,
    end: f32,
    color: Color,
    kind: ElementKind,
    children: Vec<TrackElement>,
    lane: OnceLock<Weak<Lane>>,
}

impl TrackElement {
    fn new(start: f32, end: f32, color: Color, kind: ElementKind) -> Self {
        Self {
            start,
            end,
            color,
            kind,
            children: vec![],
            lane: OnceLock::new(),
        }
    }

    /// A filled interval of the sequence, spanning the full lane
    /// height.
    pub fn segment(start: f32, end: f32) -> Result<Self, FigureError> {
        if start > end {
            return Err(FigureError::InvalidInterval { start, end });
        }
        Ok(Self::new(
            start,
            end,
            SvgColor::Lightgrey.into(),
            ElementKind::Segment { direction: None },
        ))
    }

    /// A vertical mark at one position, spanning the full lane height.
    pub fn tick(at: f32) -> Self {
        Self::new(at, at, SvgColor::Red.into(), ElementKind::Tick)
    }

    /// A text label, centered on the midpoint of its parent's interval
    /// and vertically centered in the lane.
    pub fn label(at: f32, text: &str) -> Self {
        Self::new(
            at,
            at,
            SvgColor::Black.into(),
            ElementKind::Label {
                text: text.to_string(),
                font_size: DEFAULT_FONT_SIZE,
            },
        )
    }

    /// A per-base histogram, one bar per sample, rescaled so the
    /// largest sample maps to `height`.
    pub fn coverage(start: f32, samples: Vec<f32>, height: f32) -> Result<Self, FigureError> {
        if samples.is_empty() {
            return Err(FigureError::EmptyCoverage);
        }
        let max = samples.iter().fold(0.0_f32, |m, v| m.max(*v));
        if max <= 0.0 {
            return Err(FigureError::FlatCoverage);
        }
        let end = start + samples.len() as f32;
        Ok(Self::new(
            start,
            end,
            SvgColor::Blue.into(),
            ElementKind::Coverage {
                samples,
                height,
                opacity: 1.0,
            },
        ))
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the reading direction. Only meaningful for segments.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        if let ElementKind::Segment { direction: d } = &mut self.kind {
            *d = Some(direction);
        }
        self
    }

    /// Sets the font size. Only meaningful for labels.
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        if let ElementKind::Label { font_size: f, .. } = &mut self.kind {
            *f = font_size;
        }
        self
    }

    /// Sets the fill opacity. Only meaningful for coverage elements.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        if let ElementKind::Coverage { opacity: o, .. } = &mut self.kind {
            *o = opacity;
        }
        self
    }

    /// Appends a child element. If the receiver is already attached to
    /// a track, the child subtree adopts the same lane.
    pub fn add(mut self, child: TrackElement) -> Self {
        if let Some(lane) = self.lane.get() {
            child.adopt_lane(lane);
        }
        self.children.push(child);
        self
    }

    /// Records the enclosing lane on this element and every descendant
    /// that does not have one yet. A lane, once set, stays set for the
    /// element's lifetime.
    pub(crate) fn adopt_lane(&self, lane: &Weak<Lane>) {
        let _ = self.lane.set(lane.clone());
        for child in &self.children {
            child.adopt_lane(lane);
        }
    }

    #[inline(always)]
    pub fn start(&self) -> f32 {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> f32 {
        self.end
    }

    #[inline(always)]
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Maximum horizontal extent over this element and its
    /// descendants. A forward (or bidirectional) segment extends
    /// `ARROWHEAD` units beyond its end; reverse overflow to the left
    /// of the start does not count toward the width.
    pub fn width(&self) -> f32 {
        let own = match &self.kind {
            ElementKind::Segment {
                direction: Some(Direction::Forward | Direction::Both),
            } => self.end + ARROWHEAD,
            _ => self.end,
        };
        self.children.iter().map(TrackElement::width).fold(own, f32::max)
    }

    pub(crate) fn min_start(&self) -> f32 {
        self.children
            .iter()
            .map(TrackElement::min_start)
            .fold(self.start, f32::min)
    }

    pub(crate) fn max_end(&self) -> f32 {
        self.children
            .iter()
            .map(TrackElement::max_end)
            .fold(self.end, f32::max)
    }

    fn lane_height(&self) -> Result<f32, FigureError> {
        self.lane
            .get()
            .and_then(Weak::upgrade)
            .map(|lane| lane.height())
            .ok_or(FigureError::DetachedElement)
    }

    /// Renders this element and its children into a group translated
    /// to `(x * xscale, y)`. Children render at the group origin: they
    /// composite on top of the parent, they are not offset by it.
    pub fn render(&self, x: f32, y: f32, xscale: f32) -> Result<Group, FigureError> {
        self.render_within(None, x, y, xscale)
    }

    fn render_within(
        &self,
        parent: Option<(f32, f32)>,
        x: f32,
        y: f32,
        xscale: f32,
    ) -> Result<Group, FigureError> {
        let mut group = Group::new().set("transform", format!("translate({} {})", x * xscale, y));
        group = self.draw_self(group, parent, xscale)?;
        for child in &self.children {
            group = group.add(child.render_within(Some((self.start, self.end)), 0.0, 0.0, xscale)?);
        }
        Ok(group)
    }

    fn draw_self(
        &self,
        mut group: Group,
        parent: Option<(f32, f32)>,
        xscale: f32,
    ) -> Result<Group, FigureError> {
        match &self.kind {
            ElementKind::Segment { direction } => {
                let height = self.lane_height()?;
                let a = self.start * xscale;
                let b = self.end * xscale;
                match direction {
                    None => {
                        group = group.add(
                            Rectangle::new()
                                .set("x", a)
                                .set("y", 0)
                                .set("width", b - a)
                                .set("height", height)
                                .set("fill", self.color.to_string())
                                .set("stroke", self.color.to_string()),
                        );
                    }
                    Some(direction) => {
                        group = group.add(
                            Polygon::new()
                                .set("points", self.chevron_points(*direction, height, xscale))
                                .set("fill", self.color.to_string())
                                .set("stroke", self.color.to_string()),
                        );
                    }
                }
            }
            ElementKind::Tick => {
                let height = self.lane_height()?;
                let x = self.start * xscale;
                group = group.add(
                    Line::new()
                        .set("x1", x)
                        .set("y1", 0)
                        .set("x2", x)
                        .set("y2", height)
                        .set("stroke", self.color.to_string())
                        .set("stroke-width", 1),
                );
            }
            ElementKind::Label { text, font_size } => {
                let height = self.lane_height()?;
                let (span_start, span_end) = parent.unwrap_or((self.start, self.end));
                group = group.add(
                    Text::new(escape_text(text))
                        .set("x", (span_start + span_end) / 2.0 * xscale)
                        .set("y", height / 2.0)
                        .set("text-anchor", "middle")
                        .set("dominant-baseline", "middle")
                        .set("font-family", "monospace")
                        .set("font-size", *font_size)
                        .set("fill", self.color.to_string()),
                );
            }
            ElementKind::Coverage {
                samples,
                height,
                opacity,
            } => {
                let max = samples.iter().fold(0.0_f32, |m, v| m.max(*v));
                let yscale = height / max;
                for (i, value) in samples.iter().enumerate() {
                    let bar = value.max(0.0) * yscale;
                    group = group.add(
                        Rectangle::new()
                            .set("x", (self.start + i as f32) * xscale)
                            .set("y", height - bar)
                            .set("width", xscale)
                            .set("height", bar)
                            .set("fill", self.color.to_string())
                            .set("fill-opacity", *opacity),
                    );
                }
            }
        }
        Ok(group)
    }

    fn chevron_points(&self, direction: Direction, height: f32, xscale: f32) -> String {
        let a = self.start * xscale;
        let b = self.end * xscale;
        let mid = height / 2.0;
        let forward_tip = (self.end + ARROWHEAD) * xscale;
        let reverse_tip = (self.start - ARROWHEAD) * xscale;
        let points = match direction {
            Direction::Forward => vec![
                (a, 0.0),
                (b, 0.0),
                (forward_tip, mid),
                (b, height),
                (a, height),
            ],
            Direction::Reverse => vec![
                (b, 0.0),
                (a, 0.0),
                (reverse_tip, mid),
                (a, height),
                (b, height),
            ],
            Direction::Both => vec![
                (a, 0.0),
                (b, 0.0),
                (forward_tip, mid),
                (b, height),
                (a, height),
                (reverse_tip, mid),
            ],
        };
        points
            .iter()
            .map(|(px, py)| format!("{px},{py}"))
            .join(" ")
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    #[test]
    fn test_invalid_interval() {
        assert_eq!(
            TrackElement::segment(300.0, 50.0).unwrap_err(),
            FigureError::InvalidInterval {
                start: 300.0,
                end: 50.0
            }
        );
    }

    #[test]
    fn test_segment_width() {
        let plain = TrackElement::segment(50.0, 300.0).unwrap();
        assert_eq!(plain.width(), 300.0);

        let forward = TrackElement::segment(50.0, 300.0)
            .unwrap()
            .with_direction(Direction::Forward);
        assert_eq!(forward.width(), 305.0);

        let reverse = TrackElement::segment(50.0, 300.0)
            .unwrap()
            .with_direction(Direction::Reverse);
        assert_eq!(reverse.width(), 300.0);
    }

    #[test]
    fn test_child_extends_width() {
        let segment = TrackElement::segment(0.0, 100.0)
            .unwrap()
            .add(TrackElement::tick(150.0));
        assert_eq!(segment.width(), 150.0);
    }

    #[test]
    fn test_detached_tick_has_no_height() {
        let tick = TrackElement::tick(10.0);
        assert_eq!(
            tick.render(0.0, 0.0, 1.0).unwrap_err(),
            FigureError::DetachedElement
        );
    }

    #[test]
    fn test_coverage_rejects_degenerate_samples() {
        assert_eq!(
            TrackElement::coverage(0.0, vec![], 10.0).unwrap_err(),
            FigureError::EmptyCoverage
        );
        assert_eq!(
            TrackElement::coverage(0.0, vec![0.0, 0.0], 10.0).unwrap_err(),
            FigureError::FlatCoverage
        );
    }

    #[test]
    fn test_forward_chevron_tip() {
        let track = Track::new().add(
            TrackElement::segment(0.0, 100.0)
                .unwrap()
                .with_direction(Direction::Forward),
        );
        let markup = track.render(0.0, 0.0, 1.0).unwrap().to_string();
        assert!(markup.contains("105,5"));
    }

    #[test]
    fn test_label_is_escaped() {
        let track = Track::new().add(
            TrackElement::segment(0.0, 100.0)
                .unwrap()
                .add(TrackElement::label(0.0, "<gag> & friends")),
        );
        let markup = track.render(0.0, 0.0, 1.0).unwrap().to_string();
        assert!(markup.contains("&lt;gag&gt; &amp; friends"));
    }
}
