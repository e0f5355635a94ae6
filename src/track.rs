use crate::element::TrackElement;
use crate::error::FigureError;
use std::sync::Arc;
use svg::node::element::Group;

pub const DEFAULT_TRACK_HEIGHT: f32 = 10.0;

/// The single authoritative record of a lane's height. Every element
/// in the lane holds a weak handle to this and queries it at render
/// time; no element carries its own copy.
#[derive(Debug)]
pub(crate) struct Lane {
    height: f32,
}

impl Lane {
    #[inline(always)]
    pub(crate) fn height(&self) -> f32 {
        self.height
    }
}

/// A horizontal lane of elements sharing one fixed height.
///
/// The height is fixed at construction and never derived from
/// children; the width is the maximum horizontal extent over all
/// descendants.
#[derive(Debug)]
pub struct Track {
    lane: Arc<Lane>,
    elements: Vec<TrackElement>,
}

impl Track {
    pub fn new() -> Self {
        Self::with_height(DEFAULT_TRACK_HEIGHT)
    }

    pub fn with_height(height: f32) -> Self {
        Self {
            lane: Arc::new(Lane { height }),
            elements: vec![],
        }
    }

    /// Appends an element; the element and all its descendants adopt
    /// this track's lane.
    pub fn add(mut self, element: TrackElement) -> Self {
        element.adopt_lane(&Arc::downgrade(&self.lane));
        self.elements.push(element);
        self
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.lane.height
    }

    /// Maximum horizontal extent over all descendants, including
    /// forward arrowhead overflow.
    pub fn width(&self) -> f32 {
        self.elements
            .iter()
            .map(TrackElement::width)
            .fold(0.0, f32::max)
    }

    /// Minimum element start, 0 for an empty track.
    pub fn start(&self) -> f32 {
        let min = self
            .elements
            .iter()
            .map(TrackElement::min_start)
            .fold(f32::INFINITY, f32::min);
        if min.is_finite() { min } else { 0.0 }
    }

    /// Maximum interval end over all descendants, without arrowhead
    /// overflow.
    pub fn end(&self) -> f32 {
        self.elements
            .iter()
            .map(TrackElement::max_end)
            .fold(0.0, f32::max)
    }

    /// Renders all elements into one group translated to
    /// `(x * xscale, y)`. The translation is supplied exactly once by
    /// the enclosing container.
    pub fn render(&self, x: f32, y: f32, xscale: f32) -> Result<Group, FigureError> {
        let mut group = Group::new().set("transform", format!("translate({} {})", x * xscale, y));
        for element in &self.elements {
            group = group.add(element.render(0.0, 0.0, xscale)?);
        }
        Ok(group)
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Direction;

    #[test]
    fn test_width_over_descendants() {
        let track = Track::new()
            .add(
                TrackElement::segment(50.0, 300.0)
                    .unwrap()
                    .add(TrackElement::tick(350.0)),
            )
            .add(TrackElement::segment(100.0, 200.0).unwrap());
        assert_eq!(track.width(), 350.0);
        assert_eq!(track.start(), 50.0);
        assert_eq!(track.end(), 350.0);
    }

    #[test]
    fn test_empty_track() {
        let track = Track::new();
        assert_eq!(track.width(), 0.0);
        assert_eq!(track.start(), 0.0);
        assert_eq!(track.end(), 0.0);
        assert!(track.render(0.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_lane_height_reaches_descendants() {
        let track = Track::with_height(14.0).add(
            TrackElement::segment(0.0, 100.0)
                .unwrap()
                .add(TrackElement::tick(40.0)),
        );
        let markup = track.render(0.0, 0.0, 1.0).unwrap().to_string();
        // Tick line spans the full lane height.
        assert!(markup.contains(r#"y2="14""#));
    }

    #[test]
    fn test_arrow_overflow_counts_toward_width() {
        let track = Track::new().add(
            TrackElement::segment(100.0, 360.0)
                .unwrap()
                .with_direction(Direction::Forward),
        );
        assert_eq!(track.width(), 365.0);
        assert_eq!(track.end(), 360.0);
    }
}
