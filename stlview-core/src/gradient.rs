/// Procedural color ramps spread across a fixed number of steps
use rand::Rng;
use std::ops::{Index, RangeInclusive};

use crate::color::{Color, ColorInterpolation};
use crate::error::GradientError;

/// Fewest anchors that still define a segment
pub const MIN_ANCHORS: usize = 2;

/// An ordered run of colors, one per gradient step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Gradient {
    colors: Vec<Color>,
}

impl Gradient {
    /// Blend between randomly drawn anchor colors over `steps` entries
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        num_anchors: usize,
        steps: usize,
    ) -> Result<Self, GradientError> {
        if num_anchors < MIN_ANCHORS {
            return Err(GradientError::TooFewAnchors(num_anchors));
        }
        let anchors: Vec<Color> = (0..num_anchors).map(|_| Color::random(rng)).collect();
        Self::from_anchors(&anchors, steps)
    }

    /// Blend between the given anchors over `steps` entries.
    ///
    /// Anchor `i` starts at `distribute(n, steps)[i]` and fades toward anchor
    /// `i + 1`. The last anchor has no successor, so its trailing segment
    /// reuses the blend from the second-to-last anchor.
    pub fn from_anchors(anchors: &[Color], steps: usize) -> Result<Self, GradientError> {
        let n = anchors.len();
        if n < MIN_ANCHORS {
            return Err(GradientError::TooFewAnchors(n));
        }

        // Ceiling spacing can overshoot `steps` for the trailing anchors
        let offsets: Vec<usize> = distribute(n, steps)
            .into_iter()
            .map(|offset| offset.min(steps))
            .collect();

        let mut colors = Vec::with_capacity(steps);
        for (i, pair) in anchors.windows(2).enumerate() {
            let len = offsets[i + 1] - offsets[i];
            push_segment(&mut colors, &ColorInterpolation::new(pair[0], pair[1]), len);
        }

        let last = n - 1;
        let tail = ColorInterpolation::new(anchors[last - 1], anchors[last]);
        push_segment(&mut colors, &tail, steps - offsets[last]);

        debug_assert_eq!(colors.len(), steps);
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }
}

impl Index<usize> for Gradient {
    type Output = Color;

    fn index(&self, step: usize) -> &Color {
        &self.colors[step]
    }
}

/// Starting step of each anchor: `ceil(steps / num_anchors) * i`
pub fn distribute(num_anchors: usize, steps: usize) -> Vec<usize> {
    if num_anchors == 0 {
        return Vec::new();
    }
    let spacing = steps.div_ceil(num_anchors);
    (0..num_anchors).map(|i| spacing * i).collect()
}

/// Pick how many anchors a fresh gradient gets
pub fn random_anchor_count<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<usize>) -> usize {
    let low = (*range.start()).max(MIN_ANCHORS);
    let high = (*range.end()).max(low);
    rng.gen_range(low..=high)
}

fn push_segment(out: &mut Vec<Color>, lerp: &ColorInterpolation, len: usize) {
    // The end color is left for the next segment to emit
    out.extend((0..len).map(|i| lerp.interpolate(i as f32 / len as f32)));
}
