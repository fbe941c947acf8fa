// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The zoom animation: a hold on the opening view, a zoom toward the
//! closing view, and a hold on the closing view.
//!
//! The zoom is geometric in scale, so every frame magnifies by the
//! same ratio and the zoom looks steady on screen.  Rotation advances
//! linearly over the zoom, including any extra full turns requested.

use std::f64::consts::PI;

use crate::planes::Viewport;

/// Which part of the animation a frame belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Still frames of the opening view.
    InitialHold,
    /// The zoom itself.
    Zoom,
    /// Still frames of the closing view.
    FinalHold,
}

/// One frame of the animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    /// Position in the whole animation, from zero.
    pub index: usize,
    /// The phase the frame belongs to.
    pub phase: Phase,
    /// What to render.
    pub viewport: Viewport,
}

/// Converts a duration into a whole number of frames.  Negative or
/// non-finite durations give no frames.
pub fn frame_count(seconds: f64, fps: u32) -> usize {
    let frames = (seconds * f64::from(fps)).round();
    if frames.is_finite() && frames > 0.0 {
        frames as usize
    } else {
        0
    }
}

/// Everything needed to lay out an animation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationPlan {
    /// The opening view.
    pub initial: Viewport,
    /// The closing view.  Shares its center and size with `initial`.
    pub last: Viewport,
    /// Number of opening still frames.
    pub initial_frames: usize,
    /// Number of zoom frames.
    pub zoom_frames: usize,
    /// Number of closing still frames.
    pub final_frames: usize,
    /// Extra full turns made during the zoom.
    pub turns: i32,
}

impl AnimationPlan {
    /// Lays out an animation from durations in seconds.
    pub fn new(
        initial: Viewport,
        last: Viewport,
        fps: u32,
        initial_seconds: f64,
        zoom_seconds: f64,
        final_seconds: f64,
        turns: i32,
    ) -> AnimationPlan {
        AnimationPlan {
            initial,
            last,
            initial_frames: frame_count(initial_seconds, fps),
            zoom_frames: frame_count(zoom_seconds, fps),
            final_frames: frame_count(final_seconds, fps),
            turns,
        }
    }

    /// Total frames across all three phases.
    pub fn len(&self) -> usize {
        self.initial_frames + self.zoom_frames + self.final_frames
    }

    /// True if the animation has no frames at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total rotation applied across the zoom.
    pub fn net_rotation(&self) -> f64 {
        (self.last.rotation() - self.initial.rotation()) + f64::from(self.turns) * 2.0 * PI
    }

    /// The per-frame scale multiplier during the zoom.
    pub fn scale_ratio(&self) -> f64 {
        if self.zoom_frames == 0 {
            return 1.0;
        }
        (self.last.scale() / self.initial.scale()).powf(1.0 / self.zoom_frames as f64)
    }

    /// The frames, in order.  Each call starts from the beginning.
    pub fn frames(&self) -> Frames {
        Frames {
            plan: *self,
            index: 0,
            scale: self.initial.scale(),
            ratio: self.scale_ratio(),
            net_rotation: self.net_rotation(),
        }
    }
}

/// Iterator over the frames of an `AnimationPlan`.
#[derive(Clone, Debug)]
pub struct Frames {
    plan: AnimationPlan,
    index: usize,
    scale: f64,
    ratio: f64,
    net_rotation: f64,
}

impl Iterator for Frames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let plan = &self.plan;
        let index = self.index;
        let zoom_start = plan.initial_frames;
        let final_start = zoom_start + plan.zoom_frames;

        let (phase, viewport) = if index < zoom_start {
            (Phase::InitialHold, plan.initial)
        } else if index < final_start {
            let step = index - zoom_start;
            self.scale *= self.ratio;
            let progress = step as f64 / plan.zoom_frames as f64;
            let rotation = plan.initial.rotation() + progress * self.net_rotation;
            (
                Phase::Zoom,
                plan.initial.with_scale_rotation(self.scale, rotation),
            )
        } else if index < plan.len() {
            (Phase::FinalHold, plan.last)
        } else {
            return None;
        };

        self.index += 1;
        Some(Frame {
            index,
            phase,
            viewport,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames {}
