// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowstudio-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowstudio and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The canvas viewport transform.
//!
//! `client = origin + pan + zoom * document`
//!
//! `origin` is the canvas surface's top-left corner in client space, `pan` is a client-space
//! translation and `zoom` a uniform scale. `to_document` is the only place in the crate that
//! inverts this transform; every click, drop and drag goes through it.

use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl ZoomBounds {
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0.25, max: 4.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    origin: Point,
    pan: Point,
    zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            pan: Point::ORIGIN,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// `zoom` must be finite and positive; anything else falls back to `1.0`.
    pub fn new(pan: Point, zoom: f64) -> Self {
        Self {
            origin: Point::ORIGIN,
            pan,
            zoom: sanitize_zoom(zoom),
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn to_document(&self, client: Point) -> Point {
        (client - self.origin - self.pan) * (1.0 / self.zoom)
    }

    pub fn to_client(&self, document: Point) -> Point {
        self.origin + self.pan + document * self.zoom
    }

    /// Client-space distance to document-space distance.
    pub fn scale_to_document(&self, client_len: f64) -> f64 {
        client_len / self.zoom
    }

    pub fn pan_by(&mut self, client_delta: Point) {
        self.pan = self.pan + client_delta;
    }

    /// Sets the zoom (clamped) while keeping the document point under `anchor` fixed.
    pub fn zoom_to(&mut self, zoom: f64, anchor: Point, bounds: ZoomBounds) {
        let zoom = bounds.clamp(sanitize_zoom(zoom));
        let focus = self.to_document(anchor);
        self.zoom = zoom;
        self.pan = anchor - self.origin - focus * zoom;
    }

    pub fn zoom_by(&mut self, factor: f64, anchor: Point, bounds: ZoomBounds) {
        self.zoom_to(self.zoom * factor, anchor, bounds);
    }

    pub fn reset(&mut self) {
        self.pan = Point::ORIGIN;
        self.zoom = 1.0;
    }
}

fn sanitize_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Viewport, ZoomBounds};
    use crate::model::Point;

    const EPS: f64 = 1e-9;

    #[rstest]
    #[case::identity(Point::new(0.0, 0.0), 1.0, Point::new(250.0, 150.0), Point::new(250.0, 150.0))]
    #[case::zoomed_and_panned(Point::new(20.0, 20.0), 2.0, Point::new(250.0, 150.0), Point::new(115.0, 65.0))]
    #[case::zoomed_out(Point::new(0.0, 0.0), 0.5, Point::new(100.0, 40.0), Point::new(200.0, 80.0))]
    #[case::negative_pan(Point::new(-100.0, -50.0), 1.0, Point::new(0.0, 0.0), Point::new(100.0, 50.0))]
    fn to_document_inverts_the_transform(
        #[case] pan: Point,
        #[case] zoom: f64,
        #[case] client: Point,
        #[case] expected: Point,
    ) {
        let viewport = Viewport::new(pan, zoom);
        assert!(viewport.to_document(client).approx_eq(expected, EPS));
    }

    #[rstest]
    #[case(Point::new(20.0, 20.0), 2.0, Point::ORIGIN)]
    #[case(Point::new(-37.5, 12.25), 0.3, Point::new(10.0, 5.0))]
    #[case(Point::new(1e4, -1e4), 3.7, Point::new(-40.0, 900.0))]
    fn client_round_trip_is_stable(#[case] pan: Point, #[case] zoom: f64, #[case] origin: Point) {
        let viewport = Viewport::new(pan, zoom).with_origin(origin);
        for client in [
            Point::new(0.0, 0.0),
            Point::new(250.0, 150.0),
            Point::new(-13.0, 7.5),
            Point::new(1920.0, 1080.0),
        ] {
            let back = viewport.to_client(viewport.to_document(client));
            assert!(back.approx_eq(client, 1e-6), "{client:?} -> {back:?}");
        }
    }

    #[test]
    fn origin_offsets_client_coordinates() {
        let viewport = Viewport::new(Point::ORIGIN, 1.0).with_origin(Point::new(16.0, 32.0));
        assert_eq!(viewport.to_document(Point::new(16.0, 32.0)), Point::ORIGIN);
    }

    #[test]
    fn zoom_keeps_anchor_fixed_and_clamps() {
        let mut viewport = Viewport::new(Point::new(20.0, 20.0), 1.0);
        let anchor = Point::new(300.0, 200.0);
        let before = viewport.to_document(anchor);

        viewport.zoom_by(1.5, anchor, ZoomBounds::default());
        assert!((viewport.zoom() - 1.5).abs() < EPS);
        assert!(viewport.to_document(anchor).approx_eq(before, 1e-9));

        viewport.zoom_to(100.0, anchor, ZoomBounds::default());
        assert_eq!(viewport.zoom(), 4.0);
        assert!(viewport.to_document(anchor).approx_eq(before, 1e-9));

        viewport.zoom_to(0.0, anchor, ZoomBounds::default());
        assert_eq!(viewport.zoom(), 1.0, "non-positive zoom falls back to 1.0");
    }

    #[test]
    fn invalid_initial_zoom_falls_back() {
        assert_eq!(Viewport::new(Point::ORIGIN, f64::NAN).zoom(), 1.0);
        assert_eq!(Viewport::new(Point::ORIGIN, -2.0).zoom(), 1.0);
    }
}
