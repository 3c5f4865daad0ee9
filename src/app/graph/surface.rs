use eframe::egui::{Align2, Color32, FontId, Painter, Rect, Stroke, Vec2};

pub(in crate::app) trait Surface {
    fn clear(&mut self, color: Color32);
    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);
    fn circle(&mut self, center: Vec2, radius: f32, fill: Color32, outline: Stroke);
    fn label(&mut self, anchor: Vec2, text: &str, size: f32, color: Color32);
}

pub(in crate::app) struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub(in crate::app) fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 0.0, color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.painter
            .line_segment([self.rect.min + from, self.rect.min + to], stroke);
    }

    fn circle(&mut self, center: Vec2, radius: f32, fill: Color32, outline: Stroke) {
        self.painter
            .circle(self.rect.min + center, radius, fill, outline);
    }

    fn label(&mut self, anchor: Vec2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            self.rect.min + anchor,
            Align2::CENTER_TOP,
            text,
            FontId::proportional(size),
            color,
        );
    }
}

#[cfg(test)]
pub(in crate::app) mod recording {
    use eframe::egui::{Color32, Stroke, Vec2};

    use super::Surface;

    #[derive(Clone, Debug, PartialEq)]
    pub(in crate::app) enum DrawCall {
        Clear(Color32),
        Line(Vec2, Vec2),
        Circle {
            center: Vec2,
            radius: f32,
            fill: Color32,
        },
        Label(Vec2, String),
    }

    #[derive(Default)]
    pub(in crate::app) struct RecordingSurface {
        pub(in crate::app) calls: Vec<DrawCall>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, color: Color32) {
            self.calls.push(DrawCall::Clear(color));
        }

        fn line(&mut self, from: Vec2, to: Vec2, _stroke: Stroke) {
            self.calls.push(DrawCall::Line(from, to));
        }

        fn circle(&mut self, center: Vec2, radius: f32, fill: Color32, _outline: Stroke) {
            self.calls.push(DrawCall::Circle {
                center,
                radius,
                fill,
            });
        }

        fn label(&mut self, anchor: Vec2, text: &str, _size: f32, _color: Color32) {
            self.calls.push(DrawCall::Label(anchor, text.to_owned()));
        }
    }
}
