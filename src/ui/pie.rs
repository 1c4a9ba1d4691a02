use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use crate::color;
use crate::data::aggregate::RiderShare;

/// Degrees counter-clockwise from the positive x axis where the first slice starts.
const START_ANGLE_DEG: f32 = 140.0;
/// Radial offset of the casual slice, as a fraction of the radius.
const CASUAL_EXPLODE: f32 = 0.1;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Angular extent of one slice, radians counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f32,
    pub sweep: f32,
}

impl Wedge {
    pub fn mid(&self) -> f32 {
        self.start + self.sweep / 2.0
    }
}

/// Split the full circle proportionally to `values`, starting at `start_deg`.
///
/// Values are normalised by their sum; an all-zero input yields no wedges.
pub fn wedges(values: &[f64], start_deg: f32) -> Vec<Wedge> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut start = start_deg.to_radians();
    values
        .iter()
        .map(|v| {
            let sweep = (v / total) as f32 * TAU;
            let wedge = Wedge { start, sweep };
            start += sweep;
            wedge
        })
        .collect()
}

/// Screen position at `angle` on a circle; screen y grows downwards.
fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::new(angle.cos(), -angle.sin()) * radius
}

// ---------------------------------------------------------------------------
// Painting
// ---------------------------------------------------------------------------

/// Casual vs registered pie, casual slice pulled out.
pub fn rider_share_pie(ui: &mut Ui, share: Option<RiderShare>, size: f32) {
    let Some(share) = share else {
        ui.label("No riders in the selected range.");
        return;
    };

    let slices = [
        ("Casual", share.casual_pct, color::CASUAL, CASUAL_EXPLODE),
        ("Registered", share.registered_pct, color::REGISTERED, 0.0),
    ];
    let values: Vec<f64> = slices.iter().map(|s| s.1).collect();

    let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
    let center = response.rect.center();
    let radius = size * 0.32;
    let font = FontId::proportional(14.0);

    for ((label, pct, fill, explode), wedge) in slices.into_iter().zip(wedges(&values, START_ANGLE_DEG)) {
        let origin = on_circle(center, explode * radius, wedge.mid());

        // One triangle per step keeps every polygon convex.
        let steps = ((wedge.sweep / TAU) * 120.0).ceil().max(2.0) as usize;
        for i in 0..steps {
            let a0 = wedge.start + wedge.sweep * i as f32 / steps as f32;
            let a1 = wedge.start + wedge.sweep * (i + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![
                    origin,
                    on_circle(origin, radius, a0),
                    on_circle(origin, radius, a1),
                ],
                fill,
                Stroke::NONE,
            ));
        }

        painter.text(
            on_circle(origin, radius * 1.15, wedge.mid()),
            Align2::CENTER_CENTER,
            label,
            font.clone(),
            ui.visuals().text_color(),
        );
        painter.text(
            on_circle(origin, radius * 0.6, wedge.mid()),
            Align2::CENTER_CENTER,
            format!("{pct:.1}%"),
            font.clone(),
            Color32::BLACK,
        );
    }

    response.on_hover_text(format!(
        "Casual {:.1}% · Registered {:.1}%",
        share.casual_pct, share.registered_pct
    ));
}

/// Convenience wrapper reserving a square of the available width.
pub fn rider_share_section(ui: &mut Ui, share: Option<RiderShare>) {
    let size = ui.available_width().min(360.0);
    ui.vertical_centered(|ui: &mut egui::Ui| {
        rider_share_pie(ui, share, size);
    });
}
