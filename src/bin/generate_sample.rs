//! Writes a synthetic bike sharing dataset into `dashboard/` so the
//! dashboard can run without the real usage data.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use image::{Rgba, RgbaImage};
use serde::Serialize;

const OUTPUT_DIR: &str = "dashboard";

/// Relative demand per hour of day, commuter peaks at 08:00 and 17:00-18:00.
const HOURLY_PROFILE: [f64; 24] = [
    0.25, 0.15, 0.10, 0.05, 0.05, 0.12, 0.45, 1.30, 2.40, 1.40, 0.90, 1.05, 1.30, 1.30, 1.20,
    1.30, 1.70, 2.70, 2.50, 1.80, 1.30, 1.00, 0.75, 0.45,
];

#[derive(Serialize)]
struct DayRow {
    dteday: String,
    season: u8,
    yr: u8,
    mnth: u32,
    casual: u64,
    registered: u64,
    cnt: u64,
}

#[derive(Serialize)]
struct HourRow {
    dteday: String,
    season: u8,
    hours: usize,
    casual: u64,
    registered: u64,
    cnt: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Spring 1, summer 2, fall 3, winter 4.
fn season_of(date: NaiveDate) -> u8 {
    match date.month() {
        3..=5 => 1,
        6..=8 => 2,
        9..=11 => 3,
        _ => 4,
    }
}

fn season_factor(season: u8) -> f64 {
    match season {
        1 => 0.9,
        2 => 1.25,
        3 => 1.15,
        _ => 0.55,
    }
}

fn generate(rng: &mut SimpleRng) -> Result<(Vec<DayRow>, Vec<HourRow>)> {
    let first = NaiveDate::from_ymd_opt(2011, 1, 1).context("start date")?;
    let last = NaiveDate::from_ymd_opt(2012, 12, 31).context("end date")?;

    let mut days = Vec::new();
    let mut hours = Vec::new();

    for date in first.iter_days().take_while(|d| *d <= last) {
        let season = season_of(date);
        let yr = (date.year() - 2011) as u8;
        let weekend = date.weekday().number_from_monday() >= 6;
        let scale = 80.0 * season_factor(season) * if yr == 0 { 1.0 } else { 1.6 };
        let dteday = date.format("%Y-%m-%d").to_string();

        let (mut day_casual, mut day_registered) = (0u64, 0u64);
        for (hour, weight) in HOURLY_PROFILE.iter().enumerate() {
            // Quiet hours are occasionally missing, as in the real data.
            if (2..=5).contains(&hour) && rng.next_f64() < 0.03 {
                continue;
            }
            let demand = scale * weight * rng.range(0.7, 1.3);
            let casual_share = (if weekend { 0.35 } else { 0.12 }) * rng.range(0.6, 1.4);
            let casual = (demand * casual_share).round() as u64;
            let registered = (demand * (1.0 - casual_share)).round() as u64;

            day_casual += casual;
            day_registered += registered;
            hours.push(HourRow {
                dteday: dteday.clone(),
                season,
                hours: hour,
                casual,
                registered,
                cnt: casual + registered,
            });
        }

        days.push(DayRow {
            dteday,
            season,
            yr,
            mnth: date.month(),
            casual: day_casual,
            registered: day_registered,
            cnt: day_casual + day_registered,
        });
    }

    Ok((days, hours))
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// A small flat-colour bicycle for the sidebar.
fn branding_image() -> RgbaImage {
    let (w, h) = (240u32, 140u32);
    let wheels = [(62.0f32, 92.0f32), (178.0, 92.0)];
    let frame = [
        ((62.0, 92.0), (110.0, 92.0)),
        ((110.0, 92.0), (150.0, 52.0)),
        ((62.0, 92.0), (92.0, 52.0)),
        ((92.0, 52.0), (150.0, 52.0)),
        ((150.0, 52.0), (178.0, 92.0)),
        ((92.0, 52.0), (110.0, 92.0)),
    ];

    RgbaImage::from_fn(w, h, |x, y| {
        let (px, py) = (x as f32, y as f32);
        let on_wheel = wheels.iter().any(|(cx, cy)| {
            let r = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            (28.0..=33.0).contains(&r)
        });
        let on_frame = frame.iter().any(|&((x0, y0), (x1, y1))| {
            let (dx, dy) = (x1 - x0, y1 - y0);
            let t = (((px - x0) * dx + (py - y0) * dy) / (dx * dx + dy * dy)).clamp(0.0, 1.0);
            let (qx, qy) = (x0 + t * dx, y0 + t * dy);
            ((px - qx).powi(2) + (py - qy).powi(2)).sqrt() <= 2.5
        });

        if on_wheel {
            Rgba([0x33, 0x33, 0x33, 0xFF])
        } else if on_frame {
            Rgba([0x00, 0x7B, 0xFF, 0xFF])
        } else {
            Rgba([0xF4, 0xF8, 0xFC, 0xFF])
        }
    })
}

fn main() -> Result<()> {
    let out = Path::new(OUTPUT_DIR);
    fs::create_dir_all(out).with_context(|| format!("creating {OUTPUT_DIR}/"))?;

    let mut rng = SimpleRng::new(42);
    let (days, hours) = generate(&mut rng)?;

    write_csv(&out.join("day_clean.csv"), &days)?;
    write_csv(&out.join("hour_clean.csv"), &hours)?;
    branding_image()
        .save(out.join("bike.png"))
        .context("writing bike.png")?;

    println!(
        "Wrote {} daily rows and {} hourly rows to {OUTPUT_DIR}/",
        days.len(),
        hours.len()
    );
    Ok(())
}
