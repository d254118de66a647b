//! Background gradient.
//!
//! The sky is a tall, two pixel wide image filled with a vertical linear
//! gradient. The sky pipeline stretches it over the whole screen.

use anyhow::{Context as _, anyhow};

use crate::config::SkyStop;

pub const GRADIENT_WIDTH: u32 = 2;
pub const GRADIENT_HEIGHT: u32 = 512;

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex_colour(colour: &str) -> anyhow::Result<[u8; 3]> {
    let hex = colour.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(anyhow!("expected six hex digits, got {:?}", colour));
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .ok_or_else(|| anyhow!("{:?} is not ASCII", colour))
            .and_then(|digits| {
                u8::from_str_radix(digits, 16).with_context(|| format!("invalid colour {:?}", colour))
            })
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Renders `stops` into a `GRADIENT_WIDTH` x `height` image. Row 0 is
/// offset 0. Rows before the first or after the last stop take that stop's
/// colour. Stops with unparsable colours are skipped.
pub fn gradient_image(stops: &[SkyStop], height: u32) -> image::RgbaImage {
    let mut parsed: Vec<(f32, [u8; 3])> = stops
        .iter()
        .filter_map(|stop| match parse_hex_colour(&stop.colour) {
            Ok(rgb) => Some((stop.offset.clamp(0.0, 1.0), rgb)),
            Err(e) => {
                log::warn!("Skipping sky stop: {:#}", e);
                None
            }
        })
        .collect();
    parsed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let height = height.max(1);
    image::RgbaImage::from_fn(GRADIENT_WIDTH, height, |_, y| {
        let offset = if height == 1 {
            0.0
        } else {
            y as f32 / (height - 1) as f32
        };
        let [r, g, b] = colour_at(&parsed, offset);
        image::Rgba([r, g, b, 255])
    })
}

fn colour_at(stops: &[(f32, [u8; 3])], offset: f32) -> [u8; 3] {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0, 0, 0];
    };
    if offset <= first.0 {
        return first.1;
    }
    if offset >= last.0 {
        return last.1;
    }
    stops
        .windows(2)
        .find(|pair| offset >= pair[0].0 && offset <= pair[1].0)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            let span = to.0 - from.0;
            let t = if span > 0.0 { (offset - from.0) / span } else { 1.0 };
            let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
            [mix(from.1[0], to.1[0]), mix(from.1[1], to.1[1]), mix(from.1[2], to.1[2])]
        })
        .unwrap_or(last.1)
}
