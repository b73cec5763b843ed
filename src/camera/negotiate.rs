use crate::format::ColorCoding;
use crate::mode::VideoMode;

/// A fixed video mode as reported by the camera
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub mode: VideoMode,
    pub width: u32,
    pub height: u32,
    pub coding: ColorCoding,
}

/// Picks the candidate with `target` coding whose size is closest to the requested one
///
/// Distance is Euclidean in (width, height); on ties the earliest candidate wins.
pub fn closest_mode(
    candidates: &[Candidate],
    target: ColorCoding,
    width: u32,
    height: u32,
) -> Option<Candidate> {
    let mut best: Option<(Candidate, f64)> = None;
    for candidate in candidates.iter().filter(|c| c.coding == target) {
        let dx = candidate.width as f64 - width as f64;
        let dy = candidate.height as f64 - height as f64;
        let distance = (dx * dx + dy * dy).sqrt();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((*candidate, distance)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Rounds `value` down to a multiple of `unit`
pub fn quantize(value: u32, unit: u32) -> u32 {
    if unit == 0 {
        return value;
    }
    (value / unit) * unit
}
