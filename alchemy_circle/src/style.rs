//! Style parameters, render style tags, and colour schemes.
//!
//! A circle's look is a plain data object re-rolled on every spawn.  The
//! renderer reads it; nothing here draws.

use rand::Rng;

// ════════════════════════════════════════════════════════════════════════════
// Colours
// ════════════════════════════════════════════════════════════════════════════

/// Pack an opaque RGB triple as `0xAARRGGBB`.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF000000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

pub const WHITE: u32 = rgb(255, 255, 255);

/// The three colours a circle is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    /// Rings, outer arcs, vertex markers.
    pub primary:   u32,
    /// Near-white: polygon outlines and cross ticks.
    pub secondary: u32,
    /// Spokes and runes.
    pub accent:    u32,
}

pub const SCHEMES: [ColorScheme; 3] = [
    // magenta / purple
    ColorScheme { primary: rgb(255, 120, 180), secondary: WHITE, accent: rgb(255, 180, 220) },
    // cyan / blue
    ColorScheme { primary: rgb(100, 200, 255), secondary: WHITE, accent: rgb(150, 220, 255) },
    // orange / gold
    ColorScheme { primary: rgb(255, 165, 0),   secondary: WHITE, accent: rgb(255, 200, 100) },
];

// ════════════════════════════════════════════════════════════════════════════
// RenderStyle
// ════════════════════════════════════════════════════════════════════════════

/// Which geometric recipe draws a circle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Layered mandala: rings, hexagon/octagon polygons, spokes, outer arcs,
    /// cross ticks.
    #[default]
    Strange,
    /// Concentric rings, one polygon, radial tick lines.
    Classic,
}

impl RenderStyle {
    pub fn name(&self) -> &'static str {
        match self {
            RenderStyle::Strange => "strange",
            RenderStyle::Classic => "classic",
        }
    }
}

impl std::str::FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strange" => Ok(RenderStyle::Strange),
            "classic" => Ok(RenderStyle::Classic),
            other     => Err(format!("unknown render style '{}' (expected strange|classic)", other)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StyleParams
// ════════════════════════════════════════════════════════════════════════════

/// Randomised per-spawn parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleParams {
    /// 5–8.  Classic recipe only.
    pub polygon_sides:  u32,
    /// 8–16.  Classic recipe only.
    pub radial_lines:   u32,
    /// Degrees per second, 40–80.
    pub rotation_speed: f32,
    /// Index into [`SCHEMES`], 0–2.
    pub color_hue:      usize,
    /// 3–5.  Classic recipe only.
    pub num_rings:      u32,
    /// 2–4.
    pub mandala_layers: u32,
    /// Odd mandala layers spin the other way.
    pub counter_rotate: bool,
}

impl StyleParams {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        StyleParams {
            polygon_sides:  rng.random_range(5..=8),
            radial_lines:   rng.random_range(8..=16),
            rotation_speed: rng.random_range(40.0..80.0),
            color_hue:      rng.random_range(0..SCHEMES.len()),
            num_rings:      rng.random_range(3..=5),
            mandala_layers: rng.random_range(2..=4),
            counter_rotate: rng.random_bool(0.5),
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        SCHEMES[self.color_hue % SCHEMES.len()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rgb_packs_opaque() {
        assert_eq!(rgb(255, 165, 0), 0xFFFFA500);
        assert_eq!(WHITE >> 24, 0xFF);
    }

    #[test]
    fn random_params_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let s = StyleParams::random(&mut rng);
            assert!((5..=8).contains(&s.polygon_sides));
            assert!((8..=16).contains(&s.radial_lines));
            assert!(s.rotation_speed >= 40.0 && s.rotation_speed < 80.0);
            assert!(s.color_hue < 3);
            assert!((3..=5).contains(&s.num_rings));
            assert!((2..=4).contains(&s.mandala_layers));
        }
    }

    #[test]
    fn random_params_cover_all_schemes_and_layers() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut hues = [false; 3];
        let mut layers = [false; 5];
        let mut flips = [false; 2];
        for _ in 0..500 {
            let s = StyleParams::random(&mut rng);
            hues[s.color_hue] = true;
            layers[s.mandala_layers as usize] = true;
            flips[s.counter_rotate as usize] = true;
        }
        assert!(hues.iter().all(|&h| h));
        assert!(layers[2] && layers[3] && layers[4]);
        assert!(flips[0] && flips[1]);
    }

    #[test]
    fn same_seed_same_style() {
        let a = StyleParams::random(&mut StdRng::seed_from_u64(3));
        let b = StyleParams::random(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn schemes_secondary_is_white() {
        for s in SCHEMES.iter() {
            assert_eq!(s.secondary, WHITE);
        }
    }

    #[test]
    fn render_style_parse() {
        assert_eq!("Classic".parse::<RenderStyle>(), Ok(RenderStyle::Classic));
        assert_eq!("strange".parse::<RenderStyle>(), Ok(RenderStyle::Strange));
        assert!("fancy".parse::<RenderStyle>().is_err());
    }
}
