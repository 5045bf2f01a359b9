use serde::{Deserialize, Serialize};

/// Color in HSB space with alpha, on the ranges hue `[0, 360)`, saturation/brightness/alpha
/// `[0, 100]`.
///
/// Hue values outside the range wrap; the other channels clamp when converted to RGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsba {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation, 0..100.
    pub s: f64,
    /// Brightness, 0..100.
    pub b: f64,
    /// Alpha, 0..100.
    pub a: f64,
}

impl Hsba {
    /// Build a color from its four channels.
    pub const fn new(h: f64, s: f64, b: f64, a: f64) -> Self {
        Self { h, s, b, a }
    }

    /// Fully opaque color.
    pub const fn opaque(h: f64, s: f64, b: f64) -> Self {
        Self::new(h, s, b, 100.0)
    }

    /// Alpha as a `[0, 1]` fraction.
    pub fn opacity(self) -> f64 {
        (self.a / 100.0).clamp(0.0, 1.0)
    }

    /// Convert to straight-alpha RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        let (r, g, b) = hsv_to_rgb(self.h, self.s / 100.0, self.b / 100.0);
        [to_u8(r), to_u8(g), to_u8(b), to_u8(self.opacity())]
    }
}

impl<'de> Deserialize<'de> for Hsba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Obj {
                h: f64,
                s: f64,
                b: f64,
                #[serde(default = "full")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn full() -> f64 {
            100.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Obj { h, s, b, a } => Ok(Self::new(h, s, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [h, s, b] => Ok(Self::opaque(*h, *s, *b)),
                [h, s, b, a] => Ok(Self::new(*h, *s, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "hsba array must have len 3 ([h,s,b]) or 4 ([h,s,b,a])",
                )),
            },
        }
    }
}

/// Standard HSV -> RGB conversion. `h` in degrees, `s`/`v` normalized to `[0, 1]`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    (r1 + m, g1 + m, b1 + m)
}
