//! Power-law transfer curve with an optional linear toe.

/// Number of bisection steps used to place the toe breakpoint.
const BISECTION_STEPS: usize = 48;

/// Output transfer curve described by `(gamma, toe_slope)`.
///
/// The curve is `x^(1/gamma)` rescaled so that it meets a straight segment
/// of slope `toe_slope` near black with a continuous first derivative, so
/// `(2.222, 4.5)` is the BT.709 curve. A toe slope of 0 disables the linear
/// segment. A toe slope of 1 pushes the breakpoint to white, which leaves the
/// transfer linear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaCurve {
    power: f64,
    toe_slope: f64,
    breakpoint: f64,
    linear_limit: f64,
    offset: f64,
}

impl GammaCurve {
    pub fn new(gamma: f64, toe_slope: f64) -> Self {
        let power = 1.0 / gamma;
        let mut breakpoint = 0.0;
        let mut linear_limit = 0.0;
        let mut offset = 0.0;

        if toe_slope != 0.0 && (toe_slope - 1.0) * (power - 1.0) <= 0.0 {
            let mut bounds = if toe_slope >= 1.0 { [0.0, 1.0] } else { [1.0, 0.0] };
            for _ in 0..BISECTION_STEPS {
                breakpoint = (bounds[0] + bounds[1]) / 2.0;
                let above = if power != 0.0 {
                    ((breakpoint / toe_slope).powf(-power) - 1.0) / power - 1.0 / breakpoint > -1.0
                } else {
                    breakpoint / (1.0 - 1.0 / breakpoint).exp() < toe_slope
                };
                bounds[above as usize] = breakpoint;
            }
            linear_limit = breakpoint / toe_slope;
            if power != 0.0 {
                offset = breakpoint * (1.0 / power - 1.0);
            }
        }

        Self { power, toe_slope, breakpoint, linear_limit, offset }
    }

    /// Maps a linear value in `[0, 1]` to its encoded value in `[0, 1]`.
    pub fn apply(&self, linear: f64) -> f64 {
        let x = linear.clamp(0.0, 1.0);
        let encoded = if x < self.linear_limit {
            x * self.toe_slope
        } else if self.power != 0.0 {
            x.powf(self.power) * (1.0 + self.offset) - self.offset
        } else {
            x.ln() * self.breakpoint + 1.0
        };
        encoded.clamp(0.0, 1.0)
    }

    /// Lookup table from a 16-bit linear sample to an 8-bit encoded value.
    pub fn lut_u16_to_u8(&self) -> Vec<u8> {
        (0..=u16::MAX as u32)
            .map(|i| (self.apply(i as f64 / u16::MAX as f64) * 255.0).round() as u8)
            .collect()
    }
}
