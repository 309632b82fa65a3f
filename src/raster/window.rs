use std::f64::consts::PI;

use clap::ValueEnum;

/// Gaussian width parameter used by renderfall.
const GAUSSIAN_BETA: f64 = 8.0;
/// Kaiser shape parameter; roughly Blackman-Harris sidelobe levels.
const KAISER_BETA: f64 = 8.6;

/// Windowing functions understood by both renderfall and the built-in renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WindowKind {
    Hann,
    Gaussian,
    Square,
    #[default]
    Blackman,
    #[value(name = "blackmanharris")]
    BlackmanHarris,
    Hamming,
    Kaiser,
    Parzen,
}

impl WindowKind {
    /// Name passed on the renderfall command line
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Hann => "hann",
            WindowKind::Gaussian => "gaussian",
            WindowKind::Square => "square",
            WindowKind::Blackman => "blackman",
            WindowKind::BlackmanHarris => "blackmanharris",
            WindowKind::Hamming => "hamming",
            WindowKind::Kaiser => "kaiser",
            WindowKind::Parzen => "parzen",
        }
    }

    /// Symmetric window coefficients of length `size`
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        if size <= 1 {
            return vec![1.0; size];
        }
        let last = (size - 1) as f64;
        (0..size)
            .map(|n| {
                let x = n as f64 / last;
                let w = match self {
                    WindowKind::Hann => 0.5 - 0.5 * (2.0 * PI * x).cos(),
                    WindowKind::Square => 1.0,
                    WindowKind::Gaussian => {
                        let arg = GAUSSIAN_BETA * (1.0 - 2.0 * x);
                        (-0.5 * arg * arg).exp()
                    }
                    WindowKind::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                    WindowKind::BlackmanHarris => {
                        0.35875 - 0.48829 * (2.0 * PI * x).cos() + 0.14128 * (4.0 * PI * x).cos()
                            - 0.01168 * (6.0 * PI * x).cos()
                    }
                    WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
                    WindowKind::Kaiser => {
                        let r = 2.0 * x - 1.0;
                        let arg = KAISER_BETA * (1.0 - r * r).max(0.0).sqrt();
                        bessel_i0(arg) / bessel_i0(KAISER_BETA)
                    }
                    WindowKind::Parzen => parzen(2.0 * x - 1.0),
                };
                w as f32
            })
            .collect()
    }
}

/// Parzen (de la Vallee Poussin) window at normalized position r in [-1, 1]
fn parzen(r: f64) -> f64 {
    let r = r.abs();
    if r <= 0.5 {
        1.0 - 6.0 * r * r * (1.0 - r)
    } else {
        2.0 * (1.0 - r).powi(3)
    }
}

/// Zeroth-order modified Bessel function of the first kind (series expansion)
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..30 {
        term *= (half / k as f64) * (half / k as f64);
        sum += term;
    }
    sum
}
