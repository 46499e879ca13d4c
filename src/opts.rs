use argh::FromArgs;
use log::LevelFilter;
use strum_macros::{Display, EnumString};

/// Built-in curves with fitting defaults taken from their intended use.
#[derive(Clone, Copy, Debug, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Curve {
    /// `sqrt(x^2 + 1)` on `[-1, 1]`, fitted in `u = x^2` so the integer
    /// pipeline never needs a square root.
    Sqrt1px2,
    /// The sRGB decode kernel `(x / 1.055)^2.4`, fitted on `[1/2, 1]`; a
    /// frexp-style argument reduction with a power-of-two post-factor
    /// covers the rest of the decode range.
    GammaDecodeSrgb,
    /// The sRGB encode kernel `1.055 x^(1/2.4)`, fitted on `[1/2, 1]`.
    GammaEncodeSrgb,
}

impl Curve {
    pub fn default_degree(self) -> usize {
        match self {
            Curve::Sqrt1px2 => 4,
            Curve::GammaDecodeSrgb => 6,
            Curve::GammaEncodeSrgb => 7,
        }
    }

    /// Gamma kernels feed a multiplicative post-factor, so their error
    /// budget is relative; the hypotenuse kernel's is absolute.
    pub fn default_weight(self) -> Weight {
        match self {
            Curve::Sqrt1px2 => Weight::Absolute,
            Curve::GammaDecodeSrgb => Weight::Relative,
            Curve::GammaEncodeSrgb => Weight::Relative,
        }
    }
}

#[derive(Clone, Copy, Debug, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Weight {
    Absolute,
    Relative,
}

/// Minimax fitting and fixed-point lowering of built-in curves.
#[derive(FromArgs)]
pub struct Opts {
    /// curve to fit
    #[argh(positional)]
    pub curve: Curve,

    /// polynomial degree
    #[argh(option, short = 'd')]
    pub degree: Option<usize>,

    /// override the curve's error weighting
    #[argh(option)]
    pub weight: Option<Weight>,

    /// binary exponent of the fixed-point argument; enables quantization
    #[argh(option)]
    pub x_exp: Option<i32>,

    /// pin the binary exponent of the fixed-point result
    #[argh(option)]
    pub y_exp: Option<i32>,

    /// significant bits per fixed-point evaluation stage
    #[argh(option, default = "31")]
    pub bits: u32,

    /// working precision of the fit, in bits
    #[argh(option, default = "160")]
    pub precision: usize,

    /// logging level
    #[argh(option, long = "log", default = "LevelFilter::Warn")]
    pub log_level: LevelFilter,
}

impl Opts {
    /// Parse options from `env::args`.
    pub fn parse() -> Opts {
        argh::from_env()
    }
}
