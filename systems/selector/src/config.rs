use balanced_zones_core::{EdgeColour, TileDefinition};
use balanced_zones_system_coefficients::CoefficientTuning;
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

/// Tuning knobs controlling how the selector narrows and picks candidates.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorConfig {
    /// Minimum satisfied constraints for a partial match, capped by the
    /// number of constraints present.
    pub partial_match_threshold: usize,
    /// Final pick among equally valid candidates.
    pub tie_break: TieBreak,
    /// Optional soft colour preferences for unconstrained sides.
    pub drift: ColourDrift,
    /// Coefficient formulas used on commit and by the balanced tie-break.
    pub coefficients: CoefficientTuning,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            partial_match_threshold: 2,
            tie_break: TieBreak::default(),
            drift: ColourDrift::default(),
            coefficients: CoefficientTuning::default(),
        }
    }
}

/// Strategy used to pick one tile out of the final candidate set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TieBreak {
    /// Uniform random choice.
    #[default]
    Uniform,
    /// Narrow to the preferred dispersion class when any candidate belongs to
    /// it, keep the candidates whose prospective defensiveness lies closest to
    /// the target, then choose uniformly among them.
    Balanced {
        /// Defensiveness the level should trend toward.
        target_defensiveness: f32,
        /// Dispersion class favoured before defensiveness is compared.
        dispersion: DispersionPreference,
    },
}

/// Dispersion class favoured by the balanced tie-break. Classes compare the
/// catalog constant exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispersionPreference {
    /// Every dispersion is acceptable.
    #[default]
    Any,
    /// Single-component tiles.
    PureEven,
    /// Two-component tiles.
    HalfEven,
    /// Corner-piece tiles.
    CornerPiece,
}

impl DispersionPreference {
    /// Reports whether the tile belongs to the preferred class.
    #[must_use]
    pub fn accepts(self, tile: &TileDefinition) -> bool {
        match self {
            Self::Any => true,
            Self::PureEven => tile.has_pure_even_dispersion(),
            Self::HalfEven => tile.has_half_even_dispersion(),
            Self::CornerPiece => tile.is_corner_piece(),
        }
    }
}

/// Weighted colour preferences drawn for the unconstrained sides of an
/// interior cell. Preferences only filter candidates that already satisfy the
/// hard constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColourDrift {
    /// Whether preferences are drawn at all.
    pub enabled: bool,
    /// Relative weight of Grey.
    pub grey: u32,
    /// Relative weight of Red.
    pub red: u32,
    /// Relative weight of Green.
    pub green: u32,
    /// Relative weight of Blue.
    pub blue: u32,
}

impl Default for ColourDrift {
    fn default() -> Self {
        Self {
            enabled: false,
            grey: 10,
            red: 40,
            green: 25,
            blue: 25,
        }
    }
}

impl ColourDrift {
    /// Default weights with drifting switched on.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Draws one preferred colour. Returns `None` when every weight is zero.
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<EdgeColour> {
        let table = [
            (EdgeColour::Grey, self.grey),
            (EdgeColour::Red, self.red),
            (EdgeColour::Green, self.green),
            (EdgeColour::Blue, self.blue),
        ];
        let weights = WeightedIndex::new(table.iter().map(|(_, weight)| *weight)).ok()?;
        Some(table[weights.sample(rng)].0)
    }
}
