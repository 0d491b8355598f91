//! Built-in stages, in pipeline order:
//!
//! ```text
//! candidate → structural → overrides → temporal → detail_floor → normalize
//!                 ↓            ↓           ↓            ↓             ↓
//!              fatal?       Profile      fatal?    repaired +     warnings
//!                                                   qa_flags
//! ```

mod detail_floor;
mod normalize;
mod overrides;
mod structural;
mod temporal;

pub use detail_floor::DetailFloorStage;
pub use normalize::NormalizeStage;
pub use overrides::OverridesStage;
pub use structural::StructuralStage;
pub use temporal::TemporalStage;
