//! Position source kinds

use core::fmt;

/// Where live position updates come from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Device location provider
    #[default]
    Real,
    /// Fixed-step walking simulation
    Simulated,
}

impl SourceKind {
    /// The other kind
    pub fn toggled(self) -> Self {
        match self {
            SourceKind::Real => SourceKind::Simulated,
            SourceKind::Simulated => SourceKind::Real,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Real => "real",
            SourceKind::Simulated => "simulated",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
