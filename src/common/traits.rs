//! Common traits at the boundary between the lattice and a search engine

use crate::path_planning::lattice::{Expansion, LatticeMetadata, MotionPrimitive, PrimitiveLibrary};
use crate::path_planning::search::TraversalContext;

/// Read access to a motion primitive lattice
pub trait LatticeQuery {
    /// Global lattice parameters
    fn metadata(&self) -> &LatticeMetadata;

    /// Expansions available from a heading bucket
    fn primitives_from<'a>(&'a self, heading: usize) -> Box<dyn Iterator<Item = Expansion<'a>> + 'a>;

    /// Heading bucket for an angle, if one lies within tolerance
    fn resolve_heading(&self, angle: f64) -> Option<usize>;
}

/// Trait for traversal cost functions used by a search engine
pub trait ExpansionCost {
    /// Cost of driving `primitive` under `context`
    fn cost(&self, primitive: &MotionPrimitive, context: &TraversalContext) -> f64;
}

impl LatticeQuery for PrimitiveLibrary {
    fn metadata(&self) -> &LatticeMetadata {
        PrimitiveLibrary::metadata(self)
    }

    fn primitives_from<'a>(&'a self, heading: usize) -> Box<dyn Iterator<Item = Expansion<'a>> + 'a> {
        Box::new(PrimitiveLibrary::primitives_from(self, heading))
    }

    fn resolve_heading(&self, angle: f64) -> Option<usize> {
        PrimitiveLibrary::resolve_heading(self, angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::lattice::{generate_uniform_lattice, PrimitiveGeneratorConfig};

    fn count_expansions(lattice: &dyn LatticeQuery, angle: f64) -> usize {
        lattice
            .resolve_heading(angle)
            .map_or(0, |heading| lattice.primitives_from(heading).count())
    }

    #[test]
    fn test_library_as_lattice_query() {
        let (metadata, primitives) = generate_uniform_lattice(&PrimitiveGeneratorConfig::default());
        let library = PrimitiveLibrary::load(metadata, primitives).unwrap();
        assert_eq!(count_expansions(&library, 0.0), 3);
        assert_eq!(count_expansions(&library, 0.4), 0);
        assert_eq!(LatticeQuery::metadata(&library).number_of_headings, 8);
    }
}
