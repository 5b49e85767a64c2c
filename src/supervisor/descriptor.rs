//! `TypeDescriptor`: an actor's port "shape", used to gate hot-swaps.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::Actor;

/// The `(port name, element type name)` pairs an actor exposes, sorted by
/// name.
///
/// `Actor` has no user-implemented business-logic type to compare,
/// so a supervisor judges hot-swap compatibility structurally instead: two
/// actors are interchangeable if they expose the same named ports carrying
/// the same element types. Queue lengths and actor names don't factor in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor(Vec<(String, &'static str)>);

impl TypeDescriptor {
    /// Compute the descriptor for `actor`'s current ports.
    pub fn of(actor: &Actor) -> Self {
        let mut ports: Vec<(String, &'static str)> = actor
            .ports_summary()
            .into_iter()
            .map(|(name, element_type_name, _len)| (name, element_type_name))
            .collect();
        ports.sort();
        Self(ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortKind;

    #[test]
    fn test_identical_shapes_are_equal() {
        let a = Actor::new(None, None);
        a.create_port::<u32>("in", PortKind::Input, 4).unwrap();
        let b = Actor::new(None, None);
        b.create_port::<u32>("in", PortKind::Input, 4).unwrap();
        assert_eq!(TypeDescriptor::of(&a), TypeDescriptor::of(&b));
    }

    #[test]
    fn test_different_element_types_differ() {
        let a = Actor::new(None, None);
        a.create_port::<u32>("in", PortKind::Input, 4).unwrap();
        let b = Actor::new(None, None);
        b.create_port::<String>("in", PortKind::Input, 4).unwrap();
        assert_ne!(TypeDescriptor::of(&a), TypeDescriptor::of(&b));
    }

    #[test]
    fn test_port_order_does_not_matter() {
        let a = Actor::new(None, None);
        a.create_port::<u32>("in", PortKind::Input, 4).unwrap();
        a.create_port::<String>("out", PortKind::Output, 4).unwrap();
        let b = Actor::new(None, None);
        b.create_port::<String>("out", PortKind::Output, 4).unwrap();
        b.create_port::<u32>("in", PortKind::Input, 4).unwrap();
        assert_eq!(TypeDescriptor::of(&a), TypeDescriptor::of(&b));
    }
}
