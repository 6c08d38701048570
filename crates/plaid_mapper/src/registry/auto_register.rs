#![cfg(feature = "auto_register")]

use crate::Typed;
use crate::registry::TypeRegistry;

/// A registration function submitted by `#[mapping(auto_register)]`.
pub struct AutoRegisterFunc(pub fn(&mut TypeRegistry));

inventory::collect!(AutoRegisterFunc);

/// Registers `T`; the function pointer derive output submits.
#[inline]
pub fn register_type<T: Typed>(registry: &mut TypeRegistry) {
    registry.register::<T>();
}

fn mark_available(registry: &mut TypeRegistry) {
    registry.auto_register_available = true;
}

// Collected together with user types, so its absence means the platform
// does not support static collection.
inventory::submit! { AutoRegisterFunc(mark_available) }

pub(super) fn register_all(registry: &mut TypeRegistry) -> bool {
    for func in inventory::iter::<AutoRegisterFunc> {
        (func.0)(registry);
    }
    registry.auto_register_available
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::any::TypeId;

    use crate::derive::impl_auto_register;
    use crate::registry::TypeRegistry;

    impl_auto_register!(Vec<u32>);

    #[test]
    fn foreign_types_are_collected() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.auto_register());
        assert!(registry.contains(TypeId::of::<Vec<u32>>()));
        assert!(registry.contains(TypeId::of::<u32>()));
    }
}
