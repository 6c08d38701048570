//! Paths used by `#[derive(Mapped)]` output.
//!
//! The derive only names items through this module, so the public layout of
//! the crate can change without touching generated code.

pub mod macro_utils {
    pub use alloc::boxed::Box;
    pub use alloc::vec;
    pub use alloc::vec::Vec;
    pub use core::any::TypeId;
    pub use core::option::Option::{self, None, Some};
    pub use core::result::Result::{self, Err, Ok};

    pub use crate::info::markers::{Markers, Participant, Required, Role, RoleKind, XmlRoot};
    pub use crate::info::{
        BaseLink, EnumInfo, GenericTypeInfoCell, HookInfo, HookKind, MemberInfo, NonGenericTypeInfoCell, ObjectInfo,
        Resolution, Type, TypeInfo, TypeKind,
    };
    pub use crate::{Blank, Reflect, ReflectMut, ReflectRef, Typed};
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use crate::registry::{AutoRegisterFunc, register_type};
    pub use inventory;
}
