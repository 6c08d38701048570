use crate::info::HookKind;
use crate::registry::TypeRegistry;
use crate::{Reflect, upcast, upcast_mut};

/// Runs the serialization hooks of `kind` declared along `value`'s hierarchy.
pub fn invoke(registry: &TypeRegistry, value: &dyn Reflect, kind: HookKind) {
    let hooks = registry.hooks(value.reflect_type_info(), kind);
    for hook in hooks.iter() {
        match upcast(value, hook.declaring_id()) {
            Some(owner) => hook.invoke(owner),
            None => log::warn!(
                "hook `{}` is not reachable from `{}`",
                hook.name(),
                value.reflect_type_info().type_path()
            ),
        }
    }
}

/// Runs the deserialization hooks of `kind` declared along `value`'s hierarchy.
pub fn invoke_mut(registry: &TypeRegistry, value: &mut dyn Reflect, kind: HookKind) {
    let info = value.reflect_type_info();
    let hooks = registry.hooks(info, kind);
    for hook in hooks.iter() {
        match upcast_mut(value, hook.declaring_id()) {
            Some(owner) => hook.invoke_mut(owner),
            None => log::warn!("hook `{}` is not reachable from `{}`", hook.name(), info.type_path()),
        }
    }
}
