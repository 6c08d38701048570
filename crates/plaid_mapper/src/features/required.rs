use crate::MapError;
use crate::info::markers::Required;
use crate::info::{MemberInfo, TypeInfo};
use crate::value::Value;

/// Checks a required member against its source data.
///
/// `source` is `None` when the key or index is absent from the data. Null
/// counts as missing only when the marker asks for a null check.
///
/// ```
/// use plaid_mapper::features::required::check;
/// use plaid_mapper::info::markers::Required;
/// use plaid_mapper::info::MemberInfo;
/// use plaid_mapper::{Typed, Value};
///
/// let member: &'static MemberInfo = Box::leak(Box::new(MemberInfo::new::<(), i32>("id")));
/// let owner = i32::type_info();
/// let required = Required { null_check: true };
///
/// assert!(check(owner, member, Some(&required), Some(&Value::from(1))).is_ok());
/// assert!(check(owner, member, Some(&required), Some(&Value::Null)).is_err());
/// assert!(check(owner, member, Some(&required), None).is_err());
/// assert!(check(owner, member, None, None).is_ok());
/// ```
pub fn check(
    owner: &'static TypeInfo,
    member: &MemberInfo,
    required: Option<&Required>,
    source: Option<&Value>,
) -> Result<(), MapError> {
    let reason = match (required, source) {
        (None, _) => return Ok(()),
        (Some(_), None) => "missing",
        (Some(required), Some(Value::Null)) if required.null_check => "null",
        (Some(_), Some(_)) => return Ok(()),
    };
    Err(MapError::RequiredMemberMissing {
        member: member.name(),
        owner: owner.type_path(),
        reason,
    })
}
