//! LDAP result code translation.

use georchestra_directory::error::{DirectoryError, DirectoryResult};

pub(crate) const SUCCESS: u32 = 0;
pub(crate) const NO_SUCH_ATTRIBUTE: u32 = 16;
pub(crate) const CONSTRAINT_VIOLATION: u32 = 19;
pub(crate) const ATTRIBUTE_OR_VALUE_EXISTS: u32 = 20;
pub(crate) const NO_SUCH_OBJECT: u32 = 32;
pub(crate) const INVALID_CREDENTIALS: u32 = 49;
pub(crate) const INSUFFICIENT_ACCESS_RIGHTS: u32 = 50;
pub(crate) const ENTRY_ALREADY_EXISTS: u32 = 68;

/// Translate an LDAP result code into the directory error taxonomy.
///
/// `dn` is the target entry and `attribute` the attribute being changed, when
/// the request concerned a single one.
pub(crate) fn check_result(
    rc: u32,
    text: &str,
    operation: &str,
    dn: &str,
    attribute: Option<&str>,
) -> DirectoryResult<()> {
    let attribute = attribute.unwrap_or("").to_string();
    match rc {
        SUCCESS => Ok(()),
        NO_SUCH_ATTRIBUTE => Err(DirectoryError::NoSuchValue {
            dn: dn.to_string(),
            attribute,
        }),
        CONSTRAINT_VIOLATION => Err(DirectoryError::ConstraintViolation {
            message: format!("{operation} on {dn}: {text}"),
        }),
        ATTRIBUTE_OR_VALUE_EXISTS => Err(DirectoryError::ValueAlreadyPresent {
            dn: dn.to_string(),
            attribute,
        }),
        NO_SUCH_OBJECT => Err(DirectoryError::ObjectNotFound {
            identifier: dn.to_string(),
        }),
        INVALID_CREDENTIALS => Err(DirectoryError::AuthenticationFailed),
        INSUFFICIENT_ACCESS_RIGHTS => Err(DirectoryError::AuthorizationFailed {
            operation: format!("{operation} on {dn}"),
        }),
        ENTRY_ALREADY_EXISTS => Err(DirectoryError::ObjectAlreadyExists {
            identifier: dn.to_string(),
        }),
        code => Err(DirectoryError::operation_failed_with_code(
            format!("LDAP {operation} on {dn} failed with code {code}: {text}"),
            code,
        )),
    }
}
