//! Helpers for the two uuid spellings used by the game: the 32 character
//! "trimmed" form passed on the command line and the hyphenated form.

use crate::error::{LauncherError, LauncherResult};
use uuid::Uuid;

fn parse(value: &str) -> LauncherResult<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| LauncherError::InvalidUuid {
        value: value.to_string(),
    })
}

/// `aceb326f-da15-45bc-bf2f-11940c21780c` -> `aceb326fda1545bcbf2f11940c21780c`
pub fn trim_uuid(value: &str) -> LauncherResult<String> {
    Ok(parse(value)?.simple().to_string())
}

/// `aceb326fda1545bcbf2f11940c21780c` -> `aceb326f-da15-45bc-bf2f-11940c21780c`
pub fn expand_uuid(value: &str) -> LauncherResult<String> {
    Ok(parse(value)?.hyphenated().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIMMED: &str = "aceb326fda1545bcbf2f11940c21780c";
    const EXPANDED: &str = "aceb326f-da15-45bc-bf2f-11940c21780c";

    #[test]
    fn trims_and_expands() {
        assert_eq!(trim_uuid(EXPANDED).unwrap(), TRIMMED);
        assert_eq!(trim_uuid(TRIMMED).unwrap(), TRIMMED);
        assert_eq!(expand_uuid(TRIMMED).unwrap(), EXPANDED);
    }

    #[test]
    fn rejects_garbage() {
        let err = trim_uuid("not-a-uuid").unwrap_err();
        assert!(matches!(err, LauncherError::InvalidUuid { .. }));
    }
}
