//! Identifier case conversion between descriptor keys and database columns.

use heck::{ToLowerCamelCase, ToSnakeCase};

/// `userId` -> `user_id`, used for column names derived from descriptor keys.
pub fn snake(ident: &str) -> String {
    ident.to_snake_case()
}

/// `USER_ID` / `user_id` -> `userId`, used for result keys and field aliases.
///
/// Upper-case identifiers (HANA's default) are lowered first so that
/// `CREATED_AT` and `created_at` map to the same key.
pub fn camel(ident: &str) -> String {
    if ident.chars().any(|c| c.is_ascii_lowercase()) {
        ident.to_lower_camel_case()
    } else {
        ident.to_ascii_lowercase().to_lower_camel_case()
    }
}

/// Qualified names (`t.col`) are left as written; bare names are snake_cased.
pub fn column(ident: &str) -> String {
    if ident.contains('.') {
        ident.to_string()
    } else {
        snake(ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake() {
        assert_eq!(snake("userId"), "user_id");
        assert_eq!(snake("createdAt"), "created_at");
        assert_eq!(snake("name"), "name");
    }

    #[test]
    fn test_camel() {
        assert_eq!(camel("user_id"), "userId");
        assert_eq!(camel("USER_ID"), "userId");
        assert_eq!(camel("ID"), "id");
        assert_eq!(camel("createdAt"), "createdAt");
    }

    #[test]
    fn test_column_keeps_qualified_names() {
        assert_eq!(column("u.createdAt"), "u.createdAt");
        assert_eq!(column("createdAt"), "created_at");
    }
}
