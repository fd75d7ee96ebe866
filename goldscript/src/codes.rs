//! Engine error codes and their symbolic names.
//!
//! An engine error carries a numeric code; scripts assert on the stable
//! symbolic name instead, as `> exception <NAME>` lines. The table below is
//! the engine's public error-code surface, declared once and indexed lazily.
//! A code outside the table renders as its decimal value so a mismatch stays
//! readable instead of failing the lookup.

use std::collections::HashMap;
use std::sync::LazyLock;

macro_rules! error_codes {
    ($($(#[$meta:meta])* $name:ident = $code:literal;)*) => {
        $(
            $(#[$meta])*
            pub const $name: i32 = $code;
        )*

        /// Every known code paired with its symbolic name.
        pub const ERROR_CODE_NAMES: &[(i32, &str)] = &[
            $(($name, stringify!($name)),)*
        ];
    };
}

error_codes! {
    /// A character value was too long for its column or parameter.
    VALUE_TOO_LONG_2 = 22001;
    /// A numeric value was outside the range of its type.
    NUMERIC_VALUE_OUT_OF_RANGE_1 = 22003;
    /// A date/time constant could not be parsed.
    INVALID_DATETIME_CONSTANT_2 = 22007;
    /// Division by zero.
    DIVISION_BY_ZERO_1 = 22012;
    /// A value could not be converted to the required data type.
    DATA_CONVERSION_ERROR_1 = 22018;
    /// Invalid escape sequence in a LIKE pattern.
    LIKE_ESCAPE_ERROR_1 = 22025;
    /// NULL written to a NOT NULL column.
    NULL_NOT_ALLOWED = 23502;
    /// Referential integrity violated: a child row still references the row.
    REFERENTIAL_INTEGRITY_VIOLATED_CHILD_EXISTS_1 = 23503;
    /// Unique or primary key violated by a duplicate value.
    DUPLICATE_KEY_1 = 23505;
    /// Referential integrity violated: the referenced parent row is missing.
    REFERENTIAL_INTEGRITY_VIOLATED_PARENT_MISSING_1 = 23506;
    /// A column with no default was omitted from an insert.
    NO_DEFAULT_SET_1 = 23507;
    /// A check constraint rejected the row.
    CHECK_CONSTRAINT_VIOLATED_1 = 23513;
    /// A check constraint definition is invalid.
    CHECK_CONSTRAINT_INVALID = 23514;
    /// Wrong user name or password.
    WRONG_USER_OR_PASSWORD = 28000;
    /// Deadlock detected between sessions.
    DEADLOCK_1 = 40001;
    /// General syntax error.
    SYNTAX_ERROR_1 = 42000;
    /// Syntax error with an expected-token hint.
    SYNTAX_ERROR_2 = 42001;
    TABLE_OR_VIEW_ALREADY_EXISTS_1 = 42101;
    TABLE_OR_VIEW_NOT_FOUND_1 = 42102;
    INDEX_ALREADY_EXISTS_1 = 42111;
    INDEX_NOT_FOUND_1 = 42112;
    DUPLICATE_COLUMN_NAME_1 = 42121;
    COLUMN_NOT_FOUND_1 = 42122;
    /// Catch-all for unexpected engine failures.
    GENERAL_ERROR_1 = 50000;
    UNKNOWN_DATA_TYPE_1 = 50004;
    FEATURE_NOT_SUPPORTED_1 = 50100;
    /// A lock could not be acquired within the timeout.
    LOCK_TIMEOUT_1 = 50200;
    /// The statement was canceled or its session closed.
    STATEMENT_WAS_CANCELED = 57014;
    FUNCTION_MUST_RETURN_RESULT_SET_1 = 90000;
    METHOD_NOT_ALLOWED_FOR_QUERY = 90001;
    METHOD_ONLY_ALLOWED_FOR_QUERY = 90002;
    HEX_STRING_ODD_1 = 90003;
    HEX_STRING_WRONG_1 = 90004;
    OBJECT_CLOSED = 90007;
    INVALID_VALUE_2 = 90008;
    PARAMETER_NOT_SET_1 = 90012;
    PARSE_ERROR_1 = 90014;
    MUST_GROUP_BY_COLUMN_1 = 90016;
    SECOND_PRIMARY_KEY = 90017;
    FUNCTION_NOT_FOUND_1 = 90022;
    SERIALIZATION_FAILED_1 = 90026;
    IO_EXCEPTION_1 = 90028;
    USER_NOT_FOUND_1 = 90032;
    USER_ALREADY_EXISTS_1 = 90033;
    SEQUENCE_ALREADY_EXISTS_1 = 90035;
    SEQUENCE_NOT_FOUND_1 = 90036;
    VIEW_NOT_FOUND_1 = 90037;
    VIEW_ALREADY_EXISTS_1 = 90038;
    ADMIN_RIGHTS_REQUIRED = 90040;
    TRIGGER_ALREADY_EXISTS_1 = 90041;
    TRIGGER_NOT_FOUND_1 = 90042;
    CONSTRAINT_ALREADY_EXISTS_1 = 90045;
    SCALAR_SUBQUERY_CONTAINS_MORE_THAN_ONE_ROW = 90053;
    INVALID_USE_OF_AGGREGATE_FUNCTION_1 = 90054;
    CONSTRAINT_NOT_FOUND_1 = 90057;
    AMBIGUOUS_COLUMN_NAME_1 = 90059;
    FILE_CREATION_FAILED_1 = 90062;
    SAVEPOINT_IS_INVALID_1 = 90063;
    SAVEPOINT_IS_UNNAMED = 90064;
    SAVEPOINT_IS_NAMED = 90065;
    CONNECTION_BROKEN_1 = 90067;
    ORDER_BY_NOT_IN_RESULT = 90068;
    ROLE_ALREADY_EXISTS_1 = 90069;
    ROLE_NOT_FOUND_1 = 90070;
    USER_OR_ROLE_NOT_FOUND_1 = 90071;
    SCHEMA_ALREADY_EXISTS_1 = 90078;
    SCHEMA_NOT_FOUND_1 = 90079;
    SCHEMA_NAME_MUST_MATCH = 90080;
    COLUMN_IS_REFERENCED_1 = 90083;
    CANNOT_DROP_LAST_COLUMN = 90084;
    CLASS_NOT_FOUND_1 = 90086;
    METHOD_NOT_FOUND_1 = 90087;
    UNKNOWN_MODE_1 = 90088;
    DATABASE_IS_READ_ONLY = 90097;
    DATABASE_IS_CLOSED = 90098;
    EXCEPTION_IN_FUNCTION_1 = 90105;
    CANNOT_TRUNCATE_1 = 90106;
    CANNOT_DROP_2 = 90107;
    OUT_OF_MEMORY = 90108;
    ROW_NOT_FOUND_WHEN_DELETING_1 = 90112;
    UNSUPPORTED_SETTING_1 = 90113;
    CONSTANT_ALREADY_EXISTS_1 = 90114;
    CONSTANT_NOT_FOUND_1 = 90115;
    LITERALS_ARE_NOT_ALLOWED = 90116;
    CANNOT_DROP_TABLE_1 = 90118;
    CONCURRENT_UPDATE_1 = 90131;
    AGGREGATE_NOT_FOUND_1 = 90132;
}

static NAME_INDEX: LazyLock<HashMap<i32, &'static str>> =
    LazyLock::new(|| ERROR_CODE_NAMES.iter().copied().collect());

/// Look up the symbolic name of an engine error code.
pub fn error_code_name(code: i32) -> Option<&'static str> {
    NAME_INDEX.get(&code).copied()
}

/// Render a code the way exception result lines expect: the symbolic name,
/// or the decimal code when the table has no entry.
pub fn render_error_code(code: i32) -> String {
    match error_code_name(code) {
        Some(name) => name.to_string(),
        None => code.to_string(),
    }
}
