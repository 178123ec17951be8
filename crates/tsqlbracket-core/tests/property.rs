use proptest::prelude::*;
use tsqlbracket_core::{bracket_name, bracketize_script, BracketizeOptions};

proptest! {
    #[test]
    fn bracket_name_is_idempotent(name in "[\\[\\] a-zA-Z0-9_]{0,12}") {
        let once = bracket_name(&name);
        prop_assert_eq!(bracket_name(&once), once);
    }

    #[test]
    fn script_rewrite_is_idempotent_and_keeps_aliases(
        schema in "s_[a-z]{1,6}",
        table in "t_[a-z]{1,6}",
        column in "c_[a-z]{1,6}",
        table_alias in "a_[a-z]{1,6}",
        column_alias in "n_[a-z]{1,6}",
    ) {
        let script = format!(
            "SELECT {table_alias}.{column} AS {column_alias} FROM {schema}.{table} AS {table_alias}\nGO\nSELECT {column} FROM {table}\n"
        );
        let options = BracketizeOptions::default();

        let once = bracketize_script(&script, &options);
        let twice = bracketize_script(&once.sql, &options);

        prop_assert!(once.changed);
        prop_assert!(!twice.changed, "second pass changed: {}", twice.sql);
        prop_assert_eq!(&once.sql, &twice.sql);

        let qualified_column = format!("{table_alias}.[{column}] AS {column_alias}");
        let relation = format!("[{schema}].[{table}] AS {table_alias}");
        prop_assert!(once.sql.contains(&qualified_column), "{}", once.sql);
        prop_assert!(once.sql.contains(&relation), "{}", once.sql);
    }
}
