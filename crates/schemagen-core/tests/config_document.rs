use schemagen_core::{
    AxisKind, Dialect, GenerationConfig, GenerationError, KeyTypePolicy, VariableSpace,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Rows,
    Charsets,
}

impl AxisKind for Table {
    const GROUP: &'static str = "tables";
    const ALL: &'static [Self] = &[Table::Rows, Table::Charsets];

    fn name(self) -> &'static str {
        match self {
            Table::Rows => "rows",
            Table::Charsets => "charsets",
        }
    }

    fn defaults(self) -> &'static [&'static str] {
        match self {
            Table::Rows => &["0"],
            Table::Charsets => &["undef"],
        }
    }
}

const TOML_CONFIG: &str = r#"
dialect = "Doris"
key_type_policy = { mode = "random", seed = 42 }

[tables]
rows = [10, 20, 30]
charsets = ["utf8", "utf8mb4", "undef"]

[fields]
types = ["int", "varchar(20)"]
"#;

#[test]
fn toml_document_loads_into_spaces() {
    let value: serde_json::Value = toml::from_str(TOML_CONFIG).expect("parse toml");
    let config = GenerationConfig::from_value(value).expect("decode config");

    assert_eq!(config.dialect(), Dialect::Doris);
    assert_eq!(config.key_type_policy, KeyTypePolicy::Random { seed: 42 });

    let space = VariableSpace::<Table>::load(Some(&config.tables)).expect("load tables");
    assert_eq!(space.combinations(), 9);
    assert_eq!(space.axes()[0].values, vec!["10", "20", "30"]);
}

#[test]
fn json_document_with_bad_axis_fails_at_load() {
    let config = GenerationConfig::from_json_str(r#"{"tables": {"rows": [null]}}"#)
        .expect("decode config");
    let err = VariableSpace::<Table>::load(Some(&config.tables)).unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(_)));
}
